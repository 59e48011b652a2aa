pub(crate) mod aggregate;
pub(crate) mod fragment;
