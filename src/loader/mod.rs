pub(crate) mod dir;
