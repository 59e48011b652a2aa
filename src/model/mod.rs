pub(crate) mod header;
pub(crate) mod mirror;
pub(crate) mod paired;
pub(crate) mod script;
