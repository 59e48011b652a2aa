pub(crate) mod adapter;
pub(crate) mod emphasis;
pub(crate) mod engines;
pub(crate) mod generic;
pub mod names;
pub(crate) mod registry;
pub(crate) mod variant;
