pub(crate) mod gif;
pub(crate) mod png;
pub(crate) mod sink;
