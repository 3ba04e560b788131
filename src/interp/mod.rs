pub(crate) mod frames;
pub(crate) mod timeline;
