pub(crate) mod format;
pub(crate) mod scene;
pub(crate) mod style;
pub(crate) mod svg;
