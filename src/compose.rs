pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod session;
pub(crate) mod style;
pub(crate) mod surface;
