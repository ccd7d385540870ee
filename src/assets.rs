pub(crate) mod decode;
pub(crate) mod fallback;
pub(crate) mod resolver;
pub(crate) mod store;
pub(crate) mod text;
