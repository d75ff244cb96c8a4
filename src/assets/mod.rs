pub(crate) mod decode;
pub(crate) mod scan;
pub(crate) mod store;
