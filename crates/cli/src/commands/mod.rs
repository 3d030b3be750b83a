pub(crate) mod label;
pub(crate) mod schema;
pub(crate) mod submit;
pub(crate) mod sync;
