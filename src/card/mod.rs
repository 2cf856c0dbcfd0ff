pub(crate) mod fields;
pub(crate) mod session;
pub(crate) mod slot;
pub(crate) mod state;
pub(crate) mod store;
