//! Saved drawings: the snapshot shape and the stores that keep it.

pub(crate) mod snapshot;
pub(crate) mod store;
