// Session state: the persisted record and its two-state lifecycle.

pub mod models;
pub mod store;
