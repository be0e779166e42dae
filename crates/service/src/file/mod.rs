//! File-backed store implementations.

pub mod user_store;
