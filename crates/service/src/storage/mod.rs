//! Storage abstractions for service layer
//!
//! Contains the file-backed snapshot helper used by stores that persist a
//! small collection as JSON.

pub mod snapshot;
