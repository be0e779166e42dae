//! Entity definitions shared by the service and server crates.

pub mod user;

pub use user::{User, UserInput};
