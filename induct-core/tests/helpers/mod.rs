//! Shared fixtures for unit tests.


pub mod fleet;

pub use self::fleet::*;
