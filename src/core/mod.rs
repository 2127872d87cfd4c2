//! Core building blocks shared by every layer
//!
//! Configuration, the crate error type and small string helpers.

pub mod config;
pub mod error;
pub mod utils;

pub use error::Error;
