//! Prompter implementations

pub mod scripted;
pub mod terminal;

pub use scripted::*;
pub use terminal::*;
