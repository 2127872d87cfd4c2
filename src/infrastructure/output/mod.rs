//! Where tool output and created files are shown

pub mod console;

pub use console::*;
