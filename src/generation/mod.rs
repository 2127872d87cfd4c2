//! Generation domain module - decides what a new function looks like
//!
//! This module holds the language and runtime model, the naming rules, the
//! typed setting resolution and the two creation strategies. It talks to the
//! user only through the [`Prompter`] port.

pub mod context;
pub mod creator;
pub mod rules;
pub mod settings;
pub mod traits;
pub mod types;

pub use context::*;
pub use creator::*;
pub use settings::*;
pub use traits::*;
pub use types::*;
