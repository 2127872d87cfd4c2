//! funcgen - add functions to an Azure Functions project from templates
//!
//! The crate is layered the same way top to bottom:
//! - [`application`]: the create-function use case and its project checks
//! - [`generation`]: languages, naming rules, setting resolution and the
//!   script/Java creation strategies
//! - [`infrastructure`]: template catalog, prompts, subprocesses and
//!   `local.settings.json`
//! - [`core`]: configuration, errors and string helpers
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;

pub use crate::core::error::{Error, Result};
