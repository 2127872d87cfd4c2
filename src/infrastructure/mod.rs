//! Infrastructure layer - concrete implementations of domain ports

pub mod local_settings;
pub mod output;
pub mod project_init;
pub mod prompt;
pub mod shell;
pub mod templates;

pub use local_settings::*;
pub use output::*;
pub use project_init::*;
pub use prompt::*;
pub use shell::*;
pub use templates::*;
