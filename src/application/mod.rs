//! Application layer - orchestrates use cases and coordinates between domains

pub mod create_function;
pub mod dto;
pub mod project;
pub mod project_settings;
pub mod template_selection;
pub mod traits;

pub use create_function::*;
pub use dto::*;
pub use project::*;
pub use project_settings::*;
pub use template_selection::*;
pub use traits::*;
