//! Template model, catalog port and materialization

pub mod filesystem_catalog;
pub mod manifest;
pub mod renderer;
pub mod traits;
pub mod types;

pub use filesystem_catalog::*;
pub use renderer::FUNCTION_JSON;
pub use traits::*;
pub use types::*;
