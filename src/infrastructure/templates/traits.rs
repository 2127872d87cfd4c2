//! Template catalog traits for the infrastructure layer

use async_trait::async_trait;

use crate::core::error::Result;
use crate::generation::{Language, Runtime, TemplateFilter};
use crate::infrastructure::templates::types::*;

/// Read-only access to templates and their setting definitions
///
/// The workflow only consumes this trait; how the catalog is stored and parsed
/// is up to the implementation.
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    /// Templates offered for a language, runtime and filter, in display order
    async fn eligible_templates(
        &self,
        language: Language,
        runtime: Runtime,
        filter: TemplateFilter,
    ) -> Result<Vec<Template>>;

    /// Definition of a setting for a trigger binding type, if the catalog has one
    async fn setting(
        &self,
        runtime: Runtime,
        binding_type: &str,
        name: &str,
    ) -> Result<Option<ConfigSetting>>;
}
