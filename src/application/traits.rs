//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::Path;

use crate::core::error::Result;

/// Turns a folder into a function project
#[async_trait]
pub trait ProjectInitializer: Send + Sync {
    async fn initialize(&self, project_root: &Path) -> Result<()>;
}

/// Makes sure the project has a storage connection configured
///
/// Only consulted for templates whose trigger is not HTTP.
#[async_trait]
pub trait StorageValidator: Send + Sync {
    async fn ensure_storage(&self, project_root: &Path) -> Result<()>;
}

/// Shows a newly created file to the user
#[async_trait]
pub trait FileOpener: Send + Sync {
    async fn open(&self, path: &Path) -> Result<()>;
}
