use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Byte source for named templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Load the path-description string for a template name.
    async fn load(&self, name: &str) -> Result<String>;

    /// True when the backing store is reachable.
    async fn health_check(&self) -> bool;
}

/// Filesystem-backed store reading templates from a single directory.
pub struct FsTemplateStore {
    svg_dir: PathBuf,
}

impl FsTemplateStore {
    pub fn new(svg_dir: PathBuf) -> Self {
        FsTemplateStore { svg_dir }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        // Template names must be bare file names
        let candidate = Path::new(name);
        let escapes = candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || candidate.components().count() != 1 {
            return Err(AppError::BadRequest(format!(
                "invalid template name: {name}"
            )));
        }
        Ok(self.svg_dir.join(name))
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::TemplateNotFound(name.to_string()))
            }
            Err(e) => Err(AppError::Internal(format!(
                "failed to read template {name}: {e}"
            ))),
        }
    }

    async fn health_check(&self) -> bool {
        self.svg_dir.is_dir()
    }
}
