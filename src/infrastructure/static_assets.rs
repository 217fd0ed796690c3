use crate::core::interfaces::StaticAssetLoader;
use crate::utils::{AppBuildError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Reads client templates from a directory such as `client/`:
/// `core.build.js`, `loader.js`, `polyfills/*.js`.
pub struct DirectoryAssetLoader {
    root: PathBuf,
}

impl DirectoryAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, static_name: &str) -> Result<PathBuf> {
        let relative = Path::new(static_name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(AppBuildError::Asset(format!(
                "static name must stay inside the asset directory: {}",
                static_name
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StaticAssetLoader for DirectoryAssetLoader {
    async fn load(&self, static_name: &str) -> Result<String> {
        let path = self.resolve(static_name)?;
        fs::read_to_string(&path).await.map_err(|e| {
            AppBuildError::Asset(format!("{}: {}", path.display(), e))
        })
    }
}

/// Templates held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetLoader {
    assets: HashMap<String, String>,
}

impl InMemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, static_name: &str, content: &str) -> Self {
        self.assets.insert(static_name.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl StaticAssetLoader for InMemoryAssetLoader {
    async fn load(&self, static_name: &str) -> Result<String> {
        self.assets
            .get(static_name)
            .cloned()
            .ok_or_else(|| AppBuildError::Asset(format!("unknown static asset: {}", static_name)))
    }
}
