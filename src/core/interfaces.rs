use crate::core::models::*;
use crate::utils::Result;
use std::path::{Path, PathBuf};
use async_trait::async_trait;

/// Bundles a global entry point into a single script for the given target syntax.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, entry: &Path, target: SourceTarget) -> Result<String>;
}

/// Minification never fails the build: problems come back as diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MinifyOutput {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Output never uses syntax newer than `target`.
pub trait JsMinifier: Send + Sync {
    fn minify(&self, code: &str, target: SourceTarget) -> MinifyOutput;
}

/// Deterministic digest of content, rendered to exactly `length` characters.
pub trait ContentHasher: Send + Sync {
    fn hash(&self, content: &str, length: usize) -> String;
}

/// Loads the fixed client templates (core, loader, polyfills) by static name.
#[async_trait]
pub trait StaticAssetLoader: Send + Sync {
    async fn load(&self, static_name: &str) -> Result<String>;
}

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;

    /// Flushes a build's write set, in path order.
    async fn write_files(&self, files: &[(PathBuf, String)]) -> Result<Vec<OutputFile>> {
        let mut written = Vec::with_capacity(files.len());
        for (path, content) in files {
            self.write_file(path, content).await?;
            written.push(OutputFile {
                path: path.clone(),
                content: content.clone(),
                size: content.len(),
            });
        }
        Ok(written)
    }
}
