use crate::core::interfaces::Bundler;
use crate::core::models::SourceTarget;
use crate::utils::{AppBuildError, Logger, Result};
use async_trait::async_trait;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Treats a global entry as already bundled: reads it relative to the project
/// root and checks that it parses. Target syntax lowering happens upstream.
pub struct FileSystemBundler {
    root: PathBuf,
}

impl FileSystemBundler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, entry: &Path) -> PathBuf {
        if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            self.root.join(entry)
        }
    }
}

pub fn check_syntax(code: &str, path: &Path) -> Result<()> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    let parsed = Parser::new(&allocator, code, source_type).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        let errors: Vec<String> = parsed
            .errors
            .iter()
            .map(|e| format!("Parse error: {}", e))
            .collect();
        return Err(AppBuildError::Bundle(format!(
            "{}: {}",
            path.display(),
            if errors.is_empty() { "parser aborted".to_string() } else { errors.join("\n") }
        )));
    }

    Ok(())
}

#[async_trait]
impl Bundler for FileSystemBundler {
    async fn bundle(&self, entry: &Path, target: SourceTarget) -> Result<String> {
        let path = self.resolve(entry);
        Logger::debug(&format!("Bundling {} ({})", path.display(), target));

        let code = fs::read_to_string(&path)
            .await
            .map_err(|e| AppBuildError::Bundle(format!("{}: {}", path.display(), e)))?;

        check_syntax(&code, &path)?;
        Ok(code)
    }
}
