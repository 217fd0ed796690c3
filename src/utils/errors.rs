use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppBuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A fixed template (core, loader, polyfill) violates its marker contract.
    #[error("Template error in {template}: {message}")]
    Template { template: String, message: String },

    #[error("Bundle error: {0}")]
    Bundle(String),

    #[error("Static asset error: {0}")]
    Asset(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Build error: {message}")]
    Build { message: String },
}

impl AppBuildError {
    pub fn build(message: String) -> Self {
        Self::Build { message }
    }

    pub fn config(message: String) -> Self {
        Self::Config(message)
    }

    pub fn template(template: &str, message: String) -> Self {
        Self::Template {
            template: template.to_string(),
            message,
        }
    }

    /// Template errors are fatal for the artifact being generated, never for the build.
    pub fn is_template_error(&self) -> bool {
        matches!(self, AppBuildError::Template { .. })
    }
}

pub type Result<T> = std::result::Result<T, AppBuildError>;
