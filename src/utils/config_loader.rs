use crate::core::models::BuildConfig;
use crate::utils::{Logger, AppBuildError, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "appbundle.config.json";

/// CLI values that override the config file when present.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub namespace: Option<String>,
    pub prod: bool,
    pub es5: bool,
    pub no_minify: bool,
    pub no_www: bool,
    pub no_dist: bool,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `appbundle.config.json` from `root`, or the explicit `config_path`.
    pub fn load_from_file(root: &Path, config_path: Option<&Path>) -> Result<Option<BuildConfig>> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.join(CONFIG_FILE_NAME));

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)
            .map_err(AppBuildError::Io)?;

        let config: BuildConfig = serde_json::from_str(&content)
            .map_err(|e| AppBuildError::config(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            )))?;

        Ok(Some(config))
    }

    /// Merge file config with CLI arguments (CLI takes precedence) and resolve
    /// relative directories against `root`.
    pub fn merge_with_cli(file_config: Option<BuildConfig>, root: PathBuf, cli: &CliOverrides) -> Result<BuildConfig> {
        let mut config = file_config.unwrap_or_default();

        if let Some(namespace) = &cli.namespace {
            config.namespace = namespace.clone();
        }

        if cli.prod {
            config.dev_mode = false;
            config.hash_file_names = true;
            config.minify_js = true;
            config.es5_fallback = true;
        }
        if cli.es5 {
            config.es5_fallback = true;
        }
        if cli.no_minify {
            config.minify_js = false;
        }
        if cli.no_www {
            config.generate_www = false;
        }
        if cli.no_dist {
            config.generate_distribution = false;
        }

        config.build_dir = resolve_dir(&root, &config.build_dir);
        config.dist_dir = resolve_dir(&root, &config.dist_dir);
        config.static_dir = resolve_dir(&root, &config.static_dir);
        config.root = root;

        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &BuildConfig) -> Result<()> {
        let namespace = config.namespace.trim();
        if namespace.is_empty() {
            return Err(AppBuildError::config("namespace is required".to_string()));
        }

        let mut chars = namespace.chars();
        let valid_start = chars.next().map(|c| c.is_ascii_alphabetic() || c == '_').unwrap_or(false);
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AppBuildError::config(format!(
                "namespace '{}' must be a JavaScript identifier",
                namespace
            )));
        }

        if !(4..=32).contains(&config.hashed_file_name_length) {
            return Err(AppBuildError::config(format!(
                "hashedFileNameLength must be between 4 and 32, got {}",
                config.hashed_file_name_length
            )));
        }

        Ok(())
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let example = BuildConfig::default();
        serde_json::to_string_pretty(&example).unwrap_or_else(|_| {
            r#"{
  "namespace": "App",
  "buildDir": "www/build",
  "distDir": "dist",
  "publicPath": "/build",
  "staticDir": "client"
}"#.to_string()
        })
    }
}

fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}
