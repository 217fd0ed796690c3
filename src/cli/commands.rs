use crate::core::{models::*, services::*, interfaces::*, context::BuildContext};
use crate::infrastructure::{TokioFileSystemService, FileSystemBundler, DirectoryAssetLoader, OxcMinifier, Blake3Hasher};
use crate::utils::{Logger, BuildUI, ConfigLoader, CliOverrides};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "appbundle")]
#[command(about = "appbundle - assembles core, loader and registry files for a component library")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the app files from compiled component output
    Build {
        /// Root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Config file (defaults to <root>/appbundle.config.json)
        #[arg(short, long)]
        config: Option<String>,
        /// Compiled component manifest (defaults to <root>/manifest.json)
        #[arg(short, long)]
        manifest: Option<String>,
        /// Override the app namespace
        #[arg(long)]
        namespace: Option<String>,
        /// Production build: hashed names, minification and ES5 fallback
        #[arg(long)]
        prod: bool,
        /// Build the polyfilled ES5 core
        #[arg(long)]
        es5: bool,
        /// Disable minification
        #[arg(long)]
        no_minify: bool,
        /// Skip the www output tree
        #[arg(long)]
        no_www: bool,
        /// Skip the distribution output tree
        #[arg(long)]
        no_dist: bool,
    },
    /// Print an example appbundle.config.json
    Init,
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        // Initialize logging
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Build {
                root,
                config,
                manifest,
                namespace,
                prod,
                es5,
                no_minify,
                no_www,
                no_dist,
            } => {
                let overrides = CliOverrides {
                    namespace,
                    prod,
                    es5,
                    no_minify,
                    no_www,
                    no_dist,
                };
                self.handle_build_command(&root, config.as_deref(), manifest.as_deref(), &overrides).await
            }
            Commands::Init => {
                println!("{}", ConfigLoader::generate_example());
                Ok(())
            }
        }
    }

    async fn handle_build_command(
        &self,
        root: &str,
        config_path: Option<&str>,
        manifest_path: Option<&str>,
        overrides: &CliOverrides,
    ) -> Result<()> {
        let root = PathBuf::from(root);
        let file_config = ConfigLoader::load_from_file(&root, config_path.map(Path::new))
            .context("Failed to load config")?;
        let config = ConfigLoader::merge_with_cli(file_config, root.clone(), overrides)
            .context("Invalid config")?;

        let ui = BuildUI::new();
        ui.show_banner(&config.namespace);
        Logger::build_start(
            &config.namespace,
            &config.build_dir.display().to_string(),
            &config.dist_dir.display().to_string(),
        );

        let manifest_path = manifest_path
            .map(PathBuf::from)
            .unwrap_or_else(|| root.join("manifest.json"));
        let input = load_build_input(&manifest_path).await?;

        let service = AppFilesService::new(
            Arc::new(FileSystemBundler::new(root.clone())),
            Arc::new(DirectoryAssetLoader::new(config.static_dir.clone())),
            Arc::new(OxcMinifier::new()),
            Arc::new(Blake3Hasher),
        );

        let ctx = BuildContext::new();
        let registry = service
            .generate_app_files(&config, &input, &ctx)
            .await
            .with_context(|| format!("Failed to generate app files for {}", config.namespace))?;

        ui.show_diagnostics(&ctx.diagnostics.snapshot());

        if registry.is_none() {
            bail!("{}: app files were not generated", config.namespace);
        }

        let fs_service = TokioFileSystemService;
        let written = fs_service
            .write_files(&ctx.take_files_to_write())
            .await
            .context("Failed to write app files")?;

        ui.show_completion(&written, ctx.files_changed());
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the compile stage's manifest; a missing manifest means no components.
async fn load_build_input(path: &Path) -> Result<AppBuildInput> {
    if !path.exists() {
        Logger::warn(&format!("No manifest at {}, building a minimal core", path.display()));
        return Ok(AppBuildInput::default());
    }

    let content = TokioFileSystemService
        .read_file(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
