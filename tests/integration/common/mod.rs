#![allow(dead_code)]

use appbundle::core::core_bundle::CORE_POLYFILLS;
use appbundle::core::interfaces::{Bundler, JsMinifier, MinifyOutput};
use appbundle::core::models::*;
use appbundle::core::naming::CORE_STATIC_NAME;
use appbundle::core::services::AppFilesService;
use appbundle::infrastructure::{Blake3Hasher, InMemoryAssetLoader, OxcMinifier};
use appbundle::utils::{AppBuildError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const CORE_TEMPLATE: &str = "var core=true;\n\
/*#if listener*/function attachListeners(){}\n/*#endif listener*/\
/*#if slot*/function relocateSlots(){}\n/*#endif slot*/\
/*#if es5*/var legacyRuntime=true;\n/*#endif es5*/\
/*#if !es5*/var modernRuntime=true;\n/*#endif es5*/\
bootstrap(Context,appNamespace,publicPath);\n";

pub const LOADER_TEMPLATE: &str = "(function(w,d,x,n,h,c,r){var s=d.currentScript;r=n;})(window,document,\"__APP__\");";

/// Serves fixed code per entry path. Slow entries finish last.
#[derive(Default)]
pub struct FakeBundler {
    sources: HashMap<PathBuf, String>,
    delays: HashMap<PathBuf, u64>,
}

impl FakeBundler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, path: &str, code: &str) -> Self {
        self.sources.insert(PathBuf::from(path), code.to_string());
        self
    }

    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays.insert(PathBuf::from(path), millis);
        self
    }
}

#[async_trait]
impl Bundler for FakeBundler {
    async fn bundle(&self, entry: &Path, target: SourceTarget) -> Result<String> {
        if let Some(millis) = self.delays.get(entry) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        let code = self
            .sources
            .get(entry)
            .ok_or_else(|| AppBuildError::Bundle(format!("cannot resolve {}", entry.display())))?;
        Ok(match target {
            SourceTarget::Es2015 => code.clone(),
            SourceTarget::Es5 => format!("/*es5*/{}", code),
        })
    }
}

pub struct PassthroughMinifier;

impl JsMinifier for PassthroughMinifier {
    fn minify(&self, code: &str, _target: SourceTarget) -> MinifyOutput {
        MinifyOutput {
            output: code.to_string(),
            diagnostics: Vec::new(),
        }
    }
}

pub fn client_assets() -> InMemoryAssetLoader {
    let mut assets = InMemoryAssetLoader::new()
        .with_asset(CORE_STATIC_NAME, CORE_TEMPLATE)
        .with_asset("loader.js", LOADER_TEMPLATE);
    for file in CORE_POLYFILLS {
        assets = assets.with_asset(&format!("polyfills/{}", file), &format!("/*polyfill:{}*/", file));
    }
    assets
}

pub fn service(bundler: FakeBundler, assets: InMemoryAssetLoader) -> AppFilesService {
    AppFilesService::new(
        Arc::new(bundler),
        Arc::new(assets),
        Arc::new(PassthroughMinifier),
        Arc::new(Blake3Hasher),
    )
}

pub fn minifying_service(bundler: FakeBundler, assets: InMemoryAssetLoader) -> AppFilesService {
    AppFilesService::new(
        Arc::new(bundler),
        Arc::new(assets),
        Arc::new(OxcMinifier::new()),
        Arc::new(Blake3Hasher),
    )
}

pub fn dev_config(namespace: &str) -> BuildConfig {
    BuildConfig {
        namespace: namespace.to_string(),
        root: PathBuf::from("/project"),
        build_dir: PathBuf::from("/project/www/build"),
        dist_dir: PathBuf::from("/project/dist"),
        ..Default::default()
    }
}

pub fn prod_config(namespace: &str) -> BuildConfig {
    BuildConfig {
        hash_file_names: true,
        es5_fallback: true,
        dev_mode: false,
        ..dev_config(namespace)
    }
}

pub fn component(tag: &str) -> ComponentMeta {
    let mut meta = ComponentMeta::new(tag);
    meta.bundle_ids.insert("$".to_string(), format!("{}-bundle", tag));
    meta
}

pub fn input(components: Vec<ComponentMeta>) -> AppBuildInput {
    AppBuildInput {
        manifest_bundles: vec![ManifestBundle {
            bundle_id: "main".to_string(),
            components,
        }],
        dependent_manifests: Vec::new(),
    }
}
