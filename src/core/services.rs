use crate::core::conditionals::resolve_conditionals;
use crate::core::context::BuildContext;
use crate::core::core_bundle::CoreComposer;
use crate::core::es5_disabled::generate_es5_disabled_message;
use crate::core::globals::{assemble_globals, generate_app_global, GlobalEntry};
use crate::core::interfaces::*;
use crate::core::loader::{loader_registry_path, LoaderGenerator};
use crate::core::models::*;
use crate::core::registry::{format_component_registry, generate_app_registry};
use crate::utils::{BuildExpressionReplacer, Logger, Result, Timer};
use std::sync::Arc;
use std::time::Instant;

/// Final assembly stage: turns compiled component output into the core
/// variants, globals, registry and loader of one app.
pub struct AppFilesService {
    bundler: Arc<dyn Bundler>,
    assets: Arc<dyn StaticAssetLoader>,
    minifier: Arc<dyn JsMinifier>,
    hasher: Arc<dyn ContentHasher>,
}

impl AppFilesService {
    pub fn new(
        bundler: Arc<dyn Bundler>,
        assets: Arc<dyn StaticAssetLoader>,
        minifier: Arc<dyn JsMinifier>,
        hasher: Arc<dyn ContentHasher>,
    ) -> Self {
        Self {
            bundler,
            assets,
            minifier,
            hasher,
        }
    }

    /// Generates every app artifact into `ctx`'s write set.
    ///
    /// Returns `Ok(None)` without touching the write set when upstream
    /// diagnostics already hold a fatal error. A failing core variant is
    /// reported as a diagnostic and does not stop the other variant.
    pub async fn generate_app_files(
        &self,
        config: &BuildConfig,
        input: &AppBuildInput,
        ctx: &BuildContext,
    ) -> Result<Option<AppRegistry>> {
        if ctx.diagnostics.has_fatal() {
            Logger::skipped_fatal(&config.namespace);
            return Ok(None);
        }

        let _timer = Timer::start(&format!("generateAppFiles: {}", config.namespace));
        let started = Instant::now();

        let mut registry = AppRegistry {
            namespace: config.namespace.clone(),
            components: format_component_registry(input.components()),
            ..Default::default()
        };

        let replacer = BuildExpressionReplacer::new(config.dev_mode);
        let dependents: Vec<GlobalEntry<'_>> = input
            .dependent_manifests
            .iter()
            .map(GlobalEntry::from)
            .collect();
        let project = GlobalEntry {
            name: &config.namespace,
            entry: config.global.as_deref(),
        };

        let modern_globals = assemble_globals(
            self.bundler.as_ref(),
            &replacer,
            project,
            &dependents,
            SourceTarget::Es2015,
            ctx,
        );

        let (globals, globals_es5) = if config.es5_fallback {
            let legacy_globals = assemble_globals(
                self.bundler.as_ref(),
                &replacer,
                project,
                &dependents,
                SourceTarget::Es5,
                ctx,
            );
            let (modern, legacy) = tokio::join!(modern_globals, legacy_globals);
            (modern, Some(legacy))
        } else {
            (modern_globals.await, None)
        };

        // which runtime sections each core variant needs
        let flags = resolve_conditionals(&input.manifest_bundles);
        let composer = CoreComposer::new(
            config,
            self.assets.as_ref(),
            self.minifier.as_ref(),
            self.hasher.as_ref(),
        );

        let modern_flags = flags.clone().into_variant("core", SourceTarget::Es2015);
        let modern = composer.generate_core(&globals, &modern_flags, ctx);

        let (modern_result, legacy_result) = match &globals_es5 {
            Some(es5_globals) => {
                let legacy_flags = flags
                    .into_variant("core.pf", SourceTarget::Es5)
                    .with_override(Capability::Es5)
                    .with_override(Capability::Polyfills)
                    .with_override(Capability::CustomSlot);
                let legacy = composer.generate_core(es5_globals, &legacy_flags, ctx);
                let (modern, legacy) = tokio::join!(modern, legacy);
                (modern, Some(legacy))
            }
            None => (modern.await, None),
        };

        registry.core = record_variant("core", modern_result, ctx);

        match legacy_result {
            Some(result) => registry.core_polyfilled = record_variant("core.pf", result, ctx),
            None if config.generate_www => {
                registry.core_polyfilled = Some(generate_es5_disabled_message(config, ctx));
            }
            None => {}
        }

        registry.global = generate_app_global(config, ctx, &globals, SourceTarget::Es2015);
        if let Some(es5_globals) = &globals_es5 {
            registry.global_es5 = generate_app_global(config, ctx, es5_globals, SourceTarget::Es5);
        }

        if registry.core.is_some() {
            let loader = LoaderGenerator::new(config, self.assets.as_ref(), self.minifier.as_ref());
            match loader.generate_loader(ctx, &registry).await {
                Ok(_) => registry.loader = Some(loader_registry_path(config)),
                Err(err) => {
                    Logger::error(&format!("loader: {}", err));
                    ctx.diagnostics.push(Diagnostic::error(err.to_string()).with_source("loader"));
                }
            }
        } else {
            ctx.diagnostics.push(
                Diagnostic::error("loader skipped: no core bundle was produced").with_source("loader"),
            );
        }

        generate_app_registry(config, ctx, &registry)?;

        Logger::build_complete(&config.namespace, ctx.files_changed(), started.elapsed());

        Ok(Some(registry))
    }
}

fn record_variant(core_id: &str, result: Result<CoreOutput>, ctx: &BuildContext) -> Option<String> {
    match result {
        Ok(output) => Some(output.filename),
        Err(err) => {
            Logger::error(&format!("{}: {}", core_id, err));
            ctx.diagnostics.push(Diagnostic::error(err.to_string()).with_source(core_id));
            None
        }
    }
}
