use crate::core::context::BuildContext;
use crate::core::core_bundle::generate_preamble;
use crate::core::interfaces::{JsMinifier, StaticAssetLoader};
use crate::core::models::{AppRegistry, BuildConfig, SourceTarget};
use crate::core::naming::{app_public_path, js_string_literal, loader_file_name, loader_targets, LOADER_NAME};
use crate::utils::{AppBuildError, Logger, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static APP_NAMESPACE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']__APP__['"]"#).expect("valid loader marker regex")
});

/// Registry path of the loader, relative to the app build directory.
pub fn loader_registry_path(config: &BuildConfig) -> String {
    format!("../{}", loader_file_name(config))
}

/// Substitutes the single `"__APP__"` marker with the loader arguments.
///
/// The marker must occur exactly once; anything else is a broken template and
/// nothing is substituted.
pub fn inject_app_into_loader(
    config: &BuildConfig,
    template_name: &str,
    core_file_name: &str,
    core_polyfilled_file_name: &str,
    components: &[serde_json::Value],
    loader_content: &str,
) -> Result<String> {
    let occurrences = APP_NAMESPACE_MARKER.find_iter(loader_content).count();
    if occurrences != 1 {
        return Err(AppBuildError::template(
            template_name,
            format!("expected exactly one \"__APP__\" marker, found {}", occurrences),
        ));
    }

    let registry_json = serde_json::to_string(components)?;
    let replacement = format!(
        "{},{},{},{},{}",
        js_string_literal(&config.namespace),
        js_string_literal(&app_public_path(config)),
        js_string_literal(core_file_name),
        js_string_literal(core_polyfilled_file_name),
        registry_json
    );

    Ok(APP_NAMESPACE_MARKER
        .replace(loader_content, regex::NoExpand(&replacement))
        .into_owned())
}

pub struct LoaderGenerator<'a> {
    config: &'a BuildConfig,
    assets: &'a dyn StaticAssetLoader,
    minifier: &'a dyn JsMinifier,
}

impl<'a> LoaderGenerator<'a> {
    pub fn new(
        config: &'a BuildConfig,
        assets: &'a dyn StaticAssetLoader,
        minifier: &'a dyn JsMinifier,
    ) -> Self {
        Self { config, assets, minifier }
    }

    /// Builds the loader script, queueing it only when it differs from the
    /// previous build's loader.
    pub async fn generate_loader(&self, ctx: &BuildContext, registry: &AppRegistry) -> Result<String> {
        let template_name = format!("{}.js", LOADER_NAME);
        let template = self.assets.load(&template_name).await?;

        let core = registry.core.as_deref().unwrap_or_default();
        let core_polyfilled = registry.core_polyfilled.as_deref().unwrap_or_default();

        let mut loader_content = inject_app_into_loader(
            self.config,
            &template_name,
            core,
            core_polyfilled,
            &registry.components,
            &template,
        )?;

        // legacy browsers run the loader to pick their core
        if self.config.minify_js {
            let minified = self.minifier.minify(&loader_content, SourceTarget::Es5);
            if minified.diagnostics.is_empty() {
                loader_content = minified.output;
            } else {
                for diagnostic in &minified.diagnostics {
                    Logger::warn(&format!("loader minify: {}", diagnostic));
                }
                ctx.diagnostics.extend(minified.diagnostics);
            }
        }

        let loader_content = format!("{}{}", generate_preamble(self.config), loader_content)
            .trim()
            .to_string();

        if ctx.ledger().record("loader", &loader_content) {
            for path in loader_targets(self.config) {
                Logger::artifact_queued("loader", &path.display().to_string());
                ctx.queue_write(path, &loader_content);
            }
            ctx.increment_files_changed();
        }

        Ok(loader_content)
    }
}
