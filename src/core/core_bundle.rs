use crate::core::conditionals::BuildConditionals;
use crate::core::context::BuildContext;
use crate::core::interfaces::{ContentHasher, JsMinifier, StaticAssetLoader};
use crate::core::models::{BuildConfig, CoreOutput};
use crate::core::models::SourceTarget;
use crate::core::naming::{app_dir_targets, app_public_path, core_file_name, js_string_literal, CORE_STATIC_NAME};
use crate::core::regions::CoreTemplate;
use crate::utils::{Logger, Result};
use futures::future::try_join_all;

/// Sentinel in the core's self-location query, replaced by the real file name
/// after hashing so the hash never depends on the name it produces.
pub const APP_CORE_FILENAME_PLACEHOLDER: &str = "__APP_CORE_FILENAME__";

/// Later polyfills may rely on earlier ones.
pub const CORE_POLYFILLS: [&str; 7] = [
    "document-register-element.js",
    "object-assign.js",
    "promise.js",
    "fetch.js",
    "closest.js",
    "request-animation-frame.js",
    "performance-now.js",
];

pub fn generate_preamble(config: &BuildConfig) -> String {
    match config.preamble.as_deref().map(str::trim) {
        Some(preamble) if !preamble.is_empty() => {
            format!("/*! {} */\n", preamble.replace("*/", "* /"))
        }
        _ => "/*! Built with appbundle */\n".to_string(),
    }
}

/// Wraps the merged script in one self-invoking function.
///
/// At startup the bundle looks for
/// `<script data-core="<this file>" data-path="...">` in the host document and,
/// when present, takes `publicPath` from its `data-path`, so the build output
/// can be served from another location without rebuilding.
pub fn wrap_core_js(config: &BuildConfig, js_content: &str) -> String {
    [
        generate_preamble(config),
        "(function(Context,appNamespace,hydratedCssClass,publicPath){".to_string(),
        "\"use strict\";\n".to_string(),
        format!(
            "var s=document.querySelector(\"script[data-core='{}'][data-path]\");",
            APP_CORE_FILENAME_PLACEHOLDER
        ),
        "if(s){publicPath=s.getAttribute('data-path');}\n".to_string(),
        js_content.trim().to_string(),
        format!(
            "\n}})({{}},{},{},{});",
            js_string_literal(&config.namespace),
            js_string_literal(&config.hydrated_css_class),
            js_string_literal(&app_public_path(config))
        ),
    ]
    .concat()
}

pub async fn load_core_polyfills(assets: &dyn StaticAssetLoader) -> Result<String> {
    let loads = CORE_POLYFILLS
        .iter()
        .map(|file| async move { assets.load(&format!("polyfills/{}", file)).await });

    let sources = try_join_all(loads).await?;
    Ok(sources.join("\n").trim().to_string())
}

pub struct CoreComposer<'a> {
    config: &'a BuildConfig,
    assets: &'a dyn StaticAssetLoader,
    minifier: &'a dyn JsMinifier,
    hasher: &'a dyn ContentHasher,
}

impl<'a> CoreComposer<'a> {
    pub fn new(
        config: &'a BuildConfig,
        assets: &'a dyn StaticAssetLoader,
        minifier: &'a dyn JsMinifier,
        hasher: &'a dyn ContentHasher,
    ) -> Self {
        Self { config, assets, minifier, hasher }
    }

    /// Loads the fixed core template and composes the variant described by `flags`.
    pub async fn generate_core(
        &self,
        global_fragments: &[String],
        flags: &BuildConditionals,
        ctx: &BuildContext,
    ) -> Result<CoreOutput> {
        let source = self.assets.load(CORE_STATIC_NAME).await?;
        let template = CoreTemplate::parse(CORE_STATIC_NAME, &source)?;
        self.compose_core(&template, global_fragments, flags, ctx).await
    }

    pub async fn compose_core(
        &self,
        template: &CoreTemplate,
        global_fragments: &[String],
        flags: &BuildConditionals,
        ctx: &BuildContext,
    ) -> Result<CoreOutput> {
        Logger::debug(&format!(
            "{} ({}): {}",
            flags.core_id(),
            flags.target(),
            flags.enabled_names().join(", ")
        ));
        let core_content = template.render(flags);

        let mut js_content = match self.global_content(global_fragments, flags.target(), ctx) {
            Some(globals) => format!("{}\n{}", globals, core_content),
            None => core_content,
        };

        js_content = wrap_core_js(self.config, &js_content);

        if flags.polyfills() {
            let polyfills = load_core_polyfills(self.assets).await?;
            js_content = format!("{}\n{}", polyfills, js_content);
        }

        let filename = self.build_filename(flags.core_id(), &js_content);

        if !ctx.ledger().record(flags.core_id(), &js_content) {
            Logger::variant_composed(flags.core_id(), &filename, false);
            let content = js_content.replace(APP_CORE_FILENAME_PLACEHOLDER, &filename);
            return Ok(CoreOutput { filename, content, changed: false });
        }

        let content = js_content.replace(APP_CORE_FILENAME_PLACEHOLDER, &filename);

        for path in app_dir_targets(self.config, &filename) {
            Logger::artifact_queued("core", &path.display().to_string());
            ctx.queue_write(path, &content);
        }
        ctx.increment_files_changed();

        Logger::variant_composed(flags.core_id(), &filename, true);
        Ok(CoreOutput { filename, content, changed: true })
    }

    /// Joined global fragments, minified for the variant's target when configured.
    fn global_content(
        &self,
        global_fragments: &[String],
        target: SourceTarget,
        ctx: &BuildContext,
    ) -> Option<String> {
        let globals = global_fragments.join("\n").trim().to_string();
        if globals.is_empty() {
            return None;
        }

        if !self.config.minify_js {
            return Some(globals);
        }

        let minified = self.minifier.minify(&globals, target);
        if minified.diagnostics.is_empty() {
            Some(minified.output.trim().to_string())
        } else {
            ctx.diagnostics.extend(minified.diagnostics);
            Some(globals)
        }
    }

    /// Content hash in prod, variant id in dev.
    pub fn build_filename(&self, core_id: &str, js_content: &str) -> String {
        if self.config.hash_file_names {
            let hash = self.hasher.hash(js_content, self.config.hashed_file_name_length);
            core_file_name(self.config, &hash)
        } else {
            core_file_name(self.config, core_id)
        }
    }
}
