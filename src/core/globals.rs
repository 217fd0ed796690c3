use crate::core::context::BuildContext;
use crate::core::core_bundle::generate_preamble;
use crate::core::interfaces::Bundler;
use crate::core::models::{BuildConfig, DependentManifest, Diagnostic, SourceTarget};
use crate::core::naming::{app_dir_targets, app_public_path, global_file_name, js_string_literal};
use crate::utils::{BuildExpressionReplacer, Logger};
use futures::future::join_all;
use std::path::Path;

/// A global entry point owned by a dependency collection or the project itself.
#[derive(Debug, Clone, Copy)]
pub struct GlobalEntry<'a> {
    pub name: &'a str,
    pub entry: Option<&'a Path>,
}

impl<'a> From<&'a DependentManifest> for GlobalEntry<'a> {
    fn from(manifest: &'a DependentManifest) -> Self {
        Self {
            name: &manifest.manifest_name,
            entry: manifest.global.as_deref(),
        }
    }
}

/// Bundles and wraps every global entry for one target syntax.
///
/// Dependencies come first in manifest order and the project comes last, so
/// project code can observe and override what dependencies declared. Entries
/// are bundled concurrently but collected by index. Entries without a path
/// contribute nothing; failed entries are reported as diagnostics.
pub async fn assemble_globals(
    bundler: &dyn Bundler,
    replacer: &BuildExpressionReplacer,
    project: GlobalEntry<'_>,
    dependents: &[GlobalEntry<'_>],
    target: SourceTarget,
    ctx: &BuildContext,
) -> Vec<String> {
    let entries: Vec<GlobalEntry<'_>> = dependents
        .iter()
        .copied()
        .chain(std::iter::once(project))
        .collect();

    let tasks = entries
        .iter()
        .map(|entry| bundle_global(bundler, replacer, *entry, target, ctx));

    join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect()
}

async fn bundle_global(
    bundler: &dyn Bundler,
    replacer: &BuildExpressionReplacer,
    global: GlobalEntry<'_>,
    target: SourceTarget,
    ctx: &BuildContext,
) -> Option<String> {
    let entry = global.entry.filter(|path| !path.as_os_str().is_empty())?;

    Logger::bundling_global(global.name, &entry.display().to_string());

    match bundler.bundle(entry, target).await {
        Ok(code) => {
            let code = replacer.replace_in_code(&code);
            Some(wrap_global_js(global.name, &code))
        }
        Err(err) => {
            ctx.diagnostics.push(
                Diagnostic::error(format!("failed to bundle {} global: {}", global.name, err))
                    .with_source(entry.display().to_string()),
            );
            Some(String::new())
        }
    }
}

/// Isolates one global in its own function scope fed only `publicPath`.
pub fn wrap_global_js(name: &str, code: &str) -> String {
    let body = format!("\n/** {} global **/\n\n{}", name, code.trim());

    let indented: Vec<String> = body
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect();

    format!("\n(function(publicPath){{{}\n}})(publicPath);\n", indented.join("\n"))
}

/// Standalone global script: all fragments inside one scope carrying the
/// namespace and public path.
pub fn generate_global_js(config: &BuildConfig, fragments: &[String]) -> String {
    [
        generate_preamble(config),
        "(function(appNamespace,publicPath){".to_string(),
        "\"use strict\";\n".to_string(),
        fragments.join("\n").trim().to_string(),
        format!(
            "\n}})({},{});",
            js_string_literal(&config.namespace),
            js_string_literal(&app_public_path(config))
        ),
    ]
    .concat()
}

/// Queues the global file for `target` when any fragment has content.
/// Returns the file name recorded in the registry.
pub fn generate_app_global(
    config: &BuildConfig,
    ctx: &BuildContext,
    fragments: &[String],
    target: SourceTarget,
) -> Option<String> {
    if fragments.iter().all(|fragment| fragment.trim().is_empty()) {
        return None;
    }

    let file_name = global_file_name(config, target);
    let content = generate_global_js(config, fragments);

    let ledger_key = match target {
        SourceTarget::Es2015 => "global",
        SourceTarget::Es5 => "global.es5",
    };

    if ctx.ledger().record(ledger_key, &content) {
        for path in app_dir_targets(config, &file_name) {
            Logger::artifact_queued("global", &path.display().to_string());
            ctx.queue_write(path, &content);
        }
        ctx.increment_files_changed();
    }

    Some(file_name)
}
