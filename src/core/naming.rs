// Output file naming. These names are consumed by the runtime loader and
// downstream builds, so they must not drift.

use crate::core::models::{BuildConfig, SourceTarget};
use std::path::PathBuf;

pub const GLOBAL_NAME: &str = "global";
pub const LOADER_NAME: &str = "loader";
pub const CORE_STATIC_NAME: &str = "core.build.js";
pub const ES5_DISABLED_FILE_NAME: &str = "es5-build-disabled.js";

pub fn app_file_name(config: &BuildConfig) -> String {
    config.namespace.to_lowercase()
}

/// `<publicPath>/<app>/` with forward slashes and no doubled separators.
pub fn app_public_path(config: &BuildConfig) -> String {
    let joined = format!("{}/{}", config.public_path, app_file_name(config));
    let mut normalized = normalize_url_path(&joined);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn normalize_url_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (prefix, rest) = split_url_origin(&path);

    let mut output = String::with_capacity(path.len());
    output.push_str(prefix);
    let mut last_was_slash = false;
    for ch in rest.chars() {
        if ch == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        output.push(ch);
    }
    output
}

/// Splits off a `scheme://` or protocol-relative `//` prefix, which must keep its slashes.
fn split_url_origin(path: &str) -> (&str, &str) {
    if let Some(idx) = path.find("://") {
        let scheme = &path[..idx];
        let is_scheme = scheme
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic())
            .unwrap_or(false)
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme {
            return path.split_at(idx + 3);
        }
    }
    if path.starts_with("//") {
        return path.split_at(2);
    }
    ("", path)
}

/// `value` as a double-quoted JavaScript string literal.
pub fn js_string_literal(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

pub fn core_file_name(config: &BuildConfig, variant_or_hash: &str) -> String {
    format!("{}.{}.js", app_file_name(config), variant_or_hash)
}

pub fn global_file_name(config: &BuildConfig, target: SourceTarget) -> String {
    let suffix = match target {
        SourceTarget::Es5 => ".es5",
        SourceTarget::Es2015 => "",
    };
    format!("{}.{}{}.js", app_file_name(config), GLOBAL_NAME, suffix)
}

pub fn loader_file_name(config: &BuildConfig) -> String {
    format!("{}.js", app_file_name(config))
}

pub fn registry_file_name(config: &BuildConfig) -> String {
    format!("{}.registry.json", app_file_name(config))
}

pub fn app_www_build_dir(config: &BuildConfig) -> PathBuf {
    config.build_dir.join(app_file_name(config))
}

pub fn app_dist_dir(config: &BuildConfig) -> PathBuf {
    config.dist_dir.join(app_file_name(config))
}

/// Destinations for a file that lives inside the app directory of each output tree.
pub fn app_dir_targets(config: &BuildConfig, file_name: &str) -> Vec<PathBuf> {
    output_targets(
        config,
        app_www_build_dir(config).join(file_name),
        app_dist_dir(config).join(file_name),
    )
}

pub fn loader_targets(config: &BuildConfig) -> Vec<PathBuf> {
    let file_name = loader_file_name(config);
    output_targets(
        config,
        config.build_dir.join(&file_name),
        config.dist_dir.join(&file_name),
    )
}

pub fn registry_targets(config: &BuildConfig) -> Vec<PathBuf> {
    let file_name = registry_file_name(config);
    output_targets(
        config,
        app_www_build_dir(config).join(&file_name),
        config.dist_dir.join(&file_name),
    )
}

/// Each output tree is enabled independently; both enabled means two identical writes.
fn output_targets(config: &BuildConfig, www: PathBuf, dist: PathBuf) -> Vec<PathBuf> {
    let mut targets = Vec::with_capacity(2);
    if config.generate_www {
        targets.push(www);
    }
    if config.generate_distribution {
        targets.push(dist);
    }
    targets
}
