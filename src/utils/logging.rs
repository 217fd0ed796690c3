use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;
use std::time::Instant;

pub struct Logger;

impl Logger {
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("appbundle=info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    pub fn build_start(namespace: &str, build_dir: &str, dist_dir: &str) {
        info!("📦 Generating app files: {}", namespace);
        info!("  • www build: {}", build_dir);
        info!("  • distribution: {}", dist_dir);
    }

    pub fn skipped_fatal(namespace: &str) {
        warn!("⛔ {}: upstream fatal diagnostics, skipping app file generation", namespace);
    }

    pub fn bundling_global(name: &str, entry: &str) {
        debug!("🌐 Bundling global for {}: {}", name, entry);
    }

    pub fn variant_composed(core_id: &str, filename: &str, changed: bool) {
        if changed {
            debug!("🧩 Core {} -> {}", core_id, filename);
        } else {
            debug!("🧩 Core {} unchanged ({})", core_id, filename);
        }
    }

    pub fn artifact_queued(kind: &str, path: &str) {
        debug!("build, app {}: {}", kind, path);
    }

    pub fn build_complete(namespace: &str, files_changed: usize, build_time: std::time::Duration) {
        info!("✅ {}: {} app file(s) changed in {:.2?}", namespace, files_changed, build_time);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
