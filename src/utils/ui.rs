use crate::core::models::{Diagnostic, OutputFile, Severity};
use colored::*;
use std::time::Instant;

pub struct BuildUI {
    start_time: Instant,
}

impl BuildUI {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn show_banner(&self, namespace: &str) {
        println!("\n  {} {}", "APPBUNDLE".bright_cyan().bold(), namespace.bright_white());
        println!();
    }

    pub fn show_diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            let label = match diagnostic.severity {
                Severity::Fatal => "fatal".bright_red().bold(),
                Severity::Error => "error".red(),
                Severity::Warning => "warn".yellow(),
            };
            match &diagnostic.source {
                Some(source) => println!("  {} {} {}", label, source.bright_black(), diagnostic.message),
                None => println!("  {} {}", label, diagnostic.message),
            }
        }
    }

    pub fn show_completion(&self, files: &[OutputFile], files_changed: usize) {
        let build_time = self.start_time.elapsed();

        println!();
        if files.is_empty() {
            println!("  {}", "no app files changed".bright_black());
        }
        for file in files {
            println!("  {} {}",
                file.path.display().to_string().bright_cyan(),
                format!("({})", format_size(file.size)).bright_black()
            );
        }

        println!();
        println!("  {} {} app file(s) changed in {}",
            "✓".bright_green(),
            files_changed.to_string().bright_white().bold(),
            format!("{:.0}ms", build_time.as_secs_f64() * 1000.0).bright_white().bold()
        );
    }
}

fn format_size(size: usize) -> String {
    let size_kb = size as f64 / 1024.0;
    if size_kb < 1.0 {
        format!("{} B", size)
    } else {
        format!("{:.2} kB", size_kb)
    }
}

impl Default for BuildUI {
    fn default() -> Self {
        Self::new()
    }
}
