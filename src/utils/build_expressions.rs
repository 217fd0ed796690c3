use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NODE_ENV_COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"process\.env\.NODE_ENV\s*(===|==|!==|!=)\s*['"](production|development)['"]"#)
        .expect("valid NODE_ENV comparison regex")
});

static NODE_ENV_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"process\.env\.NODE_ENV\b").expect("valid NODE_ENV regex")
});

static IMPORT_META_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"import\.meta\.env\.(DEV|PROD)\b").expect("valid import.meta.env regex")
});

/// Replaces environment-conditional expressions in global code with fixed
/// literals so a later minify pass can drop the dead branches.
#[derive(Debug, Clone)]
pub struct BuildExpressionReplacer {
    dev_mode: bool,
}

impl BuildExpressionReplacer {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    pub fn mode(&self) -> &'static str {
        if self.dev_mode {
            "development"
        } else {
            "production"
        }
    }

    pub fn replace_in_code(&self, code: &str) -> String {
        let mode = self.mode();

        // comparisons first, the bare pattern would otherwise eat their left side
        let result = NODE_ENV_COMPARISON.replace_all(code, |caps: &Captures| {
            let equality = matches!(&caps[1], "===" | "==");
            let matches_mode = &caps[2] == mode;
            (equality == matches_mode).to_string()
        });

        let result = NODE_ENV_BARE.replace_all(&result, format!("\"{}\"", mode).as_str());

        let result = IMPORT_META_MODE.replace_all(&result, |caps: &Captures| {
            let is_dev = &caps[1] == "DEV";
            (is_dev == self.dev_mode).to_string()
        });

        result.into_owned()
    }
}
