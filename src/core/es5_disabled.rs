// Stand-in for the polyfilled core during development builds without an
// ES5 fallback, so legacy browsers show why nothing rendered.

use crate::core::context::BuildContext;
use crate::core::models::BuildConfig;
use crate::core::naming::{app_www_build_dir, ES5_DISABLED_FILE_NAME};

const DISABLED_MESSAGE_HTML: &str = r#"
  <style>
  body {
    font-family: sans-serif;
    padding: 20px;
    line-height:22px;
  }
  h1 {
    font-size: 18px;
  }
  h2 {
    font-size: 14px;
    margin-top: 40px;
  }
  </style>

  <h1>This app is disabled for this browser.</h1>

  <h2>Developers:</h2>
  <ul>
    <li>ES5 builds are disabled <strong>during development</strong> to keep rebuilds fast.</li>
    <li>Set <code>es5Fallback</code> in appbundle.config.json, or build with <code>--es5</code>, to develop on a browser without ES2015 and custom elements support.</li>
    <li>Production builds (<code>--prod</code>) always include the ES5 build and polyfills.</li>
  </ul>

  <h2>Current Browser's Support:</h2>
  <ul>
    <li>ES Module Imports: <span id="esModules"></span></li>
    <li>Custom Elements: <span id="customElements"></span></li>
    <li>fetch(): <span id="fetch"></span></li>
  </ul>
  "#;

pub fn disabled_message_script() -> String {
    let html: String = DISABLED_MESSAGE_HTML
        .replace(['\r', '\n'], "")
        .replace('\'', "\\'");

    let script = format!(
        "\n    document.body.innerHTML = '{}';\n\n    document.getElementById('esModules').textContent = !!('noModule' in document.createElement('script'));\n    document.getElementById('customElements').textContent = !!(window.customElements);\n    document.getElementById('fetch').textContent = !!(window.fetch);\n  ",
        html.trim()
    );

    // <body> may not exist yet when the loader picks this file
    format!("setTimeout(function(){{ {} }}, 10)", script)
}

/// Queues the message script once per build session and returns the file name
/// the loader should use as its polyfilled core.
pub fn generate_es5_disabled_message(config: &BuildConfig, ctx: &BuildContext) -> String {
    let script = disabled_message_script();

    if ctx.ledger().record("es5-disabled", &script) {
        let path = app_www_build_dir(config).join(ES5_DISABLED_FILE_NAME);
        ctx.queue_write(path, &script);
        ctx.increment_files_changed();
    }

    ES5_DISABLED_FILE_NAME.to_string()
}
