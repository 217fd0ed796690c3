use crate::core::interfaces::{JsMinifier, MinifyOutput};
use crate::core::models::{Diagnostic, SourceTarget};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use oxc_syntax::es_target::ESTarget;

/// JavaScript minification using oxc
///
/// The compressor's lowest target is ES2015 and minified codegen may print
/// strings with backticks, so ES5 output is only mangled and printed with
/// plain quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcMinifier;

impl OxcMinifier {
    pub fn new() -> Self {
        Self
    }

    fn options(target: SourceTarget) -> MinifierOptions {
        let compress = match target {
            SourceTarget::Es2015 => Some(CompressOptions {
                target: ESTarget::ES2015,
                ..CompressOptions::default()
            }),
            SourceTarget::Es5 => None,
        };

        MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress,
        }
    }

    fn codegen_options(target: SourceTarget) -> CodegenOptions {
        match target {
            SourceTarget::Es2015 => CodegenOptions::minify(),
            SourceTarget::Es5 => CodegenOptions {
                minify: false,
                indent_width: 0,
                ..CodegenOptions::minify()
            },
        }
    }
}

impl JsMinifier for OxcMinifier {
    fn minify(&self, source_code: &str, target: SourceTarget) -> MinifyOutput {
        let allocator = Allocator::default();
        // app scripts are classic scripts, not modules
        let source_type = SourceType::cjs();

        let parse_result = Parser::new(&allocator, source_code, source_type).parse();

        if parse_result.panicked || !parse_result.errors.is_empty() {
            let diagnostics = parse_result
                .errors
                .iter()
                .map(|e| Diagnostic::warning(format!("Minify parse error: {}", e)))
                .collect::<Vec<_>>();
            return MinifyOutput {
                output: source_code.to_string(),
                diagnostics: if diagnostics.is_empty() {
                    vec![Diagnostic::warning("Minify parse error: parser aborted")]
                } else {
                    diagnostics
                },
            };
        }

        let mut program = parse_result.program;
        let minified = Minifier::new(Self::options(target)).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(Self::codegen_options(target))
            .with_scoping(minified.scoping)
            .build(&program)
            .code;

        MinifyOutput {
            output: code,
            diagnostics: Vec::new(),
        }
    }
}
