//! Capability-guarded regions in the fixed core template.
//!
//! ```text
//! /*#if listener*/ ... /*#endif listener*/
//! /*#if !es5*/ ... /*#endif es5*/
//! ```
//!
//! The template is parsed into a tree once and rendered per variant. A region
//! whose condition does not hold is removed completely; markers never reach the
//! output.

use crate::core::conditionals::BuildConditionals;
use crate::core::models::Capability;
use crate::utils::{AppBuildError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static REGION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\*#(if|endif)\s+(!?)\s*([A-Za-z_][A-Za-z0-9_]*)\s*\*/").expect("valid region marker regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Region {
        capability: Capability,
        negated: bool,
        children: Vec<Segment>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreTemplate {
    segments: Vec<Segment>,
}

struct OpenRegion {
    capability: Capability,
    negated: bool,
    children: Vec<Segment>,
}

impl CoreTemplate {
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut root: Vec<Segment> = Vec::new();
        let mut stack: Vec<OpenRegion> = Vec::new();
        let mut cursor = 0;

        for caps in REGION_MARKER.captures_iter(source) {
            let Some(marker) = caps.get(0) else { continue };
            let text = &source[cursor..marker.start()];
            push_text(current_children(&mut root, &mut stack), text);
            cursor = marker.end();

            let capability: Capability = caps[3]
                .parse()
                .map_err(|e: String| AppBuildError::template(name, e))?;
            let negated = !caps[2].is_empty();

            match &caps[1] {
                "if" => stack.push(OpenRegion {
                    capability,
                    negated,
                    children: Vec::new(),
                }),
                _ => {
                    let open = stack.pop().ok_or_else(|| {
                        AppBuildError::template(
                            name,
                            format!("'#endif {}' without matching '#if'", capability),
                        )
                    })?;
                    if open.capability != capability {
                        return Err(AppBuildError::template(
                            name,
                            format!(
                                "'#endif {}' closes region '{}'",
                                capability, open.capability
                            ),
                        ));
                    }
                    current_children(&mut root, &mut stack).push(Segment::Region {
                        capability: open.capability,
                        negated: open.negated,
                        children: open.children,
                    });
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(AppBuildError::template(
                name,
                format!("region '{}' is never closed", open.capability),
            ));
        }

        push_text(&mut root, &source[cursor..]);

        Ok(Self { segments: root })
    }

    pub fn render(&self, flags: &BuildConditionals) -> String {
        let mut output = String::new();
        render_segments(&self.segments, flags, &mut output);
        output
    }
}

fn current_children<'a>(root: &'a mut Vec<Segment>, stack: &'a mut [OpenRegion]) -> &'a mut Vec<Segment> {
    match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

fn render_segments(segments: &[Segment], flags: &BuildConditionals, output: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Region { capability, negated, children } => {
                if flags.is_enabled(*capability) != *negated {
                    render_segments(children, flags, output);
                }
            }
        }
    }
}
