use crate::core::models::{Capability, ManifestBundle, SourceTarget};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Flag-set describing which optional runtime blocks a core variant keeps.
///
/// Built by [`resolve_conditionals`], specialised once with
/// [`BuildConditionals::into_variant`] and [`BuildConditionals::with_override`],
/// then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConditionals {
    core_id: String,
    target: SourceTarget,
    enabled: BTreeSet<Capability>,
}

impl BuildConditionals {
    fn from_capabilities(enabled: BTreeSet<Capability>) -> Self {
        Self {
            core_id: "core".to_string(),
            target: SourceTarget::Es2015,
            enabled,
        }
    }

    pub fn into_variant(mut self, core_id: &str, target: SourceTarget) -> Self {
        self.core_id = core_id.to_string();
        self.target = target;
        self
    }

    /// Force-enables a variant-level flag regardless of static usage.
    pub fn with_override(mut self, capability: Capability) -> Self {
        self.enabled.insert(capability);
        self
    }

    pub fn core_id(&self) -> &str {
        &self.core_id
    }

    pub fn target(&self) -> SourceTarget {
        self.target
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
            || self
                .enabled
                .iter()
                .any(|enabled| enabled.implies().contains(&capability))
    }

    pub fn polyfills(&self) -> bool {
        self.is_enabled(Capability::Polyfills)
    }

    /// Enabled capability names, in a stable order.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        Capability::ALL
            .iter()
            .filter(|cap| self.is_enabled(**cap))
            .map(|cap| cap.as_str())
            .collect()
    }
}

/// OR of every component's statically referenced capabilities.
///
/// No bundles or no components yields the minimal, all-false core.
pub fn resolve_conditionals(bundles: &[ManifestBundle]) -> BuildConditionals {
    let enabled = bundles
        .par_iter()
        .flat_map(|bundle| bundle.components.par_iter())
        .map(|component| component.capabilities())
        .reduce(BTreeSet::new, |mut acc, caps| {
            acc.extend(caps);
            acc
        });

    BuildConditionals::from_capabilities(enabled)
}
