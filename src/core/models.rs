use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    #[serde(default = "default_public_path")]
    pub public_path: String,
    /// Directory holding `core.build.js`, `loader.js` and `polyfills/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Project global entry point.
    #[serde(default)]
    pub global: Option<PathBuf>,
    #[serde(default = "default_hydrated_css_class")]
    pub hydrated_css_class: String,
    #[serde(default)]
    pub hash_file_names: bool,
    #[serde(default = "default_hash_length")]
    pub hashed_file_name_length: usize,
    #[serde(default)]
    pub minify_js: bool,
    #[serde(default)]
    pub es5_fallback: bool,
    #[serde(default = "default_true", rename = "generateWWW")]
    pub generate_www: bool,
    #[serde(default)]
    pub generate_distribution: bool,
    #[serde(default = "default_true")]
    pub dev_mode: bool,
    #[serde(default)]
    pub preamble: Option<String>,
}

fn default_namespace() -> String {
    "App".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("www/build")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public_path() -> String {
    "/build".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("client")
}

fn default_hydrated_css_class() -> String {
    "hydrated".to_string()
}

fn default_hash_length() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            root: default_root(),
            build_dir: default_build_dir(),
            dist_dir: default_dist_dir(),
            public_path: default_public_path(),
            static_dir: default_static_dir(),
            global: None,
            hydrated_css_class: default_hydrated_css_class(),
            hash_file_names: false,
            hashed_file_name_length: default_hash_length(),
            minify_js: false,
            es5_fallback: false,
            generate_www: true,
            generate_distribution: false,
            dev_mode: true,
            preamble: None,
        }
    }
}

/// Target syntax of a bundle variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTarget {
    Es2015,
    Es5,
}

impl SourceTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTarget::Es2015 => "es2015",
            SourceTarget::Es5 => "es5",
        }
    }
}

impl fmt::Display for SourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional runtime capability that the core template guards with a named region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Slot,
    CustomSlot,
    Listener,
    Event,
    Method,
    Element,
    PropConnect,
    PropContext,
    ObserveAttr,
    WillLoad,
    DidLoad,
    WillUpdate,
    DidUpdate,
    DidUnload,
    HostData,
    ShadowDom,
    ScopedCss,
    Styles,
    Svg,
    Es5,
    Polyfills,
}

impl Capability {
    pub const ALL: [Capability; 21] = [
        Capability::Slot,
        Capability::CustomSlot,
        Capability::Listener,
        Capability::Event,
        Capability::Method,
        Capability::Element,
        Capability::PropConnect,
        Capability::PropContext,
        Capability::ObserveAttr,
        Capability::WillLoad,
        Capability::DidLoad,
        Capability::WillUpdate,
        Capability::DidUpdate,
        Capability::DidUnload,
        Capability::HostData,
        Capability::ShadowDom,
        Capability::ScopedCss,
        Capability::Styles,
        Capability::Svg,
        Capability::Es5,
        Capability::Polyfills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Slot => "slot",
            Capability::CustomSlot => "customSlot",
            Capability::Listener => "listener",
            Capability::Event => "event",
            Capability::Method => "method",
            Capability::Element => "element",
            Capability::PropConnect => "propConnect",
            Capability::PropContext => "propContext",
            Capability::ObserveAttr => "observeAttr",
            Capability::WillLoad => "willLoad",
            Capability::DidLoad => "didLoad",
            Capability::WillUpdate => "willUpdate",
            Capability::DidUpdate => "didUpdate",
            Capability::DidUnload => "didUnload",
            Capability::HostData => "hostData",
            Capability::ShadowDom => "shadowDom",
            Capability::ScopedCss => "scopedCss",
            Capability::Styles => "styles",
            Capability::Svg => "svg",
            Capability::Es5 => "es5",
            Capability::Polyfills => "polyfills",
        }
    }

    /// Capabilities whose blocks are force-enabled when this one is enabled.
    pub fn implies(&self) -> &'static [Capability] {
        match self {
            Capability::CustomSlot => &[Capability::Slot],
            _ => &[],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| format!("unknown capability '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Prop,
    PropMutable,
    State,
    Method,
    Element,
    PropConnect,
    PropContext,
}

impl MemberKind {
    /// Numeric member type understood by the runtime loader.
    pub fn runtime_code(&self) -> u8 {
        match self {
            MemberKind::Prop => 1,
            MemberKind::PropMutable => 2,
            MemberKind::State => 5,
            MemberKind::Element => 7,
            MemberKind::Method => 6,
            MemberKind::PropConnect => 3,
            MemberKind::PropContext => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropType {
    Any,
    String,
    Boolean,
    Number,
}

impl PropType {
    pub fn runtime_code(&self) -> u8 {
        match self {
            PropType::Any => 1,
            PropType::String => 2,
            PropType::Boolean => 3,
            PropType::Number => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMeta {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub attr_name: Option<String>,
    #[serde(default)]
    pub prop_type: Option<PropType>,
    #[serde(default)]
    pub reflect_to_attr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerMeta {
    pub event_name: String,
    pub method_name: String,
    #[serde(default)]
    pub capture: bool,
    #[serde(default)]
    pub passive: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub event_name: String,
    #[serde(default)]
    pub bubbles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotUsage {
    #[default]
    None,
    Default,
    Named,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Encapsulation {
    #[default]
    None,
    ShadowDom,
    Scoped,
}

impl Encapsulation {
    pub fn runtime_code(&self) -> u8 {
        match self {
            Encapsulation::None => 0,
            Encapsulation::ShadowDom => 1,
            Encapsulation::Scoped => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleHook {
    WillLoad,
    DidLoad,
    WillUpdate,
    DidUpdate,
    DidUnload,
}

/// Compiled component metadata as produced by the upstream compile stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub tag_name: String,
    /// Bundle id per mode; `$` is the default mode.
    #[serde(default)]
    pub bundle_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub members: Vec<MemberMeta>,
    #[serde(default)]
    pub listeners: Vec<ListenerMeta>,
    #[serde(default)]
    pub events: Vec<EventMeta>,
    #[serde(default)]
    pub slot: SlotUsage,
    #[serde(default)]
    pub encapsulation: Encapsulation,
    #[serde(default)]
    pub lifecycle_hooks: BTreeSet<LifecycleHook>,
    #[serde(default)]
    pub has_host_data: bool,
    #[serde(default)]
    pub has_styles: bool,
    #[serde(default)]
    pub has_svg: bool,
}

impl ComponentMeta {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            bundle_ids: BTreeMap::new(),
            members: Vec::new(),
            listeners: Vec::new(),
            events: Vec::new(),
            slot: SlotUsage::None,
            encapsulation: Encapsulation::None,
            lifecycle_hooks: BTreeSet::new(),
            has_host_data: false,
            has_styles: false,
            has_svg: false,
        }
    }

    /// Capabilities this component statically references.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let mut caps = BTreeSet::new();

        if self.slot != SlotUsage::None {
            caps.insert(Capability::Slot);
        }
        if !self.listeners.is_empty() {
            caps.insert(Capability::Listener);
        }
        if !self.events.is_empty() {
            caps.insert(Capability::Event);
        }

        for member in &self.members {
            match member.kind {
                MemberKind::Method => {
                    caps.insert(Capability::Method);
                }
                MemberKind::Element => {
                    caps.insert(Capability::Element);
                }
                MemberKind::PropConnect => {
                    caps.insert(Capability::PropConnect);
                }
                MemberKind::PropContext => {
                    caps.insert(Capability::PropContext);
                }
                MemberKind::Prop | MemberKind::PropMutable => {
                    if member.attr_name.is_some() {
                        caps.insert(Capability::ObserveAttr);
                    }
                }
                MemberKind::State => {}
            }
        }

        for hook in &self.lifecycle_hooks {
            caps.insert(match hook {
                LifecycleHook::WillLoad => Capability::WillLoad,
                LifecycleHook::DidLoad => Capability::DidLoad,
                LifecycleHook::WillUpdate => Capability::WillUpdate,
                LifecycleHook::DidUpdate => Capability::DidUpdate,
                LifecycleHook::DidUnload => Capability::DidUnload,
            });
        }

        match self.encapsulation {
            Encapsulation::ShadowDom => {
                caps.insert(Capability::ShadowDom);
            }
            Encapsulation::Scoped => {
                caps.insert(Capability::ScopedCss);
            }
            Encapsulation::None => {}
        }

        if self.has_host_data {
            caps.insert(Capability::HostData);
        }
        if self.has_styles {
            caps.insert(Capability::Styles);
        }
        if self.has_svg {
            caps.insert(Capability::Svg);
        }

        caps
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestBundle {
    #[serde(default)]
    pub bundle_id: String,
    #[serde(default)]
    pub components: Vec<ComponentMeta>,
}

/// A dependency collection that may contribute global side-effect code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentManifest {
    pub manifest_name: String,
    #[serde(default)]
    pub global: Option<PathBuf>,
}

/// Everything the upstream compile stage hands to app file generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppBuildInput {
    #[serde(default)]
    pub manifest_bundles: Vec<ManifestBundle>,
    #[serde(default)]
    pub dependent_manifests: Vec<DependentManifest>,
}

impl AppBuildInput {
    pub fn components(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.manifest_bundles.iter().flat_map(|b| b.components.iter())
    }
}

/// Manifest of a build's emitted artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRegistry {
    pub namespace: String,
    pub components: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_polyfilled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_es5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    /// Marks a failure upstream stages cannot recover from.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self { severity: Severity::Fatal, message: message.into(), source: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, message: message.into(), source: None }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, message: message.into(), source: None }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "[{:?}] {}: {}", self.severity, source, self.message),
            None => write!(f, "[{:?}] {}", self.severity, self.message),
        }
    }
}

/// Result of composing one core bundle variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreOutput {
    pub filename: String,
    /// Final content with the filename placeholder substituted.
    pub content: String,
    /// False when the ledger already held identical content for this variant.
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub content: String,
    pub size: usize,
}
