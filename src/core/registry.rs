use crate::core::context::BuildContext;
use crate::core::models::{AppRegistry, BuildConfig, ComponentMeta, ListenerMeta, MemberMeta};
use crate::core::naming::registry_targets;
use crate::utils::{Logger, Result};
use serde_json::{json, Value};

/// Compact runtime registry, sorted by tag name:
/// `[tag, bundleIds, hasStyles, members, encapsulation, listeners]`.
pub fn format_component_registry<'a>(components: impl IntoIterator<Item = &'a ComponentMeta>) -> Vec<Value> {
    let mut components: Vec<&ComponentMeta> = components.into_iter().collect();
    components.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
    components.dedup_by(|a, b| a.tag_name == b.tag_name);

    components.into_iter().map(format_component).collect()
}

fn format_component(component: &ComponentMeta) -> Value {
    let members: Vec<Value> = component.members.iter().map(format_member).collect();
    let listeners: Vec<Value> = component.listeners.iter().map(format_listener).collect();

    json!([
        component.tag_name,
        component.bundle_ids,
        component.has_styles,
        members,
        component.encapsulation.runtime_code(),
        listeners,
    ])
}

fn format_member(member: &MemberMeta) -> Value {
    let mut entry = vec![
        json!(member.name),
        json!(member.kind.runtime_code()),
        json!(member.reflect_to_attr),
    ];

    if let Some(attr_name) = &member.attr_name {
        entry.push(json!(attr_name));
        if let Some(prop_type) = member.prop_type {
            entry.push(json!(prop_type.runtime_code()));
        }
    }

    Value::Array(entry)
}

fn format_listener(listener: &ListenerMeta) -> Value {
    json!([
        listener.event_name,
        listener.method_name,
        listener.capture,
        listener.passive,
        listener.enabled,
    ])
}

/// Queues `<app>.registry.json` when it changed since the last build.
pub fn generate_app_registry(config: &BuildConfig, ctx: &BuildContext, registry: &AppRegistry) -> Result<String> {
    let json = serde_json::to_string_pretty(registry)?;

    if ctx.ledger().record("registry", &json) {
        for path in registry_targets(config) {
            Logger::artifact_queued("registry", &path.display().to_string());
            ctx.queue_write(path, &json);
        }
        ctx.increment_files_changed();
    }

    Ok(json)
}
