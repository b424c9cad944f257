//! Accessibility-tree outline: `Accessibility.getFullAXTree` rebuilt into a
//! tree and serialised one node per line with role, quoted name, bracketed
//! state flags and trailing value.

use std::collections::HashMap;

use chromiumoxide::cdp::browser_protocol::accessibility::{
    AxNode, AxPropertyName, GetFullAxTreeParams,
};
use chromiumoxide::Page;
use serde_json::Value;

use crate::errors::ExtractError;

/// Roles that are pure noise in an outline; their children are promoted.
const SKIP_ROLES: &[&str] = &["InlineTextBox", "LineBreak", "none", "presentation"];

/// Container roles that only matter when they carry a name.
const COLLAPSE_IF_UNNAMED: &[&str] = &["generic", "paragraph", "group"];

/// One node of the rebuilt, filtered accessibility tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AriaNode {
    pub role: String,
    pub name: Option<String>,
    pub active: bool,
    pub level: Option<i64>,
    pub disabled: bool,
    pub expanded: Option<bool>,
    pub checked: Option<bool>,
    pub selected: bool,
    pub pressed: bool,
    pub readonly: bool,
    pub required: bool,
    pub value: Option<String>,
    pub children: Vec<AriaNode>,
}

/// Fetch the page's accessibility tree and render the outline.
pub async fn aria_snapshot(page: &Page) -> Result<String, ExtractError> {
    let resp = page.execute(GetFullAxTreeParams::builder().build()).await?;
    let roots = build_tree(&resp.result.nodes);

    let mut out = String::new();
    for root in &roots {
        format_node(root, 0, &mut out);
    }
    Ok(out.trim().to_string())
}

/// Rebuild parent/child structure from the flat node list, dropping ignored
/// and noise nodes by promoting their children.
pub fn build_tree(nodes: &[AxNode]) -> Vec<AriaNode> {
    let mut children_map: HashMap<&str, Vec<&AxNode>> = HashMap::new();
    let mut roots: Vec<&AxNode> = Vec::new();

    for node in nodes {
        match &node.parent_id {
            Some(parent) => children_map
                .entry(parent.inner().as_str())
                .or_default()
                .push(node),
            None => roots.push(node),
        }
    }

    roots
        .into_iter()
        .flat_map(|node| convert(node, &children_map))
        .collect()
}

fn convert(node: &AxNode, children_map: &HashMap<&str, Vec<&AxNode>>) -> Vec<AriaNode> {
    let children: Vec<AriaNode> = children_map
        .get(node.node_id.inner().as_str())
        .map(|kids| {
            kids.iter()
                .flat_map(|kid| convert(kid, children_map))
                .collect()
        })
        .unwrap_or_default();

    let role = ax_value_str(node.role.as_ref()).unwrap_or_default();
    let name = ax_value_str(node.name.as_ref()).filter(|name| !name.is_empty());

    if node.ignored || SKIP_ROLES.contains(&role.as_str()) {
        return children;
    }
    if COLLAPSE_IF_UNNAMED.contains(&role.as_str()) && name.is_none() {
        return children;
    }

    let mut aria = AriaNode {
        role,
        name,
        value: ax_value_str(node.value.as_ref()).filter(|value| !value.is_empty()),
        children,
        ..AriaNode::default()
    };

    if let Some(properties) = &node.properties {
        for property in properties {
            let value = property.value.value.as_ref();
            match property.name {
                AxPropertyName::Focused => aria.active = truthy(value),
                AxPropertyName::Level => aria.level = value.and_then(Value::as_i64),
                AxPropertyName::Disabled => aria.disabled = truthy(value),
                AxPropertyName::Expanded => aria.expanded = tristate(value),
                AxPropertyName::Checked => aria.checked = tristate(value),
                AxPropertyName::Selected => aria.selected = truthy(value),
                AxPropertyName::Pressed => aria.pressed = truthy(value),
                AxPropertyName::Readonly => aria.readonly = truthy(value),
                AxPropertyName::Required => aria.required = truthy(value),
                AxPropertyName::Valuetext => {
                    if aria.value.is_none() {
                        aria.value = value.and_then(Value::as_str).map(str::to_string);
                    }
                }
                _ => {}
            }
        }
    }

    vec![aria]
}

fn ax_value_str(value: Option<&chromiumoxide::cdp::browser_protocol::accessibility::AxValue>) -> Option<String> {
    let raw = value?.value.as_ref()?;
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// `checked`/`expanded` style tristates: true, false, or mixed (`None`).
fn tristate(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) if s == "true" => Some(true),
        Some(Value::String(s)) if s == "false" => Some(false),
        _ => None,
    }
}

/// Render one node per line: `- role "name" [flags]: value`, two-space
/// indent per nesting level.
pub fn format_node(node: &AriaNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str("- ");
    out.push_str(&node.role);

    if let Some(name) = &node.name {
        out.push_str(&format!(" \"{name}\""));
    }

    let mut flags: Vec<String> = Vec::new();
    if node.active {
        flags.push("active".to_string());
    }
    if let Some(level) = node.level {
        flags.push(format!("level={level}"));
    }
    if node.disabled {
        flags.push("disabled".to_string());
    }
    match node.expanded {
        Some(true) => flags.push("expanded".to_string()),
        Some(false) => flags.push("collapsed".to_string()),
        None => {}
    }
    match node.checked {
        Some(true) => flags.push("checked".to_string()),
        Some(false) => flags.push("unchecked".to_string()),
        None => {}
    }
    if node.selected {
        flags.push("selected".to_string());
    }
    if node.pressed {
        flags.push("pressed".to_string());
    }
    if node.readonly {
        flags.push("readonly".to_string());
    }
    if node.required {
        flags.push("required".to_string());
    }

    if !flags.is_empty() {
        out.push_str(" [");
        out.push_str(&flags.join("] ["));
        out.push(']');
    }

    if let Some(value) = &node.value {
        out.push_str(": ");
        out.push_str(value);
    } else if !node.children.is_empty() {
        out.push(':');
    }
    out.push('\n');

    for child in &node.children {
        format_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(role: &str, name: Option<&str>) -> AriaNode {
        AriaNode {
            role: role.to_string(),
            name: name.map(str::to_string),
            ..AriaNode::default()
        }
    }

    #[test]
    fn formats_role_name_flags_and_value() {
        let aria = AriaNode {
            active: true,
            level: Some(2),
            checked: Some(false),
            value: Some("42".to_string()),
            ..node("spinbutton", Some("Quantity"))
        };
        let mut out = String::new();
        format_node(&aria, 0, &mut out);
        assert_eq!(
            out,
            "- spinbutton \"Quantity\" [active] [level=2] [unchecked]: 42\n"
        );
    }

    #[test]
    fn nesting_depth_matches_indentation() {
        let tree = AriaNode {
            children: vec![AriaNode {
                children: vec![node("button", Some("Go"))],
                ..node("navigation", None)
            }],
            ..node("WebArea", Some("Home"))
        };
        let mut out = String::new();
        format_node(&tree, 0, &mut out);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, depth) in lines.iter().zip([0usize, 1, 2]) {
            let spaces = line.len() - line.trim_start().len();
            assert_eq!(spaces, depth * 2);
        }
    }

    #[test]
    fn parent_with_children_gets_trailing_colon() {
        let tree = AriaNode {
            children: vec![node("link", Some("Docs"))],
            ..node("list", None)
        };
        let mut out = String::new();
        format_node(&tree, 0, &mut out);
        assert!(out.starts_with("- list:\n"));
    }

    #[test]
    fn ignored_and_generic_nodes_are_promoted() {
        let nodes: Vec<AxNode> = serde_json::from_value(json!([
            { "nodeId": "1", "ignored": false,
              "role": { "type": "role", "value": "WebArea" },
              "name": { "type": "computedString", "value": "Page" } },
            { "nodeId": "2", "parentId": "1", "ignored": false,
              "role": { "type": "role", "value": "generic" } },
            { "nodeId": "3", "parentId": "2", "ignored": false,
              "role": { "type": "role", "value": "button" },
              "name": { "type": "computedString", "value": "Submit" },
              "properties": [
                { "name": "focused", "value": { "type": "booleanOrUndefined", "value": true } }
              ] }
        ]))
        .unwrap();

        let roots = build_tree(&nodes);
        assert_eq!(roots.len(), 1);
        let web_area = &roots[0];
        assert_eq!(web_area.role, "WebArea");
        // The unnamed generic wrapper collapses; the button moves up a level.
        assert_eq!(web_area.children.len(), 1);
        let button = &web_area.children[0];
        assert_eq!(button.role, "button");
        assert_eq!(button.name.as_deref(), Some("Submit"));
        assert!(button.active);
    }

    #[test]
    fn tristate_handles_mixed() {
        assert_eq!(tristate(Some(&json!("mixed"))), None);
        assert_eq!(tristate(Some(&json!(true))), Some(true));
        assert_eq!(tristate(Some(&json!("false"))), Some(false));
    }
}
