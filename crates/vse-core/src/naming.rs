//! Naming policy for newly created nodes.
//!
//! The store asks the policy for the initial `data.name` whenever a node is
//! created from a type tag. It is a seam: embedders can localize names or
//! pull them from the component palette without touching store logic.

/// Supplies the default display name for a node of a given type.
pub trait NamePolicy {
    fn default_node_name(&self, node_type: &str) -> String;
}

/// Title-cases the type tag: `load_balancer` → `Load Balancer`.
/// Empty or separator-only tags fall back to `"Node"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleCaseNames;

impl NamePolicy for TitleCaseNames {
    fn default_node_name(&self, node_type: &str) -> String {
        let mut out = String::with_capacity(node_type.len());
        for word in node_type
            .split(['_', '-', ' '])
            .filter(|w| !w.is_empty())
        {
            if !out.is_empty() {
                out.push(' ');
            }
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
        if out.is_empty() {
            "Node".to_string()
        } else {
            out
        }
    }
}
