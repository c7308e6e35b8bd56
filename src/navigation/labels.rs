//! Short descriptions of matches, used for list rows

use crate::messages;
use crate::navigation::classifier::{self, ClassifyContext};
use crate::tree::{all_text, NodeId, Role, State};

/// Best short label for a node
pub fn item_string(ctx: &ClassifyContext, node: NodeId) -> String {
    item_string_bounded(ctx, node, 4)
}

fn item_string_bounded(ctx: &ClassifyContext, node: NodeId, depth: usize) -> String {
    let tree = ctx.tree;
    for candidate in [tree.name(node), tree.description(node)] {
        if let Ok(text) = candidate {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
    }

    let Some(role) = ctx.role(node) else {
        return String::new();
    };
    let children = tree.children(node).unwrap_or_default();
    match role {
        Role::Table => {
            return tree
                .caption(node)
                .ok()
                .flatten()
                .map(|caption| all_text(tree, caption).trim().to_string())
                .unwrap_or_default();
        }
        Role::InternalFrame => {
            let inner = match children.first() {
                Some(child) if depth > 0 => item_string_bounded(ctx, *child, depth - 1),
                _ => String::new(),
            };
            return if inner.is_empty() { role.label().to_string() } else { inner };
        }
        Role::List => {
            let count = children.iter().filter(|c| classifier::is_list_item(ctx, **c)).count();
            let nested = tree
                .parent(node)
                .ok()
                .flatten()
                .is_some_and(|parent| ctx.role(parent) == Some(Role::ListItem));
            return if nested {
                messages::nested_list_item_count(count)
            } else {
                messages::list_item_count(count)
            };
        }
        Role::DescriptionList => {
            let count = children.iter().filter(|c| ctx.role(**c) == Some(Role::DescriptionTerm)).count();
            return messages::description_list_term_count(count);
        }
        Role::PageTabList => {
            let count = children.iter().filter(|c| ctx.role(**c) == Some(Role::PageTab)).count();
            return messages::tab_list_item_count(count);
        }
        Role::Image | Role::ImageMap => {
            if let Some(parent) = tree.parent(node).ok().flatten() {
                if ctx.role(parent) == Some(Role::Link) && depth > 0 {
                    return item_string_bounded(ctx, parent, depth - 1);
                }
            }
            return role.label().to_string();
        }
        _ => {}
    }

    let text = all_text(tree, node);
    let text = text.replace(classifier::EMBEDDED_OBJECT_CHAR, " ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        return text;
    }

    if role == Role::Link {
        if let Ok(Some(uri)) = tree.link_uri(node) {
            return link_basename(&uri);
        }
    }
    String::new()
}

/// State summary for toggles and links
pub fn state_string(ctx: &ClassifyContext, node: NodeId) -> String {
    let states = ctx.states(node);
    let label = match ctx.role(node) {
        Some(Role::Switch) => {
            if states.contains(State::Checked) {
                messages::STATE_ON
            } else {
                messages::STATE_OFF
            }
        }
        Some(Role::CheckBox) => {
            if states.contains(State::Indeterminate) {
                messages::STATE_PARTIALLY_CHECKED
            } else if states.contains(State::Checked) {
                messages::STATE_CHECKED
            } else {
                messages::STATE_NOT_CHECKED
            }
        }
        Some(Role::RadioButton) => {
            if states.contains(State::Checked) {
                messages::STATE_SELECTED
            } else {
                messages::STATE_NOT_SELECTED
            }
        }
        Some(Role::Link) => {
            if states.contains(State::Visited) {
                messages::STATE_VISITED
            } else {
                messages::STATE_UNVISITED
            }
        }
        _ => "",
    };
    label.to_string()
}

/// Current value of a form control
pub fn value_string(ctx: &ClassifyContext, node: NodeId) -> String {
    match ctx.role(node) {
        Some(Role::CheckBox | Role::Switch | Role::RadioButton) => state_string(ctx, node),
        _ => all_text(ctx.tree, node).trim().to_string(),
    }
}

/// Localized role name, preferring an `xml-roles` token for landmarks
pub fn role_string(ctx: &ClassifyContext, node: NodeId) -> String {
    if classifier::is_landmark(ctx, node) {
        if let Some(token) = ctx.xml_roles(node).into_iter().next() {
            return token;
        }
    }
    ctx.role(node).map(|role| role.label().to_string()).unwrap_or_default()
}

/// Last meaningful path segment of a URI
pub fn link_basename(uri: &str) -> String {
    let without_query = uri.split(['?', '#']).next().unwrap_or(uri);
    let trimmed = without_query.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let segment = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
    if segment.is_empty() || segment.contains(':') {
        trimmed.to_string()
    } else {
        segment.to_string()
    }
}

/// Full URI of a link, empty when unavailable
pub fn uri_string(ctx: &ClassifyContext, node: NodeId) -> String {
    ctx.tree.link_uri(node).ok().flatten().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorSettings;
    use crate::tree::{NodeSpec, SnapshotTree};

    fn create_test_document() -> SnapshotTree {
        SnapshotTree::from_spec(
            NodeSpec::new(Role::DocumentWeb)
                .with_child(
                    NodeSpec::new(Role::List)
                        .with_id("list")
                        .with_child(NodeSpec::new(Role::ListItem).with_text("One"))
                        .with_child(
                            NodeSpec::new(Role::ListItem)
                                .with_text("Two")
                                .with_child(NodeSpec::new(Role::List).with_id("nested").with_child(NodeSpec::new(Role::ListItem).with_text("a"))),
                        ),
                )
                .with_child(
                    NodeSpec::link("", "https://example.com/docs/guide.html")
                        .with_id("bare-link")
                        .with_child(NodeSpec::new(Role::Image).with_id("img")),
                )
                .with_child(NodeSpec::new(Role::CheckBox).with_state(State::Checked).with_id("cb"))
                .with_child(NodeSpec::new(Role::Switch).with_id("switch"))
                .with_child(
                    NodeSpec::new(Role::Table)
                        .with_id("table")
                        .with_child(NodeSpec::new(Role::Caption).with_text("Totals")),
                )
                .with_child(NodeSpec::new(Role::Section).with_attribute("xml-roles", "main").with_id("main")),
        )
    }

    #[test]
    fn test_item_strings() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(item_string(&ctx, tree.node("list").unwrap()), "List with 2 items");
        assert_eq!(item_string(&ctx, tree.node("nested").unwrap()), "Nested list with 1 item");
        assert_eq!(item_string(&ctx, tree.node("bare-link").unwrap()), "guide");
        assert_eq!(item_string(&ctx, tree.node("img").unwrap()), "guide");
        assert_eq!(item_string(&ctx, tree.node("table").unwrap()), "Totals");
    }

    #[test]
    fn test_state_strings() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(state_string(&ctx, tree.node("cb").unwrap()), "checked");
        assert_eq!(state_string(&ctx, tree.node("switch").unwrap()), "off");
        assert_eq!(state_string(&ctx, tree.node("bare-link").unwrap()), "unvisited");
        assert_eq!(state_string(&ctx, tree.node("list").unwrap()), "");
    }

    #[test]
    fn test_role_string_prefers_landmark_token() {
        let tree = create_test_document();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(role_string(&ctx, tree.node("main").unwrap()), "main");
        assert_eq!(role_string(&ctx, tree.node("cb").unwrap()), "check box");
    }

    #[test]
    fn test_link_basename() {
        assert_eq!(link_basename("https://example.com/docs/guide.html"), "guide");
        assert_eq!(link_basename("https://example.com/about/"), "about");
        assert_eq!(link_basename("https://example.com/a?b=c#top"), "a");
        assert_eq!(link_basename("mailto:someone@example.com"), "mailto:someone@example");
    }
}
