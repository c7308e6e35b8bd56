//! Search root resolution for the current mode and locus

use crate::navigation::classifier::{self, ClassifyContext};
use crate::navigation::mode::NavigationMode;
use crate::tree::{find_ancestor_inclusive, NodeId};
use std::collections::HashSet;

/// Subtree that category searches are confined to
///
/// An enclosing modal dialog wins in every mode. Otherwise document mode
/// uses the outermost document around the focus, and GUI mode the nearest
/// dialog or window, falling back to the active window.
pub fn resolve_root(ctx: &ClassifyContext, mode: NavigationMode, focus: Option<NodeId>) -> Option<NodeId> {
    if mode == NavigationMode::Off {
        return None;
    }
    let focus = focus?;
    let max_depth = ctx.settings.max_ancestor_depth;

    if let Some(dialog) = find_ancestor_inclusive(ctx.tree, focus, max_depth, |id| classifier::is_modal_dialog(ctx, id)) {
        log::debug!("Root for {} is modal dialog {}", focus, dialog);
        return Some(dialog);
    }

    let root = match mode {
        NavigationMode::Document => outermost_document(ctx, focus),
        NavigationMode::Gui => find_ancestor_inclusive(ctx.tree, focus, max_depth, |id| {
            ctx.role(id).is_some_and(|role| role.is_dialog() || role.is_window())
        })
        .or_else(|| ctx.tree.active_window()),
        NavigationMode::Off => None,
    };
    log::debug!("Root for {} is {:?} (mode: {})", focus, root, mode);
    root
}

/// Top-level document containing `node`, which may be `node` itself
fn outermost_document(ctx: &ClassifyContext, node: NodeId) -> Option<NodeId> {
    let mut visited = HashSet::new();
    let mut outermost = None;
    let mut current = Some(node);
    while let Some(id) = current {
        if !visited.insert(id) || visited.len() > ctx.settings.max_ancestor_depth {
            break;
        }
        if classifier::is_document(ctx, id) {
            outermost = Some(id);
        }
        current = ctx.tree.parent(id).ok().flatten();
    }
    outermost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigatorSettings;
    use crate::tree::{NodeSpec, Role, SnapshotTree, State};

    fn create_test_tree() -> SnapshotTree {
        SnapshotTree::from_spec(
            NodeSpec::new(Role::Frame)
                .with_id("frame")
                .with_child(NodeSpec::new(Role::Button).with_name("Back").with_id("back"))
                .with_child(
                    NodeSpec::new(Role::DocumentWeb)
                        .with_id("doc")
                        .with_child(
                            NodeSpec::new(Role::InternalFrame).with_child(
                                NodeSpec::new(Role::DocumentWeb)
                                    .with_id("inner-doc")
                                    .with_child(NodeSpec::paragraph("Inner").with_id("inner")),
                            ),
                        )
                        .with_child(
                            NodeSpec::new(Role::Dialog)
                                .with_state(State::Modal)
                                .with_id("modal")
                                .with_child(NodeSpec::new(Role::Button).with_name("OK").with_id("ok")),
                        )
                        .with_child(
                            NodeSpec::new(Role::Dialog)
                                .with_id("plain-dialog")
                                .with_child(NodeSpec::new(Role::Button).with_name("Close").with_id("close")),
                        ),
                ),
        )
    }

    #[test]
    fn test_document_mode_uses_outermost_document() {
        let tree = create_test_tree();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        let root = resolve_root(&ctx, NavigationMode::Document, tree.find("inner"));
        assert_eq!(root, tree.find("doc"));
    }

    #[test]
    fn test_modal_dialog_wins() {
        let tree = create_test_tree();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(resolve_root(&ctx, NavigationMode::Document, tree.find("ok")), tree.find("modal"));
        assert_eq!(resolve_root(&ctx, NavigationMode::Gui, tree.find("ok")), tree.find("modal"));
    }

    #[test]
    fn test_gui_mode_uses_nearest_dialog_or_window() {
        let tree = create_test_tree();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(resolve_root(&ctx, NavigationMode::Gui, tree.find("close")), tree.find("plain-dialog"));
        assert_eq!(resolve_root(&ctx, NavigationMode::Gui, tree.find("back")), tree.find("frame"));
    }

    #[test]
    fn test_gui_mode_falls_back_to_active_window() {
        let tree = SnapshotTree::from_spec(
            NodeSpec::new(Role::Application)
                .with_child(NodeSpec::new(Role::Panel).with_child(NodeSpec::new(Role::Button).with_id("loose")))
                .with_child(NodeSpec::new(Role::Window).with_id("window")),
        );
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(resolve_root(&ctx, NavigationMode::Gui, tree.find("loose")), tree.find("window"));
    }

    #[test]
    fn test_no_root_without_focus_or_mode() {
        let tree = create_test_tree();
        let settings = NavigatorSettings::default();
        let ctx = ClassifyContext::new(&tree, &settings);

        assert_eq!(resolve_root(&ctx, NavigationMode::Document, None), None);
        assert_eq!(resolve_root(&ctx, NavigationMode::Off, tree.find("inner")), None);
        assert_eq!(resolve_root(&ctx, NavigationMode::Document, tree.find("back")), None);
    }
}
