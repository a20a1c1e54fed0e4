//! Category tree reconciliation.
//!
//! The cached tree is what the shopper has already seen. A fresh response may
//! describe the same root or only the subtree of the category being browsed.

use sf_api_types::CategoryNode;

/// Merge a fresh category tree into the cached one.
///
/// When `fresh` has the cached root's id, the cached shape is kept: counts and
/// labels are refreshed by id, nodes absent from `fresh` drop to zero, and new
/// children are appended. When `fresh` is rooted at a descendant, only that
/// subtree is merged. Otherwise `fresh` replaces the cache.
pub fn merge_category_tree(cached: &CategoryNode, fresh: &CategoryNode) -> CategoryNode {
    if cached.id == fresh.id {
        return merge_node(cached, fresh);
    }

    let mut grafted = cached.clone();
    if graft(&mut grafted, fresh) {
        grafted
    } else {
        fresh.clone()
    }
}

fn merge_node(cached: &CategoryNode, fresh: &CategoryNode) -> CategoryNode {
    let mut children: Vec<CategoryNode> = cached
        .children
        .iter()
        .map(|child| match fresh.children.iter().find(|f| f.id == child.id) {
            Some(fresh_child) => merge_node(child, fresh_child),
            None => zero_counts(child),
        })
        .collect();

    for fresh_child in &fresh.children {
        if !cached.children.iter().any(|child| child.id == fresh_child.id) {
            children.push(fresh_child.clone());
        }
    }

    CategoryNode {
        id: cached.id.clone(),
        label: if fresh.label.is_empty() {
            cached.label.clone()
        } else {
            fresh.label.clone()
        },
        product_count: fresh.product_count,
        children,
    }
}

fn graft(node: &mut CategoryNode, fresh: &CategoryNode) -> bool {
    for child in &mut node.children {
        if child.id == fresh.id {
            *child = merge_node(child, fresh);
            return true;
        }
        if graft(child, fresh) {
            return true;
        }
    }
    false
}

fn zero_counts(node: &CategoryNode) -> CategoryNode {
    CategoryNode {
        id: node.id.clone(),
        label: node.label.clone(),
        product_count: 0,
        children: node.children.iter().map(zero_counts).collect(),
    }
}

/// Breadcrumb from the root down to the node with `id`, inclusive.
pub fn find_category_path<'a>(tree: &'a CategoryNode, id: &str) -> Option<Vec<&'a CategoryNode>> {
    if tree.id == id {
        return Some(vec![tree]);
    }

    tree.children.iter().find_map(|child| {
        find_category_path(child, id).map(|mut path| {
            path.insert(0, tree);
            path
        })
    })
}
