use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use crate::cli::ToggleArgs;
use crate::dom::{Document, Element, Node};
use crate::html;
use crate::profile::AugmentProfile;
use crate::store::{JsonFileStore, StateStore};

pub const TREE_NODE_ATTR: &str = "data-tree";
pub const OPEN_VALUE: &str = "1";
pub const CLOSED_VALUE: &str = "0";

const KEY_PREFIX: &str = "tree_open_";
const OPEN_ATTR: &str = "open";

/// How a disclosure node maps to its persisted key.
///
/// `Positional` is the original wire format: the node's 0-based document-order
/// index. It silently re-applies saved state to a different node whenever the
/// sidebar's node set or order changes between renders. `Labeled` keys on a
/// digest of the node's label instead, so saved state follows the node across
/// reorders and resets when the node is renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    #[default]
    Positional,
    Labeled,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub index: usize,
    pub open: bool,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreReport {
    pub nodes: usize,
    pub restored: usize,
}

pub fn state_key(scheme: KeyScheme, node: &TreeNode) -> String {
    match scheme {
        KeyScheme::Positional => format!("{KEY_PREFIX}{}", node.index),
        KeyScheme::Labeled => format!("{KEY_PREFIX}{}", label_digest(&node.label)),
    }
}

fn label_digest(label: &str) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

fn node_label(el: &Element) -> String {
    for child in &el.children {
        if let Node::Element(inner) = child
            && inner.tag == "summary"
        {
            return inner.text_content().trim().to_owned();
        }
    }
    el.text_content().trim().to_owned()
}

/// Snapshot of the page's disclosure nodes in document order.
pub fn scan(doc: &Document, tree_attr: &str) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    doc.walk_elements(&mut |el| {
        if el.has_attr(tree_attr) {
            nodes.push(TreeNode {
                index: nodes.len(),
                open: el.has_attr(OPEN_ATTR),
                label: node_label(el),
            });
        }
    });
    nodes
}

/// Applies persisted state to every disclosure node: `"1"` forces the node
/// open, `"0"` forces it closed, an absent entry leaves the server-rendered
/// default. A page without tree nodes is a no-op.
pub fn restore(
    doc: &mut Document,
    store: &dyn StateStore,
    tree_attr: &str,
    scheme: KeyScheme,
) -> RestoreReport {
    let mut report = RestoreReport::default();

    doc.walk_elements_mut(&mut |el| {
        if !el.has_attr(tree_attr) {
            return;
        }
        let node = TreeNode {
            index: report.nodes,
            open: el.has_attr(OPEN_ATTR),
            label: node_label(el),
        };
        report.nodes += 1;

        let key = state_key(scheme, &node);
        match store.get(&key).as_deref() {
            Some(OPEN_VALUE) => {
                el.set_attr(OPEN_ATTR, "");
                report.restored += 1;
            }
            Some(CLOSED_VALUE) => {
                el.remove_attr(OPEN_ATTR);
                report.restored += 1;
            }
            Some(other) => {
                tracing::debug!(key, value = other, "ignoring unrecognized tree state value");
            }
            None => {}
        }
    });

    report
}

/// Write-through for one observed state transition. Every transition is
/// persisted immediately and overwrites the previous value.
pub fn record_toggle(store: &mut dyn StateStore, key: &str, open: bool) {
    store.set(key, if open { OPEN_VALUE } else { CLOSED_VALUE });
}

/// The toggle handler: transitions node `index` to `open` on the page and
/// persists the new state under the node's key. Returns false when the page
/// has no node at that index.
pub fn set_node_open(
    doc: &mut Document,
    store: &mut dyn StateStore,
    tree_attr: &str,
    scheme: KeyScheme,
    index: usize,
    open: bool,
) -> bool {
    let mut seen = 0usize;
    let mut toggled = None;

    doc.walk_elements_mut(&mut |el| {
        if !el.has_attr(tree_attr) {
            return;
        }
        if seen == index && toggled.is_none() {
            let node = TreeNode {
                index,
                open: el.has_attr(OPEN_ATTR),
                label: node_label(el),
            };
            if open {
                el.set_attr(OPEN_ATTR, "");
            } else {
                el.remove_attr(OPEN_ATTR);
            }
            toggled = Some(state_key(scheme, &node));
        }
        seen += 1;
    });

    match toggled {
        Some(key) => {
            record_toggle(store, &key, open);
            true
        }
        None => false,
    }
}

pub fn toggle(args: ToggleArgs) -> anyhow::Result<()> {
    let profile = AugmentProfile::load(args.profile.as_deref()).context("load profile")?;

    let page = std::fs::read_to_string(&args.page)
        .with_context(|| format!("read page: {}", args.page))?;
    let mut doc = html::parse(&page);
    let mut store = JsonFileStore::load(&args.state).context("load state store")?;

    // The user toggles from the state they actually see, which is the
    // rendered default with persisted preferences applied on top.
    restore(&mut doc, &store, &profile.tree_attr, profile.key_scheme);

    let nodes = scan(&doc, &profile.tree_attr);
    let node = nodes.get(args.index).ok_or_else(|| {
        anyhow::anyhow!(
            "no tree node at index {} ({} present)",
            args.index,
            nodes.len()
        )
    })?;
    let open = args.open.unwrap_or(!node.open);

    if !set_node_open(
        &mut doc,
        &mut store,
        &profile.tree_attr,
        profile.key_scheme,
        args.index,
        open,
    ) {
        anyhow::bail!("no tree node at index {}", args.index);
    }
    store.save().context("save state store")?;

    tracing::info!(index = args.index, open, "recorded tree toggle");
    Ok(())
}
