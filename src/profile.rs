use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::toc;
use crate::tree_state::{self, KeyScheme};

/// Page markers and thresholds for one augmentation pass. The defaults match
/// what the wiki renderer emits; a profile YAML overrides them per site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentProfile {
    pub tree_attr: String,
    pub prose_class: String,
    pub min_headings: usize,
    pub key_scheme: KeyScheme,
}

impl Default for AugmentProfile {
    fn default() -> Self {
        Self {
            tree_attr: tree_state::TREE_NODE_ATTR.to_owned(),
            prose_class: toc::PROSE_CLASS.to_owned(),
            min_headings: toc::MIN_HEADINGS,
            key_scheme: KeyScheme::default(),
        }
    }
}

impl AugmentProfile {
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read profile: {path}"))?;
        serde_yaml::from_str(&contents).with_context(|| format!("parse profile: {path}"))
    }
}
