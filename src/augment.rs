use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::AugmentArgs;
use crate::dom::Document;
use crate::html;
use crate::profile::AugmentProfile;
use crate::store::{JsonFileStore, StateStore};
use crate::toc;
use crate::tree_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageReport {
    pub tree_nodes: usize,
    pub restored: usize,
    pub toc_links: usize,
}

/// The page-ready pass: restore sidebar state, then build the article TOC.
/// The two are independent; the fixed order keeps output deterministic.
pub fn augment_page(
    doc: &mut Document,
    store: &dyn StateStore,
    profile: &AugmentProfile,
) -> PageReport {
    let restore = tree_state::restore(doc, store, &profile.tree_attr, profile.key_scheme);
    let entries = toc::build(doc, &profile.prose_class, profile.min_headings);

    PageReport {
        tree_nodes: restore.nodes,
        restored: restore.restored,
        toc_links: entries.len(),
    }
}

pub fn run(args: AugmentArgs) -> anyhow::Result<()> {
    let profile = AugmentProfile::load(args.profile.as_deref()).context("load profile")?;

    let out_path = PathBuf::from(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("augmented page output already exists: {}", out_path.display());
    }

    let page = std::fs::read_to_string(&args.page)
        .with_context(|| format!("read page: {}", args.page))?;
    let store = JsonFileStore::load(&args.state).context("load state store")?;

    let mut doc = html::parse(&page);
    let report = augment_page(&mut doc, &store, &profile);
    tracing::info!(
        page = %args.page,
        tree_nodes = report.tree_nodes,
        restored = report.restored,
        toc_links = report.toc_links,
        "augmented page"
    );

    let rendered = html::serialize(&doc);

    let mut options = OpenOptions::new();
    options.write(true);
    if args.force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut out = options
        .open(&out_path)
        .with_context(|| format!("open page output: {}", out_path.display()))?;
    out.write_all(rendered.as_bytes())
        .with_context(|| format!("write page output: {}", out_path.display()))?;
    out.flush().context("flush page output")?;

    Ok(())
}
