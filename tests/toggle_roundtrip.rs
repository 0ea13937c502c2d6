use std::fs;
use std::path::Path;

use predicates::prelude::*;

const PAGE: &str = "<aside class=\"sidebar\">\
<details data-tree><summary>Guides</summary></details>\
<details data-tree><summary>Reference</summary></details>\
</aside>";

fn toggle(page: &Path, state: &Path, index: usize) {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wikinav");
    cmd.args([
        "toggle",
        "--page",
        page.to_str().unwrap(),
        "--state",
        state.to_str().unwrap(),
        "--index",
        &index.to_string(),
    ])
    .assert()
    .success();
}

fn state_entries(state: &Path) -> serde_json::Map<String, serde_json::Value> {
    let contents = fs::read_to_string(state).expect("state file exists after toggle");
    serde_json::from_str(&contents).expect("state file is a json object")
}

#[test]
fn toggle_writes_one_key_per_node() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let page_path = temp.path().join("page.html");
    let state_path = temp.path().join("state.json");
    fs::write(&page_path, PAGE)?;

    toggle(&page_path, &state_path, 1);

    let entries = state_entries(&state_path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries["tree_open_1"], "1");

    Ok(())
}

#[test]
fn repeated_toggles_alternate_the_persisted_value() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let page_path = temp.path().join("page.html");
    let state_path = temp.path().join("state.json");
    fs::write(&page_path, PAGE)?;

    // closed -> open -> closed -> open; the last transition wins
    toggle(&page_path, &state_path, 0);
    toggle(&page_path, &state_path, 0);
    toggle(&page_path, &state_path, 0);

    let entries = state_entries(&state_path);
    assert_eq!(entries["tree_open_0"], "1");

    Ok(())
}

#[test]
fn explicit_open_flag_sets_the_state_directly() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let page_path = temp.path().join("page.html");
    let state_path = temp.path().join("state.json");
    fs::write(&page_path, PAGE)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wikinav");
    cmd.args([
        "toggle",
        "--page",
        page_path.to_str().unwrap(),
        "--state",
        state_path.to_str().unwrap(),
        "--index",
        "0",
        "--open",
        "false",
    ])
    .assert()
    .success();

    let entries = state_entries(&state_path);
    assert_eq!(entries["tree_open_0"], "0");

    Ok(())
}

#[test]
fn toggle_out_of_range_fails_with_context() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let page_path = temp.path().join("page.html");
    let state_path = temp.path().join("state.json");
    fs::write(&page_path, PAGE)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wikinav");
    cmd.args([
        "toggle",
        "--page",
        page_path.to_str().unwrap(),
        "--state",
        state_path.to_str().unwrap(),
        "--index",
        "7",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no tree node at index 7"));

    assert!(!state_path.exists());

    Ok(())
}

#[test]
fn toggled_state_is_applied_on_the_next_page_load() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let page_path = temp.path().join("page.html");
    let state_path = temp.path().join("state.json");
    let out_path = temp.path().join("page.out.html");
    fs::write(&page_path, PAGE)?;

    toggle(&page_path, &state_path, 0);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wikinav");
    cmd.args([
        "augment",
        "--page",
        page_path.to_str().unwrap(),
        "--out",
        out_path.to_str().unwrap(),
        "--state",
        state_path.to_str().unwrap(),
    ])
    .assert()
    .success();

    let out = fs::read_to_string(&out_path)?;
    assert!(out.contains("<details data-tree open><summary>Guides</summary>"));
    assert!(out.contains("<details data-tree><summary>Reference</summary>"));

    Ok(())
}

#[test]
fn state_show_prints_sorted_entries() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let state_path = temp.path().join("state.json");
    fs::write(&state_path, r#"{"tree_open_1":"0","tree_open_0":"1"}"#)?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wikinav");
    cmd.args(["state", "show", "--state", state_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("tree_open_0=1\ntree_open_1=0\n");

    Ok(())
}
