/*!
 * End-to-end tests through the public library API
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use codepack::storage::{load_filter_config, save_filter_config, JsonFileStore};
use codepack::utils::bundle_file_name;
use codepack::writer::render_tree;
use codepack::{
    BundleWriter, CodePackError, DropPayload, FilterConfig, FsSource, IngestError, Ingestor,
    LoadOutcome, PresetType, Workspace,
};

fn create_project(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("target").join("debug"))?;
    fs::write(root.join("Cargo.toml"), "[package]\nname = \"demo\"\n")?;
    fs::write(root.join("src").join("main.rs"), "fn main() {}\n")?;
    fs::write(root.join("src").join("lib.rs"), "pub fn add() {}\n")?;
    fs::write(root.join("src").join("big.rs"), "x".repeat(2048))?;
    fs::write(root.join("target").join("debug").join("demo"), "binary")?;
    Ok(())
}

#[test]
fn test_open_filter_select_and_bundle() -> io::Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("demo");
    create_project(&root)?;

    let mut workspace = Workspace::new(Ingestor::hidden());
    assert_eq!(workspace.open(Ok(FsSource::new(&root))), LoadOutcome::Loaded);

    let config = FilterConfig {
        max_file_size: 1024,
        include_extensions: vec![".rs".to_string(), "Cargo.toml".to_string()],
        exclude_patterns: vec!["lib\\.rs$".to_string()],
        preset: PresetType::Custom,
    };
    let view = workspace
        .filtered(&config)
        .ok_or_else(|| io::Error::other("nothing survived filtering"))?;
    workspace.select_all(&view);

    let mut selected: Vec<&String> = workspace.selected().iter().collect();
    selected.sort();
    assert_eq!(selected, vec!["demo/Cargo.toml", "demo/src/main.rs"]);

    let generated_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let bundle = workspace.bundle(&config, &BundleWriter::new().with_timestamp(generated_at))?;

    assert!(bundle.starts_with(&"=".repeat(80)));
    assert!(bundle.contains("# Generated: 2024-01-02T03:04:05.000Z"));
    assert!(bundle.contains("# Files: 2"));
    assert!(bundle.contains("├── Cargo.toml ✓\n└── src\n    └── main.rs ✓"));
    assert!(bundle.contains("### File: demo/Cargo.toml\n\n```toml\n[package]"));
    assert!(bundle.contains("```rust\nfn main() {}\n\n```"));
    assert!(!bundle.contains("big.rs"));
    assert!(!bundle.contains("target"));

    assert_eq!(bundle_file_name(&generated_at), "codepack_2024-01-02T03-04-05.txt");
    Ok(())
}

#[test]
fn test_tree_only_rendering_of_a_subdirectory() -> io::Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("demo");
    create_project(&root)?;

    let mut workspace = Workspace::new(Ingestor::hidden());
    workspace.open_dropped(DropPayload::from_paths([&root]));
    let view = workspace
        .filtered(&FilterConfig::from_preset(PresetType::All))
        .ok_or_else(|| io::Error::other("empty view"))?;

    assert_eq!(workspace.select_matching(&view, "src"), 3);
    assert_eq!(
        render_tree(&view, workspace.selected()),
        "└── src\n    ├── big.rs ✓\n    ├── lib.rs ✓\n    └── main.rs ✓"
    );
    Ok(())
}

#[test]
fn test_dropping_a_file_is_rejected() -> io::Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("notes.txt");
    fs::write(&file, "hello")?;

    let mut workspace = Workspace::new(Ingestor::hidden());
    assert_eq!(
        workspace.open_dropped(DropPayload::from_paths([&file])),
        LoadOutcome::Failed
    );
    assert_eq!(workspace.error(), Some("Not a directory: notes.txt"));
    assert!(workspace.tree().is_none());

    // Cancelling afterwards clears the error without loading anything
    assert_eq!(
        workspace.open::<FsSource>(Err(IngestError::Aborted)),
        LoadOutcome::Cancelled
    );
    assert!(workspace.error().is_none());
    Ok(())
}

#[test]
fn test_nothing_selected() -> io::Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("demo");
    create_project(&root)?;

    let mut workspace = Workspace::new(Ingestor::hidden());
    workspace.open(Ok(FsSource::new(&root)));

    let result = workspace.bundle(&FilterConfig::default(), &BundleWriter::new());
    assert!(matches!(result, Err(CodePackError::EmptySelection)));

    let result = BundleWriter::new().serialize(None, &HashSet::new(), workspace.store());
    assert!(matches!(result, Err(CodePackError::EmptySelection)));
    Ok(())
}

#[test]
fn test_filter_config_persists_between_runs() -> io::Result<()> {
    let dir = tempdir()?;
    let prefs = JsonFileStore::new(dir.path().join("codepack"));
    assert_eq!(load_filter_config(&prefs), FilterConfig::default());

    let config = FilterConfig::from_preset(PresetType::Typescript);
    save_filter_config(&prefs, &config)?;

    let reopened = JsonFileStore::new(dir.path().join("codepack"));
    assert_eq!(load_filter_config(&reopened), config);

    let raw = fs::read_to_string(dir.path().join("codepack").join("codepack-filter-config.json"))?;
    assert!(raw.contains("\"preset\": \"typescript\""));
    assert!(raw.contains("\"includeExtensions\""));
    Ok(())
}
