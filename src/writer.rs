/*!
 * Bundle writer: renders the text artifact handed to an AI assistant
 */

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;

use crate::error::{CodePackError, Result};
use crate::language::detect_language;
use crate::store::ContentReader;
use crate::types::FileEntry;
use crate::utils::format_file_size;

/// Width of the `=` separator lines
pub const SEPARATOR_WIDTH: usize = 80;

/// Appended to tree lines of selected files
pub const SELECTED_MARKER: &str = "✓";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUE_INDENT: &str = "│   ";
const EMPTY_INDENT: &str = "    ";

/// Serializes a tree and a selection into a bundle
#[derive(Debug, Clone)]
pub struct BundleWriter {
    title: String,
    generated_at: Option<DateTime<Utc>>,
}

impl Default for BundleWriter {
    fn default() -> Self {
        Self {
            title: "Project Code Bundle - CodePack".to_string(),
            generated_at: None,
        }
    }
}

impl BundleWriter {
    /// Create a new bundle writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp bundles with a fixed generation time instead of the current one
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the bundle for `selected` paths of `tree`.
    ///
    /// Content is read through `reader`, in parallel, and emitted in
    /// lexicographic path order. A file that cannot be read gets an inline
    /// error line instead of its content.
    pub fn serialize<R>(
        &self,
        tree: Option<&FileEntry>,
        selected: &HashSet<String>,
        reader: &R,
    ) -> Result<String>
    where
        R: ContentReader + ?Sized,
    {
        let tree = match tree {
            Some(tree) if !selected.is_empty() => tree,
            _ => return Err(CodePackError::EmptySelection),
        };

        let mut paths: Vec<&String> = selected.iter().collect();
        paths.sort();

        let files: Vec<&FileEntry> = paths
            .iter()
            .filter_map(|path| tree.find(path))
            .filter(|node| node.is_file())
            .collect();
        let total_size: u64 = files.iter().map(|f| f.size).sum();

        let contents: Vec<String> = files
            .par_iter()
            .map(|file| match reader.read_content(&file.path) {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("Error reading {}: {}", file.path, e);
                    format!("[Error: unable to read file content - {}]", e)
                }
            })
            .collect();

        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut output: Vec<String> = Vec::new();

        // Header
        output.push(separator.clone());
        output.push(format!("# {}", self.title));
        output.push(format!(
            "# Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        output.push(format!("# Files: {}", files.len()));
        output.push(format!("# Total size: {}", format_file_size(total_size)));
        output.push(format!("# Project root: {}", tree.name));
        output.push(separator.clone());
        output.push(String::new());

        // File structure
        output.push("## 📁 Included file structure:".to_string());
        output.push(String::new());
        output.push("```".to_string());
        output.push(render_tree(tree, selected));
        output.push("```".to_string());
        output.push(String::new());
        output.push(separator);
        output.push(String::new());

        // File contents
        output.push("## 📄 File contents:".to_string());
        output.push(String::new());

        for (file, content) in files.iter().zip(contents) {
            output.push(format!("### File: {}", file.path));
            output.push(String::new());
            output.push(format!("```{}", detect_language(&file.path)));
            output.push(content);
            output.push("```".to_string());
            output.push(String::new());
        }

        log::info!("Serialized bundle with {} files", files.len());
        Ok(output.join("\n"))
    }
}

/// Render the part of `tree` that is selected or leads to a selection.
///
/// The root itself is not rendered; its children start at depth zero.
pub fn render_tree(tree: &FileEntry, selected: &HashSet<String>) -> String {
    let mut lines = Vec::new();
    render_children(tree, selected, "", &mut lines);
    lines.join("\n")
}

fn render_children(dir: &FileEntry, selected: &HashSet<String>, prefix: &str, lines: &mut Vec<String>) {
    let visible: Vec<&FileEntry> = dir
        .children()
        .map(|child| &**child)
        .filter(|child| has_selection(child, selected))
        .collect();

    for (index, child) in visible.iter().enumerate() {
        let is_last = index + 1 == visible.len();
        let connector = if is_last { LAST_BRANCH } else { BRANCH };

        if child.is_file() {
            lines.push(format!("{}{}{} {}", prefix, connector, child.name, SELECTED_MARKER));
        } else {
            lines.push(format!("{}{}{}", prefix, connector, child.name));
            let indent = if is_last { EMPTY_INDENT } else { CONTINUE_INDENT };
            render_children(child, selected, &format!("{}{}", prefix, indent), lines);
        }
    }
}

/// A selected file, or a directory with a selected descendant
fn has_selection(node: &FileEntry, selected: &HashSet<String>) -> bool {
    if node.is_file() {
        return selected.contains(&node.path);
    }
    node.children().any(|child| has_selection(child, selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use crate::types::Children;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn file(path: &str, size: u64) -> Arc<FileEntry> {
        let name = path.rsplit('/').next().unwrap_or(path);
        Arc::new(FileEntry::file(name, path, size, None))
    }

    fn dir(path: &str, children: Vec<Arc<FileEntry>>) -> Arc<FileEntry> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let children: Children = children.into_iter().map(|c| (c.name.clone(), c)).collect();
        Arc::new(FileEntry::directory_with(name, path, children))
    }

    fn sample_tree() -> Arc<FileEntry> {
        dir(
            "root",
            vec![
                file("root/z.py", 10),
                dir("root/sub", vec![file("root/sub/b.txt", 1536), file("root/sub/c.md", 4)]),
                file("root/a.py", 20),
            ],
        )
    }

    fn selection(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn echo_reader(path: &str) -> std::result::Result<String, ContentError> {
        Ok(format!("content of {}", path))
    }

    fn writer() -> BundleWriter {
        BundleWriter::new().with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap())
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let tree = sample_tree();
        let result = writer().serialize(Some(&*tree), &HashSet::new(), &echo_reader);
        assert!(matches!(result, Err(CodePackError::EmptySelection)));

        let result = writer().serialize(None, &selection(&["root/a.py"]), &echo_reader);
        assert!(matches!(result, Err(CodePackError::EmptySelection)));
    }

    #[test]
    fn test_header() {
        let tree = sample_tree();
        let bundle = writer()
            .serialize(Some(&*tree), &selection(&["root/a.py", "root/sub/b.txt"]), &echo_reader)
            .unwrap();
        let lines: Vec<&str> = bundle.lines().collect();

        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1], "# Project Code Bundle - CodePack");
        assert_eq!(lines[2], "# Generated: 2024-05-01T08:30:00.000Z");
        assert_eq!(lines[3], "# Files: 2");
        assert_eq!(lines[4], "# Total size: 1.5 KB");
        assert_eq!(lines[5], "# Project root: root");
        assert_eq!(lines[6], "=".repeat(80));
    }

    #[test]
    fn test_render_tree_connectors() {
        let tree = sample_tree();
        let rendered = render_tree(&tree, &selection(&["root/z.py", "root/sub/b.txt", "root/sub/c.md"]));
        let expected = [
            "├── z.py ✓",
            "└── sub",
            "    ├── b.txt ✓",
            "    └── c.md ✓",
        ]
        .join("\n");
        assert_eq!(rendered, expected);

        let rendered = render_tree(&tree, &selection(&["root/sub/b.txt", "root/a.py"]));
        let expected = ["├── sub", "│   └── b.txt ✓", "└── a.py ✓"].join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_only_selected_branches_are_rendered() {
        let tree = sample_tree();
        let rendered = render_tree(&tree, &selection(&["root/a.py"]));
        assert_eq!(rendered, "└── a.py ✓");
        assert!(!rendered.contains("sub"));
        assert!(!rendered.contains("b.txt"));
    }

    #[test]
    fn test_contents_sorted_by_path() {
        let tree = sample_tree();
        let bundle = writer()
            .serialize(
                Some(&*tree),
                &selection(&["root/z.py", "root/sub/c.md", "root/a.py"]),
                &echo_reader,
            )
            .unwrap();

        let headings: Vec<&str> = bundle.lines().filter(|l| l.starts_with("### File: ")).collect();
        assert_eq!(
            headings,
            vec!["### File: root/a.py", "### File: root/sub/c.md", "### File: root/z.py"]
        );
        assert!(bundle.contains("```python\ncontent of root/a.py\n```"));
        assert!(bundle.contains("```markdown\ncontent of root/sub/c.md\n```"));
    }

    #[test]
    fn test_order_ignores_read_completion() {
        let tree = sample_tree();
        // Earlier paths finish last
        let reader = |path: &str| -> std::result::Result<String, ContentError> {
            let delay = match path {
                "root/a.py" => 60,
                "root/sub/b.txt" => 40,
                "root/sub/c.md" => 20,
                _ => 0,
            };
            std::thread::sleep(std::time::Duration::from_millis(delay));
            Ok(format!("content of {}", path))
        };

        let bundle = writer()
            .serialize(
                Some(&*tree),
                &selection(&["root/z.py", "root/sub/c.md", "root/sub/b.txt", "root/a.py"]),
                &reader,
            )
            .unwrap();

        let headings: Vec<&str> = bundle.lines().filter(|l| l.starts_with("### File: ")).collect();
        assert_eq!(
            headings,
            vec![
                "### File: root/a.py",
                "### File: root/sub/b.txt",
                "### File: root/sub/c.md",
                "### File: root/z.py",
            ]
        );
        let bodies: Vec<&str> = bundle.lines().filter(|l| l.starts_with("content of ")).collect();
        assert_eq!(
            bodies,
            vec![
                "content of root/a.py",
                "content of root/sub/b.txt",
                "content of root/sub/c.md",
                "content of root/z.py",
            ]
        );
    }

    #[test]
    fn test_failed_read_is_inlined() {
        let tree = sample_tree();
        let reader = |path: &str| -> std::result::Result<String, ContentError> {
            if path == "root/sub/b.txt" {
                Err(ContentError::NotFound(path.to_string()))
            } else {
                Ok("ok".to_string())
            }
        };

        let bundle = writer()
            .serialize(
                Some(&*tree),
                &selection(&["root/a.py", "root/sub/b.txt", "root/z.py"]),
                &reader,
            )
            .unwrap();

        assert!(bundle.contains("### File: root/a.py"));
        assert!(bundle.contains("### File: root/z.py"));
        assert!(bundle.contains(
            "### File: root/sub/b.txt\n\n```\n[Error: unable to read file content - File not found: root/sub/b.txt]\n```"
        ));
    }

    #[test]
    fn test_unknown_paths_are_skipped() {
        let tree = sample_tree();
        let bundle = writer()
            .serialize(Some(&*tree), &selection(&["root/a.py", "root/sub", "root/ghost.rs"]), &echo_reader)
            .unwrap();
        assert!(bundle.contains("# Files: 1"));
        assert!(!bundle.contains("### File: root/ghost.rs"));
        assert!(!bundle.contains("### File: root/sub\n"));
    }
}
