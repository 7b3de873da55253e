/*!
 * Filter engine
 *
 * Prunes an ingested tree by size, include list and exclude patterns. The
 * input tree is never modified: surviving directories are rebuilt and
 * surviving file nodes are shared with the input tree by reference.
 */

use std::sync::Arc;

use regex::Regex;

use crate::types::{Children, FileEntry, FilterConfig};

/// A compiled exclude pattern
#[derive(Debug, Clone)]
enum ExcludeMatcher {
    Regex(Regex),
    /// Patterns that are not valid regular expressions match as substrings
    Substring(String),
}

impl ExcludeMatcher {
    fn compile(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => ExcludeMatcher::Regex(regex),
            Err(e) => {
                log::debug!("Pattern {:?} is not a regex ({}), matching as text", pattern, e);
                ExcludeMatcher::Substring(pattern.to_string())
            }
        }
    }

    fn is_match(&self, path: &str) -> bool {
        match self {
            ExcludeMatcher::Regex(regex) => regex.is_match(path),
            ExcludeMatcher::Substring(text) => path.contains(text.as_str()),
        }
    }
}

/// A compiled include entry, stored lower-cased
#[derive(Debug, Clone)]
enum IncludeRule {
    /// `.py`, `.d.ts`: the file name must end with it
    Suffix(String),
    /// `Dockerfile`: the file name must equal it
    Name(String),
}

impl IncludeRule {
    fn new(entry: &str) -> Self {
        let lower = entry.to_lowercase();
        if lower.starts_with('.') {
            IncludeRule::Suffix(lower)
        } else {
            IncludeRule::Name(lower)
        }
    }

    fn matches(&self, lower_name: &str) -> bool {
        match self {
            IncludeRule::Suffix(suffix) => lower_name.ends_with(suffix.as_str()),
            IncludeRule::Name(name) => lower_name == name,
        }
    }
}

/// A [`FilterConfig`] with its patterns compiled once
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    max_file_size: u64,
    /// `None` when every file passes the include check
    includes: Option<Vec<IncludeRule>>,
    excludes: Vec<ExcludeMatcher>,
}

impl CompiledFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let includes = if config.includes_everything() {
            None
        } else {
            Some(
                config
                    .include_extensions
                    .iter()
                    .map(|e| IncludeRule::new(e))
                    .collect(),
            )
        };

        Self {
            max_file_size: config.max_file_size,
            includes,
            excludes: config
                .exclude_patterns
                .iter()
                .map(|p| ExcludeMatcher::compile(p))
                .collect(),
        }
    }

    /// Whether a file node passes every rule
    pub fn file_passes(&self, file: &FileEntry) -> bool {
        if file.size > self.max_file_size {
            return false;
        }

        if self.excludes.iter().any(|m| m.is_match(&file.path)) {
            return false;
        }

        match &self.includes {
            None => true,
            Some(rules) => {
                let lower_name = file.name.to_lowercase();
                rules.iter().any(|rule| rule.matches(&lower_name))
            }
        }
    }

    /// Filter a tree; `None` when nothing in it survives
    pub fn apply(&self, node: &FileEntry) -> Option<FileEntry> {
        if node.is_file() {
            return self.file_passes(node).then(|| node.clone());
        }

        let children = self.filter_children(node)?;
        Some(FileEntry {
            children: Some(children),
            ..node.clone_shallow()
        })
    }

    fn apply_shared(&self, node: &Arc<FileEntry>) -> Option<Arc<FileEntry>> {
        if node.is_file() {
            return self.file_passes(node).then(|| Arc::clone(node));
        }
        self.apply(node).map(Arc::new)
    }

    fn filter_children(&self, dir: &FileEntry) -> Option<Children> {
        let children: Children = dir
            .children()
            .filter_map(|child| self.apply_shared(child))
            .map(|child| (child.name.clone(), child))
            .collect();

        (!children.is_empty()).then_some(children)
    }
}

impl FileEntry {
    /// Copy of this node without its children
    fn clone_shallow(&self) -> FileEntry {
        FileEntry {
            name: self.name.clone(),
            path: self.path.clone(),
            kind: self.kind,
            size: self.size,
            last_modified: self.last_modified,
            children: None,
        }
    }
}

/// Filter `tree` with `config`; `None` when nothing survives
pub fn apply_filters(tree: &FileEntry, config: &FilterConfig) -> Option<FileEntry> {
    CompiledFilter::new(config).apply(tree)
}

/// Paths of every file in a tree, depth-first
pub fn collect_file_paths(tree: &FileEntry) -> Vec<String> {
    tree.files().into_iter().map(|f| f.path.clone()).collect()
}
