/*!
 * Configuration handling for CodePack
 */

use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;

use crate::types::{FilterConfig, PresetType};

/// Ingestion backend used to read the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Directory handle with direct listing (default)
    #[default]
    Capability,
    /// Dropped entry read through a batched directory reader
    Legacy,
}

/// Command-line arguments for CodePack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codepack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle a source tree into one text file for an AI assistant",
    long_about = "Walks a directory, filters its files by extension, size and exclude patterns, and writes the selected files into a single text bundle with a tree overview and fenced file contents."
)]
pub struct Args {
    /// Directory to bundle (prompted for when omitted)
    pub directory: Option<String>,

    /// Output file (defaults to codepack_<timestamp>.txt)
    #[clap(short, long)]
    pub output: Option<String>,

    /// Print the bundle to stdout instead of writing a file
    #[clap(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Copy the bundle to the system clipboard
    #[clap(long)]
    pub clip: bool,

    /// Ingestion backend
    #[clap(long, value_enum, default_value_t = Backend::default())]
    pub backend: Backend,

    /// Start from a named preset instead of the saved filter rules
    #[clap(long, value_enum)]
    pub preset: Option<PresetType>,

    /// Maximum file size in bytes (inclusive)
    #[clap(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Comma-separated extensions or file names to include (`*` for all)
    #[clap(long = "ext", value_delimiter = ',')]
    pub include_extensions: Option<Vec<String>>,

    /// Comma-separated exclude patterns (regex, or substring when invalid)
    #[clap(long = "exclude", value_delimiter = ',')]
    pub exclude_patterns: Option<Vec<String>>,

    /// Restrict the selection to these paths, relative to the directory
    #[clap(long = "select", value_name = "PATH")]
    pub select: Vec<String>,

    /// Only print the structure of the selected files
    #[clap(long)]
    pub tree_only: bool,

    /// Number of threads to use for processing
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Do not save the effective filter rules
    #[clap(long)]
    pub no_save: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Increase log verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Where the bundle goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to a file
    File(PathBuf),
    /// Print to stdout
    Stdout,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to bundle; `None` asks the user
    pub directory: Option<PathBuf>,

    /// Output file, when given explicitly
    pub output: Option<PathBuf>,

    /// Print to stdout
    pub stdout: bool,

    /// Copy to the clipboard
    pub clip: bool,

    /// Ingestion backend
    pub backend: Backend,

    /// Preset overriding the saved rules
    pub preset: Option<PresetType>,

    /// Rule overrides
    pub max_file_size: Option<u64>,
    pub include_extensions: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,

    /// Paths to select; empty selects everything
    pub select: Vec<String>,

    /// Structure-only output
    pub tree_only: bool,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Persist the effective filter rules
    pub save: bool,

    /// Log verbosity
    pub verbosity: u8,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            directory: args.directory.map(PathBuf::from),
            output: args.output.map(PathBuf::from),
            stdout: args.stdout,
            clip: args.clip,
            backend: args.backend,
            preset: args.preset,
            max_file_size: args.max_size,
            include_extensions: args.include_extensions,
            exclude_patterns: args.exclude_patterns,
            select: args.select,
            tree_only: args.tree_only,
            num_threads: args.threads,
            save: !args.no_save,
            verbosity: args.verbose,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> io::Result<()> {
        if let Some(dir) = &self.directory {
            if !dir.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Target directory not found: {}", dir.display()),
                ));
            }
        }

        // Check if output file directory exists
        if let Some(parent) = self.output.as_ref().and_then(|o| o.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Output directory not found: {}", parent.display()),
                ));
            }
        }

        if self.num_threads == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Thread count must be at least 1",
            ));
        }

        Ok(())
    }

    /// Whether any rule flag was given explicitly
    pub fn has_rule_overrides(&self) -> bool {
        self.max_file_size.is_some()
            || self.include_extensions.is_some()
            || self.exclude_patterns.is_some()
    }

    /// Effective filter rules, starting from the saved ones.
    ///
    /// A preset replaces the saved rules; any explicit rule flag then
    /// overrides its field and marks the result as custom.
    pub fn resolve_filter(&self, saved: FilterConfig) -> FilterConfig {
        let mut filter = match self.preset {
            Some(kind) => FilterConfig::from_preset(kind),
            None => saved,
        };

        if let Some(size) = self.max_file_size {
            filter.max_file_size = size;
        }
        if let Some(extensions) = &self.include_extensions {
            filter.include_extensions = extensions
                .iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(patterns) = &self.exclude_patterns {
            filter.exclude_patterns = patterns
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if self.has_rule_overrides() {
            filter.preset = PresetType::Custom;
        }

        filter
    }

    /// Destination of the bundle generated with `default_name`
    pub fn destination(&self, default_name: &str) -> Destination {
        if self.stdout {
            Destination::Stdout
        } else {
            Destination::File(
                self.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(default_name)),
            )
        }
    }
}
