/*!
 * CodePack - Bundle a source tree into one text file for AI assistants
 *
 * This library ingests a directory through one of two backends, filters the
 * resulting tree by extension, size and exclude patterns, and serializes the
 * selected files into a single text bundle.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod language;
pub mod presets;
pub mod report;
pub mod source;
pub mod stats;
pub mod storage;
pub mod store;
pub mod types;
pub mod utils;
pub mod workspace;
pub mod writer;


// Re-export main components for easier access
pub use config::Config;
pub use error::{CodePackError, ContentError, IngestError, Result};
pub use filter::{apply_filters, collect_file_paths, CompiledFilter};
pub use ingest::Ingestor;
pub use report::{BundleReport, Reporter};
pub use source::{DirectorySource, DropPayload, DroppedPath, FsSource};
pub use store::{ContentReader, ContentStore};
pub use types::{EntryKind, FileEntry, FilterConfig, PresetType};
pub use utils::format_file_size;
pub use workspace::{LoadOutcome, Workspace};
pub use writer::BundleWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
