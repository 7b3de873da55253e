/*!
 * Command-line interface for CodePack
 */

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;

use codepack::clipboard::copy_to_clipboard;
use codepack::config::{Args, Backend, Config, Destination};
use codepack::error::{CodePackError, IngestError};
use codepack::ingest::{summarize, Ingestor};
use codepack::report::{BundleReport, Reporter};
use codepack::source::{DropPayload, FsSource};
use codepack::stats::FileStats;
use codepack::storage::{
    add_recent_directory, load_filter_config, recent_directories, remove_recent_directory,
    save_filter_config, JsonFileStore,
};
use codepack::utils::bundle_file_name;
use codepack::workspace::{LoadOutcome, Workspace};
use codepack::writer::{render_tree, BundleWriter};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "codepack", &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(args);

    let level = match config.verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        log::warn!("Failed to set thread pool size: {}", e);
    }

    let prefs = JsonFileStore::default_location();
    let filter = config.resolve_filter(load_filter_config(&prefs));
    log::debug!("Effective filter rules: {:?}", filter);

    let picked = match &config.directory {
        Some(dir) => Ok(dir.clone()),
        None => prompt_directory(&recent_directories(&prefs)),
    };
    let picked_label = picked.as_ref().ok().map(|dir| directory_label(dir));

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files ⏱️  {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Reading");

    let start_time = Instant::now();
    let mut workspace = Workspace::new(Ingestor::new(Arc::new(progress.clone())));

    let outcome = match config.backend {
        Backend::Capability => workspace.open(picked.map(FsSource::new)),
        Backend::Legacy => match picked {
            Ok(dir) => workspace.open_dropped(DropPayload::from_paths([dir])),
            Err(e) => workspace.open::<FsSource>(Err(e)),
        },
    };
    progress.finish_and_clear();

    match outcome {
        LoadOutcome::Loaded => {}
        LoadOutcome::Cancelled => return Ok(()),
        LoadOutcome::Failed => {
            if let Some(label) = &picked_label {
                if let Err(e) = remove_recent_directory(&prefs, label) {
                    log::warn!("Failed to update recent directories: {}", e);
                }
            }
            let message = workspace.error().unwrap_or("Failed to open directory");
            return Err(io::Error::new(io::ErrorKind::Other, message.to_string()));
        }
    }

    if let Some(label) = &picked_label {
        if let Err(e) = add_recent_directory(&prefs, label) {
            log::warn!("Failed to update recent directories: {}", e);
        }
    }

    if let Some(tree) = workspace.tree() {
        let summary = summarize(tree);
        log::info!(
            "Loaded {} files ({} bytes) from {}",
            summary.files,
            summary.total_size,
            tree.name
        );
    }

    let view = workspace
        .filtered(&filter)
        .ok_or(CodePackError::EmptySelection)?;

    if config.select.is_empty() {
        workspace.select_all(&view);
    } else {
        for path in &config.select {
            if workspace.select_matching(&view, path) == 0 {
                log::warn!("No filtered files under {}", path);
            }
        }
    }

    if config.save {
        if let Err(e) = save_filter_config(&prefs, &filter) {
            log::warn!("Failed to save filter rules: {}", e);
        }
    }

    if config.tree_only {
        println!("{}", render_tree(&view, workspace.selected()));
        return Ok(());
    }

    let generated_at = Utc::now();
    let writer = BundleWriter::new().with_timestamp(generated_at);
    let bundle = workspace.bundle(&filter, &writer)?;

    let output = match config.destination(&bundle_file_name(&generated_at)) {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bundle.as_bytes())?;
            stdout.write_all(b"\n")?;
            "stdout".to_string()
        }
        Destination::File(path) => {
            fs::write(&path, &bundle)?;
            path.display().to_string()
        }
    };

    let output = if config.clip {
        match copy_to_clipboard(&bundle) {
            Ok(()) => format!("{} + clipboard", output),
            Err(e) => {
                log::error!("Failed to copy to clipboard: {}", e);
                output
            }
        }
    } else {
        output
    };

    let selected_files = workspace
        .selected()
        .iter()
        .filter_map(|path| view.find(path))
        .filter(|node| node.is_file());

    let report = BundleReport {
        output,
        duration: start_time.elapsed(),
        stats: FileStats::from_files(selected_files),
        preset: filter.preset,
        chars: bundle.chars().count(),
    };
    Reporter::new().print_report(&report);

    Ok(())
}

/// Ask for a directory on the terminal; an empty answer cancels
fn prompt_directory(recent: &[String]) -> Result<PathBuf, IngestError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(PathBuf::from("."));
    }

    if !recent.is_empty() {
        eprintln!("Recent directories:");
        for (index, dir) in recent.iter().enumerate() {
            eprintln!("  [{}] {}", index + 1, dir);
        }
    }
    eprint!("Directory to bundle (empty to cancel): ");
    io::stderr().flush()?;

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer)? == 0 {
        return Err(IngestError::Aborted);
    }

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(IngestError::Aborted);
    }

    let recent_pick = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| recent.get(index));

    Ok(match recent_pick {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(answer),
    })
}

/// Absolute form of `dir` for the recent list
fn directory_label(dir: &Path) -> String {
    fs::canonicalize(dir)
        .unwrap_or_else(|_| dir.to_path_buf())
        .display()
        .to_string()
}
