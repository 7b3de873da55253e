/*!
 * Console report printed after a bundle is produced
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::stats::FileStats;
use crate::types::PresetType;
use crate::utils::format_file_size;

/// Extensions listed before the rest are folded into one row
const MAX_EXTENSION_ROWS: usize = 10;

/// What was bundled and where it went
#[derive(Debug, Clone)]
pub struct BundleReport {
    /// Output file, `stdout` or `clipboard`
    pub output: String,
    /// Time taken from ingestion to delivery
    pub duration: Duration,
    /// Statistics over the bundled files
    pub stats: FileStats,
    /// Preset of the effective filter configuration
    pub preset: PresetType,
    /// Bundle length in characters
    pub chars: usize,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "Extension")]
    extension: String,

    #[tabled(rename = "Files")]
    count: String,

    #[tabled(rename = "Size")]
    size: String,
}

/// Renders [`BundleReport`]s as console tables
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn summary_table(&self, report: &BundleReport) -> String {
        let rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🎛️ Preset".to_string(),
                value: report.preset.to_string(),
            },
            SummaryRow {
                key: "📄 Files".to_string(),
                value: self.format_number(report.stats.total_files),
            },
            SummaryRow {
                key: "📦 Total Size".to_string(),
                value: format_file_size(report.stats.total_size),
            },
            SummaryRow {
                key: "🔤 Est. Tokens".to_string(),
                value: self.format_number(report.chars / 4),
            },
        ];

        Self::styled(Table::new(rows))
    }

    fn extension_table(&self, report: &BundleReport) -> String {
        let mut extensions: Vec<_> = report.stats.files_by_extension.iter().collect();
        extensions.sort_by(|(a_ext, a), (b_ext, b)| b.size.cmp(&a.size).then(a_ext.cmp(b_ext)));

        let mut rows: Vec<ExtensionRow> = extensions
            .iter()
            .take(MAX_EXTENSION_ROWS)
            .map(|(ext, stats)| ExtensionRow {
                extension: ext.to_string(),
                count: self.format_number(stats.count),
                size: format_file_size(stats.size),
            })
            .collect();

        if extensions.len() > MAX_EXTENSION_ROWS {
            let rest = &extensions[MAX_EXTENSION_ROWS..];
            rows.push(ExtensionRow {
                extension: format!("({} more)", rest.len()),
                count: self.format_number(rest.iter().map(|(_, s)| s.count).sum()),
                size: format_file_size(rest.iter().map(|(_, s)| s.size).sum()),
            });
        }

        Self::styled(Table::new(rows))
    }

    /// Render the full report
    pub fn generate_report(&self, report: &BundleReport) -> String {
        format!(
            "📋  FILES BY EXTENSION\n{}\n\n✅  BUNDLE COMPLETE\n{}",
            self.extension_table(report),
            self.summary_table(report)
        )
    }

    /// Print the report to stderr, keeping stdout for the bundle
    pub fn print_report(&self, report: &BundleReport) {
        eprintln!("\n{}", self.generate_report(report));
    }
}
