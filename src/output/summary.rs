//! Run summary and its markdown rendering
//!
//! A summary is written next to the harvested files at the end of every run
//! so a partial or aborted run can be told apart from a complete one later.

use crate::crawler::CrawlReport;
use crate::fetch::BatchReport;
use chrono::{DateTime, Utc};
use std::path::Path;

/// File name of the summary inside the destination directory
pub const SUMMARY_FILE: &str = "summary.md";

/// Outcome of one harvester run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// What the run harvested (e.g. "likes of someblog")
    pub label: String,

    pub config_hash: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Present when a listing was crawled
    pub crawl: Option<CrawlReport>,

    /// Posts collected from the remote API, when it was paged
    pub api_posts: Option<usize>,

    /// Merged counts of every download batch
    pub downloads: BatchReport,
}

impl RunSummary {
    pub fn new(label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            label: label.into(),
            config_hash: None,
            started_at: now,
            finished_at: now,
            crawl: None,
            api_posts: None,
            downloads: BatchReport::default(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Returns true if the crawl (if any) aborted or downloads failed
    pub fn has_failures(&self) -> bool {
        let crawl_failed = self
            .crawl
            .as_ref()
            .map(|c| matches!(c.termination, crate::crawler::Termination::Aborted(_)))
            .unwrap_or(false);
        crawl_failed || self.downloads.failed > 0
    }
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Harvest Summary: {}\n\n", summary.label));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    if let Some(crawl) = &summary.crawl {
        md.push_str("## Listing Crawl\n\n");
        md.push_str(&format!("- **Pages**: {}\n", crawl.pages));
        md.push_str(&format!(
            "- **Empty-Render Waits**: {}\n",
            crawl.empty_render_retries
        ));
        md.push_str(&format!("- **Termination**: {}\n\n", crawl.termination));
    }

    if let Some(posts) = summary.api_posts {
        md.push_str("## Remote API\n\n");
        md.push_str(&format!("- **Posts Collected**: {}\n\n", posts));
    }

    let d = &summary.downloads;
    md.push_str("## Downloads\n\n");
    if d.total == 0 {
        md.push_str("No media downloaded.\n");
    } else {
        md.push_str("| Outcome | Count |\n");
        md.push_str("|---------|-------|\n");
        md.push_str(&format!("| Done | {} |\n", d.done));
        md.push_str(&format!("| Skipped (already present) | {} |\n", d.skipped));
        md.push_str(&format!("| Failed | {} |\n", d.failed));
        md.push_str(&format!("| Cancelled | {} |\n", d.cancelled));
        md.push_str(&format!("| **Total** | **{}** |\n", d.total));
    }

    md
}

/// Writes the markdown summary to `output_path`
pub async fn write_markdown_summary(
    summary: &RunSummary,
    output_path: &Path,
) -> Result<(), std::io::Error> {
    tokio::fs::write(output_path, format_markdown_summary(summary)).await
}
