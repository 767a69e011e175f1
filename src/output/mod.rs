//! Output module for harvested content and run reports
//!
//! This module handles:
//! - The `PageSink` interface the crawler delivers pages to
//! - `LikesWriter`, which appends URL lists, saves page bodies and starts
//!   media downloads
//! - Run summaries (markdown file and console statistics)

mod files;
pub mod stats;
mod summary;
mod traits;

pub use files::{list_file_name, media_dir_name, LikesWriter};
pub use stats::print_statistics;
pub use summary::{format_markdown_summary, write_markdown_summary, RunSummary, SUMMARY_FILE};
pub use traits::PageSink;
