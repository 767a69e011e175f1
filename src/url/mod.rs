//! URL handling module for Like-Harvester
//!
//! This module derives on-disk names from URLs and picks media URLs out of
//! embedded HTML fragments.

mod extract;
mod naming;

// Re-export main functions
pub use extract::pick_src_urls;
pub use naming::{page_body_name, target_file_name, FIRST_PAGE_NAME};
