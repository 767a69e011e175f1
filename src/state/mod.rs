//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `JobState`: lifecycle of a single media download (pending, in flight, done, ...)
//! - `CrawlState`: states of the listing crawl state machine

mod crawl_state;
mod job_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use job_state::JobState;
