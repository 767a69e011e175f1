//! Crawler module for walking the liked-posts listing
//!
//! This module contains:
//! - The `PageSource` interface over whatever renders the listing
//! - The `LikesCrawler` state machine that pages through it
//! - The `Page` record handed to the output sink per analyzed page

mod likes;
mod page;
mod source;

pub use likes::{CrawlReport, LikesCrawler, Termination};
pub use page::Page;
pub use source::{PageSource, SourceError, UrlKind};
