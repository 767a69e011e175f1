//! Page source interface
//!
//! A page source is whatever renders the liked-posts listing (typically a
//! driven browser). The crawler only sees it through this trait.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors raised by a page source; any of them ends the crawl session
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("{0}")]
    Other(String),
}

/// Kind of URL set read from a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlKind {
    /// Permalinks of the liked posts
    Posts,
    /// Image sources
    Images,
    /// Video sources
    Videos,
}

impl UrlKind {
    pub fn all() -> [UrlKind; 3] {
        [UrlKind::Posts, UrlKind::Images, UrlKind::Videos]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Images => "images",
            Self::Videos => "videos",
        }
    }
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rendered, paginated listing driven one page at a time
///
/// Every method takes `&mut self`: a page source is never driven from two
/// places at once.
#[async_trait]
pub trait PageSource: Send {
    /// Loads the first listing page
    ///
    /// Sources that are already positioned on the first page keep the default.
    async fn open_first_page(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    /// Position markers of the loaded page (its URL)
    async fn current_page_markers(&mut self) -> Result<String, SourceError>;

    /// Returns true if the loaded page offers a "next page" control
    async fn has_next_page_control(&mut self) -> Result<bool, SourceError>;

    /// Follows the "next page" control and waits for the page to load
    async fn advance_to_next_page(&mut self) -> Result<(), SourceError>;

    /// Reads one kind of URL set from the loaded page
    async fn extract_urls(&mut self, kind: UrlKind) -> Result<BTreeSet<String>, SourceError>;

    /// Raw content of the loaded page
    async fn page_body(&mut self) -> Result<String, SourceError>;

    /// Returns true while the page shows its "no results" indicator
    async fn has_empty_result_indicator(&mut self) -> Result<bool, SourceError>;
}
