//! Page sink trait
//!
//! The crawler hands every analyzed page to a sink as soon as the page is
//! read, before it navigates further.

use crate::crawler::Page;
use crate::HarvestError;
use async_trait::async_trait;

/// Receiver of analyzed listing pages
#[async_trait]
pub trait PageSink: Send {
    /// Accepts one page
    ///
    /// An error ends the crawl session; pages accepted earlier stay accepted.
    async fn accept(&mut self, page: Page) -> Result<(), HarvestError>;
}

/// Collects pages in memory, in crawl order
#[async_trait]
impl PageSink for Vec<Page> {
    async fn accept(&mut self, page: Page) -> Result<(), HarvestError> {
        self.push(page);
        Ok(())
    }
}
