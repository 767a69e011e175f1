use crate::crawler::source::UrlKind;
use std::collections::BTreeSet;

/// One analyzed listing page
///
/// Built once per crawl step and handed to the sink by value. URL sets
/// collapse duplicates within the page only; the same URL on two pages
/// appears in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based position in navigation order
    pub index: usize,

    /// File name for the page body, derived from the page's markers
    pub body_name: String,

    pub body: String,
    pub post_urls: BTreeSet<String>,
    pub image_urls: BTreeSet<String>,
    pub video_urls: BTreeSet<String>,
}

impl Page {
    pub fn urls(&self, kind: UrlKind) -> &BTreeSet<String> {
        match kind {
            UrlKind::Posts => &self.post_urls,
            UrlKind::Images => &self.image_urls,
            UrlKind::Videos => &self.video_urls,
        }
    }

    pub fn url_count(&self) -> usize {
        self.post_urls.len() + self.image_urls.len() + self.video_urls.len()
    }
}
