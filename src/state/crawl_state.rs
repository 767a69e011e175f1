use std::fmt;

/// States of one listing crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Opening the first listing page
    LoadingFirstPage,

    /// Reading URL sets and body from the loaded page
    AnalyzingPage,

    /// Looking for and following the next-page control
    AdvancingPage,

    /// Waiting for a transient "no results" render to clear
    RetryingEmptyRender,

    /// Terminal; the page source is no longer touched
    Done,
}

impl CrawlState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingFirstPage => "loading_first_page",
            Self::AnalyzingPage => "analyzing_page",
            Self::AdvancingPage => "advancing_page",
            Self::RetryingEmptyRender => "retrying_empty_render",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
