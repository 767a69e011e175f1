use crate::UrlError;
use url::Url;

/// File name used for the first listing page
pub const FIRST_PAGE_NAME: &str = "page1.html";

/// Name the first listing URL's markers collapse to (`.../liked/by/<blog>`)
const FIRST_PAGE_MARKER: &str = "likedby";

/// Derives the download file name from a media URL
///
/// The name is the URL's final, non-empty path segment. Query string and
/// fragment are ignored.
///
/// # Examples
///
/// ```
/// use like_harvester::url::target_file_name;
///
/// let name = target_file_name("https://64.media.example.com/abc/s540x810/c57a.jpg?x=1").unwrap();
/// assert_eq!(name, "c57a.jpg");
/// ```
pub fn target_file_name(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .ok_or_else(|| UrlError::MissingFileName(url_str.to_string()))?;

    if segment.contains('\\') {
        return Err(UrlError::MissingFileName(url_str.to_string()));
    }

    Ok(segment.to_string())
}

/// Derives the file name for a listing page body from its position markers
///
/// The markers are the page's URL. Listing URLs past the first look like
/// `.../liked/by/<blog>/page/<n>/<timestamp>`, so the two segments before the
/// last one give `page<n>.html`. The first listing URL (`.../liked/by/<blog>`)
/// carries no page number and collapses to [`FIRST_PAGE_NAME`].
///
/// Markers with fewer than three segments fall back to `page<index>.html`.
pub fn page_body_name(markers: &str, index: usize) -> String {
    let segments = marker_segments(markers);

    if segments.len() < 3 {
        return format!("page{}.html", index);
    }

    let stem = format!(
        "{}{}",
        segments[segments.len() - 3],
        segments[segments.len() - 2]
    );
    let stem: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if stem == FIRST_PAGE_MARKER {
        return FIRST_PAGE_NAME.to_string();
    }
    if stem.is_empty() {
        return format!("page{}.html", index);
    }

    format!("{}.html", stem)
}

fn marker_segments(markers: &str) -> Vec<String> {
    let mut segments: Vec<String> = match Url::parse(markers) {
        Ok(url) if !url.cannot_be_a_base() => url
            .path_segments()
            .map(|s| s.map(str::to_string).collect())
            .unwrap_or_default(),
        _ => markers.split('/').map(str::to_string).collect(),
    };

    while segments.last().map(|s| s.is_empty()).unwrap_or(false) {
        segments.pop();
    }
    segments
}
