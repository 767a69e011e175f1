/// Attribute prefix marking an embedded media source
const SRC_TOKEN: &str = " src=\"";

/// Picks every double-quoted ` src="..."` value out of an HTML fragment
///
/// Post bodies and video embed codes are opaque HTML strings; only their
/// source attributes are of interest, so no markup parsing is done here.
/// An unterminated attribute ends the scan.
pub fn pick_src_urls(html: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find(SRC_TOKEN) {
        rest = &rest[start + SRC_TOKEN.len()..];
        let Some(end) = rest.find('"') else {
            break;
        };
        let value = &rest[..end];
        if !value.is_empty() {
            urls.push(value.to_string());
        }
        rest = &rest[end..];
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_multiple_sources() {
        let body = r#"<p>hi</p><img src="https://a.example/1.jpg"> text <img class="x" src="https://a.example/2.gif"/>"#;
        assert_eq!(
            pick_src_urls(body),
            vec!["https://a.example/1.jpg", "https://a.example/2.gif"]
        );
    }

    #[test]
    fn test_video_embed_code() {
        let embed = r#"<video  id='embed-1' width='400'><source src="https://v.example/tumblr_abc.mp4" type="video/mp4"></video>"#;
        assert_eq!(pick_src_urls(embed), vec!["https://v.example/tumblr_abc.mp4"]);
    }

    #[test]
    fn test_no_sources() {
        assert!(pick_src_urls("<p>plain text</p>").is_empty());
        assert!(pick_src_urls("").is_empty());
    }

    #[test]
    fn test_unterminated_attribute() {
        let body = r#"<img src="https://a.example/ok.jpg"><img src="https://a.example/broken"#;
        assert_eq!(pick_src_urls(body), vec!["https://a.example/ok.jpg"]);
    }

    #[test]
    fn test_data_src_is_not_src() {
        let body = r#"<img data-src="https://a.example/lazy.jpg">"#;
        assert!(pick_src_urls(body).is_empty());
    }
}
