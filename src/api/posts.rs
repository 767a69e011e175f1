//! Post model returned by the remote API
//!
//! Only the fields needed to locate media are modeled. Each post type knows
//! how to list its own media URLs; types without media support decode as
//! [`PostContent::Unknown`] and contribute nothing.

use crate::crawler::UrlKind;
use crate::url::pick_src_urls;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// One post; identity is its id
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,

    #[serde(default)]
    pub blog_name: String,

    /// Permalink of the post
    #[serde(default)]
    pub post_url: String,

    #[serde(flatten)]
    pub content: PostContent,
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Post {
    /// Which download list this post's media belongs to
    ///
    /// Sources embedded in text posts are treated as images.
    pub fn media_kind(&self) -> Option<UrlKind> {
        match self.content {
            PostContent::Photo { .. } | PostContent::Text { .. } => Some(UrlKind::Images),
            PostContent::Video { .. } => Some(UrlKind::Videos),
            PostContent::Unknown => None,
        }
    }

    /// Media URLs referenced by this post
    pub fn media_urls(&self) -> Vec<String> {
        match &self.content {
            PostContent::Photo { photos } => photos
                .iter()
                .map(|photo| photo.original_size.url.clone())
                .filter(|url| !url.is_empty())
                .collect(),
            PostContent::Text { body } => pick_src_urls(body),
            PostContent::Video { player } => player
                .iter()
                .filter_map(VideoPlayer::embed_html)
                .flat_map(pick_src_urls)
                .collect(),
            PostContent::Unknown => {
                tracing::info!("Unknown post type, no media taken from post {}", self.id);
                Vec::new()
            }
        }
    }
}

/// Type-specific part of a post, tagged by the `type` field
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostContent {
    Photo {
        #[serde(default)]
        photos: Vec<Photo>,
    },
    Text {
        #[serde(default)]
        body: String,
    },
    Video {
        #[serde(default)]
        player: Vec<VideoPlayer>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub original_size: PhotoSize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One rendition of a video player
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPlayer {
    #[serde(default)]
    pub width: Option<u32>,

    /// Embed HTML, or `false` when the video is unavailable
    #[serde(default)]
    pub embed_code: serde_json::Value,
}

impl VideoPlayer {
    pub fn embed_html(&self) -> Option<&str> {
        self.embed_code.as_str()
    }
}

/// Union of the media URLs of `posts`
pub fn media_urls<'a, I>(posts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts.into_iter().flat_map(Post::media_urls).collect()
}

/// Permalinks of `posts`
pub fn post_urls<'a, I>(posts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts
        .into_iter()
        .map(|post| post.post_url.clone())
        .filter(|url| !url.is_empty())
        .collect()
}
