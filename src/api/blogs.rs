//! Followed-blog model returned by the remote API

use serde::Deserialize;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// A blog followed by the account; identity is its name
#[derive(Debug, Clone, Deserialize)]
pub struct Blog {
    pub name: String,

    #[serde(default)]
    pub url: String,

    /// Unix time of the blog's last update
    #[serde(default)]
    pub updated: Option<i64>,
}

impl PartialEq for Blog {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Blog {}

impl Hash for Blog {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Names of `blogs`, sorted
pub fn blog_names<'a, I>(blogs: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Blog>,
{
    blogs
        .into_iter()
        .map(|blog| blog.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
