//! URL templates handed to link-building tags.

use std::collections::BTreeMap;

use crate::{Error, Result};

pub const THREAD_URL: &str = "thread_url";
pub const POST_URL: &str = "post_url";
pub const ATTACH_URL: &str = "attach_url";
pub const JIRA_URL: &str = "jira_url";
pub const USER_URL: &str = "user_url";

/// Read-only configuration shared by every handler during a render.
///
/// Maps template keys (`thread_url`, `post_url`, ...) to URL templates holding one id placeholder.
/// The placeholder is either `{id}` or the key-specific form, e.g. `{thread_id}` for `thread_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RenderContext {
    urls: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RenderContext::insert`].
    #[must_use]
    pub fn with_url(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.urls.insert(key.into(), template.into());
    }

    /// The template configured under `key`. Blank templates count as absent.
    pub fn url(&self, key: &str) -> Option<&str> {
        self.urls
            .get(key)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Like [`RenderContext::url`], but a missing template is an error blamed on `tag`.
    pub fn require(&self, tag: &str, key: &str) -> Result<&str> {
        self.url(key).ok_or_else(|| Error::MissingUrlTemplate {
            tag: tag.to_owned(),
            key: key.to_owned(),
        })
    }

    /// Substitute `id` into the template under `key`.
    pub fn resolve(&self, tag: &str, key: &str, id: &str) -> Result<String> {
        let template = self.require(tag, key)?;
        let url = template.replace("{id}", id);

        Ok(match key.strip_suffix("_url") {
            Some(stem) => url.replace(&format!("{{{stem}_id}}"), id),
            None => url,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.urls.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RenderContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            urls: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
