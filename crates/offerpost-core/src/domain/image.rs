//! Image payload: downloaded bytes plus their content type.
//!
//! 投稿 1 回分だけ使い、永続化しない。

/// A validated image ready to be attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Subtype of the content type, used as the upload's file extension.
    /// `image/jpeg; charset=binary` -> `jpeg`.
    pub fn subtype(&self) -> &str {
        self.content_type
            .split(';')
            .next()
            .and_then(|mime| mime.trim().split_once('/'))
            .map(|(_, sub)| sub.trim())
            .filter(|sub| !sub.is_empty())
            .unwrap_or("jpg")
    }

    /// Content type without parameters.
    pub fn mime(&self) -> &str {
        self.content_type.split(';').next().unwrap_or_default().trim()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
