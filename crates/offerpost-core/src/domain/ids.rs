//! Domain identifiers.
//!
//! - `OfferId`: title と link から導出する重複排除キー（`offer_<hex>`）
//! - `PostId`: 投稿 API が返す識別子
//!
//! # 互換性
//! 既存の ledger はこの形式のキーで書かれているので、ハッシュは変えない。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::offer::Offer;

/// Identity of an offer inside the published-history ledger.
///
/// Derived from `lowercase(title) + link` with a 32-bit rolling hash
/// (`hash * 31 + unit`, wrapping). Collisions are possible; the id is a dedup
/// key, not a cryptographic fingerprint. Existing ledgers are keyed by this
/// exact format, so the algorithm must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    const PREFIX: &'static str = "offer_";

    pub fn for_offer(offer: &Offer) -> Self {
        Self::derive(&offer.title, &offer.link)
    }

    /// Two offers with the same (title, link) get the same id even when
    /// prices or images differ.
    pub fn derive(title: &str, link: &str) -> Self {
        let key = format!("{}{}", title.to_lowercase(), link);
        Self::from_hash(rolling_hash(&key))
    }

    fn from_hash(hash: i32) -> Self {
        // widen before abs: i32::MIN has no positive i32 counterpart
        let magnitude = i64::from(hash).abs();
        Self(format!("{}{:x}", Self::PREFIX, magnitude))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash over UTF-16 code units so non-ASCII titles hash the same way the
/// ledger's existing keys were produced.
fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Identifier of a post created on the remote page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ascii("hello", "", "offer_5e918d2")]
    #[case::title_and_link("X", "http://a/b", "offer_2b8b7ea6")]
    #[case::min_value("polygenelubricants", "", "offer_80000000")]
    #[case::non_ascii("ñandú", "", "offer_d71e274")]
    fn derive_matches_known_values(#[case] title: &str, #[case] link: &str, #[case] expected: &str) {
        assert_eq!(OfferId::derive(title, link).as_str(), expected);
    }

    #[test]
    fn title_case_does_not_matter() {
        assert_eq!(
            OfferId::derive("Consola Portátil", "https://a/b"),
            OfferId::derive("CONSOLA PORTÁTIL", "https://a/b")
        );
    }

    #[test]
    fn link_case_matters() {
        assert_ne!(
            OfferId::derive("tv", "https://a/B"),
            OfferId::derive("tv", "https://a/b")
        );
    }

    #[test]
    fn differing_title_or_link_changes_id() {
        let base = OfferId::derive("Smart TV 50", "https://a/1");
        assert_ne!(base, OfferId::derive("Smart TV 55", "https://a/1"));
        assert_ne!(base, OfferId::derive("Smart TV 50", "https://a/2"));
    }

    #[test]
    fn ids_are_prefixed_lowercase_hex() {
        let id = OfferId::derive("Teclado Mecánico RGB", "https://a/teclado");
        let hex = id.as_str().strip_prefix("offer_").unwrap();
        assert!(!hex.is_empty());
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn offer_id_serializes_as_plain_string() {
        let id = OfferId::derive("hello", "");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"offer_5e918d2\"");
    }
}
