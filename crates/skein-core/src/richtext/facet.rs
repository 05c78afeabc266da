//! Facets and the decorated segments that produce them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::limits::{MAX_TAG_GRAPHEMES, MAX_TAG_UTF16, check_length};
use crate::error::{Error, InvalidInputError};
use crate::types::{Did, Handle};

/// A half-open range `[byte_start, byte_end)` over the UTF-8 encoding of a
/// post's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

impl ByteSlice {
    pub fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    pub fn is_empty(&self) -> bool {
        self.byte_end <= self.byte_start
    }

    /// Returns true if the two ranges share at least one byte.
    pub fn overlaps(&self, other: &ByteSlice) -> bool {
        self.byte_start < other.byte_end && other.byte_start < self.byte_end
    }
}

/// What a facet annotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention { did: Did },

    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: Url },

    /// The tag excludes the leading `#`.
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },

    /// A feature this crate does not model, or a known one it cannot parse,
    /// kept as received.
    #[serde(untagged)]
    Other(Value),
}

/// An annotation over a byte range of post text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

impl Facet {
    /// Returns the annotated slice of `text`, or `None` if the range is out of
    /// bounds or splits a character.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.index.byte_start..self.index.byte_end)
    }
}

/// A mention of an account, displayed as text but pointing at its DID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    did: Did,
    text: String,
}

impl Mention {
    /// Mention `did` with custom display text.
    pub fn new(did: Did, text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        require_visible("mention text", &text)?;
        Ok(Self { did, text })
    }

    /// Mention `did`, displayed as `@handle`.
    pub fn for_handle(did: Did, handle: &Handle) -> Self {
        Self {
            did,
            text: format!("@{}", handle),
        }
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A link, displayed either as its URL or as custom text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    uri: Url,
    text: String,
}

impl Link {
    /// Link displayed as the URL in its normalized form, so
    /// `https://example.com` shows as `https://example.com/`. Use
    /// [`parse`](Self::parse) to display the URL as written.
    pub fn new(uri: Url) -> Self {
        let text = uri.to_string();
        Self { uri, text }
    }

    /// Link with custom display text.
    pub fn with_text(uri: Url, text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        require_visible("link text", &text)?;
        Ok(Self { uri, text })
    }

    /// Parse `uri` and display it as written.
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let parsed = Url::parse(uri).map_err(|e| InvalidInputError::Facet {
            reason: format!("invalid link '{}': {}", uri, e),
        })?;
        Self::with_text(parsed, uri)
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A hashtag.
///
/// The tag excludes the leading `#` (except for "double hashtags" such as
/// `##rust`, where the tag is `#rust`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTag {
    tag: String,
    text: String,
}

impl HashTag {
    /// Hashtag displayed as `#tag`.
    ///
    /// Both `tag` and `#tag` must fit in 640 UTF-16 code units and 64
    /// graphemes.
    pub fn new(tag: impl Into<String>) -> Result<Self, Error> {
        let tag = tag.into();
        require_visible("hashtag", &tag)?;
        let text = format!("#{}", tag);
        Self::checked(tag, text)
    }

    /// Hashtag with custom display text.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Result<Self, Error> {
        let tag = tag.into();
        let text = text.into();
        require_visible("hashtag", &tag)?;
        require_visible("hashtag text", &text)?;
        Self::checked(tag, text)
    }

    fn checked(tag: String, text: String) -> Result<Self, Error> {
        check_length("hashtag", &tag, MAX_TAG_UTF16, MAX_TAG_GRAPHEMES)?;
        check_length("hashtag text", &text, MAX_TAG_UTF16, MAX_TAG_GRAPHEMES)?;
        Ok(Self { tag, text })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A run of post text, plain or decorated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Mention(Mention),
    Link(Link),
    HashTag(HashTag),
}

impl Segment {
    /// The text this segment contributes to the post.
    pub fn display_text(&self) -> &str {
        match self {
            Segment::Text(text) => text,
            Segment::Mention(m) => m.text(),
            Segment::Link(l) => l.text(),
            Segment::HashTag(h) => h.text(),
        }
    }

    /// The facet feature, for decorated segments.
    pub fn feature(&self) -> Option<FacetFeature> {
        match self {
            Segment::Text(_) => None,
            Segment::Mention(m) => Some(FacetFeature::Mention {
                did: m.did.clone(),
            }),
            Segment::Link(l) => Some(FacetFeature::Link { uri: l.uri.clone() }),
            Segment::HashTag(h) => Some(FacetFeature::Tag { tag: h.tag.clone() }),
        }
    }
}

impl From<&str> for Segment {
    fn from(text: &str) -> Self {
        Segment::Text(text.to_string())
    }
}

impl From<String> for Segment {
    fn from(text: String) -> Self {
        Segment::Text(text)
    }
}

impl From<Mention> for Segment {
    fn from(mention: Mention) -> Self {
        Segment::Mention(mention)
    }
}

impl From<Link> for Segment {
    fn from(link: Link) -> Self {
        Segment::Link(link)
    }
}

impl From<HashTag> for Segment {
    fn from(tag: HashTag) -> Self {
        Segment::HashTag(tag)
    }
}

fn require_visible(what: &str, s: &str) -> Result<(), Error> {
    if s.trim().is_empty() {
        return Err(InvalidInputError::Facet {
            reason: format!("{} cannot be blank", what),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn did() -> Did {
        Did::new("did:plc:z72i7hdynmk6r22z27h6tvur").unwrap()
    }

    #[test]
    fn hashtag_display_text_gets_prefix() {
        let tag = HashTag::new("rustlang").unwrap();
        assert_eq!(tag.tag(), "rustlang");
        assert_eq!(tag.text(), "#rustlang");
    }

    #[test]
    fn hashtag_rejects_blank() {
        assert!(HashTag::new("   ").is_err());
        assert!(HashTag::with_text("rust", "").is_err());
    }

    #[test]
    fn hashtag_grapheme_limit() {
        assert!(HashTag::new("a".repeat(65)).is_err());
        // The tag fits but "#" pushes the display text over.
        assert!(HashTag::new("a".repeat(64)).is_err());
        assert!(HashTag::new("a".repeat(63)).is_ok());
    }

    #[test]
    fn hashtag_grapheme_limit_applies_when_utf16_fits() {
        // 65 graphemes, 130 UTF-16 code units.
        let tag = "e\u{301}".repeat(65);
        assert!(HashTag::new(tag).is_err());

        // 63 graphemes plus '#' is exactly 64.
        assert!(HashTag::new("e\u{301}".repeat(63)).is_ok());
    }

    #[test]
    fn hashtag_utf16_limit() {
        let family = "👨‍👩‍👧";
        assert_eq!(family.encode_utf16().count(), 8);
        let err = HashTag::with_text(family.repeat(81), "#family").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInputError::TextTooLong {
                unit: "UTF-16 code units",
                actual: 648,
                ..
            })
        ));
    }

    #[test]
    fn mention_for_handle() {
        let handle = Handle::new("alice.bsky.social").unwrap();
        let mention = Mention::for_handle(did(), &handle);
        assert_eq!(mention.text(), "@alice.bsky.social");
    }

    #[test]
    fn link_new_displays_normalized_url() {
        let link = Link::new("https://example.com".parse().unwrap());
        assert_eq!(link.text(), "https://example.com/");
    }

    #[test]
    fn unknown_and_unparseable_features_are_kept() {
        let raw = json!([
            { "$type": "blue.example.facet#highlight", "color": "yellow" },
            { "$type": "app.bsky.richtext.facet#link", "uri": "not a url" },
            { "$type": "app.bsky.richtext.facet#tag", "tag": "rust" }
        ]);
        let features: Vec<FacetFeature> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(features[0], FacetFeature::Other(raw[0].clone()));
        assert_eq!(features[1], FacetFeature::Other(raw[1].clone()));
        assert_eq!(
            features[2],
            FacetFeature::Tag {
                tag: "rust".to_string()
            }
        );
        assert_eq!(serde_json::to_value(&features).unwrap(), raw);
    }

    #[test]
    fn link_parse_keeps_written_form() {
        let link = Link::parse("https://example.com").unwrap();
        assert_eq!(link.text(), "https://example.com");
        assert!(Link::parse("not a url").is_err());
    }

    #[test]
    fn feature_wire_format() {
        let feature = Segment::from(HashTag::new("rust").unwrap()).feature().unwrap();
        assert_eq!(
            serde_json::to_value(&feature).unwrap(),
            json!({ "$type": "app.bsky.richtext.facet#tag", "tag": "rust" })
        );

        let feature = Segment::from(Mention::new(did(), "@alice").unwrap())
            .feature()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&feature).unwrap()["did"],
            "did:plc:z72i7hdynmk6r22z27h6tvur"
        );
    }

    #[test]
    fn byte_slice_overlap() {
        let a = ByteSlice {
            byte_start: 0,
            byte_end: 5,
        };
        let b = ByteSlice {
            byte_start: 5,
            byte_end: 8,
        };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&ByteSlice {
            byte_start: 4,
            byte_end: 6
        }));
    }
}
