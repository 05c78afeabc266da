//! Embeds attached to a post outside its text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, InvalidInputError};
use crate::repo::{Blob, StrongRef};

/// Width and height of an image, used by clients to reserve layout space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(InvalidInputError::Embed {
                reason: format!("aspect ratio {}x{} must be non-zero", width, height),
            }
            .into());
        }
        Ok(Self { width, height })
    }
}

/// An uploaded image with its alt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    pub image: Blob,
    /// Alt text; may be empty.
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

impl EmbeddedImage {
    pub fn new(image: Blob, alt: impl Into<String>) -> Self {
        Self {
            image,
            alt: alt.into(),
            aspect_ratio: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }
}

/// A link preview card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCard {
    pub uri: Url,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<Blob>,
}

impl ExternalCard {
    pub fn new(uri: Url, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uri,
            title: title.into(),
            description: description.into(),
            thumb: None,
        }
    }

    pub fn with_thumb(mut self, thumb: Blob) -> Self {
        self.thumb = Some(thumb);
        self
    }
}

/// The embed slot of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Embed {
    #[serde(rename = "app.bsky.embed.images")]
    Images { images: Vec<EmbeddedImage> },

    #[serde(rename = "app.bsky.embed.external")]
    External { external: ExternalCard },

    /// A quoted record.
    #[serde(rename = "app.bsky.embed.record")]
    Record { record: StrongRef },

    /// A quoted record alongside images or a link card. `record` is always
    /// [`Embed::Record`].
    #[serde(rename = "app.bsky.embed.recordWithMedia")]
    RecordWithMedia { record: Box<Embed>, media: Box<Embed> },

    /// An embed this crate does not model (video, ...), kept as received so
    /// the post can be written back unchanged.
    #[serde(untagged)]
    Unsupported(Value),
}

impl Embed {
    /// Combine a quote with optional media.
    pub(crate) fn quote_with(record: StrongRef, media: Option<Embed>) -> Embed {
        let quote = Embed::Record { record };
        match media {
            Some(media) => Embed::RecordWithMedia {
                record: Box::new(quote),
                media: Box::new(media),
            },
            None => quote,
        }
    }

    /// The quoted record, if any.
    pub fn quoted(&self) -> Option<&StrongRef> {
        match self {
            Embed::Record { record } => Some(record),
            Embed::RecordWithMedia { record, .. } => record.quoted(),
            _ => None,
        }
    }

    /// The attached images, if any.
    pub fn images(&self) -> &[EmbeddedImage] {
        match self {
            Embed::Images { images } => images,
            Embed::RecordWithMedia { media, .. } => media.images(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AtUri, Cid};
    use serde_json::json;

    fn blob() -> Blob {
        serde_json::from_value(json!({
            "$type": "blob",
            "ref": { "$link": "bafkreibme22gw2h7y2h7tg2fhqotaqjucnbc24deqo72b6mkl2egezxhvy" },
            "mimeType": "image/jpeg",
            "size": 2048
        }))
        .unwrap()
    }

    fn strong_ref() -> StrongRef {
        StrongRef::new(
            AtUri::new("at://did:plc:abc123/app.bsky.feed.post/3k2la3b4c5d6e").unwrap(),
            Cid::new("bafyreiquoted").unwrap(),
        )
    }

    #[test]
    fn images_wire_format() {
        let embed = Embed::Images {
            images: vec![
                EmbeddedImage::new(blob(), "a crab")
                    .with_aspect_ratio(AspectRatio::new(4, 3).unwrap()),
            ],
        };
        let value = serde_json::to_value(&embed).unwrap();
        assert_eq!(value["$type"], "app.bsky.embed.images");
        assert_eq!(value["images"][0]["alt"], "a crab");
        assert_eq!(value["images"][0]["aspectRatio"]["width"], 4);
        assert_eq!(value["images"][0]["image"]["$type"], "blob");
    }

    #[test]
    fn quote_with_media_wire_format() {
        let media = Embed::Images {
            images: vec![EmbeddedImage::new(blob(), "")],
        };
        let embed = Embed::quote_with(strong_ref(), Some(media));
        let value = serde_json::to_value(&embed).unwrap();
        assert_eq!(value["$type"], "app.bsky.embed.recordWithMedia");
        assert_eq!(value["record"]["$type"], "app.bsky.embed.record");
        assert_eq!(value["record"]["record"]["cid"], "bafyreiquoted");
        assert_eq!(value["media"]["$type"], "app.bsky.embed.images");
        assert_eq!(embed.quoted(), Some(&strong_ref()));
        assert_eq!(embed.images().len(), 1);
    }

    #[test]
    fn unknown_embed_kinds_are_kept_verbatim() {
        let raw = json!({
            "$type": "app.bsky.embed.video",
            "video": {
                "$type": "blob",
                "ref": { "$link": "bafkreivideo" },
                "mimeType": "video/mp4",
                "size": 1048576
            },
            "alt": "a crab dancing"
        });
        let embed: Embed = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(embed, Embed::Unsupported(raw.clone()));
        assert_eq!(serde_json::to_value(&embed).unwrap(), raw);
        assert!(embed.images().is_empty());
    }

    #[test]
    fn quote_with_unknown_media_round_trips() {
        let raw = json!({
            "$type": "app.bsky.embed.recordWithMedia",
            "record": {
                "$type": "app.bsky.embed.record",
                "record": {
                    "uri": "at://did:plc:abc123/app.bsky.feed.post/3k2la3b4c5d6e",
                    "cid": "bafyreiquoted"
                }
            },
            "media": { "$type": "app.bsky.embed.video", "video": { "size": 10 } }
        });
        let embed: Embed = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(embed.quoted(), Some(&strong_ref()));
        assert_eq!(serde_json::to_value(&embed).unwrap(), raw);
    }

    #[test]
    fn aspect_ratio_rejects_zero() {
        assert!(AspectRatio::new(0, 10).is_err());
    }
}
