//! Post records and the builder that assembles them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::embed::{Embed, EmbeddedImage, ExternalCard};
use super::facet::{ByteSlice, Facet, HashTag, Link, Mention, Segment};
use super::limits::{MAX_IMAGES, MAX_POST_GRAPHEMES, MAX_POST_UTF16, check_length};
use crate::error::{Error, InvalidInputError};
use crate::repo::{LexiconRecord, StrongRef};

/// Thread position of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    /// The post that started the thread.
    pub root: StrongRef,
    /// The post being replied to directly.
    pub parent: StrongRef,
}

/// An `app.bsky.feed.post` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,

    pub created_at: DateTime<Utc>,
}

impl LexiconRecord for Post {
    const NSID: &'static str = "app.bsky.feed.post";
}

impl Post {
    /// Start building a post.
    pub fn builder() -> PostBuilder {
        PostBuilder::new()
    }
}

/// Assembles post text and facets with exact UTF-8 byte offsets.
///
/// Each decorated segment appends its display text verbatim and records a
/// facet over exactly the bytes it added, so facets never overlap.
///
/// ```
/// use skein_core::richtext::{HashTag, Link, PostBuilder};
///
/// let mut builder = PostBuilder::new();
/// builder
///     .text("héllo ")
///     .link(Link::with_text("https://example.com/".parse().unwrap(), "beans").unwrap())
///     .text(" ")
///     .hashtag(HashTag::new("rust").unwrap());
///
/// let post = builder.build().unwrap();
/// assert_eq!(post.text, "héllo beans #rust");
/// assert_eq!(post.facets[0].index.byte_start, 7);
/// assert_eq!(post.facets[0].index.byte_end, 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostBuilder {
    text: String,
    facets: Vec<Facet>,
    images: Vec<EmbeddedImage>,
    external: Option<ExternalCard>,
    quote: Option<StrongRef>,
    reply: Option<ReplyRef>,
    langs: Vec<String>,
    created_at: Option<DateTime<Utc>>,
}

impl PostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// UTF-8 byte length of the text so far.
    pub fn cursor(&self) -> usize {
        self.text.len()
    }

    /// The text assembled so far.
    pub fn current_text(&self) -> &str {
        &self.text
    }

    /// Facets recorded so far, in append order.
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    /// Append plain text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn mention(&mut self, mention: Mention) -> &mut Self {
        self.append(Segment::Mention(mention))
    }

    pub fn link(&mut self, link: Link) -> &mut Self {
        self.append(Segment::Link(link))
    }

    pub fn hashtag(&mut self, tag: HashTag) -> &mut Self {
        self.append(Segment::HashTag(tag))
    }

    /// Append any segment.
    pub fn append(&mut self, segment: impl Into<Segment>) -> &mut Self {
        let segment = segment.into();
        let byte_start = self.text.len();
        self.text.push_str(segment.display_text());
        let byte_end = self.text.len();

        // Decorated display text is never blank, so the range is non-empty.
        if let Some(feature) = segment.feature() {
            self.facets.push(Facet {
                index: ByteSlice {
                    byte_start,
                    byte_end,
                },
                features: vec![feature],
            });
        }
        self
    }

    /// Attach an uploaded image.
    pub fn image(&mut self, image: EmbeddedImage) -> &mut Self {
        self.images.push(image);
        self
    }

    /// Attach a link card.
    pub fn external(&mut self, card: ExternalCard) -> &mut Self {
        self.external = Some(card);
        self
    }

    /// Quote another record.
    pub fn quote(&mut self, record: StrongRef) -> &mut Self {
        self.quote = Some(record);
        self
    }

    /// Make this post a reply.
    pub fn reply_to(&mut self, root: StrongRef, parent: StrongRef) -> &mut Self {
        self.reply = Some(ReplyRef { root, parent });
        self
    }

    /// Declare the languages of the text (BCP 47 tags).
    pub fn languages<I, S>(&mut self, langs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.langs = langs.into_iter().map(Into::into).collect();
        self
    }

    /// Override the creation timestamp (defaults to the time of `build`).
    pub fn created_at(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.created_at = Some(at);
        self
    }

    /// Produce the post record.
    ///
    /// # Errors
    ///
    /// Fails if the text exceeds 3000 UTF-16 code units or 300 graphemes, if
    /// more than 4 images are attached, or if both images and a link card are
    /// attached.
    pub fn build(&self) -> Result<Post, Error> {
        check_length("post text", &self.text, MAX_POST_UTF16, MAX_POST_GRAPHEMES)?;

        Ok(Post {
            text: self.text.clone(),
            facets: self.facets.clone(),
            embed: self.build_embed()?,
            langs: self.langs.clone(),
            reply: self.reply.clone(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }

    fn build_embed(&self) -> Result<Option<Embed>, Error> {
        if self.images.len() > MAX_IMAGES {
            return Err(InvalidInputError::Embed {
                reason: format!(
                    "{} images attached, at most {} allowed",
                    self.images.len(),
                    MAX_IMAGES
                ),
            }
            .into());
        }

        let media = match (self.images.is_empty(), &self.external) {
            (false, Some(_)) => {
                return Err(InvalidInputError::Embed {
                    reason: "a post cannot carry both images and a link card".to_string(),
                }
                .into());
            }
            (false, None) => Some(Embed::Images {
                images: self.images.clone(),
            }),
            (true, Some(card)) => Some(Embed::External {
                external: card.clone(),
            }),
            (true, None) => None,
        };

        Ok(match &self.quote {
            Some(record) => Some(Embed::quote_with(record.clone(), media)),
            None => media,
        })
    }
}
