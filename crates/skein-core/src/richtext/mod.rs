//! Rich text: post text annotated with byte-range facets.
//!
//! Facet offsets are UTF-8 byte offsets into the post text. Length limits
//! are checked in UTF-16 code units and grapheme clusters, see [`limits`].

mod embed;
mod facet;
pub mod limits;
mod post;

pub use embed::{AspectRatio, Embed, EmbeddedImage, ExternalCard};
pub use facet::{ByteSlice, Facet, FacetFeature, HashTag, Link, Mention, Segment};
pub use post::{Post, PostBuilder, ReplyRef};
