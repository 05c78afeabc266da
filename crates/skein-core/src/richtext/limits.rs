//! Length limits for post text and hashtags.
//!
//! Limits are counted two ways and both must hold: UTF-16 code units and
//! extended grapheme clusters. Neither is the UTF-8 byte count that facet
//! offsets use.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, InvalidInputError};

/// Maximum post text length in UTF-16 code units.
pub const MAX_POST_UTF16: usize = 3000;

/// Maximum post text length in grapheme clusters.
pub const MAX_POST_GRAPHEMES: usize = 300;

/// Maximum hashtag length in UTF-16 code units.
pub const MAX_TAG_UTF16: usize = 640;

/// Maximum hashtag length in grapheme clusters.
pub const MAX_TAG_GRAPHEMES: usize = 64;

/// Maximum number of images in one post.
pub const MAX_IMAGES: usize = 4;

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Length of `s` in extended grapheme clusters.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

pub(crate) fn check_length(
    what: &'static str,
    s: &str,
    max_utf16: usize,
    max_graphemes: usize,
) -> Result<(), Error> {
    let units = utf16_len(s);
    if units > max_utf16 {
        return Err(InvalidInputError::TextTooLong {
            what,
            unit: "UTF-16 code units",
            actual: units,
            max: max_utf16,
        }
        .into());
    }

    let graphemes = grapheme_len(s);
    if graphemes > max_graphemes {
        return Err(InvalidInputError::TextTooLong {
            what,
            unit: "graphemes",
            actual: graphemes,
            max: max_graphemes,
        }
        .into());
    }

    Ok(())
}
