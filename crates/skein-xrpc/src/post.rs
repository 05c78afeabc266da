//! Posting helpers built on the repository operations.

use tracing::{debug, instrument};

use skein_core::error::InvalidInputError;
use skein_core::richtext::{AspectRatio, EmbeddedImage, Post};
use skein_core::{
    AtIdentifier, AtUri, Commit, CreateRecordOutput, Did, LexiconRecord, Result, SwapGuard,
    ValidationMode, XrpcResponse,
};

use crate::client::AtpClient;
use crate::repo::validate_mime_type;

impl AtpClient {
    /// Publish a post to `repo`.
    #[instrument(skip(self, post), fields(%repo))]
    pub async fn create_post(
        &self,
        repo: &Did,
        post: &Post,
    ) -> Result<XrpcResponse<CreateRecordOutput>> {
        let collection = Post::collection()?;
        debug!(facets = post.facets.len(), "creating post");
        self.create_record(
            repo,
            &collection,
            post,
            None,
            ValidationMode::default(),
            None,
        )
        .await
    }

    /// Delete the post at `uri`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if `uri` is not in the post collection.
    #[instrument(skip(self), fields(%uri))]
    pub async fn delete_post(&self, uri: &AtUri) -> Result<XrpcResponse<Option<Commit>>> {
        if uri.collection().as_str() != Post::NSID {
            return Err(InvalidInputError::AtUri {
                value: uri.to_string(),
                reason: format!("not a {} record", Post::NSID),
            }
            .into());
        }

        let repo = AtIdentifier::from(uri.repo());
        self.delete_record(&repo, uri.collection(), uri.rkey(), &SwapGuard::none())
            .await
    }

    /// Upload an image and wrap it for a post embed.
    ///
    /// `mime_type` must be an `image/*` type.
    #[instrument(skip(self, bytes, alt), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        alt: &str,
        aspect_ratio: Option<AspectRatio>,
    ) -> Result<XrpcResponse<EmbeddedImage>> {
        validate_mime_type(mime_type)?;
        if !mime_type.starts_with("image/") {
            return Err(InvalidInputError::Blob {
                reason: format!("'{}' is not an image type", mime_type),
            }
            .into());
        }

        let response = self.upload_blob(bytes, mime_type).await?;
        let alt = alt.to_string();
        Ok(response.map(|blob| EmbeddedImage {
            image: blob,
            alt,
            aspect_ratio,
        }))
    }
}
