//! Multipart upload session and its state machine
//!
//! ```text
//! Planning -> SingleShot -> Completed
//! Planning -> MultipartOpen -> UploadingParts -> Completing -> Completed
//! MultipartOpen | UploadingParts | Completing -> Aborting -> Failed
//! ```

use crate::{
    s3::{
        S3,
        actions::{AbortMultipartUpload, CompleteMultipartUpload, CreateMultipartUpload},
        error::{Error, Result},
        types::ObjectWriteResult,
    },
    stream::part::Part,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Planning,
    SingleShot,
    MultipartOpen,
    UploadingParts,
    Completing,
    Completed,
    Aborting,
    Failed,
}

impl UploadState {
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::Planning,
                Self::SingleShot | Self::MultipartOpen | Self::Failed
            ) | (Self::SingleShot, Self::Completed | Self::Failed)
                | (Self::MultipartOpen, Self::UploadingParts | Self::Aborting)
                | (Self::UploadingParts, Self::Completing | Self::Aborting)
                | (Self::Completing, Self::Completed | Self::Aborting)
                | (Self::Aborting, Self::Failed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// State of one upload, owned by the operation driving it
#[derive(Debug)]
pub struct UploadSession {
    bucket: String,
    key: String,
    upload_id: Option<String>,
    parts: Vec<Part>,
    state: UploadState,
}

impl UploadSession {
    #[must_use]
    pub fn new(bucket: &str, key: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            upload_id: None,
            parts: Vec::new(),
            state: UploadState::Planning,
        }
    }

    #[must_use]
    pub const fn state(&self) -> UploadState {
        self.state
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn transition(&mut self, next: UploadState) {
        debug_assert!(
            self.state.can_transition(next),
            "invalid upload transition {:?} -> {next:?}",
            self.state
        );
        log::debug!(
            "upload {}/{}: {:?} -> {next:?}",
            self.bucket,
            self.key,
            self.state
        );
        self.state = next;
    }

    /// The data fits in one request, no multipart upload is created
    pub fn single_shot(&mut self) {
        self.transition(UploadState::SingleShot);
    }

    /// Create the multipart upload, the returned id is kept for the parts,
    /// completion and abort
    ///
    /// # Errors
    ///
    /// Will return `Err` if the upload can not be created
    pub async fn open(&mut self, s3: &S3, headers: BTreeMap<String, String>) -> Result<String> {
        self.transition(UploadState::MultipartOpen);

        let upload_id = CreateMultipartUpload::new(&self.bucket, &self.key, headers)
            .request(s3)
            .await?;

        log::debug!("upload id: {upload_id}");

        self.upload_id = Some(upload_id.clone());

        Ok(upload_id)
    }

    pub fn uploading(&mut self) {
        self.transition(UploadState::UploadingParts);
    }

    pub fn add_part(&mut self, part: Part) {
        log::info!("part {} done, etag: {}", part.get_number(), part.get_etag());
        self.parts.push(part);
    }

    /// Complete the upload with the parts in ascending order
    ///
    /// # Errors
    ///
    /// Will return `Err` if the completion fails
    pub async fn complete(&mut self, s3: &S3) -> Result<ObjectWriteResult> {
        self.transition(UploadState::Completing);

        let upload_id = self
            .upload_id
            .clone()
            .ok_or_else(|| Error::Protocol("multipart upload was not created".to_string()))?;

        self.parts.sort_by_key(Part::get_number);

        let result = CompleteMultipartUpload::new(&self.bucket, &self.key, &upload_id, &self.parts)?
            .request(s3)
            .await?;

        self.transition(UploadState::Completed);

        log::info!("upload finished, etag: {}", result.etag);

        Ok(result)
    }

    pub fn completed(&mut self) {
        self.transition(UploadState::Completed);
    }

    /// Fail the session and hand back `err` unchanged. An open multipart upload
    /// is aborted first, a failing abort is only logged.
    pub async fn fail(&mut self, s3: &S3, err: Error) -> Error {
        if self.state.is_terminal() {
            return err;
        }

        if matches!(
            self.state,
            UploadState::Planning | UploadState::SingleShot
        ) {
            self.transition(UploadState::Failed);
            return err;
        }

        self.transition(UploadState::Aborting);

        if let Some(upload_id) = &self.upload_id {
            log::warn!("aborting upload {upload_id}: {err}");

            if let Err(abort_err) = AbortMultipartUpload::new(&self.bucket, &self.key, upload_id)
                .request(s3)
                .await
            {
                log::warn!("could not abort upload {upload_id}: {abort_err}");
            }
        }

        self.transition(UploadState::Failed);

        err
    }
}
