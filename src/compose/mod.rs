//! Server-side copy and compose
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPartCopy.html>

pub mod source;

pub use self::source::{ComposeSource, CopySource, ResolvedSource};

use crate::{
    s3::{
        S3,
        actions::{CopyObject, UploadPartCopy},
        error::{Error, Result},
        limits::{MAX_MULTIPART_COUNT, MAX_MULTIPART_OBJECT_SIZE, MAX_PART_SIZE, MIN_PART_SIZE},
        options::{Directive, ObjectOptions},
        types::ObjectWriteResult,
    },
    stream::{iterator::PartIterator, part::Part, session::UploadSession},
};
use std::collections::BTreeMap;

/// Number of parts needed to compose `sources`, checked against the service
/// limits. Every source but the last must give at least 5MiB, also the last
/// range of a split source.
///
/// # Errors
///
/// Will return `Err` if a source is too small, the object too large or more
/// than 10,000 parts are needed
pub fn part_count(sources: &[ResolvedSource]) -> Result<u16> {
    let mut object_size: u64 = 0;
    let mut count: u64 = 0;

    for (i, src) in sources.iter().enumerate() {
        let size = src.effective_size();
        let is_last = i + 1 == sources.len();
        let name = format!("{}/{}", src.source.bucket, src.source.object);

        if size < MIN_PART_SIZE && !is_last {
            return Err(Error::Validation(format!(
                "source {name}: size {size} must be greater than {MIN_PART_SIZE}"
            )));
        }

        object_size += size;
        if object_size > MAX_MULTIPART_OBJECT_SIZE {
            return Err(Error::Validation(format!(
                "destination object size must be less than {MAX_MULTIPART_OBJECT_SIZE}"
            )));
        }

        if size > MAX_PART_SIZE {
            let mut parts = size / MAX_PART_SIZE;
            let mut last_part_size = size - parts * MAX_PART_SIZE;
            if last_part_size > 0 {
                parts += 1;
            } else {
                last_part_size = MAX_PART_SIZE;
            }

            if last_part_size < MIN_PART_SIZE && !is_last {
                return Err(Error::Validation(format!(
                    "source {name}: for multipart split upload of {size}, last part size \
                     is less than {MIN_PART_SIZE}"
                )));
            }

            count += parts;
        } else {
            count += 1;
        }
    }

    if count > u64::from(MAX_MULTIPART_COUNT) {
        return Err(Error::Validation(format!(
            "compose sources create more than allowed multipart count {MAX_MULTIPART_COUNT}"
        )));
    }

    u16::try_from(count).map_err(|e| Error::Validation(e.to_string()))
}

// inclusive byte range
fn copy_range(start: u64, length: u64) -> String {
    format!("bytes={start}-{}", start + length - 1)
}

impl S3 {
    /// Stat every source and count the parts, nothing is written
    ///
    /// # Errors
    ///
    /// Will return `Err` if a source can not be found or the sources break a
    /// limit
    pub async fn calc_part_count(
        &self,
        sources: &[ComposeSource],
    ) -> Result<(Vec<ResolvedSource>, u16)> {
        let mut resolved = Vec::with_capacity(sources.len());

        for src in sources {
            src.validate()?;
            let stat = self
                .stat_object(
                    &src.bucket,
                    &src.object,
                    src.version_id.as_deref(),
                    src.ssec.as_ref(),
                )
                .await?;
            resolved.push(src.resolve(stat.size, &stat.etag)?);
        }

        let count = part_count(&resolved)?;

        log::debug!("compose of {} sources needs {count} parts", resolved.len());

        Ok((resolved, count))
    }

    /// Create an object from the concatenation of `sources` with server-side
    /// copies. A single whole source is copied with `CopyObject`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if there are no sources, a limit is broken or a
    /// request fails. The multipart upload is aborted on failure.
    pub async fn compose_object(
        &self,
        bucket: &str,
        key: &str,
        sources: &[ComposeSource],
        options: &ObjectOptions,
    ) -> Result<ObjectWriteResult> {
        if sources.is_empty() {
            return Err(Error::Validation(
                "compose sources cannot be empty".to_string(),
            ));
        }

        if key.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }

        options.validate(self.is_https())?;

        let (resolved, count) = self.calc_part_count(sources).await?;

        if let [src] = resolved.as_slice()
            && count == 1
            && !src.source.is_range()
        {
            let mut headers = options.headers();
            if !options.metadata.is_empty() {
                headers.insert(
                    "x-amz-metadata-directive".to_string(),
                    Directive::Replace.to_string(),
                );
            }
            if !options.tags.is_empty() {
                headers.insert(
                    "x-amz-tagging-directive".to_string(),
                    Directive::Replace.to_string(),
                );
            }
            headers.extend(src.headers());
            return CopyObject::new(bucket, key, headers).request(self).await;
        }

        let mut session = UploadSession::new(bucket, key);

        let result = match session.open(self, options.headers()).await {
            Ok(upload_id) => {
                match self
                    .copy_parts(&mut session, &upload_id, &resolved, &options.ssec_headers())
                    .await
                {
                    Ok(()) => session.complete(self).await,
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(result) => Ok(result),
            Err(err) => Err(session.fail(self, err).await),
        }
    }

    // one UploadPartCopy per source, sources above 5GiB are split in ranges
    async fn copy_parts(
        &self,
        session: &mut UploadSession,
        upload_id: &str,
        sources: &[ResolvedSource],
        ssec: &BTreeMap<String, String>,
    ) -> Result<()> {
        session.uploading();

        let bucket = session.bucket().to_string();
        let key = session.key().to_string();
        let mut number: u16 = 0;

        for src in sources {
            let size = src.effective_size();
            let offset = src.offset();

            let mut headers = src.headers();
            headers.extend(ssec.clone());

            if size <= MAX_PART_SIZE {
                number += 1;
                if src.source.is_range() {
                    headers.insert(
                        "x-amz-copy-source-range".to_string(),
                        copy_range(offset, size),
                    );
                }
                let etag = UploadPartCopy::new(&bucket, &key, upload_id, number, headers)
                    .request(self)
                    .await?;
                session.add_part(Part::new(number, etag));
                continue;
            }

            for (_, start, chunk) in PartIterator::new(size, MAX_PART_SIZE) {
                number += 1;
                let mut headers = headers.clone();
                headers.insert(
                    "x-amz-copy-source-range".to_string(),
                    copy_range(offset + start, chunk),
                );
                let etag = UploadPartCopy::new(&bucket, &key, upload_id, number, headers)
                    .request(self)
                    .await?;
                session.add_part(Part::new(number, etag));
            }
        }

        Ok(())
    }

    /// Server-side copy of one object. Ranges and sources above 5GiB go
    /// through `compose_object`, where a `Directive::Copy` can not apply.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the source can not be found, a directive does not
    /// apply or the copy fails
    pub async fn copy_object(
        &self,
        bucket: &str,
        key: &str,
        source: &CopySource,
        options: &ObjectOptions,
        metadata_directive: Option<Directive>,
        tagging_directive: Option<Directive>,
    ) -> Result<ObjectWriteResult> {
        if key.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }

        source.validate()?;
        options.validate(self.is_https())?;

        let needs_compose = if source.is_range() {
            true
        } else {
            let stat = self
                .stat_object(
                    &source.bucket,
                    &source.object,
                    source.version_id.as_deref(),
                    source.ssec.as_ref(),
                )
                .await?;
            stat.size > MAX_PART_SIZE
        };

        if needs_compose {
            if metadata_directive == Some(Directive::Copy) {
                return Err(Error::Validation(
                    "COPY metadata directive is not applicable to source object size \
                     greater than 5 GiB"
                        .to_string(),
                ));
            }
            if tagging_directive == Some(Directive::Copy) {
                return Err(Error::Validation(
                    "COPY tagging directive is not applicable to source object size \
                     greater than 5 GiB"
                        .to_string(),
                ));
            }
            return self
                .compose_object(bucket, key, std::slice::from_ref(source), options)
                .await;
        }

        let mut headers = options.headers();
        if let Some(directive) = metadata_directive {
            headers.insert("x-amz-metadata-directive".to_string(), directive.to_string());
        }
        if let Some(directive) = tagging_directive {
            headers.insert("x-amz-tagging-directive".to_string(), directive.to_string());
        }
        headers.extend(source.copy_headers());

        CopyObject::new(bucket, key, headers).request(self).await
    }
}
