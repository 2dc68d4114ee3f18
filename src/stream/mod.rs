//! Uploads of streams and files, single `PutObject` or multipart
//! <https://docs.aws.amazon.com/AmazonS3/latest/userguide/mpuoverview.html>

pub mod file;
pub mod iterator;
pub mod part;
pub mod plan;
pub mod reader;
pub mod session;

use crate::{
    s3::{
        S3,
        actions::{PutObject, UploadPart},
        error::{Error, Result},
        limits::MAX_MULTIPART_COUNT,
        options::ObjectOptions,
        types::ObjectWriteResult,
    },
    stream::{part::Part, plan::PartPlan, reader::PartReader, session::UploadSession},
};
use bytes::Bytes;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use tokio::io::AsyncRead;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct PutObjectOptions {
    pub content_type: Option<String>,
    /// Required when the length is unknown
    pub part_size: Option<u64>,
    /// Part uploads in flight at once
    pub max_requests: u8,
    pub object: ObjectOptions,
}

impl Default for PutObjectOptions {
    fn default() -> Self {
        Self {
            content_type: None,
            part_size: None,
            max_requests: 1,
            object: ObjectOptions::default(),
        }
    }
}

impl PutObjectOptions {
    fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.object.headers();
        if !headers.contains_key("content-type") {
            headers.insert(
                "content-type".to_string(),
                self.content_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            );
        }
        headers
    }
}

// Read the next part, `uploaded` bytes were already read
async fn next_part<R: AsyncRead + Unpin>(
    reader: &mut PartReader<R>,
    plan: &PartPlan,
    uploaded: u64,
) -> Result<(Bytes, bool)> {
    match plan.total_size {
        Some(total) => {
            let size = plan.part_size.min(total - uploaded);
            let data = reader.read_part(size).await?;
            let read = uploaded + data.len() as u64;
            if read < uploaded + size {
                return Err(Error::Validation(format!(
                    "stream ended after {read} bytes, expected {total}"
                )));
            }
            Ok((data, read >= total))
        }
        None => Ok(reader.read_lookahead(plan.part_size).await?),
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/dev/UsingRESTAPImpUpload.html
// * Initiate Multipart Upload
// * Upload Part
// * Complete Multipart Upload
impl S3 {
    /// Upload `length` bytes of `source`, or the whole stream when the length
    /// is unknown. Data fitting in one part is sent with a single `PutObject`,
    /// anything else as a multipart upload that is aborted on failure.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the options are invalid, the stream is shorter than
    /// `length` or any request fails
    pub async fn put_object<R>(
        &self,
        bucket: &str,
        key: &str,
        source: R,
        length: Option<u64>,
        options: &PutObjectOptions,
    ) -> Result<ObjectWriteResult>
    where
        R: AsyncRead + Unpin + Send,
    {
        if key.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }

        options.object.validate(self.is_https())?;

        let plan = PartPlan::new(length, options.part_size)?;

        log::debug!(
            "upload plan for {bucket}/{key}: size: {:?}, part size: {}, parts: {:?}",
            plan.total_size,
            plan.part_size,
            plan.part_count
        );

        let mut reader = PartReader::new(source);
        let mut session = UploadSession::new(bucket, key);

        let (data, last) = match next_part(&mut reader, &plan, 0).await {
            Ok(first) => first,
            Err(err) => return Err(session.fail(self, err).await),
        };

        if last {
            session.single_shot();

            return match PutObject::new(bucket, key, data, options.headers())
                .request(self)
                .await
            {
                Ok(result) => {
                    session.completed();
                    Ok(result)
                }
                Err(err) => Err(session.fail(self, err).await),
            };
        }

        let result = match session.open(self, options.headers()).await {
            Ok(upload_id) => {
                match self
                    .upload_parts(&mut session, &upload_id, &mut reader, data, &plan, options)
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

    // Upload the first part and every part after it, at most `max_requests` at
    // once. After the first error no part is started and the ones in flight
    // are awaited, their results discarded.
    async fn upload_parts<R>(
        &self,
        session: &mut UploadSession,
        upload_id: &str,
        reader: &mut PartReader<R>,
        first: Bytes,
        plan: &PartPlan,
        options: &PutObjectOptions,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        session.uploading();

        let bucket = session.bucket().to_string();
        let key = session.key().to_string();
        let ssec = options.object.ssec_headers();
        let max_requests = usize::from(options.max_requests.max(1));

        log::info!("Max concurrent requests: {max_requests}");

        let mut tasks = FuturesUnordered::new();
        let mut number: u16 = 1;
        let mut uploaded = first.len() as u64;
        let mut data = first;
        let mut last = false;
        let mut failure = None;

        loop {
            let headers = ssec.clone();
            let (bucket, key) = (bucket.as_str(), key.as_str());

            log::debug!("Task push part: {number}, size: {}", data.len());

            tasks.push(async move {
                let etag = UploadPart::new(bucket, key, upload_id, number, data, headers)
                    .request(self)
                    .await?;
                Ok::<Part, Error>(Part::new(number, etag))
            });

            while tasks.len() >= max_requests {
                match tasks.next().await {
                    Some(Ok(part)) => session.add_part(part),
                    Some(Err(err)) => {
                        failure = Some(err);
                        break;
                    }
                    None => break,
                }
            }

            if failure.is_some() || last {
                break;
            }

            if number == MAX_MULTIPART_COUNT {
                failure = Some(Error::Validation(format!(
                    "stream needs more than {MAX_MULTIPART_COUNT} parts of {} bytes",
                    plan.part_size
                )));
                break;
            }

            number += 1;
            match next_part(reader, plan, uploaded).await {
                Ok((next, is_last)) => {
                    uploaded += next.len() as u64;
                    data = next;
                    last = is_last;
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        // parts in flight finish before the upload can be aborted
        while let Some(part) = tasks.next().await {
            match part {
                Ok(part) if failure.is_none() => session.add_part(part),
                Ok(part) => log::debug!("discarding part {}", part.get_number()),
                Err(err) if failure.is_none() => failure = Some(err),
                Err(err) => log::debug!("part failed after the upload failed: {err}"),
            }
        }

        failure.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = PutObjectOptions::default();
        assert_eq!(options.max_requests, 1);
        assert_eq!(
            options.headers().get("content-type").unwrap(),
            DEFAULT_CONTENT_TYPE
        );

        let options = PutObjectOptions {
            content_type: Some("text/plain".to_string()),
            ..PutObjectOptions::default()
        };
        assert_eq!(options.headers().get("content-type").unwrap(), "text/plain");

        // metadata wins over the option
        let options = PutObjectOptions {
            content_type: Some("text/plain".to_string()),
            object: ObjectOptions::new().with_metadata("Content-Type", "image/png"),
            ..PutObjectOptions::default()
        };
        assert_eq!(options.headers().get("content-type").unwrap(), "image/png");
    }

    #[tokio::test]
    async fn test_next_part_short_stream() {
        let plan = PartPlan::new(Some(10), None).unwrap();
        let mut reader = PartReader::new(&b"12345"[..]);
        let err = next_part(&mut reader, &plan, 0).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_put_object_validation() {
        let s3 = S3::new("http://localhost:9000", None, None).unwrap();

        // unknown length without part size
        let err = s3
            .put_object("bucket", "key", &b"x"[..], None, &PutObjectOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // SSE-C over HTTP
        let options = PutObjectOptions {
            object: ObjectOptions::new().with_sse(crate::s3::Sse::CustomerKey([0; 32])),
            ..PutObjectOptions::default()
        };
        let err = s3
            .put_object("bucket", "key", &b"x"[..], Some(1), &options)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
