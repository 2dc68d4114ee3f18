use crate::{
    cli::location::S3Location,
    compose::ComposeSource,
    s3::{GetObjectOptions, ObjectOptions, PresignOptions, S3},
    stream::PutObjectOptions,
};
use anyhow::{Result, anyhow};
use std::{path::PathBuf, time::Duration};

#[derive(Debug)]
pub enum Action {
    PutObject {
        bucket: String,
        key: String,
        file: Option<PathBuf>,
        part_size: u64,
        max_requests: u8,
        content_type: Option<String>,
    },
    GetObject {
        bucket: String,
        key: String,
        file: PathBuf,
    },
    ComposeObject {
        bucket: String,
        key: String,
        sources: Vec<S3Location>,
    },
    ShareObject {
        bucket: String,
        key: String,
        expire: u64,
    },
}

impl Action {
    /// # Errors
    ///
    /// Will return `Err` if the operation fails
    pub async fn run(self, s3: &S3) -> Result<()> {
        match self {
            Self::PutObject {
                bucket,
                key,
                file,
                part_size,
                max_requests,
                content_type,
            } => {
                let options = PutObjectOptions {
                    content_type,
                    part_size: Some(part_size),
                    max_requests,
                    object: ObjectOptions::default(),
                };

                let result = match file {
                    Some(file) => s3.fput_object(&bucket, &key, &file, &options).await?,
                    None => {
                        s3.put_object(&bucket, &key, tokio::io::stdin(), None, &options)
                            .await?
                    }
                };

                println!("ETag: {}", result.etag);
                if let Some(version_id) = result.version_id {
                    println!("VersionId: {version_id}");
                }
            }

            Self::GetObject { bucket, key, file } => {
                let stat = s3
                    .fget_object(&bucket, &key, &file, &GetObjectOptions::default())
                    .await?;
                println!("{} bytes, ETag: {}", stat.size, stat.etag);
            }

            Self::ComposeObject {
                bucket,
                key,
                sources,
            } => {
                let sources: Vec<ComposeSource> = sources
                    .iter()
                    .map(|src| ComposeSource::new(&src.bucket, &src.key))
                    .collect();
                let result = s3
                    .compose_object(&bucket, &key, &sources, &ObjectOptions::default())
                    .await?;
                println!("ETag: {}", result.etag);
            }

            Self::ShareObject {
                bucket,
                key,
                expire,
            } => {
                let url = s3
                    .presigned_get_object(
                        &bucket,
                        &key,
                        Duration::from_secs(expire),
                        &PresignOptions::default(),
                    )
                    .await
                    .map_err(|e| anyhow!("could not share {bucket}/{key}: {e}"))?;
                println!("{url}");
            }
        }

        Ok(())
    }
}
