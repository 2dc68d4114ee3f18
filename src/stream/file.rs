//! File helpers around `put_object` and `get_object`

use crate::{
    s3::{
        S3,
        error::{Error, Result},
        object::GetObjectOptions,
        types::{ObjectStat, ObjectWriteResult},
    },
    stream::PutObjectOptions,
};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufReader},
};

impl S3 {
    /// Upload a file, its length is the known size of the upload
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or the upload fails
    pub async fn fput_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        options: &PutObjectOptions,
    ) -> Result<ObjectWriteResult> {
        let file = File::open(path).await?;
        let length = file.metadata().await?.len();

        log::debug!("uploading {} ({length} bytes)", path.display());

        self.put_object(bucket, key, BufReader::new(file), Some(length), options)
            .await
    }

    /// Download an object into `path`. Data lands in a temporary file in the
    /// same directory that replaces `path` once complete.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `path` is a directory, the object can not be read
    /// or the file can not be written
    pub async fn fget_object(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        options: &GetObjectOptions,
    ) -> Result<ObjectStat> {
        if path.is_dir() {
            return Err(Error::Validation(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        tokio::fs::create_dir_all(&dir).await?;

        let stat = self
            .stat_object(
                bucket,
                key,
                options.version_id.as_deref(),
                options.ssec.as_ref(),
            )
            .await?;

        let tmp = NamedTempFile::new_in(&dir)?;
        let mut file = File::from_std(tmp.reopen()?);

        let mut response = self.get_object(bucket, key, options).await?;

        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        let expected = match options.length {
            Some(length) => length.min(stat.size.saturating_sub(options.offset)),
            None => stat.size.saturating_sub(options.offset),
        };
        if written != expected {
            return Err(Error::Protocol(format!(
                "downloaded {written} bytes, expected {expected}"
            )));
        }

        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        log::info!("downloaded {bucket}/{key} to {}", path.display());

        Ok(stat)
    }
}
