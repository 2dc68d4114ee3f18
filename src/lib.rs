//! Client for S3-compatible object storage.
//!
//! Uploads of any size from files or streams of unknown length, server-side
//! compose, presigned URLs and bucket region discovery.

pub mod cli;
pub mod compose;
pub mod s3;
pub mod stream;
