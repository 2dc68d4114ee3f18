//! S3 service limits and constants
//!
//! All upload planning, compose validation and presign checks read their
//! bounds from here.
//!
//! # References
//! - [S3 Quotas](https://docs.aws.amazon.com/AmazonS3/latest/userguide/qfacts.html)
//! - [Multipart Upload Overview](https://docs.aws.amazon.com/AmazonS3/latest/userguide/mpuoverview.html)

use std::time::Duration;

/// Maximum size of an object assembled by a multipart upload (5 TiB)
pub const MAX_MULTIPART_OBJECT_SIZE: u64 = 5_497_558_138_880;

/// Maximum size of a single multipart upload part (5 GiB)
///
/// Also the largest object that can be copied with a single `CopyObject`.
pub const MAX_PART_SIZE: u64 = 5_368_709_120;

/// Minimum size of a multipart upload part (5 MiB)
///
/// The last part can be smaller than this minimum.
pub const MIN_PART_SIZE: u64 = 5_242_880;

/// Maximum number of parts in a multipart upload, numbered 1 to 10,000
pub const MAX_MULTIPART_COUNT: u16 = 10_000;

/// Longest validity accepted for a presigned URL (7 days)
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_hours(168);

/// Region used when nothing else is known about a bucket
pub const DEFAULT_REGION: &str = "us-east-1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_sane() {
        const _: () = assert!(MAX_MULTIPART_OBJECT_SIZE > MAX_PART_SIZE);
        const _: () = assert!(MAX_PART_SIZE > MIN_PART_SIZE);

        // the max object must fit in max parts of max size
        let max_uploadable = MAX_PART_SIZE * u64::from(MAX_MULTIPART_COUNT);
        assert!(
            max_uploadable >= MAX_MULTIPART_OBJECT_SIZE,
            "Should be able to upload {MAX_MULTIPART_OBJECT_SIZE} bytes \
             with {MAX_MULTIPART_COUNT} parts of {MAX_PART_SIZE} bytes each"
        );
    }

    #[test]
    fn test_documented_values_match_constants() {
        assert_eq!(MAX_MULTIPART_OBJECT_SIZE, 5 * 1024 * 1024 * 1024 * 1024, "5 TiB");
        assert_eq!(MAX_PART_SIZE, 5 * 1024 * 1024 * 1024, "5 GiB");
        assert_eq!(MIN_PART_SIZE, 5 * 1024 * 1024, "5 MiB");
        assert_eq!(MAX_MULTIPART_COUNT, 10_000, "10,000 parts");
        assert_eq!(MAX_PRESIGN_EXPIRY.as_secs(), 7 * 24 * 3600, "7 days");
    }
}
