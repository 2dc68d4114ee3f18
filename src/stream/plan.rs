//! Part size and count of an upload

use crate::s3::{
    error::{Error, Result},
    limits::{MAX_MULTIPART_COUNT, MAX_MULTIPART_OBJECT_SIZE, MAX_PART_SIZE, MIN_PART_SIZE},
};

/// Validated plan, computed once per upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    pub part_size: u64,
    /// `None` when the length is unknown, the last part is found by a short read
    pub part_count: Option<u16>,
    pub total_size: Option<u64>,
}

impl PartPlan {
    /// A `part_size` of zero is the same as unset.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the part size is out of bounds, the object is too
    /// large or the length is unknown and no part size was given
    pub fn new(total_size: Option<u64>, part_size: Option<u64>) -> Result<Self> {
        let part_size = part_size.filter(|size| *size > 0);

        if let Some(size) = part_size {
            if size < MIN_PART_SIZE {
                return Err(Error::Validation(format!(
                    "part size {size} is not supported; minimum allowed 5MiB"
                )));
            }
            if size > MAX_PART_SIZE {
                return Err(Error::Validation(format!(
                    "part size {size} is not supported; maximum allowed 5GiB"
                )));
            }
        }

        let Some(total) = total_size else {
            return match part_size {
                Some(part_size) => Ok(Self {
                    part_size,
                    part_count: None,
                    total_size: None,
                }),
                None => Err(Error::Validation(
                    "valid part size must be provided when object size is unknown".to_string(),
                )),
            };
        };

        if total > MAX_MULTIPART_OBJECT_SIZE {
            return Err(Error::Validation(format!(
                "object size {total} is not supported; maximum allowed 5TiB"
            )));
        }

        let part_size = part_size.unwrap_or_else(|| {
            let size = total.div_ceil(u64::from(MAX_MULTIPART_COUNT));
            (size.div_ceil(MIN_PART_SIZE) * MIN_PART_SIZE).max(MIN_PART_SIZE)
        });

        if part_size > MAX_PART_SIZE {
            return Err(Error::Validation(format!(
                "object size {total} needs parts larger than 5GiB"
            )));
        }

        let count = total.div_ceil(part_size).max(1);
        if count > u64::from(MAX_MULTIPART_COUNT) {
            return Err(Error::Validation(format!(
                "object size {total} and part size {part_size} make more than \
                 {MAX_MULTIPART_COUNT} parts"
            )));
        }

        Ok(Self {
            part_size,
            part_count: u16::try_from(count).ok(),
            total_size: Some(total),
        })
    }

    #[must_use]
    pub const fn is_length_known(&self) -> bool {
        self.total_size.is_some()
    }

    /// Known to fit in one part, a plain `PutObject` is enough
    #[must_use]
    pub fn is_single_part(&self) -> bool {
        self.part_count == Some(1)
    }
}
