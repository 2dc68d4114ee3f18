/// One uploaded or copied part, the `ETag` is kept unquoted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Part {
    number: u16,
    etag: String,
}

impl Part {
    #[must_use]
    pub fn new(number: u16, etag: impl Into<String>) -> Self {
        Self {
            number,
            etag: etag.into(),
        }
    }

    #[must_use]
    pub fn get_etag(&self) -> &str {
        &self.etag
    }

    #[must_use]
    pub const fn get_number(&self) -> u16 {
        self.number
    }
}
