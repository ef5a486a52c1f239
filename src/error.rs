pub type AdmintResult<T> = Result<T, AdmintError>;

#[derive(thiserror::Error, Debug)]
pub enum AdmintError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A single template's bytes are not a valid image. Callers skip the
    /// affected item and continue the run.
    #[error("decode error: {0}")]
    Decode(String),

    /// Remote store failure. Swallowed into a `None` result when routed
    /// through [`QuotaGate::call`](crate::QuotaGate::call).
    #[error("remote fetch error: {0}")]
    Fetch(String),

    /// Output cannot be written. Fatal to the whole run.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdmintError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            AdmintError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(AdmintError::decode("x").to_string().contains("decode error:"));
        assert!(
            AdmintError::fetch("x")
                .to_string()
                .contains("remote fetch error:")
        );
    }

    #[test]
    fn io_and_other_preserve_source() {
        let io = AdmintError::from(std::io::Error::other("disk gone"));
        assert!(io.to_string().contains("disk gone"));

        let base = std::io::Error::other("boom");
        let err = AdmintError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
