//! Content error types.

/// Error produced while reading or assembling article content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The backing fragment file does not exist.
    #[error("article not found: {0}")]
    NotFound(String),

    /// The root article lacks the index start marker required for book
    /// assembly. This is a content configuration problem, not a missing file.
    #[error("index markers not found in {0}")]
    IndexMarkersMissing(String),

    /// Any other read failure, surfaced unchanged.
    #[error("failed to read {file}: {source}")]
    Io {
        /// Fragment file the read targeted.
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// True when the error means "the article does not exist".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_recognized() {
        assert!(ContentError::NotFound("a.html".into()).is_not_found());
        assert!(!ContentError::IndexMarkersMissing("101".into()).is_not_found());
    }

    #[test]
    fn io_error_keeps_source() {
        let err = ContentError::Io {
            file: "a.html".into(),
            source: std::io::Error::other("disk gone"),
        };
        assert!(err.to_string().contains("a.html"));
        assert!(err.to_string().contains("disk gone"));
    }
}
