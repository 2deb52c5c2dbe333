use crate::corona::country::RecordError;
use thiserror::Error;

/// Why a refresh of the country cache was abandoned.
///
/// Any of these leaves the previous snapshot in place.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("request to the statistics API failed: {0}")]
    Transport(String),

    #[error("unexpected response from the statistics API: {0}")]
    Payload(String),

    #[error("country record #{index} is invalid: {source}")]
    Validation {
        index: usize,
        #[source]
        source: RecordError,
    },
}

impl From<reqwest::Error> for RefreshError {
    fn from(err: reqwest::Error) -> Self {
        RefreshError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_the_offending_record() {
        let err = RefreshError::Validation {
            index: 3,
            source: RecordError::EmptyName,
        };
        assert_eq!(
            err.to_string(),
            "country record #3 is invalid: record has an empty country name"
        );
    }
}
