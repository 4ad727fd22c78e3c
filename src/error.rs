use std::path::PathBuf;

use thiserror::Error;

/// Why a dataset refresh was abandoned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("http {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {what}: {source}")]
    Parse {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid {what}: expected {expected}")]
    Shape {
        what: &'static str,
        expected: &'static str,
    },
    #[error("http client unavailable: {0}")]
    Client(String),
}

impl LoadError {
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoadError::Timeout {
                url: url.to_string(),
            }
        } else {
            LoadError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LoadError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::LoadError;

    #[test]
    fn messages_name_the_failing_resource() {
        let err = LoadError::Status {
            url: "http://host/rosters.json".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "http 503 from http://host/rosters.json");

        let err = LoadError::Timeout {
            url: "http://host/schedule.json".to_string(),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }
}
