use thiserror::Error;

/// Failures talking to the storage API.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("API key missing; set drive.api_key or DRIVEFOLIO_API_KEY")]
    MissingApiKey,

    #[error("Drive returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Drive request failed: {0}")]
    Transport(String),

    #[error("Failed to read Drive response: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for DriveError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => DriveError::Status {
                status,
                url: strip_query(response.get_url()),
            },
            // Transport's Display carries the full URL, key included.
            ureq::Error::Transport(transport) => DriveError::Transport(match transport.message() {
                Some(message) => format!("{}: {}", transport.kind(), message),
                None => transport.kind().to_string(),
            }),
        }
    }
}

/// Drop the query string so the API key never reaches the logs.
fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query_hides_key() {
        assert_eq!(
            strip_query("https://www.googleapis.com/drive/v3/files?key=secret&q=x"),
            "https://www.googleapis.com/drive/v3/files"
        );
        assert_eq!(strip_query("https://example.com/a"), "https://example.com/a");
    }
}
