use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to build the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Invalid Spark UI address {address}: {source}")]
    Url {
        address: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read {}: {source}", path.display())]
    RuntimeFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("spark {0} is still unresolved after reading the driver environment")]
    Unresolved(&'static str),
}

/// Failure to deliver a batch to the events API. HTTP error statuses are not errors, they are reported as the
/// returned status code.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("Failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to compress events: {0}")]
    Compress(#[from] std::io::Error),
    #[error("Failed to post events to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
