use thiserror::Error;

/// Failure of a single request against the remote catalog.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode {url}: {message}")]
    Decode { url: String, message: String },

    #[error("no resource at {0}")]
    NotFound(String),
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                url
            }
            Self::NotFound(url) => url,
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("load failed: {0}")]
    Index(#[source] FetchError),

    #[error("a catalog load is already in progress")]
    LoadInFlight,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
