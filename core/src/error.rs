use thiserror::Error;

/// Banner shown when a recompute of the map fails.
pub const UPDATE_FAILED_MESSAGE: &str =
    "An error occurred while updating the map. Please try again.";

#[derive(Error, Debug)]
pub enum LoveError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Both locations must be set before showing the connection")]
    LocationsUnset,

    #[error("Memory '{id}' not found")]
    MemoryNotFound { id: String },

    #[error("Unsupported image file: {path}")]
    UnsupportedImage { path: String },

    #[error("Map provider failure: {0}")]
    MapProvider(MapFailure),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures reported by the map provider through the injected callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapFailure {
    /// The provider rejected the credentials.
    Auth,
    /// The provider script or SDK could not be loaded.
    Load,
    /// Tiles did not arrive after the first idle event.
    Tiles,
}

impl std::fmt::Display for MapFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.banner())
    }
}

impl MapFailure {
    pub fn banner(&self) -> &'static str {
        match self {
            MapFailure::Auth => "Map authentication failed. Please check your API key.",
            MapFailure::Load => {
                "Failed to load the map. Please check your internet connection and try refreshing the page."
            }
            MapFailure::Tiles => "Failed to load map tiles. Please check your internet connection.",
        }
    }
}

impl LoveError {
    /// The string a front end shows in its error banner.
    /// Every failure degrades to one of these; there are no error codes.
    pub fn user_message(&self) -> String {
        match self {
            LoveError::MapProvider(failure) => failure.banner().to_string(),
            LoveError::LocationsUnset => "Please enter both locations first.".to_string(),
            LoveError::InvalidCoordinate { .. } => {
                "Please enter a valid latitude and longitude.".to_string()
            }
            LoveError::UnsupportedImage { .. } => "Please choose an image file.".to_string(),
            _ => UPDATE_FAILED_MESSAGE.to_string(),
        }
    }
}

pub type LoveResult<T> = Result<T, LoveError>;
