//! Error types shared by layout, composition and rendering.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a card an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Front,
    Back,
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Front => f.write_str("front"),
            Face::Back => f.write_str("back"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Page or tile dimensions are unusable.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The tile does not fit the printable area but cards still need placing.
    #[error(
        "Degenerate layout: a {tile_width}x{tile_height} pt tile does not fit the \
         {printable_width}x{printable_height} pt printable area ({remaining} card(s) unplaced)"
    )]
    DegenerateLayout {
        tile_width: f32,
        tile_height: f32,
        printable_width: f32,
        printable_height: f32,
        remaining: usize,
    },

    /// Operation not allowed in the document's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An image for a card face could not be found or read.
    #[error("Missing asset for card {index} ({face}): {detail}")]
    MissingAsset {
        index: usize,
        face: Face,
        detail: String,
    },

    /// The job manifest could not be parsed.
    #[error("Manifest error in '{path}': {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn missing(index: usize, face: Face, detail: impl Into<String>) -> Self {
        Error::MissingAsset {
            index,
            face,
            detail: detail.into(),
        }
    }
}
