//! Error types for loading and presenting slide decks.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a presentation from being loaded.
///
/// Everything else (bad image URLs, images that fail to decode) degrades to a
/// warning or a placeholder and never reaches this type.
#[derive(Error, Debug)]
pub enum Error {
    /// The text produced no slides after segmentation.
    #[error("No slides found")]
    NoSlides,

    /// A presentation file or bundled example could not be loaded.
    #[error("Could not load presentation {name}: {reason}")]
    ResourceLoad { name: String, reason: String },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
