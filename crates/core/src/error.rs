//! Error types for presentation editing, persistence and export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing, storing or exporting a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The durable storage backend rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored or supplied data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An update was attempted before the initial load completed.
    #[error("Presentation is still loading; update ignored")]
    NotLoaded,

    /// A module already holds the maximum number of features.
    #[error("Maximum of {max} features per module reached")]
    FeatureLimitReached {
        /// The configured per-module cap.
        max: usize,
    },

    /// A module index does not address one of the configured modules.
    #[error("Module {0} does not exist")]
    ModuleOutOfRange(usize),

    /// A feature index does not address a feature of its module.
    #[error("Feature {feature} does not exist in module {module}")]
    FeatureOutOfRange {
        /// Module index.
        module: usize,
        /// Feature index within the module.
        feature: usize,
    },

    /// An uploaded file is not an image.
    #[error("Please select a valid image file.")]
    NotAnImage(String),

    /// An uploaded file exceeds the size limit.
    #[error("File size must be less than {}MB.", .max / (1024 * 1024))]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        max: u64,
    },

    /// There is nothing to export (no visible module has features).
    #[error("No visible modules with features to export")]
    NothingToExport,

    /// A remote asset (image, stylesheet or font) could not be retrieved.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// An image could not be loaded or decoded.
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// The rasterizer failed on a slide layout.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// The document collaborator failed to accept a page or finish.
    #[error("Document error: {0}")]
    Document(String),
}

impl Error {
    /// Whether the error is a rejected user input that leaves the model
    /// unchanged and can simply be retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::FeatureLimitReached { .. }
                | Error::ModuleOutOfRange(_)
                | Error::FeatureOutOfRange { .. }
                | Error::NotAnImage(_)
                | Error::FileTooLarge { .. }
        )
    }
}
