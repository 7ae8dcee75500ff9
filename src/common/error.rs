use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    // Options
    #[error("invalid version {0}: expected a value within 1..=40")]
    InvalidVersion(usize),
    #[error(
        "The chosen QR code version ({requested}) cannot contain this amount of data. \
         Minimum version required: {minimum_required}"
    )]
    InsufficientVersion { requested: usize, minimum_required: usize },
    #[error("invalid error correction level {0:?}: expected one of L, M, Q, H")]
    InvalidECLevel(String),
    #[error("invalid module shape {0:?}: expected squares, dots, rounded or extra-rounded")]
    InvalidShape(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),
    #[error("invalid size {0}: expected a side within 1..=8192 pixels")]
    InvalidSize(u32),
    #[error("invalid logo size: must be non-zero")]
    InvalidLogoSize,
    #[error("invalid configuration: {0}")]
    Config(String),

    // Pipeline
    #[error("failed to generate QR code: {0}")]
    Encode(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("compositing failed: {0}")]
    Compositing(String),
    #[error("export failed: {0}")]
    Export(String),
}

impl QRError {
    /// True for failures the caller can fix by adjusting options, as opposed to
    /// encoder, decoder or export failures.
    pub fn is_options_error(&self) -> bool {
        !matches!(self, Self::Encode(_) | Self::Decode(_) | Self::Compositing(_) | Self::Export(_))
    }
}

impl From<image::ImageError> for QRError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => Self::Decode(e.to_string()),
            e => Self::Export(e.to_string()),
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
