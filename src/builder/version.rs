use crate::common::{
    capacity::capacities,
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
    mode::Mode,
};

// Version resolution
//------------------------------------------------------------------------------

/// Smallest version whose capacity for `text` at `ecl` fits the text. Text longer
/// than the version 40 capacity still resolves to 40; the encoder has the final say.
pub fn minimum_version(text: &str, ecl: ECLevel) -> Version {
    let mode = Mode::classify(text);
    let len = mode.payload_len(text);
    capacities(ecl, mode)
        .iter()
        .position(|&cap| len <= cap)
        .and_then(|i| Version::new(i + 1).ok())
        .unwrap_or(Version::MAX)
}

/// Validates `requested` against the minimum version, or picks the minimum when
/// no version is requested. Callers pass the effective error correction level.
pub fn resolve_version(text: &str, ecl: ECLevel, requested: Option<Version>) -> QRResult<Version> {
    let min = minimum_version(text, ecl);
    match requested {
        None => Ok(min),
        Some(ver) if ver < min => {
            Err(QRError::InsufficientVersion { requested: *ver, minimum_required: *min })
        }
        Some(ver) => Ok(ver),
    }
}
