use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::Deserialize;

use super::error::{QRError, QRResult};

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        match ver {
            1..=40 => Ok(Self(ver)),
            _ => Err(QRError::InvalidVersion(ver)),
        }
    }

    /// Number of modules per side, excluding the quiet zone.
    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ver = usize::deserialize(deserializer)?;
        Version::new(ver).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod version_tests {
    use super::Version;
    use crate::common::error::QRError;

    #[test]
    fn test_bounds() {
        assert_eq!(Version::new(0), Err(QRError::InvalidVersion(0)));
        assert_eq!(Version::new(41), Err(QRError::InvalidVersion(41)));
        assert_eq!(Version::new(1), Ok(Version::MIN));
        assert_eq!(Version::new(40), Ok(Version::MAX));
    }

    #[test]
    fn test_width() {
        assert_eq!(Version::MIN.width(), 21);
        assert_eq!(Version::MAX.width(), 177);
    }

    #[test]
    fn test_all_is_ascending() {
        let all = Version::all().map(|v| *v).collect::<Vec<_>>();
        assert_eq!(all.len(), 40);
        assert_eq!(all[0], 1);
        assert!(all.windows(2).all(|w| w[0] + 1 == w[1]));
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Deserialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel(s.to_string())),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
