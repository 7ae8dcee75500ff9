use std::cmp::Ordering;

use serde::Deserialize;

// Mode
//------------------------------------------------------------------------------

/// Payload mode of a QR segment. Ordered by permissiveness: every numeric text is
/// alphanumeric and every alphanumeric text is byte encodable.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl PartialOrd for Mode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mode {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Mode {
    /// Narrowest mode able to hold every character of `text`. Empty text is byte.
    pub fn classify(text: &str) -> Mode {
        if text.is_empty() {
            return Mode::Byte;
        }
        [Mode::Numeric, Mode::Alphanumeric]
            .into_iter()
            .find(|m| text.chars().all(|c| m.contains(c)))
            .unwrap_or(Mode::Byte)
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            Self::Numeric => c.is_ascii_digit(),
            Self::Alphanumeric => matches!(
                c.to_ascii_uppercase(),
                '0'..='9' | 'A'..='Z' | ' ' | '$' | '%' | '*' | '+' | '-' | '.' | '/' | ':'
            ),
            Self::Byte => true,
        }
    }

    /// Length of `text` in this mode's capacity unit: characters for numeric and
    /// alphanumeric, UTF-8 bytes for byte mode.
    pub fn payload_len(&self, text: &str) -> usize {
        match self {
            Self::Numeric | Self::Alphanumeric => text.chars().count(),
            Self::Byte => text.len(),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

pub fn classify(text: &str) -> Mode {
    Mode::classify(text)
}


#[cfg(test)]
mod mode_proptests {
    use proptest::prelude::*;

    use super::Mode;

    proptest! {
        #[test]
        fn proptest_numeric(text in "[0-9]{1,64}") {
            prop_assert_eq!(Mode::classify(&text), Mode::Numeric);
        }

        #[test]
        fn proptest_alphanumeric(text in r"[0-9A-Za-z $%*+\-./:]{0,63}[A-Za-z $%*+\-./:]") {
            prop_assert_eq!(Mode::classify(&text), Mode::Alphanumeric);
        }

        #[test]
        fn proptest_byte(prefix in "[0-9A-Z]{0,16}", odd in "[a-z]{0,4}[!@#&()\\[\\]{}=?,;~]") {
            let text = format!("{prefix}{odd}");
            prop_assert_eq!(Mode::classify(&text), Mode::Byte);
        }
    }
}
