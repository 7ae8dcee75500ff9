use std::fmt::{Display, Formatter};
use std::str::FromStr;

use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use serde::Deserialize;

use crate::common::error::QRError;

pub(crate) const COVERED: Luma<u8> = Luma([255]);

/// Share of the pitch left empty on each side of padded shapes.
const PADDING_RATIO: f32 = 0.1;

// Module shape
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleShape {
    #[default]
    Squares,
    Dots,
    Rounded,
    ExtraRounded,
}

impl ModuleShape {
    pub const ALL: [ModuleShape; 4] =
        [ModuleShape::Squares, ModuleShape::Dots, ModuleShape::Rounded, ModuleShape::ExtraRounded];

    /// Corner radius of the padded cell as a share of the pitch.
    fn corner_ratio(self) -> Option<f32> {
        match self {
            Self::Rounded => Some(1.0 / 5.0),
            Self::ExtraRounded => Some(1.0 / 2.5),
            Self::Squares | Self::Dots => None,
        }
    }

    /// Marks the coverage of one dark module whose cell starts at `(x, y)`.
    /// Squares fill the whole cell so that adjacent modules stay connected.
    pub fn draw(self, mask: &mut GrayImage, x: i32, y: i32, pitch: u32) {
        let pad = (pitch as f32 * PADDING_RATIO).round() as u32;
        let inner = pitch - 2 * pad;
        let (ix, iy) = (x + pad as i32, y + pad as i32);

        match self {
            Self::Squares => draw_filled_rect_mut(mask, Rect::at(x, y).of_size(pitch, pitch), COVERED),
            Self::Dots if inner < 2 => {
                draw_filled_rect_mut(mask, Rect::at(ix, iy).of_size(inner, inner), COVERED)
            }
            Self::Dots => {
                let half = pitch as i32 / 2;
                draw_filled_circle_mut(mask, (x + half, y + half), inner as i32 / 2, COVERED);
            }
            Self::Rounded | Self::ExtraRounded => {
                let ratio = self.corner_ratio().unwrap_or_default();
                let r = ((pitch as f32 * ratio).round() as u32).min(inner / 2);
                draw_rounded_rect(mask, ix, iy, inner, r);
            }
        }
    }
}

/// Square of side `side` at `(x, y)` with corners of radius `r`, built from two
/// crossing bars and four corner discs.
fn draw_rounded_rect(mask: &mut GrayImage, x: i32, y: i32, side: u32, r: u32) {
    if r == 0 {
        draw_filled_rect_mut(mask, Rect::at(x, y).of_size(side, side), COVERED);
        return;
    }

    let bar = side - 2 * r;
    if bar > 0 {
        draw_filled_rect_mut(mask, Rect::at(x + r as i32, y).of_size(bar, side), COVERED);
        draw_filled_rect_mut(mask, Rect::at(x, y + r as i32).of_size(side, bar), COVERED);
    }

    let (r, far) = (r as i32, side as i32 - 1 - r as i32);
    for (dx, dy) in [(r, r), (far, r), (r, far), (far, far)] {
        draw_filled_circle_mut(mask, (x + dx, y + dy), r, COVERED);
    }
}

impl FromStr for ModuleShape {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squares" | "square" => Ok(Self::Squares),
            "dots" | "dot" => Ok(Self::Dots),
            "rounded" => Ok(Self::Rounded),
            "extra-rounded" => Ok(Self::ExtraRounded),
            _ => Err(QRError::InvalidShape(s.to_string())),
        }
    }
}

impl Display for ModuleShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Squares => "squares",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
            Self::ExtraRounded => "extra-rounded",
        };
        f.write_str(name)
    }
}
