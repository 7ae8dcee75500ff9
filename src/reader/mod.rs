//! Recovers the logical module grid of a rendered symbol from its pixels alone.
//!
//! The encoder is treated as a black box that only hands back a raster, so the
//! module pitch and every module's state are re-derived by sampling:
//!
//! 1. Pitch: the shortest complete run of same-class pixels on the middle row
//!    and column.
//! 2. Size: `ceil(width / pitch)` modules per side.
//! 3. State: one sample at each module center, dark iff luminance < 128.

mod pitch;

use image::RgbaImage;
use tracing::debug;

use crate::common::color::is_dark;

pub use pitch::{detect_pitch, fallback_pitch};

// Module grid
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    modules: Vec<bool>,
    w: usize,
    pitch: u32,
}

impl ModuleGrid {
    /// Samples `img` into a grid. Pure function of the pixel content.
    pub fn reconstruct(img: &RgbaImage) -> Self {
        let (iw, ih) = img.dimensions();
        let pitch = detect_pitch(img).unwrap_or_else(|| {
            let pitch = fallback_pitch(iw);
            debug!(pitch, "No transition on the middle scanline, using fallback pitch");
            pitch
        });

        let w = iw.div_ceil(pitch) as usize;
        let mut modules = Vec::with_capacity(w * w);
        if ih > 0 {
            for r in 0..w as u32 {
                let y = (r * pitch + pitch / 2).min(ih - 1);
                for c in 0..w as u32 {
                    let x = (c * pitch + pitch / 2).min(iw - 1);
                    modules.push(is_dark(img.get_pixel(x, y)));
                }
            }
        } else {
            modules.resize(w * w, false);
        }

        debug!(width = w, pitch, "Reconstructed module grid");
        Self { modules, w, pitch }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.w && c < self.w, "Module ({r}, {c}) outside grid of width {}", self.w);
        self.modules[r * self.w + c]
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Row and column of every dark module, row by row.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.w;
        self.modules.iter().enumerate().filter(|(_, &m)| m).map(move |(i, _)| (i / w, i % w))
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let mut res = String::with_capacity(self.w * (self.w + 1) + 1);
        res.push('\n');
        for r in 0..self.w {
            for c in 0..self.w {
                res.push(if self.get(r, c) { '#' } else { '.' });
            }
            res.push('\n');
        }
        res
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use image::RgbaImage;

    use crate::common::color::{BLACK, WHITE};

    /// Paints a grid given as rows of `#` and `.` with `pitch` pixels per module.
    pub fn paint(rows: &[&str], pitch: u32) -> RgbaImage {
        let w = rows.len() as u32;
        RgbaImage::from_fn(w * pitch, w * pitch, |x, y| {
            let row = rows[(y / pitch) as usize].as_bytes();
            if row[(x / pitch) as usize] == b'#' {
                BLACK
            } else {
                WHITE
            }
        })
    }
}

#[cfg(test)]
mod grid_tests {
    use image::{Rgba, RgbaImage};

    use super::{test_utils::paint, ModuleGrid};
    use crate::common::color::{TRANSPARENT, WHITE};

    const ROWS: [&str; 7] =
        [".......", ".#.##..", ".......", "#.#.#.#", ".##..#.", "...#...", ".#....#"];

    #[test]
    fn test_reconstruct_painted_grid() {
        let img = paint(&ROWS, 6);
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.pitch(), 6);
        assert_eq!(grid.width(), 7);
        let exp = format!("\n{}\n", ROWS.join("\n"));
        assert_eq!(grid.to_debug_str(), exp);
        assert_eq!(grid.count_dark_modules(), 13);
    }

    #[test]
    fn test_dark_modules() {
        let img = paint(&["#..", "..#", ".#."], 4);
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.dark_modules().collect::<Vec<_>>(), vec![(0, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_reconstruct_is_idempotent() {
        let img = paint(&ROWS, 5);
        assert_eq!(ModuleGrid::reconstruct(&img), ModuleGrid::reconstruct(&img));
    }

    #[test]
    fn test_partial_trailing_module() {
        // 7 modules of 6 px cropped to 40 px: last column is 4 px wide
        let full = paint(&ROWS, 6);
        let img = image::imageops::crop_imm(&full, 0, 0, 40, 40).to_image();
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.pitch(), 6);
        assert_eq!(grid.width(), 7);
        assert!(grid.get(3, 6));
    }

    #[test]
    fn test_blank_raster_uses_fallback_pitch() {
        let img = RgbaImage::from_pixel(290, 290, WHITE);
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.pitch(), 10);
        assert_eq!(grid.width(), 29);
        assert_eq!(grid.count_dark_modules(), 0);
    }

    #[test]
    fn test_tiny_blank_raster_never_zero_pitch() {
        let img = RgbaImage::from_pixel(10, 10, TRANSPARENT);
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.pitch(), 1);
        assert_eq!(grid.width(), 10);
    }

    #[test]
    fn test_empty_raster() {
        let grid = ModuleGrid::reconstruct(&RgbaImage::new(0, 0));
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.count_dark_modules(), 0);
    }

    #[test]
    fn test_colored_modules_use_luminance() {
        let navy = Rgba([10, 20, 90, 255]);
        let cream = Rgba([250, 240, 200, 255]);
        let img = RgbaImage::from_fn(30, 30, |x, y| if (x / 10 + y / 10) % 2 == 0 { navy } else { cream });
        let grid = ModuleGrid::reconstruct(&img);
        assert_eq!(grid.pitch(), 10);
        assert!(grid.get(0, 0) && !grid.get(0, 1) && grid.get(1, 1));
    }
}
