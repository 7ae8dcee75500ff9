//! Redraws a reconstructed module grid with a module shape, a solid or gradient
//! fill, an optional centered logo and an optional transparent background.

pub mod gradient;
pub mod logo;
pub mod shape;

pub use gradient::{ColorStop, Gradient, GradientKind, GradientShader};
pub use logo::{logo_draw_size, Logo, LogoSource, DEFAULT_LOGO_RATIO, MAX_LOGO_RATIO};
pub use shape::ModuleShape;

use image::{DynamicImage, GrayImage, ImageBuffer, Rgba, RgbaImage};
use num_traits::cast;
use tracing::debug;

use crate::common::{
    color::{blend, is_transparent, TRANSPARENT},
    error::{QRError, QRResult},
};
use crate::reader::ModuleGrid;

// Style compositor
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StyleCompositor {
    pub shape: ModuleShape,
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
    pub gradient: Option<Gradient>,
    pub logo_size: Option<u32>,
}

impl StyleCompositor {
    /// Paints `grid` onto a fresh `size` x `size` surface. Fails when the grid
    /// holds no dark module, which happens when the foreground is too light to
    /// be told apart from the background.
    pub fn compose(
        &self,
        grid: &ModuleGrid,
        size: u32,
        logo: Option<&DynamicImage>,
    ) -> QRResult<RgbaImage> {
        if grid.count_dark_modules() == 0 {
            return Err(QRError::Compositing("no dark module to restyle".into()));
        }
        let len = (size as usize)
            .checked_mul(size as usize)
            .ok_or_else(|| QRError::Compositing(format!("surface of side {size} overflows")))?;

        let mut mask = GrayImage::from_raw(size, size, vec![0; len])
            .ok_or_else(|| QRError::Compositing("failed to allocate coverage mask".into()))?;
        let pitch = grid.pitch();
        for (r, c) in grid.dark_modules() {
            let x = to_coord(c, pitch)?;
            let y = to_coord(r, pitch)?;
            self.shape.draw(&mut mask, x, y, pitch);
        }

        let bg = if is_transparent(self.background) { TRANSPARENT } else { self.background };
        if len.checked_mul(4).is_none() {
            return Err(QRError::Compositing(format!("surface of side {size} overflows")));
        }
        let mut surface: RgbaImage = ImageBuffer::from_raw(size, size, bg.0.repeat(len))
            .ok_or_else(|| QRError::Compositing("failed to allocate surface".into()))?;

        let shader = self.gradient.as_ref().map(|g| g.shader(size));
        for (x, y, px) in surface.enumerate_pixels_mut() {
            if mask.get_pixel(x, y)[0] == 0 {
                continue;
            }
            let fill = shader.as_ref().map_or(self.foreground, |s| s.color_at(x, y));
            *px = blend(*px, fill);
        }

        if let Some(logo) = logo {
            logo::overlay_logo(&mut surface, logo, self.logo_size, bg);
        }

        debug!(
            size,
            shape = %self.shape,
            gradient = self.gradient.is_some(),
            logo = logo.is_some(),
            "Composed styled symbol"
        );
        Ok(surface)
    }
}

fn to_coord(idx: usize, pitch: u32) -> QRResult<i32> {
    cast::<usize, i32>(idx)
        .and_then(|i| i.checked_mul(cast::<u32, i32>(pitch)?))
        .ok_or_else(|| QRError::Compositing(format!("module {idx} outside drawable range")))
}
