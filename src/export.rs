//! Encodes rendered symbols into output containers.

use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, imageops::FilterType, ExtendedColorType, ImageFormat, RgbaImage};
use tracing::debug;

use crate::builder::{RenderOptions, MAX_SIZE};
use crate::common::{
    color::{blend, WHITE},
    error::{QRError, QRResult},
};
use crate::pipeline::Renderer;

pub const DEFAULT_QUALITY: f32 = 0.9;

// Export format
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    /// Unstyled symbol only.
    Svg,
}

impl ExportFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> QRResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ext.parse()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            _ => Err(QRError::Export(format!("unsupported format {s:?}"))),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output side in pixels; the rendered side when absent.
    pub size: Option<u32>,
    /// JPEG quality in (0, 1].
    pub quality: f32,
    /// Keep transparent pixels. Ignored for JPEG.
    pub transparent: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { format: ExportFormat::Png, size: None, quality: DEFAULT_QUALITY, transparent: false }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self { format, ..Default::default() }
    }
}

// Export
//------------------------------------------------------------------------------

/// Encodes a rendered raster as PNG or JPEG. Opaque exports are flattened onto
/// white.
pub fn export(img: &RgbaImage, opts: &ExportOptions) -> QRResult<Vec<u8>> {
    if opts.format == ExportFormat::Svg {
        return Err(QRError::Export("styled symbols are raster only, use export_svg".into()));
    }
    if !(opts.quality > 0.0 && opts.quality <= 1.0) {
        return Err(QRError::Export(format!("quality {} outside (0, 1]", opts.quality)));
    }

    let mut out = match opts.size {
        Some(s) if s == 0 || s > MAX_SIZE => return Err(QRError::InvalidSize(s)),
        Some(s) if s != img.width() || s != img.height() => {
            imageops::resize(img, s, s, FilterType::Nearest)
        }
        _ => img.clone(),
    };
    if !opts.transparent || opts.format == ExportFormat::Jpeg {
        out.pixels_mut().for_each(|px| *px = blend(WHITE, *px));
    }

    debug!(format = ?opts.format, width = out.width(), "Exporting symbol...");
    let mut buf = Cursor::new(Vec::new());
    if opts.format == ExportFormat::Jpeg {
        let rgb = image::DynamicImage::ImageRgba8(out).to_rgb8();
        let quality = (opts.quality * 100.0).round().clamp(1.0, 100.0) as u8;
        JpegEncoder::new_with_quality(&mut buf, quality).encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )?;
    } else {
        out.write_to(&mut buf, ImageFormat::Png)?;
    }
    Ok(buf.into_inner())
}

/// SVG of the unstyled symbol at the requested size.
pub async fn export_svg(renderer: &Renderer, opts: &RenderOptions) -> QRResult<Vec<u8>> {
    let svg = renderer.render_svg(opts).await?;
    Ok(svg.into_bytes())
}
