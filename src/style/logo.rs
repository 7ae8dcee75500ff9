use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tokio::task;
use tracing::debug;

use crate::common::error::{QRError, QRResult};

/// Largest share of the symbol side a logo may cover.
pub const MAX_LOGO_RATIO: f64 = 0.3;

/// Logo side as a share of the symbol side when no size is requested.
pub const DEFAULT_LOGO_RATIO: f64 = 0.2;

/// Clearance around the logo as a share of the logo side, per side.
const CLEARANCE_RATIO: f64 = 0.1;

// Logo source
//------------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq)]
pub enum LogoSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>`
    DataUri(String),
}

impl Debug for LogoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::DataUri(uri) => write!(f, "DataUri({} chars)", uri.len()),
        }
    }
}

impl LogoSource {
    /// Reads and decodes the logo. Decoding runs on the blocking pool.
    pub async fn load(&self) -> QRResult<DynamicImage> {
        let bytes = match self {
            Self::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| QRError::Decode(format!("{}: {e}", path.display())))?,
            Self::Bytes(bytes) => bytes.clone(),
            Self::DataUri(uri) => decode_data_uri(uri)?,
        };
        debug!(len = bytes.len(), "Decoding logo...");
        task::spawn_blocking(move || decode_image(&bytes))
            .await
            .map_err(|e| QRError::Decode(e.to_string()))?
    }
}

pub(crate) fn decode_image(bytes: &[u8]) -> QRResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| QRError::Decode(e.to_string()))
}

fn decode_data_uri(uri: &str) -> QRResult<Vec<u8>> {
    let (header, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| QRError::Decode("malformed data uri".into()))?;
    if !header.ends_with(";base64") {
        return Err(QRError::Decode(format!("unsupported data uri encoding {header:?}")));
    }
    STANDARD.decode(payload.trim()).map_err(|e| QRError::Decode(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub source: LogoSource,
    /// Requested side in pixels; defaults to a fifth of the symbol.
    pub size: Option<u32>,
}

impl Logo {
    pub fn new(source: LogoSource) -> Self {
        Self { source, size: None }
    }

    pub fn with_size(source: LogoSource, size: u32) -> Self {
        Self { source, size: Some(size) }
    }
}

// Overlay
//------------------------------------------------------------------------------

/// Side of the drawn logo: the requested side capped at 30% of the symbol.
pub fn logo_draw_size(requested: Option<u32>, size: u32) -> u32 {
    let size = size as f64;
    let requested = requested.map_or(size * DEFAULT_LOGO_RATIO, f64::from);
    requested.min(size * MAX_LOGO_RATIO).floor() as u32
}

/// Clears a padded square in the middle of `surface` with `clearance` and draws
/// the logo centered on top of it.
pub fn overlay_logo(
    surface: &mut RgbaImage,
    logo: &DynamicImage,
    requested: Option<u32>,
    clearance: Rgba<u8>,
) {
    let size = surface.width();
    let side = logo_draw_size(requested, size);
    if side == 0 {
        return;
    }

    let pad = (side as f64 * CLEARANCE_RATIO).round() as u32;
    let origin = (size - side) / 2;
    let clear_at = origin as i32 - pad as i32;
    let clear_side = side + 2 * pad;
    draw_filled_rect_mut(surface, Rect::at(clear_at, clear_at).of_size(clear_side, clear_side), clearance);

    let resized = imageops::resize(&logo.to_rgba8(), side, side, FilterType::Lanczos3);
    imageops::overlay(surface, &resized, origin as i64, origin as i64);
}

#[cfg(test)]
mod logo_tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use test_case::test_case;

    use super::{decode_data_uri, logo_draw_size, overlay_logo, LogoSource};
    use crate::common::{
        color::{BLACK, TRANSPARENT, WHITE},
        error::QRError,
    };

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test_case(None, 300, 60)]
    #[test_case(Some(50), 300, 50)]
    #[test_case(Some(200), 300, 90)]
    #[test_case(Some(90), 300, 90)]
    #[test_case(None, 0, 0)]
    fn test_logo_draw_size(requested: Option<u32>, size: u32, exp: u32) {
        assert_eq!(logo_draw_size(requested, size), exp);
    }

    #[test]
    fn test_overlay_clears_and_centers() {
        let mut surface = RgbaImage::from_pixel(200, 200, BLACK);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, RED));
        overlay_logo(&mut surface, &logo, Some(40), WHITE);

        // logo at 80..120, clearance at 76..124
        assert_eq!(*surface.get_pixel(100, 100), RED);
        assert_eq!(*surface.get_pixel(81, 81), RED);
        assert_eq!(*surface.get_pixel(77, 77), WHITE);
        assert_eq!(*surface.get_pixel(122, 100), WHITE);
        assert_eq!(*surface.get_pixel(75, 75), BLACK);
        assert_eq!(*surface.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn test_overlay_keeps_clearance_under_transparent_logo() {
        let mut surface = RgbaImage::from_pixel(100, 100, BLACK);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, TRANSPARENT));
        overlay_logo(&mut surface, &logo, Some(20), WHITE);
        assert_eq!(*surface.get_pixel(50, 50), WHITE);
    }

    #[tokio::test]
    async fn test_load_bytes_and_data_uri() {
        let png = png_bytes(&RgbaImage::from_pixel(4, 3, RED));

        let img = LogoSource::Bytes(png.clone()).load().await.unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));

        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&png));
        let img = LogoSource::DataUri(uri).load().await.unwrap();
        assert_eq!(img.to_rgba8().get_pixel(0, 0), &RED);
    }

    #[tokio::test]
    async fn test_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, png_bytes(&RgbaImage::from_pixel(2, 2, RED))).unwrap();
        let img = LogoSource::Path(path).load().await.unwrap();
        assert_eq!(img.width(), 2);

        let missing = LogoSource::Path(dir.path().join("missing.png")).load().await;
        assert!(matches!(missing, Err(QRError::Decode(_))));
    }

    #[tokio::test]
    async fn test_load_garbage() {
        let res = LogoSource::Bytes(b"not an image".to_vec()).load().await;
        assert!(matches!(res, Err(QRError::Decode(_))));
    }

    #[test]
    fn test_decode_data_uri_errors() {
        assert!(decode_data_uri("image/png;base64,AAAA").is_err());
        assert!(decode_data_uri("data:image/png,AAAA").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
        assert_eq!(decode_data_uri("data:text/plain;base64,aGk="), Ok(b"hi".to_vec()));
    }
}
