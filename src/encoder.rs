//! Boundary to the external symbol encoder. The rest of the crate only sees the
//! raster it returns.

use image::{Rgba, RgbaImage};
use qrcode::{render::svg, types::QrError, Color, EcLevel, QrCode};
use tracing::debug;

use crate::common::{
    color::{is_transparent, to_hex, WHITE},
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};

// Encode request
//------------------------------------------------------------------------------

/// Fully resolved input of one base symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub text: String,
    pub version: Version,
    /// The caller asked for `version`. Only a resolved version may grow.
    pub explicit_version: bool,
    pub ec_level: ECLevel,
    /// Side of the output raster in pixels.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
}

impl EncodeRequest {
    /// Modules per side including the quiet zone on both sides.
    pub fn total_modules(&self) -> u32 {
        self.version.width() as u32 + 2 * self.margin
    }
}

// Symbol encoder
//------------------------------------------------------------------------------

pub trait SymbolEncoder: Send + Sync {
    /// Renders the base symbol as a `size` x `size` raster of solid, axis aligned
    /// module blocks without anti-aliasing.
    fn rasterize(&self, req: &EncodeRequest) -> QRResult<RgbaImage>;

    /// Renders the base symbol as an SVG document.
    fn vectorize(&self, req: &EncodeRequest) -> QRResult<String>;
}

/// Adapter over the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeEncoder;

impl QrcodeEncoder {
    /// Encodes at the requested version. A resolved version may grow to the next
    /// one that fits: lowercase text counts as alphanumeric when resolving but has
    /// to be byte encoded, so it may need more room than the table promised. An
    /// explicit version never changes.
    fn encode(req: &EncodeRequest) -> QRResult<QrCode> {
        let ecl = match req.ec_level {
            ECLevel::L => EcLevel::L,
            ECLevel::M => EcLevel::M,
            ECLevel::Q => EcLevel::Q,
            ECLevel::H => EcLevel::H,
        };
        let last = if req.explicit_version { *req.version } else { *Version::MAX };
        for v in *req.version..=last {
            let ver = qrcode::Version::Normal(v as i16);
            match QrCode::with_version(req.text.as_bytes(), ver, ecl) {
                Ok(code) => {
                    if v != *req.version {
                        debug!(requested = *req.version, version = v, "Grew symbol to fit payload");
                    }
                    return Ok(code);
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(QRError::Encode(format!("version {v}: {e}"))),
            }
        }
        Err(QRError::Encode(format!(
            "{} bytes do not fit in version {last} at level {}",
            req.text.len(),
            req.ec_level
        )))
    }
}

impl SymbolEncoder for QrcodeEncoder {
    fn rasterize(&self, req: &EncodeRequest) -> QRResult<RgbaImage> {
        if req.size == 0 {
            return Err(QRError::InvalidSize(0));
        }
        let code = Self::encode(req)?;
        let colors = code.to_colors();
        let w = code.width() as u32;
        let total = w + 2 * req.margin;
        let px = req.size / total;
        if px == 0 {
            return Err(QRError::Encode(format!(
                "{} px cannot hold {total} modules per side",
                req.size
            )));
        }
        let light = if is_transparent(req.light) { WHITE } else { req.light };

        debug!(version = *req.version, width = w, module_px = px, "Rasterizing base symbol");

        // Leftover pixels widen the right and bottom border, every block starts on
        // a multiple of the module side
        let module = |p: u32| (p / px).checked_sub(req.margin).filter(|&m| m < w);
        let img = RgbaImage::from_fn(req.size, req.size, |x, y| match (module(x), module(y)) {
            (Some(c), Some(r)) if colors[(r * w + c) as usize] == Color::Dark => req.dark,
            _ => light,
        });
        Ok(img)
    }

    fn vectorize(&self, req: &EncodeRequest) -> QRResult<String> {
        let code = Self::encode(req)?;
        let dark = to_hex(req.dark);
        let light = if is_transparent(req.light) { "none".to_string() } else { to_hex(req.light) };
        let svg = code
            .render::<svg::Color<'_>>()
            .quiet_zone(req.margin > 0)
            .min_dimensions(req.size, req.size)
            .dark_color(svg::Color(&dark))
            .light_color(svg::Color(&light))
            .build();
        Ok(svg)
    }
}
