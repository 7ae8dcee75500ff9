use image::{Pixel, Rgba};

use super::error::{QRError, QRResult};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Luminance at or above this value is light.
pub const LUMA_THRESHOLD: u8 = 128;

// Parsing
//------------------------------------------------------------------------------

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
pub fn parse_color(s: &str) -> QRResult<Rgba<u8>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Ok(TRANSPARENT);
    }

    let invalid = || QRError::InvalidColor(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize, w: usize| -> QRResult<u8> {
        let v = u8::from_str_radix(&hex[i..i + w], 16).map_err(|_| invalid())?;
        Ok(if w == 1 { v * 17 } else { v })
    };

    match hex.len() {
        3 => Ok(Rgba([channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 255])),
        6 => Ok(Rgba([channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 255])),
        8 => Ok(Rgba([channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, channel(6, 2)?])),
        _ => Err(invalid()),
    }
}

/// Inverse of [`parse_color`]; the alpha pair is omitted for opaque colors.
pub fn to_hex(c: Rgba<u8>) -> String {
    let Rgba([r, g, b, a]) = c;
    match a {
        255 => format!("#{r:02x}{g:02x}{b:02x}"),
        _ => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
    }
}

pub fn is_transparent(c: Rgba<u8>) -> bool {
    c[3] == 0
}

/// Fully transparent pixels count as light.
pub fn is_dark(px: &Rgba<u8>) -> bool {
    px[3] != 0 && px.to_luma()[0] < LUMA_THRESHOLD
}

// Blending
//------------------------------------------------------------------------------

/// Source-over composite of `fg` onto `bg`.
pub fn blend(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    match fg[3] {
        255 => fg,
        0 => bg,
        _ => {
            let mut out = bg;
            out.blend(&fg);
            out
        }
    }
}

/// Linear interpolation between two colors, `t` clamped to [0, 1].
pub fn lerp(a: Rgba<u8>, b: Rgba<u8>, t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), mix(a[3], b[3])])
}
