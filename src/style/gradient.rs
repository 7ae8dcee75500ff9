use image::Rgba;
use serde::Deserialize;

use crate::common::{
    color::lerp,
    error::{QRError, QRResult},
};

// Gradient
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba<u8>,
}

impl ColorStop {
    pub fn new(offset: f64, color: Rgba<u8>) -> Self {
        Self { offset, color }
    }
}

/// Fill spanning the whole symbol box. Stops are kept sorted by offset; stops
/// sharing an offset keep their insertion order.
#[derive(Debug, PartialEq, Clone)]
pub struct Gradient {
    kind: GradientKind,
    rotation: f64,
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(kind: GradientKind, rotation: f64, mut stops: Vec<ColorStop>) -> QRResult<Self> {
        if stops.is_empty() {
            return Err(QRError::InvalidGradient("at least one color stop is required".into()));
        }
        if let Some(s) = stops.iter().find(|s| !(0.0..=1.0).contains(&s.offset)) {
            return Err(QRError::InvalidGradient(format!("stop offset {} outside [0, 1]", s.offset)));
        }
        if !rotation.is_finite() {
            return Err(QRError::InvalidGradient(format!("rotation {rotation} is not finite")));
        }
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Ok(Self { kind, rotation, stops })
    }

    pub fn linear(rotation: f64, stops: Vec<ColorStop>) -> QRResult<Self> {
        Self::new(GradientKind::Linear, rotation, stops)
    }

    pub fn radial(stops: Vec<ColorStop>) -> QRResult<Self> {
        Self::new(GradientKind::Radial, 0.0, stops)
    }

    pub fn kind(&self) -> GradientKind {
        self.kind
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at position `t` along the gradient. Positions before the first stop
    /// take its color, positions after the last stop take the last color.
    pub fn color_at_offset(&self, t: f64) -> Rgba<u8> {
        let first = self.stops[0];
        if t < first.offset {
            return first.color;
        }
        match self.stops.iter().position(|s| s.offset > t) {
            None => self.stops[self.stops.len() - 1].color,
            Some(i) => {
                let (a, b) = (self.stops[i - 1], self.stops[i]);
                lerp(a.color, b.color, (t - a.offset) / (b.offset - a.offset))
            }
        }
    }

    /// Binds the gradient geometry to a `size` x `size` box.
    pub fn shader(&self, size: u32) -> GradientShader<'_> {
        let half = size as f64 / 2.0;
        let geometry = match self.kind {
            GradientKind::Linear => {
                let angle = self.rotation.to_radians();
                let (dx, dy) = (angle.cos() * half, angle.sin() * half);
                let start = (half - dx, half - dy);
                let axis = (2.0 * dx, 2.0 * dy);
                let len_sq = axis.0 * axis.0 + axis.1 * axis.1;
                Geometry::Linear { start, axis, len_sq }
            }
            GradientKind::Radial => Geometry::Radial { center: (half, half), radius: half },
        };
        GradientShader { gradient: self, geometry }
    }
}

#[derive(Debug, Clone, Copy)]
enum Geometry {
    Linear { start: (f64, f64), axis: (f64, f64), len_sq: f64 },
    Radial { center: (f64, f64), radius: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct GradientShader<'a> {
    gradient: &'a Gradient,
    geometry: Geometry,
}

impl GradientShader<'_> {
    /// Position along the gradient of the pixel center at `(x, y)`, in [0, 1].
    pub fn offset_at(&self, x: u32, y: u32) -> f64 {
        let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
        let t = match self.geometry {
            Geometry::Linear { len_sq, .. } if len_sq == 0.0 => 0.0,
            Geometry::Linear { start, axis, len_sq } => {
                ((px - start.0) * axis.0 + (py - start.1) * axis.1) / len_sq
            }
            Geometry::Radial { radius, .. } if radius == 0.0 => 0.0,
            Geometry::Radial { center, radius } => {
                (px - center.0).hypot(py - center.1) / radius
            }
        };
        t.clamp(0.0, 1.0)
    }

    pub fn color_at(&self, x: u32, y: u32) -> Rgba<u8> {
        self.gradient.color_at_offset(self.offset_at(x, y))
    }
}
