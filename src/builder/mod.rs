pub mod version;

pub use version::{minimum_version, resolve_version};

use image::Rgba;
use tracing::debug;

use crate::common::{
    capacity::estimate_usage_percent,
    color::{is_transparent, BLACK, WHITE},
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};
use crate::encoder::EncodeRequest;
use crate::style::{Gradient, Logo, ModuleShape, StyleCompositor};

pub const DEFAULT_SIZE: u32 = 300;
pub const DEFAULT_MARGIN: u32 = 4;

/// Largest accepted side of rendered and exported symbols in pixels.
pub const MAX_SIZE: u32 = 8192;

// Render builder
//------------------------------------------------------------------------------

pub struct RenderBuilder<'a> {
    text: &'a str,
    size: u32,
    margin: u32,
    ec_level: ECLevel,
    version: Option<Version>,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    gradient: Option<Gradient>,
    logo: Option<Logo>,
    shape: ModuleShape,
}

impl<'a> RenderBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            ec_level: ECLevel::M,
            version: None,
            foreground: BLACK,
            background: WHITE,
            gradient: None,
            logo: None,
            shape: ModuleShape::Squares,
        }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    pub fn size(&mut self, size: u32) -> &mut Self {
        self.size = size;
        self
    }

    pub fn margin(&mut self, margin: u32) -> &mut Self {
        self.margin = margin;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn foreground(&mut self, color: Rgba<u8>) -> &mut Self {
        self.foreground = color;
        self
    }

    /// A fully transparent color yields a transparent background.
    pub fn background(&mut self, color: Rgba<u8>) -> &mut Self {
        self.background = color;
        self
    }

    pub fn gradient(&mut self, gradient: Gradient) -> &mut Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn unset_gradient(&mut self) -> &mut Self {
        self.gradient = None;
        self
    }

    pub fn logo(&mut self, logo: Logo) -> &mut Self {
        self.logo = Some(logo);
        self
    }

    pub fn unset_logo(&mut self) -> &mut Self {
        self.logo = None;
        self
    }

    pub fn shape(&mut self, shape: ModuleShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Error correction level the symbol is encoded with. A logo needs the
    /// highest level to survive the modules it hides.
    pub fn effective_ec_level(&self) -> ECLevel {
        match self.logo {
            Some(_) => ECLevel::H,
            None => self.ec_level,
        }
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {}, Ec level: {:?}, Shape: {}, Size: {} }}",
                *v, self.ec_level, self.shape, self.size
            ),
            None => format!(
                "{{ Version: None, Ec level: {:?}, Shape: {}, Size: {} }}",
                self.ec_level, self.shape, self.size
            ),
        }
    }
}

impl RenderBuilder<'_> {
    pub fn build(&self) -> QRResult<RenderOptions> {
        debug!("Validating render options {}...", self.metadata());

        if self.size == 0 || self.size > MAX_SIZE {
            return Err(QRError::InvalidSize(self.size));
        }
        if self.logo.as_ref().is_some_and(|l| l.size == Some(0)) {
            return Err(QRError::InvalidLogoSize);
        }

        let ec_level = self.effective_ec_level();
        if ec_level != self.ec_level {
            debug!(requested = %self.ec_level, "Logo present, raising error correction to H");
        }
        let version = resolve_version(self.text, ec_level, self.version)?;
        debug!(version = *version, ec_level = %ec_level, "Resolved symbol version");

        Ok(RenderOptions {
            text: self.text.to_string(),
            size: self.size,
            margin: self.margin,
            requested_ec_level: self.ec_level,
            ec_level,
            version,
            explicit_version: self.version.is_some(),
            foreground: self.foreground,
            background: self.background,
            gradient: self.gradient.clone(),
            logo: self.logo.clone(),
            shape: self.shape,
        })
    }
}

// Render options
//------------------------------------------------------------------------------

/// Validated, immutable options of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    text: String,
    size: u32,
    margin: u32,
    requested_ec_level: ECLevel,
    ec_level: ECLevel,
    version: Version,
    explicit_version: bool,
    foreground: Rgba<u8>,
    background: Rgba<u8>,
    gradient: Option<Gradient>,
    logo: Option<Logo>,
    shape: ModuleShape,
}

impl RenderOptions {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn requested_ec_level(&self) -> ECLevel {
        self.requested_ec_level
    }

    /// Level the symbol is encoded with, `H` whenever a logo is present.
    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// True when the version was requested rather than resolved.
    pub fn is_version_explicit(&self) -> bool {
        self.explicit_version
    }

    pub fn foreground(&self) -> Rgba<u8> {
        self.foreground
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn is_transparent(&self) -> bool {
        is_transparent(self.background)
    }

    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    pub fn logo(&self) -> Option<&Logo> {
        self.logo.as_ref()
    }

    pub fn shape(&self) -> ModuleShape {
        self.shape
    }

    /// Share of the version 40 capacity used by the text, in percent.
    pub fn usage_percent(&self) -> f64 {
        estimate_usage_percent(&self.text, self.ec_level)
    }

    pub fn encode_request(&self) -> EncodeRequest {
        EncodeRequest {
            text: self.text.clone(),
            version: self.version,
            explicit_version: self.explicit_version,
            ec_level: self.ec_level,
            size: self.size,
            margin: self.margin,
            dark: self.foreground,
            light: self.background,
        }
    }

    pub fn compositor(&self) -> StyleCompositor {
        StyleCompositor {
            shape: self.shape,
            foreground: self.foreground,
            background: self.background,
            gradient: self.gradient.clone(),
            logo_size: self.logo.as_ref().and_then(|l| l.size),
        }
    }
}
