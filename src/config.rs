//! TOML style documents.
//!
//! ```toml
//! size = 512
//! ec-level = "Q"
//! foreground = "#1d3557"
//! background = "transparent"
//! shape = "rounded"
//!
//! [gradient]
//! type = "linear"
//! rotation = 45
//! stops = [{ offset = 0.0, color = "#e63946" }, { offset = 1.0, color = "#1d3557" }]
//!
//! [logo]
//! path = "logo.png"
//! size = 96
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::builder::RenderBuilder;
use crate::common::{
    color::parse_color,
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};
use crate::style::{ColorStop, Gradient, GradientKind, Logo, LogoSource, ModuleShape};

// Style config
//------------------------------------------------------------------------------

/// Every field is optional; absent fields leave the builder untouched.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StyleConfig {
    pub size: Option<u32>,
    pub margin: Option<u32>,
    pub ec_level: Option<ECLevel>,
    pub version: Option<Version>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub shape: Option<ModuleShape>,
    pub gradient: Option<GradientConfig>,
    pub logo: Option<LogoConfig>,

    /// Directory relative logo paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientConfig {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    #[serde(default)]
    pub rotation: f64,
    pub stops: Vec<StopConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopConfig {
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoConfig {
    pub path: PathBuf,
    pub size: Option<u32>,
}

impl StyleConfig {
    pub fn load(path: &Path) -> QRResult<Self> {
        debug!(path = %path.display(), "Loading style config...");
        let content = fs::read_to_string(path)
            .map_err(|e| QRError::Config(format!("failed to read {}: {e}", path.display())))?;
        let mut config = Self::parse(&content)
            .map_err(|e| QRError::Config(format!("{}: {e}", path.display())))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn parse(content: &str) -> QRResult<Self> {
        toml::from_str(content).map_err(|e| QRError::Config(e.to_string()))
    }

    pub fn gradient(&self) -> QRResult<Option<Gradient>> {
        let Some(g) = &self.gradient else {
            return Ok(None);
        };
        let stops = g
            .stops
            .iter()
            .map(|s| Ok(ColorStop::new(s.offset, parse_color(&s.color)?)))
            .collect::<QRResult<Vec<_>>>()?;
        Gradient::new(g.kind, g.rotation, stops).map(Some)
    }

    pub fn logo(&self) -> Option<Logo> {
        let logo = self.logo.as_ref()?;
        let path = match &self.base_dir {
            Some(dir) if logo.path.is_relative() => dir.join(&logo.path),
            _ => logo.path.clone(),
        };
        Some(Logo { source: LogoSource::Path(path), size: logo.size })
    }

    /// Copies every field present in the document onto `builder`.
    pub fn apply(&self, builder: &mut RenderBuilder<'_>) -> QRResult<()> {
        if let Some(size) = self.size {
            builder.size(size);
        }
        if let Some(margin) = self.margin {
            builder.margin(margin);
        }
        if let Some(ecl) = self.ec_level {
            builder.ec_level(ecl);
        }
        if let Some(ver) = self.version {
            builder.version(ver);
        }
        if let Some(fg) = &self.foreground {
            builder.foreground(parse_color(fg)?);
        }
        if let Some(bg) = &self.background {
            builder.background(parse_color(bg)?);
        }
        if let Some(shape) = self.shape {
            builder.shape(shape);
        }
        if let Some(gradient) = self.gradient()? {
            builder.gradient(gradient);
        }
        if let Some(logo) = self.logo() {
            builder.logo(logo);
        }
        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use std::path::PathBuf;

    use image::Rgba;

    use super::StyleConfig;
    use crate::builder::RenderBuilder;
    use crate::common::{
        color::TRANSPARENT,
        error::QRError,
        metadata::{ECLevel, Version},
    };
    use crate::style::{GradientKind, LogoSource, ModuleShape};

    const FULL: &str = r##"
        size = 512
        margin = 2
        ec-level = "Q"
        version = 6
        foreground = "#1d3557"
        background = "transparent"
        shape = "extra-rounded"

        [gradient]
        type = "radial"
        stops = [{ offset = 1.0, color = "#1d3557" }, { offset = 0.0, color = "#e63946" }]

        [logo]
        path = "logo.png"
        size = 96
    "##;

    #[test]
    fn test_parse_full() {
        let config = StyleConfig::parse(FULL).unwrap();
        assert_eq!(config.size, Some(512));
        assert_eq!(config.ec_level, Some(ECLevel::Q));
        assert_eq!(config.version, Some(Version::new(6).unwrap()));
        assert_eq!(config.shape, Some(ModuleShape::ExtraRounded));

        let gradient = config.gradient().unwrap().unwrap();
        assert_eq!(gradient.kind(), GradientKind::Radial);
        assert_eq!(gradient.rotation(), 0.0);
        assert_eq!(gradient.stops()[0].color, Rgba([0xe6, 0x39, 0x46, 255]));
    }

    #[test]
    fn test_apply() {
        let config = StyleConfig::parse(FULL).unwrap();
        let mut builder = RenderBuilder::new("HELLO");
        config.apply(&mut builder).unwrap();
        let opts = builder.build().unwrap();
        assert_eq!(opts.size(), 512);
        assert_eq!(opts.margin(), 2);
        assert_eq!(*opts.version(), 6);
        assert_eq!(opts.requested_ec_level(), ECLevel::Q);
        assert_eq!(opts.ec_level(), ECLevel::H);
        assert_eq!(opts.background(), TRANSPARENT);
        assert_eq!(opts.logo().and_then(|l| l.size), Some(96));
    }

    #[test]
    fn test_empty_config_keeps_defaults() {
        let mut builder = RenderBuilder::new("HELLO");
        StyleConfig::parse("").unwrap().apply(&mut builder).unwrap();
        assert_eq!(builder.build(), RenderBuilder::new("HELLO").build());
    }

    #[test]
    fn test_invalid_documents() {
        let invalid = [
            "colour = \"#000\"",
            "version = 41",
            "ec-level = \"X\"",
            "shape = \"hearts\"",
            "[gradient]\ntype = \"conic\"\nstops = []",
        ];
        for doc in invalid {
            assert!(matches!(StyleConfig::parse(doc), Err(QRError::Config(_))), "{doc}");
        }
    }

    #[test]
    fn test_invalid_values_surface_on_apply() {
        let mut builder = RenderBuilder::new("HELLO");
        let config = StyleConfig::parse("foreground = \"navy\"").unwrap();
        assert_eq!(config.apply(&mut builder), Err(QRError::InvalidColor("navy".into())));

        let config = StyleConfig::parse("[gradient]\ntype = \"linear\"\nstops = []").unwrap();
        assert!(matches!(config.apply(&mut builder), Err(QRError::InvalidGradient(_))));
    }

    #[test]
    fn test_load_resolves_logo_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.toml");
        std::fs::write(&path, "[logo]\npath = \"brand/logo.png\"\n").unwrap();

        let config = StyleConfig::load(&path).unwrap();
        let logo = config.logo().unwrap();
        assert_eq!(logo.source, LogoSource::Path(dir.path().join("brand/logo.png")));
        assert_eq!(logo.size, None);

        let abs = PathBuf::from("/srv/logo.png");
        std::fs::write(&path, format!("[logo]\npath = {:?}\n", abs)).unwrap();
        let config = StyleConfig::load(&path).unwrap();
        assert_eq!(config.logo().unwrap().source, LogoSource::Path(abs));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = StyleConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(res, Err(QRError::Config(_))));
    }
}
