//! # qrstyle
//!
//! A Rust library for rendering styled QR codes. The symbol itself comes from an
//! encoder that only hands back pixels; qrstyle recovers the module grid from
//! that raster and redraws it with custom module shapes, gradient fills, a
//! centered logo and an optional transparent background.
//!
//! ## Features
//!
//! - **Version resolution**: Picks the smallest version that fits the payload from the standard capacity tables, or validates a requested one
//! - **Grid reconstruction**: Samples the encoded raster back into a module grid, no encoder internals needed
//! - **Styling**: Squares, dots, rounded and extra-rounded modules with solid or gradient fills
//! - **Logos**: Centered logo with a cleared backdrop; a logo always raises error correction to H
//! - **Export**: PNG, JPEG and unstyled SVG output
//!
//! ## Quick Start
//!
//! ### Capacity and version
//!
//! ```rust
//! use qrstyle::{builder::minimum_version, classify, ECLevel, Mode};
//!
//! assert_eq!(classify("HELLO WORLD"), Mode::Alphanumeric);
//! assert_eq!(*minimum_version("HELLO WORLD", ECLevel::M), 1);
//! assert!(minimum_version(&"x".repeat(500), ECLevel::H) > minimum_version(&"x".repeat(500), ECLevel::L));
//! ```
//!
//! ### Rendering a styled symbol
//!
//! ```rust,no_run
//! use qrstyle::{
//!     common::parse_color,
//!     export::{export, ExportOptions},
//!     style::{ColorStop, Gradient, Logo, LogoSource, ModuleShape},
//!     ECLevel, RenderBuilder, Renderer,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stops = vec![
//!     ColorStop::new(0.0, parse_color("#e63946")?),
//!     ColorStop::new(1.0, parse_color("#1d3557")?),
//! ];
//! let opts = RenderBuilder::new("https://example.com")
//!     .size(512)                                        // Output side in pixels, defaults to 300
//!     .ec_level(ECLevel::Q)                             // Raised to H because of the logo below
//!     .shape(ModuleShape::Rounded)                      // Defaults to squares
//!     .gradient(Gradient::linear(45.0, stops)?)         // Solid foreground when absent
//!     .background(parse_color("transparent")?)
//!     .logo(Logo::new(LogoSource::Path("logo.png".into())))
//!     .build()?;
//!
//! let img = Renderer::default().render(&opts).await?;
//! let png = export(&img, &ExportOptions { transparent: true, ..Default::default() })?;
//! std::fs::write("styled_qr.png", png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Version resolution**: the payload is classified as numeric, alphanumeric or byte
//!    and looked up in the capacity table of the effective error correction level.
//! 2. **Encoding**: a [`SymbolEncoder`] turns the resolved options into a raster of solid
//!    module blocks. [`encoder::QrcodeEncoder`] is the default.
//! 3. **Reconstruction**: [`ModuleGrid::reconstruct`] takes the shortest complete run on the
//!    middle row and column as the module pitch and samples the center of every module.
//! 4. **Compositing**: [`style::StyleCompositor`] redraws the dark modules with the chosen
//!    shape and fill, then clears a backdrop for the logo and draws it.
//!
//! If compositing fails, for instance because the foreground is too light to be told
//! apart from the background, the unstyled symbol is returned, and a logo that fails to load is
//! skipped. Both are reported through `tracing`.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub mod common;
pub mod config;
pub mod encoder;
pub mod export;
pub mod pipeline;
pub mod reader;
pub mod style;

pub use builder::{RenderBuilder, RenderOptions};
pub use common::{
    capacity::{capacity, estimate_usage_percent, max_capacity},
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
    mode::{classify, Mode},
};
pub use encoder::{EncodeRequest, SymbolEncoder};
pub use pipeline::Renderer;
pub use reader::ModuleGrid;
