//! Async driver of one render: encode, reconstruct, restyle.

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use tokio::task;
use tracing::{debug, warn};

use crate::builder::RenderOptions;
use crate::common::error::{QRError, QRResult};
use crate::encoder::{EncodeRequest, QrcodeEncoder, SymbolEncoder};
use crate::reader::ModuleGrid;

// Renderer
//------------------------------------------------------------------------------

/// Renders symbols with a shared encoder. Renders hold no shared mutable state,
/// so any number may run at once; dropping a render future abandons it.
#[derive(Clone)]
pub struct Renderer {
    encoder: Arc<dyn SymbolEncoder>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(QrcodeEncoder)
    }
}

impl Renderer {
    pub fn new(encoder: impl SymbolEncoder + 'static) -> Self {
        Self { encoder: Arc::new(encoder) }
    }

    pub fn with_encoder(encoder: Arc<dyn SymbolEncoder>) -> Self {
        Self { encoder }
    }

    /// Produces the styled symbol. Logo failures drop the logo and compositing
    /// failures fall back to the unstyled symbol; both are logged.
    pub async fn render(&self, opts: &RenderOptions) -> QRResult<RgbaImage> {
        debug!(version = *opts.version(), ec_level = %opts.ec_level(), "Rendering symbol...");

        let (base, logo) = tokio::join!(self.render_unstyled(opts), load_logo(opts));
        let base = base?;

        let grid = ModuleGrid::reconstruct(&base);
        debug!(modules = grid.width(), pitch = grid.pitch(), "Restyling symbol...");

        match opts.compositor().compose(&grid, opts.size(), logo.as_ref()) {
            Ok(img) => Ok(img),
            Err(QRError::Compositing(e)) => {
                warn!("Compositing failed, returning the unstyled symbol: {e}");
                Ok(base)
            }
            Err(e) => Err(e),
        }
    }

    /// Base symbol straight from the encoder.
    pub async fn render_unstyled(&self, opts: &RenderOptions) -> QRResult<RgbaImage> {
        let req = opts.encode_request();
        let (w, h) = (req.size, req.size);
        let base = self.spawn_encoder(req, |enc, req| enc.rasterize(req)).await?;
        if base.dimensions() != (w, h) {
            let (bw, bh) = base.dimensions();
            return Err(QRError::Decode(format!("encoder returned {bw}x{bh} raster, expected {w}x{h}")));
        }
        Ok(base)
    }

    /// SVG of the base symbol. Styling is raster only.
    pub async fn render_svg(&self, opts: &RenderOptions) -> QRResult<String> {
        self.spawn_encoder(opts.encode_request(), |enc, req| enc.vectorize(req)).await
    }

    async fn spawn_encoder<T, F>(&self, req: EncodeRequest, f: F) -> QRResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SymbolEncoder, &EncodeRequest) -> QRResult<T> + Send + 'static,
    {
        let encoder = Arc::clone(&self.encoder);
        task::spawn_blocking(move || f(encoder.as_ref(), &req))
            .await
            .map_err(|e| QRError::Encode(e.to_string()))?
    }
}

async fn load_logo(opts: &RenderOptions) -> Option<DynamicImage> {
    let logo = opts.logo()?;
    match logo.source.load().await {
        Ok(img) => Some(img),
        Err(e) => {
            warn!(source = ?logo.source, "Skipping logo: {e}");
            None
        }
    }
}
