use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{info, Level};

use qrstyle::{
    builder::{minimum_version, RenderBuilder},
    common::{parse_color, ECLevel, Version},
    config::StyleConfig,
    export::{export, export_svg, ExportFormat, ExportOptions, DEFAULT_QUALITY},
    pipeline::Renderer,
    style::{ColorStop, Gradient, GradientKind, Logo, LogoSource, ModuleShape},
    QRResult,
};

/// Render styled QR symbols
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Cli {
    /// Payload to encode
    text: String,

    /// Style document applied before the flags below
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Side of the rendered symbol in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Quiet zone in modules
    #[arg(long)]
    margin: Option<u32>,

    /// Error correction level (L, M, Q, H); a logo always uses H
    #[arg(long, value_name = "LEVEL")]
    ec_level: Option<ECLevel>,

    /// Symbol version (1-40); the smallest fitting version when omitted
    #[arg(long, value_parser = parse_version)]
    version: Option<Version>,

    /// Module color
    #[arg(long, value_name = "COLOR", value_parser = parse_color)]
    fg: Option<image::Rgba<u8>>,

    /// Background color, `transparent` for none
    #[arg(long, value_name = "COLOR", value_parser = parse_color)]
    bg: Option<image::Rgba<u8>>,

    /// squares, dots, rounded or extra-rounded
    #[arg(long)]
    shape: Option<ModuleShape>,

    /// Fill modules with a linear or radial gradient
    #[arg(long, value_name = "KIND", value_parser = parse_gradient_kind)]
    gradient: Option<GradientKind>,

    /// Linear gradient angle in degrees, 0 when omitted
    #[arg(long, requires = "gradient")]
    rotation: Option<f64>,

    /// Gradient color stop, repeatable
    #[arg(long = "stop", value_name = "OFFSET:COLOR", value_parser = parse_stop, requires = "gradient")]
    stops: Vec<ColorStop>,

    /// Image drawn at the center
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Logo side in pixels, capped at 30% of the symbol
    #[arg(long, value_name = "PX", requires = "logo")]
    logo_size: Option<u32>,

    /// Output file; png, jpg or svg by extension
    #[arg(short, long, value_name = "FILE", default_value = "qr.png")]
    out: PathBuf,

    /// Output side in pixels when different from the rendered side
    #[arg(long, value_name = "PX")]
    export_size: Option<u32>,

    /// JPEG quality in (0, 1]
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    quality: f32,

    /// Keep transparent pixels in PNG output
    #[arg(long)]
    transparent: bool,

    /// Print capacity usage and the minimum version, then exit
    #[arg(long)]
    usage: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, builder: &mut RenderBuilder<'_>) -> QRResult<()> {
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
        if let Some(fg) = self.fg {
            builder.foreground(fg);
        }
        if let Some(bg) = self.bg {
            builder.background(bg);
        }
        if let Some(shape) = self.shape {
            builder.shape(shape);
        }
        if let Some(kind) = self.gradient {
            let rotation = self.rotation.unwrap_or_default();
            builder.gradient(Gradient::new(kind, rotation, self.stops.clone())?);
        }
        if let Some(path) = &self.logo {
            let source = LogoSource::Path(path.clone());
            builder.logo(Logo { source, size: self.logo_size });
        }
        Ok(())
    }
}

fn parse_version(s: &str) -> Result<Version, String> {
    let ver = s.parse::<usize>().map_err(|e| e.to_string())?;
    Version::new(ver).map_err(|e| e.to_string())
}

fn parse_gradient_kind(s: &str) -> Result<GradientKind, String> {
    match s.to_ascii_lowercase().as_str() {
        "linear" => Ok(GradientKind::Linear),
        "radial" => Ok(GradientKind::Radial),
        _ => Err(format!("expected linear or radial, got {s:?}")),
    }
}

fn parse_stop(s: &str) -> Result<ColorStop, String> {
    let (offset, color) = s.split_once(':').ok_or("expected OFFSET:COLOR")?;
    let offset = offset.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let color = parse_color(color).map_err(|e| e.to_string())?;
    Ok(ColorStop::new(offset, color))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut builder = RenderBuilder::new(&cli.text);
    if let Some(path) = &cli.config {
        StyleConfig::load(path)?.apply(&mut builder)?;
    }
    cli.apply(&mut builder)?;

    if cli.usage {
        let ecl = builder.effective_ec_level();
        let usage = qrstyle::estimate_usage_percent(&cli.text, ecl);
        println!("Mode: {:?}", qrstyle::classify(&cli.text));
        println!("Ec level: {ecl}");
        println!("Usage: {usage:.1}%");
        println!("Minimum version: {}", minimum_version(&cli.text, ecl));
        return Ok(());
    }

    let opts = builder.build()?;
    let renderer = Renderer::default();
    let format = ExportFormat::from_path(&cli.out)?;
    info!(version = *opts.version(), ec_level = %opts.ec_level(), "Rendering {}...", cli.out.display());

    let bytes = match format {
        ExportFormat::Svg => export_svg(&renderer, &opts).await?,
        _ => {
            let img = renderer.render(&opts).await?;
            let export_opts = ExportOptions {
                format,
                size: cli.export_size,
                quality: cli.quality,
                transparent: cli.transparent || opts.is_transparent(),
            };
            export(&img, &export_opts)?
        }
    };

    tokio::fs::write(&cli.out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;
    info!(bytes = bytes.len(), "Wrote {}", cli.out.display());
    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use clap::Parser;

    use super::{parse_stop, Cli};
    use qrstyle::builder::RenderBuilder;
    use qrstyle::common::{ECLevel, QRError};
    use qrstyle::style::ModuleShape;

    #[test]
    fn test_parse_stop() {
        let stop = parse_stop("0.5:#ff0000").unwrap();
        assert_eq!(stop.offset, 0.5);
        assert_eq!(stop.color, image::Rgba([255, 0, 0, 255]));
        assert!(parse_stop("#ff0000").is_err());
        assert!(parse_stop("x:#ff0000").is_err());
    }

    #[test]
    fn test_flags_override_builder() {
        let cli = Cli::try_parse_from([
            "qrstyle", "HELLO", "--size", "400", "--ec-level", "Q", "--shape", "dots", "--bg",
            "transparent", "--gradient", "radial", "--stop", "0:#000", "--stop", "1:#333",
        ])
        .unwrap();
        let mut builder = RenderBuilder::new(&cli.text);
        cli.apply(&mut builder).unwrap();
        let opts = builder.build().unwrap();
        assert_eq!(opts.size(), 400);
        assert_eq!(opts.ec_level(), ECLevel::Q);
        assert_eq!(opts.shape(), ModuleShape::Dots);
        assert!(opts.is_transparent());
        assert_eq!(opts.gradient().map(|g| g.stops().len()), Some(2));
    }

    #[test]
    fn test_gradient_without_stops() {
        let cli = Cli::try_parse_from(["qrstyle", "HELLO", "--gradient", "linear"]).unwrap();
        let mut builder = RenderBuilder::new(&cli.text);
        assert!(matches!(cli.apply(&mut builder), Err(QRError::InvalidGradient(_))));
    }

    #[test]
    fn test_dependent_flags_need_their_feature() {
        for args in [
            &["qrstyle", "HELLO", "--stop", "0:#000"][..],
            &["qrstyle", "HELLO", "--rotation", "45"][..],
            &["qrstyle", "HELLO", "--logo-size", "64"][..],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
        let cli = Cli::try_parse_from([
            "qrstyle", "HELLO", "--gradient", "linear", "--rotation", "45", "--stop", "0:#000",
            "--stop", "1:#333", "--logo", "logo.png", "--logo-size", "64",
        ])
        .unwrap();
        let mut builder = RenderBuilder::new(&cli.text);
        cli.apply(&mut builder).unwrap();
        let opts = builder.build().unwrap();
        assert_eq!(opts.gradient().map(|g| g.rotation()), Some(45.0));
        assert_eq!(opts.logo().and_then(|l| l.size), Some(64));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["qrstyle", "HELLO", "--version", "41"]).is_err());
        assert!(Cli::try_parse_from(["qrstyle", "HELLO", "--fg", "blue"]).is_err());
        assert!(Cli::try_parse_from(["qrstyle", "HELLO", "--gradient", "conic"]).is_err());
    }
}
