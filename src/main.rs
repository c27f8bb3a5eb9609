use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qrstyle::{
    encode, helper, list_templates, render, render_svg, template, Color, FrameKind, FrameSpec,
    LogoClip, LogoSpec, Margin, QrCodeEcc, ShapeSpec, StyleConfig,
};

/// Render styled QR codes.
#[derive(Parser, Debug)]
#[command(name = "qrstyle", version, about = "Render styled QR codes")]
struct Cli {
    /// The text or URL to encode
    #[arg(required_unless_present = "list_templates")]
    text: Option<String>,

    /// Start from a built-in template
    #[arg(short, long, default_value = "classic")]
    template: String,

    /// Start from a style saved as JSON (takes precedence over --template)
    #[arg(long)]
    style: Option<PathBuf>,

    /// List built-in templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Canvas side length in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Quiet zone: `4` (modules) or `20px`
    #[arg(long)]
    margin: Option<Margin>,

    /// Error correction level: L, M, Q or H
    #[arg(long)]
    ecc: Option<QrCodeEcc>,

    #[arg(long)]
    body: Option<ShapeSpec>,

    #[arg(long)]
    eye_frame: Option<ShapeSpec>,

    #[arg(long)]
    eye_ball: Option<ShapeSpec>,

    /// none, square, rounded, circle, double or brackets
    #[arg(long)]
    frame: Option<FrameKind>,

    /// Frame stroke width in pixels
    #[arg(long)]
    frame_width: Option<u32>,

    #[arg(long)]
    foreground: Option<Color>,

    #[arg(long)]
    background: Option<Color>,

    #[arg(long)]
    eye_color: Option<Color>,

    #[arg(long)]
    frame_color: Option<Color>,

    /// Image to place at the center
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo side length in pixels
    #[arg(long, default_value_t = 60)]
    logo_size: u32,

    /// circle, square or rounded-square
    #[arg(long, default_value = "circle")]
    logo_clip: LogoClip,

    /// Output directory
    #[arg(short, long, default_value = "generated")]
    out: PathBuf,

    /// File name stem; the image is written to `<out>/<slug>-qr-code.png`
    #[arg(long, default_value = "qrstyle")]
    slug: String,

    /// Write an SVG document instead of a PNG
    #[arg(long)]
    svg: bool,

    /// Print a data URL to stdout instead of writing a file
    #[arg(long)]
    data_url: bool,

    /// Print the module grid to the console
    #[arg(long)]
    print: bool,

    /// Print the effective style as JSON and exit
    #[arg(long)]
    dump_style: bool,
}

impl Cli {
    fn base_style(&self) -> Result<StyleConfig> {
        if let Some(path) = &self.style {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read style file {}", path.display()))?;
            return StyleConfig::from_json(&json).context("Failed to parse style file");
        }
        if template::get_template(&self.template).is_none() {
            bail!("Unknown template `{}` (see --list-templates)", self.template);
        }
        Ok(template::apply_template(&self.template))
    }

    fn style(&self) -> Result<StyleConfig> {
        let mut style = self.base_style()?;
        if let Some(size) = self.size {
            style = style.with_size(size);
        }
        if let Some(margin) = self.margin {
            style = style.with_margin(margin);
        }
        if let Some(ecc) = self.ecc {
            style = style.with_error_correction_level(ecc);
        }
        if let Some(shape) = self.body {
            style = style.with_body_shape(shape);
        }
        if let Some(shape) = self.eye_frame {
            style = style.with_eye_frame_shape(shape);
        }
        if let Some(shape) = self.eye_ball {
            style = style.with_eye_ball_shape(shape);
        }
        if self.frame.is_some() || self.frame_width.is_some() {
            let current = style.frame();
            let mut frame = FrameSpec::new(self.frame.unwrap_or(current.kind));
            frame.width = self.frame_width.unwrap_or(current.width);
            style = style.with_frame(frame);
        }
        if let Some(color) = self.foreground {
            style = style.with_foreground(color);
        }
        if let Some(color) = self.background {
            style = style.with_background(color);
        }
        if let Some(color) = self.eye_color {
            style = style.with_eye_color(color);
        }
        if let Some(color) = self.frame_color {
            style = style.with_frame_color(color);
        }
        if let Some(path) = &self.logo {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read logo {}", path.display()))?;
            let logo = LogoSpec::new(bytes, self.logo_size).with_clip(self.logo_clip);
            style = style.with_logo(Some(logo));
        }
        Ok(style)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_templates {
        for t in list_templates() {
            println!("{:<14} {:<12} {}", t.id, t.category, t.description);
        }
        return Ok(());
    }

    let style = cli.style()?;
    if cli.dump_style {
        println!("{}", style.to_json()?);
        return Ok(());
    }

    let Some(text) = cli.text.as_deref() else {
        bail!("Nothing to encode");
    };
    let grid = encode(text, style.error_correction_level()).context("Failed to encode text")?;
    if cli.print {
        helper::print_grid(&grid);
    }

    if cli.svg {
        let svg = render_svg(&grid, &style).context("Failed to render SVG")?;
        fs::create_dir_all(&cli.out)
            .with_context(|| format!("Failed to create {}", cli.out.display()))?;
        let path = cli.out.join(format!("{}-qr-code.svg", cli.slug));
        fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved svg");
        return Ok(());
    }

    let image = render(&grid, &style).context("Failed to render QR code")?;
    if let Some(occlusion) = image.logo_occlusion() {
        info!("logo covers {:.1}% of data modules", occlusion * 100.0);
    }
    if cli.data_url {
        println!("{}", image.to_data_url());
        return Ok(());
    }
    let path = image.save(&cli.out, &cli.slug).context("Failed to save QR code image")?;
    info!(path = %path.display(), size = image.size(), "saved png");
    Ok(())
}
