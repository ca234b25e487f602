use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, error, info};
use thiserror::Error;

use iconmaker::{
    EncodeError, ExportFormat, Generated, GenerationError, IconRenderer, IconSpec,
    ProceduralGenerator, RenderOptions, SpecError, export, generate_with_fallback,
};
#[cfg(feature = "remote")]
use iconmaker::{RemoteConfig, RemoteGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render an icon from a description and export it as PNG or ICO.", long_about = None)]
struct Args {
    /// What the icon should show; keywords pick the glyph
    #[arg(short, long)]
    description: String,

    /// Background color as #rrggbb
    #[arg(short, long, default_value = "#6366f1")]
    background: String,

    /// Foreground color as #rrggbb
    #[arg(short, long, default_value = "#ffffff")]
    foreground: String,

    /// Output side length in pixels (16-1024)
    #[arg(short, long, default_value_t = 256)]
    size: u32,

    /// Output container
    #[arg(long, value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,

    /// Base of the output file name
    #[arg(short, long, default_value = "icon")]
    name: String,

    /// Directory the file is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Add seeded grain to the background
    #[arg(long)]
    grain_seed: Option<u64>,

    /// Skip the glyph's drop shadow
    #[arg(long)]
    no_shadow: bool,

    /// Skip the glyph's highlight
    #[arg(long)]
    no_highlight: bool,

    /// Generation service to try before rendering locally
    #[cfg(feature = "remote")]
    #[arg(long)]
    remote_url: Option<String>,

    /// Bearer token for the generation service
    #[cfg(feature = "remote")]
    #[arg(long)]
    api_key: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn init_logging(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    Builder::new().filter_level(level).init();
}

impl Args {
    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions {
            shadow: !self.no_shadow,
            highlight: !self.no_highlight,
            ..RenderOptions::default()
        };
        if let Some(seed) = self.grain_seed {
            options = options.with_grain(seed);
        }
        options
    }
}

async fn generate(
    args: &Args,
    procedural: &ProceduralGenerator,
    spec: &IconSpec,
) -> Result<Generated, GenerationError> {
    #[cfg(feature = "remote")]
    if let Some(url) = &args.remote_url {
        let mut config = RemoteConfig::new(url);
        if let Some(key) = &args.api_key {
            config = config.with_api_key(key);
        }
        let remote = RemoteGenerator::new(config)?;
        return generate_with_fallback(Some(&remote), procedural, spec).await;
    }
    #[cfg(not(feature = "remote"))]
    let _ = args;

    generate_with_fallback::<ProceduralGenerator>(None, procedural, spec).await
}

async fn run(args: Args) -> Result<PathBuf, CliError> {
    let spec = IconSpec::from_hex(&args.description, &args.background, &args.foreground, args.size)?;
    let procedural = ProceduralGenerator::new(IconRenderer::with_options(&args.render_options()));

    let generated = generate(&args, &procedural, &spec).await?;
    info!("generated icon ({:?})", generated.source);

    // Encode fully before touching the file system.
    let export = export(&generated.image, spec.size, &args.name, args.format)?;
    let path = args.out_dir.join(&export.file_name);
    std::fs::write(&path, &export.bytes).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(args).await {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
