use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snapframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a still image into a framed photo.
    Compose(ComposeArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input image standing in for the captured frame.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Configuration JSON; defaults apply to every missing key.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the input as a mirrored (front camera) capture.
    #[arg(long)]
    mirror: bool,

    /// Overlay style.
    #[arg(long, value_enum)]
    style: Option<StyleChoice>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Lossy quality in [0, 1].
    #[arg(long)]
    quality: Option<f32>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Configuration JSON to merge over the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    FullBleed,
    Bordered,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args).await,
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<snapframe::CompositorConfig> {
    let config = match path {
        Some(p) => snapframe::CompositorConfig::from_path(p)?,
        None => snapframe::CompositorConfig::default(),
    };
    Ok(config)
}

async fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(style) = args.style {
        config.overlay_style = match style {
            StyleChoice::FullBleed => snapframe::OverlayStyle::FullBleed,
            StyleChoice::Bordered => snapframe::OverlayStyle::Bordered,
        };
    }
    if let Some(format) = args.format {
        config.output_format = match format {
            FormatChoice::Png => snapframe::OutputFormat::Lossless,
            FormatChoice::Jpeg => snapframe::OutputFormat::Lossy,
        };
    }
    if let Some(q) = args.quality {
        config.output_quality = q;
    }

    let facing = if args.mirror {
        snapframe::FacingMode::User
    } else {
        snapframe::FacingMode::Environment
    };
    let provider = snapframe::StillImageProvider::from_path(&args.in_path, facing)?;

    let compositor = snapframe::Compositor::from_config(config)?;
    let session = snapframe::CaptureSession::new(Arc::new(compositor));
    let result = session.capture(&provider).await?;

    let mut output = snapframe::MemoryOutput::new();
    let suggested = session.export(&result, &mut output)?;
    let (_, bytes) = output.last().context("export produced no output")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    eprintln!("wrote {} (suggested name {suggested})", args.out.display());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    let json = serde_json::to_string_pretty(&config).context("serialize configuration")?;
    println!("{json}");
    Ok(())
}
