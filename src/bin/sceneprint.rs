use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "sceneprint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a serialized scene as an encoded image.
    Export(ExportArgs),
    /// Compress an existing image into a thumbnail (best-effort).
    Thumbnail(ThumbnailArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (extension is advisory; the encoded format follows
    /// the background mode and classifier).
    #[arg(long)]
    out: PathBuf,

    /// Background handling.
    #[arg(long, value_enum, default_value_t = BackgroundChoice::Auto)]
    background: BackgroundChoice,

    /// Rasterize at print density (300 DPI).
    #[arg(long)]
    high_resolution: bool,

    /// Root directory for relative object sources (defaults to the scene
    /// file's directory).
    #[arg(long)]
    assets_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Maximum length of the longer edge in pixels.
    #[arg(long, default_value_t = 512)]
    max_edge: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackgroundChoice {
    Auto,
    Opaque,
    Transparent,
}

impl From<BackgroundChoice> for sceneprint::BackgroundMode {
    fn from(value: BackgroundChoice) -> Self {
        match value {
            BackgroundChoice::Auto => Self::Auto,
            BackgroundChoice::Opaque => Self::Opaque,
            BackgroundChoice::Transparent => Self::Transparent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Thumbnail(args) => cmd_thumbnail(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read scene '{}'", args.in_path.display()))?;

    let assets_root = args
        .assets_root
        .clone()
        .unwrap_or_else(|| {
            args.in_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        });

    let request = sceneprint::ExportRequest {
        background: args.background.into(),
        high_resolution: args.high_resolution,
    };

    let result = sceneprint::export_scene_str(&json, &request, &assets_root)?;

    write_payload(&args.out, &result)?;
    eprintln!(
        "wrote {} ({}x{}, {})",
        args.out.display(),
        result.width,
        result.height,
        result.format.mime()
    );
    Ok(())
}

fn cmd_thumbnail(args: ThumbnailArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let out_bytes = sceneprint::compress_thumbnail(&bytes, args.max_edge);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &out_bytes)
        .with_context(|| format!("write thumbnail '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_payload(out: &Path, result: &sceneprint::RasterResult) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &result.bytes)
        .with_context(|| format!("write image '{}'", out.display()))?;
    Ok(())
}
