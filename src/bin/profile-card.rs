use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "profile-card", version)]
struct Cli {
    /// Log debug details to stderr.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a card manifest to a PNG.
    Render(RenderArgs),
    /// Print the font the default family stack resolves to.
    Fonts,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input card manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = profile_card::DEFAULT_EXPORT_FILE_NAME)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts => cmd_fonts(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let manifest = profile_card::CardManifest::from_path(&args.in_path)?;
    let root = args
        .in_path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let session = manifest.build_session(root)?;
    let stats = session.last_stats();
    tracing::info!(
        slots = stats.slots_drawn.len(),
        skipped = stats.slots_skipped.len() + stats.fields_skipped.len(),
        "card rendered"
    );

    session.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_fonts() -> anyhow::Result<()> {
    let config = profile_card::FontConfig::default();
    let face = profile_card::resolve_font(&config)?;
    println!("{} (face {})", face.family, face.index);
    Ok(())
}
