use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use showscript::{RendererVariant, SessionOpts, SessionState, ShowEvent, ShowSession, Size};

#[derive(Parser, Debug)]
#[command(name = "showscript", version)]
struct Cli {
    /// Log pipeline progress to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge, normalize and scale a show; write the resulting script as JSON.
    Build(BuildArgs),
    /// Print scene counts and the slide-to-scene map of a show.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Show directory containing `header.json` and one `<slideId>.json` per slide.
    #[arg(long)]
    dir: PathBuf,

    /// Display viewport as `WIDTHxHEIGHT`. Defaults to the authoring size.
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<Size>,

    /// Rendering engine to normalize for.
    #[arg(long, value_enum, default_value_t = RendererVariant::Reference)]
    variant: RendererVariant,

    /// Output JSON path. Prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Show directory containing `header.json` and one `<slideId>.json` per slide.
    #[arg(long)]
    dir: PathBuf,
}

fn parse_viewport(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(format!("viewport must be positive, got '{s}'"));
    }
    Ok(Size::new(w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load(dir: &std::path::Path, opts: SessionOpts) -> anyhow::Result<ShowSession> {
    let mut session = showscript::load_show_dir(dir, opts)?;
    if session.state() != SessionState::Ready {
        let reason = session
            .drain_events()
            .into_iter()
            .find_map(|e| match e {
                ShowEvent::ScriptDidNotLoad { reason } => Some(reason),
                _ => None,
            })
            .unwrap_or_else(|| "show did not finish loading".to_string());
        anyhow::bail!("show '{}' did not load: {reason}", dir.display());
    }
    Ok(session)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let opts = SessionOpts {
        variant: args.variant,
        viewport: args.viewport.unwrap_or(Size::ZERO),
        ..SessionOpts::default()
    };
    let session = load(&args.dir, opts)?;
    let script = session
        .into_script()
        .context("ready session without a script")?;

    let json = serde_json::to_string_pretty(&script).context("serialize show script")?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json)
                .with_context(|| format!("write script '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let session = load(&args.dir, SessionOpts::default())?;
    let script = session
        .script()
        .context("ready session without a script")?;

    let size = script.original_slide_size();
    println!("size: {}x{}", size.width, size.height);
    println!("slides: {}", script.slide_list().len());
    println!("scenes: {}", script.num_scenes());
    for (i, id) in script.slide_list().iter().enumerate() {
        let range = script.slide_scene_range(i).unwrap_or(0..0);
        println!("  [{i}] {id}: scenes {}..{}", range.start, range.end);
    }
    Ok(())
}
