use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "barrace", version, about = "Render a bar chart race GIF from yearly sales")]
struct Cli {
    /// Log pipeline progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full animation as a GIF (default).
    Render(RenderArgs),
    /// Render a single timeline frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// JSON pipeline config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV with `Year,Car,Sales` columns.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Interpolated frames between consecutive years.
    #[arg(long)]
    steps: Option<u32>,

    /// Skip system fonts (labels need fonts from `--font-dir` to show).
    #[arg(long)]
    no_system_fonts: bool,

    /// Extra directory to load fonts from.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug, Default)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output GIF path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Display time of each frame in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,

    /// Play the animation this many extra times instead of looping forever.
    #[arg(long)]
    loops: Option<u16>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based) in the interpolated timeline.
    #[arg(long)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.cmd {
        Some(Command::Render(args)) => cmd_render(args),
        Some(Command::Frame(args)) => cmd_frame(args),
        None => cmd_render(RenderArgs::default()),
    }
}

fn load_config(args: &InputArgs) -> anyhow::Result<barrace::PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => barrace::PipelineConfig::from_path(path)?,
        None => barrace::PipelineConfig::default(),
    };
    if let Some(p) = &args.in_path {
        cfg.input = p.clone();
    }
    if let Some(steps) = args.steps {
        cfg.steps_per_year = steps;
    }
    if args.no_system_fonts {
        cfg.fonts.system_fonts = false;
    }
    cfg.fonts.font_dirs.extend(args.font_dirs.iter().cloned());
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.input)?;
    if let Some(out) = args.out {
        cfg.output = out;
    }
    if let Some(ms) = args.delay_ms {
        cfg.frame_delay_ms = ms;
    }
    if let Some(n) = args.loops {
        cfg.loop_mode = barrace::LoopMode::Finite(n);
    }
    if args.parallel {
        cfg.threading.parallel = true;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }
    if let Some(n) = args.chunk_size {
        cfg.threading.chunk_size = n;
    }

    barrace::run_pipeline(&cfg)?;
    println!("Animation saved as '{}'", cfg.output.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    let frame = barrace::render_single_frame(&cfg, barrace::FrameIndex(args.index))?;
    barrace::write_png(&frame, &args.out, cfg.style.palette.background.to_rgba())?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
