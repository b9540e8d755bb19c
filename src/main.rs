use arcane_plot::{
    build_and_render, ChartStyle, Result, ARCANE_PROFILING, CPU_ONLY_PROFILING,
};
use clap::{ArgEnum, Parser};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(ArgEnum, Clone, Copy, Debug)]
enum Preset {
    Classic,
    Compact,
}

/// Plot ARCANE vs CPU-only latency per node
#[derive(Parser, Debug)]
#[clap(name = "arcane-plot", version)]
struct Args {
    /// Output image; .svg, .png, .bmp or .jpg
    #[clap(short, long, default_value = "arcane_vs_cpu.svg")]
    output: PathBuf,

    /// Built-in style to start from
    #[clap(long, arg_enum, default_value = "classic")]
    preset: Preset,

    /// TOML file overriding preset fields
    #[clap(long)]
    style: Option<PathBuf>,

    #[clap(long, default_value = "1000")]
    width: u32,

    #[clap(long, default_value = "300")]
    height: u32,

    /// Print the per-node ratio table
    #[clap(long)]
    summary: bool,

    #[clap(short, long)]
    verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let mut style = match args.preset {
        Preset::Classic => ChartStyle::classic(),
        Preset::Compact => ChartStyle::compact(),
    };
    if let Some(path) = &args.style {
        style = style.with_file(path)?;
    }

    let layout = build_and_render(
        &ARCANE_PROFILING,
        &CPU_ONLY_PROFILING,
        &style,
        &args.output,
        (args.width, args.height),
    )?;

    if args.summary {
        print!("{}", layout.ratios.summary());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}
