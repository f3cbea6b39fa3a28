use std::{fs::File, path::Path, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reframe::{
    AspectRatio, FrameError, ProgressCallback, ProgressInfo, SequenceFile, Strategy,
    TransformOptions, measure,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  reframe info input.seq --json\n  reframe reverse input.seq reversed.seq --strategy fast --progress\n  reframe swap-channel input.seq output.seq 0 2\n  reframe clip-channel input.seq output.seq 1 20 200 --strategy small\n  reframe scale-channel input.seq output.seq 0 1.5 --stats\n  reframe speed-up input.seq output.seq 2\n  reframe crop-aspect input.seq output.seq 4:3\n  reframe completions zsh > _reframe";

#[derive(Debug, Parser)]
#[command(
    name = "reframe",
    version,
    about = "Transform raw planar frame sequences",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Execution strategy: balanced (batched), fast (bulk/mapped, more
    /// memory), or small (single frame, least memory).
    #[arg(long, default_value = "balanced")]
    strategy: String,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// Print elapsed time and peak memory delta after the run.
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print sequence header information (alias: probe).
    #[command(
        about = "Print sequence header information",
        visible_alias = "probe",
        after_help = "Examples:\n  reframe info input.seq\n  reframe info input.seq --json"
    )]
    Info {
        /// Input sequence path.
        input: PathBuf,

        /// Output header fields as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Reverse frame order.
    #[command(about = "Reverse frame order")]
    Reverse {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
    },

    /// Exchange two channel planes in every frame.
    #[command(about = "Swap two channel planes")]
    SwapChannel {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
        /// First channel index.
        first: u8,
        /// Second channel index.
        second: u8,
    },

    /// Clamp a channel's values to [MIN, MAX].
    #[command(about = "Clip a channel's values")]
    ClipChannel {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
        /// Channel index.
        channel: u8,
        /// Lower clamp bound.
        min: u8,
        /// Upper clamp bound.
        max: u8,
    },

    /// Multiply a channel's values by a factor, clamped to [0, 255].
    #[command(about = "Scale a channel's values")]
    ScaleChannel {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
        /// Channel index.
        channel: u8,
        /// Scaling factor.
        factor: f32,
    },

    /// Keep every Nth frame and rewrite the frame count.
    #[command(about = "Decimate the frame rate")]
    SpeedUp {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
        /// Decimation factor (must be greater than 1).
        factor: i64,
    },

    /// Crop every frame to a centered WIDTH:HEIGHT aspect-ratio window.
    #[command(about = "Crop to a target aspect ratio")]
    CropAspect {
        /// Input sequence path.
        input: PathBuf,
        /// Output sequence path.
        output: PathBuf,
        /// Target ratio, e.g. 16:9.
        ratio: String,
    },

    /// Validate sequence structure and print a report.
    #[command(about = "Validate a sequence file")]
    Validate {
        /// Input sequence path.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_strategy(value: &str) -> Option<Strategy> {
    match value.to_ascii_lowercase().as_str() {
        "balanced" | "default" => Some(Strategy::Balanced),
        "fast" | "speed" | "s" => Some(Strategy::Fast),
        "small" | "memory" | "m" => Some(Strategy::Small),
        _ => None,
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

/// Open input and output, run one transform, and report the outcome.
///
/// `copies_header` is true for transforms that keep the sequence shape and
/// expect the driver to transfer the header; decimation and cropping rewrite
/// it themselves.
fn execute<F>(
    global: &GlobalOptions,
    input: &Path,
    output: &Path,
    copies_header: bool,
    operation: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut SequenceFile, &mut File, &TransformOptions) -> Result<(), FrameError>,
{
    let strategy = parse_strategy(&global.strategy)
        .ok_or(format!("unsupported --strategy: {}", global.strategy))?;
    ensure_writable_path(output, global.overwrite)?;

    let mut sequence = SequenceFile::open(input)?;
    let mut destination = File::create(output)?;

    let mut options = TransformOptions::new().with_strategy(strategy);
    let progress_bar = if global.progress {
        let bar = ProgressBar::new(sequence.header().frame_count.max(0) as u64);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        options = options.with_progress(Arc::new(TerminalProgress { bar: bar.clone() }));
        Some(bar)
    } else {
        None
    };

    if copies_header {
        sequence.copy_header_to(&mut destination)?;
    }

    let outcome = if global.stats {
        let (outcome, stats) = measure(|| operation(&mut sequence, &mut destination, &options));
        if let Some(bar) = &progress_bar {
            bar.finish_and_clear();
        }
        println!("Elapsed time: {:.6} seconds", stats.elapsed.as_secs_f64());
        if let Some(delta) = stats.peak_rss_delta_kb {
            println!("Memory used: {delta} KB");
        }
        outcome
    } else {
        let outcome = operation(&mut sequence, &mut destination, &options);
        if let Some(bar) = &progress_bar {
            bar.finish_and_clear();
        }
        outcome
    };

    outcome?;
    println!("{} {}", "saved".green().bold(), output.display());
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Info { input, json } => {
            let sequence = SequenceFile::open(&input)?;
            let header = sequence.header();
            if json {
                let payload = json!({
                    "frame_count": header.frame_count,
                    "channels": header.channels,
                    "height": header.height,
                    "width": header.width,
                    "frame_size_bytes": header.frame_size(),
                    "payload_size_bytes": header.payload_size(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Frames: {}", header.frame_count);
                println!("Dimensions: {}x{}", header.width, header.height);
                println!("Channels: {}", header.channels);
                println!("Frame size: {} bytes", header.frame_size());
            }
        }
        Commands::Reverse { input, output } => {
            execute(&cli.global, &input, &output, true, |sequence, out, options| {
                sequence.timeline().reverse(out, options)
            })?;
        }
        Commands::SwapChannel {
            input,
            output,
            first,
            second,
        } => {
            execute(&cli.global, &input, &output, true, |sequence, out, options| {
                sequence.channels().swap(out, first, second, options)
            })?;
        }
        Commands::ClipChannel {
            input,
            output,
            channel,
            min,
            max,
        } => {
            execute(&cli.global, &input, &output, true, |sequence, out, options| {
                sequence.channels().clip(out, channel, min, max, options)
            })?;
        }
        Commands::ScaleChannel {
            input,
            output,
            channel,
            factor,
        } => {
            execute(&cli.global, &input, &output, true, |sequence, out, options| {
                sequence.channels().scale(out, channel, factor, options)
            })?;
        }
        Commands::SpeedUp {
            input,
            output,
            factor,
        } => {
            execute(&cli.global, &input, &output, false, |sequence, out, options| {
                sequence.timeline().speed_up(out, factor, options)
            })?;
        }
        Commands::CropAspect {
            input,
            output,
            ratio,
        } => {
            let ratio: AspectRatio = ratio.parse()?;
            execute(&cli.global, &input, &output, false, |sequence, out, options| {
                sequence.geometry().crop_aspect(out, ratio, options)
            })?;
        }
        Commands::Validate { input } => {
            let sequence = SequenceFile::open(&input)?;
            let report = sequence.validate();
            print!("{report}");
            if !report.is_valid() {
                return Err("sequence failed validation".into());
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "reframe", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::{Cli, parse_strategy};
    use reframe::Strategy;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_strategy_aliases() {
        assert_eq!(parse_strategy("balanced"), Some(Strategy::Balanced));
        assert_eq!(parse_strategy("default"), Some(Strategy::Balanced));
        assert_eq!(parse_strategy("FAST"), Some(Strategy::Fast));
        assert_eq!(parse_strategy("s"), Some(Strategy::Fast));
        assert_eq!(parse_strategy("small"), Some(Strategy::Small));
        assert_eq!(parse_strategy("m"), Some(Strategy::Small));
        assert_eq!(parse_strategy("turbo"), None);
    }
}
