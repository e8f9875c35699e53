//! gcodecloud CLI - G-code to point cloud converter

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use gcodecloud::{
    convert_file, init_logging, inspect_file, save_points, Config, DecodeMode, PointFormat,
    Summary, BUILD_DATE, VERSION,
};

#[derive(Parser)]
#[command(name = "gcodecloud")]
#[command(about = "Decode 3D-printer G-code into point clouds", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs and the summary as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (.toml or .json); defaults to the platform config if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a G-code file and write its point cloud
    Decode {
        /// Input G-code file
        input: PathBuf,
        /// Output point file (default: input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Point file format: csv, xyz, ply or json
        #[arg(long)]
        format: Option<PointFormat>,
        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Print counts, bounds and layers of a G-code file without writing anything
    Info {
        /// Input G-code file
        input: PathBuf,
        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Emission mode: vertex or interpolated
    #[arg(long)]
    mode: Option<DecodeMode>,
    /// Sample spacing for interpolated mode
    #[arg(long)]
    step: Option<f64>,
    /// Round coordinates to this many decimals
    #[arg(long, conflicts_with = "no_round")]
    decimals: Option<u32>,
    /// Keep raw coordinates
    #[arg(long)]
    no_round: bool,
    /// Stop after this many points
    #[arg(long)]
    max_points: Option<usize>,
}

impl DecodeArgs {
    /// Command line flags override loaded values
    fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.decode.mode = mode;
        }
        if let Some(step) = self.step {
            config.decode.resolution_step = step;
        }
        if let Some(decimals) = self.decimals {
            config.decode.round = true;
            config.decode.round_decimals = decimals;
        }
        if self.no_round {
            config.decode.round = false;
        }
        if self.max_points.is_some() {
            config.decode.max_points = self.max_points;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json)?;
    info!("gcodecloud {} (built {})", VERSION, BUILD_DATE);

    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Decode {
            input,
            output,
            format,
            decode,
        } => {
            decode.apply(&mut config);
            let format = format
                .or_else(|| output.as_deref().and_then(PointFormat::from_path))
                .unwrap_or(config.export.format);
            config.export.format = format;
            config.validate().context("Invalid options")?;

            let output = output.unwrap_or_else(|| input.with_extension(format.extension()));
            decode_command(&input, &output, &config, cli.json)?;
        }
        Commands::Info { input, decode } => {
            decode.apply(&mut config);
            config.validate().context("Invalid options")?;
            info_command(&input, &config, cli.json)?;
        }
    }

    Ok(())
}

fn decode_command(input: &Path, output: &Path, config: &Config, json: bool) -> Result<()> {
    let conversion = convert_file(input, &config.assembly_options())
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    save_points(
        output,
        &conversion.cloud,
        config.export.format,
        &config.export.delimiter,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Wrote {} points to {}",
        conversion.cloud.len(),
        output.display()
    );

    print_summary(&conversion.summary(&config.reconstruction), json)
}

fn info_command(input: &Path, config: &Config, json: bool) -> Result<()> {
    let (conversion, layers) = inspect_file(input, &config.assembly_options())
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let mut summary = conversion.summary(&config.reconstruction);
    summary.layers = Some(layers.len());
    print_summary(&summary, json)
}

fn print_summary(summary: &Summary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
