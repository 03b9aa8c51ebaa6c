use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use c41invert_rs::image_pipeline::{
    BatchConverter, ConversionConfig, ConversionConfigBuilder, FailurePolicy,
    NegativeConversionPipeline, OutputFormat, TiffCompression, ToneCurve,
};
use c41invert_rs::logger::{self, error, info};

#[derive(Parser)]
#[command(name = "c41invert")]
#[command(version, about = "Invert scanned film negatives and normalize their colors", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invert every negative in a directory, normalize colors and write positives
    Convert {
        /// Input directory containing scans or RAW captures
        #[arg(long, value_name = "DIR")]
        input: PathBuf,

        /// Output directory for converted files
        #[arg(long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Output file format: tiff or jpeg
        #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Tiff)]
        output_format: OutputFormat,

        /// TIFF compression: none, lzw, deflate-fast, deflate-balanced or deflate-best
        #[arg(long, value_name = "METHOD", default_value_t = TiffCompression::DeflateBalanced)]
        compression: TiffCompression,

        /// Disable the TIFF horizontal predictor
        #[arg(long)]
        no_predictor: bool,

        /// JPEG quality (1-100)
        #[arg(long, value_name = "N", default_value_t = 95)]
        jpeg_quality: u8,

        /// Keep converting the remaining files when one fails
        #[arg(long)]
        keep_going: bool,

        /// Print a per-step timing summary for every file
        #[arg(long)]
        timings: bool,
    },

    /// Report the black and white points sampled from a single negative
    Analyze {
        /// Negative to analyze
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,
    },
}

#[derive(Args)]
struct SamplingArgs {
    /// Sample the palette from a centered crop covering this fraction of the frame, 0 < fraction <= 1
    #[arg(long, alias = "sample_fraction", value_name = "FRACTION", default_value_t = 0.8)]
    sample_fraction: f64,

    /// Shadows start here, lower values save more shadows
    #[arg(long, value_name = "RANK", default_value_t = 0.01)]
    lowlights: f64,

    /// Highlights start here, lower values save more highlights
    #[arg(long, value_name = "RANK", default_value_t = 0.99)]
    highlights: f64,

    /// Tone curve between the black and white points: linear or sigmoid
    #[arg(long, value_name = "CURVE", default_value_t = ToneCurve::Linear)]
    curve: ToneCurve,

    /// Use a sigmoid function instead of linear mapping, same as `--curve sigmoid`
    #[arg(long)]
    s_curve: bool,

    /// Sample a centered square, useful when the negative doesn't fill the frame
    #[arg(long)]
    center_weighted_metering: bool,
}

impl SamplingArgs {
    fn apply(&self, builder: ConversionConfigBuilder) -> ConversionConfigBuilder {
        let curve = if self.s_curve {
            ToneCurve::Sigmoid
        } else {
            self.curve
        };
        builder
            .sample_fraction(self.sample_fraction)
            .low_cut(self.lowlights)
            .high_cut(self.highlights)
            .curve(curve)
            .center_weighted(self.center_weighted_metering)
    }
}

fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Convert {
            input,
            output,
            sampling,
            output_format,
            compression,
            no_predictor,
            jpeg_quality,
            keep_going,
            timings,
        } => {
            let config = sampling
                .apply(ConversionConfig::builder())
                .output_format(output_format)
                .compression(compression)
                .predictor(if no_predictor { None } else { Some(2) })
                .jpeg_quality(jpeg_quality)
                .build();
            let pipeline = NegativeConversionPipeline::new(config)?;

            info!("Output format: {}", pipeline.config().output_format);
            info!("Tone curve: {}", pipeline.config().curve);

            let policy = if keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            };
            let report = BatchConverter::new(pipeline, policy)
                .with_timings(timings)
                .convert_directory(&input, &output)
                .with_context(|| format!("Error processing directory {}", input.display()))?;

            for (path, e) in &report.failed {
                error!("Could not load input file `{}`: {}", path.display(), e);
            }
            Ok(report.is_success())
        }
        Commands::Analyze { input, sampling } => {
            let config = sampling.apply(ConversionConfig::builder()).build();
            let pipeline = NegativeConversionPipeline::new(config)?;

            let transformation = pipeline
                .analyze_file(&input)
                .with_context(|| format!("Could not analyze `{}`", input.display()))?;

            for (name, range) in ["red", "green", "blue"].iter().zip(transformation.ranges()) {
                info!("{:<5} low {:>5}  high {:>5}", name, range.low, range.high);
            }
            info!("steepness {:.3}", transformation.steepness);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(&cli.log_level);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
