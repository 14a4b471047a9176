use clap::{Parser, Subcommand};

mod frames;
mod logging;
mod probe;

use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "vidtensor")]
#[command(about = "Inspect video files and the tensors decoded from them")]
struct Args {
    /// Log filter used when VIDTENSOR_LOG and RUST_LOG are unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print stream metadata
    Probe(probe::ProbeArgs),
    /// Decode frames and print statistics of their packed buffers
    Frames(frames::FramesArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level, args.log_format)?;
    vidtensor::init()?;

    match args.command {
        Command::Probe(probe) => probe::run(&probe),
        Command::Frames(frames) => frames::run(&frames),
    }
}
