use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use vidtensor::Session;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video file to inspect
    path: PathBuf,

    /// Print a JSON object instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct Probe {
    path: String,
    width: u32,
    height: u32,
    pixel_format: String,
    time_base: String,
    frame_rate: f64,
    frame_count: u64,
    duration: f64,
}

impl Probe {
    fn of(session: &Session) -> anyhow::Result<Self> {
        Ok(Self {
            path: session.path().display().to_string(),
            width: session.width()?,
            height: session.height()?,
            pixel_format: session.pixel_format()?.to_string(),
            time_base: session.time_base()?.to_string(),
            frame_rate: session.frame_rate()?,
            frame_count: session.frame_count()?,
            duration: session.duration()?,
        })
    }
}

pub fn run(args: &ProbeArgs) -> anyhow::Result<()> {
    let session = Session::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    let probe = Probe::of(&session)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&probe)?);
    } else {
        println!("path:         {}", probe.path);
        println!("size:         {}x{}", probe.width, probe.height);
        println!("pixel format: {}", probe.pixel_format);
        println!("time base:    {}", probe.time_base);
        println!("frame rate:   {:.3}", probe.frame_rate);
        println!("frame count:  {}", probe.frame_count);
        println!("duration:     {:.3}s", probe.duration);
    }
    Ok(())
}
