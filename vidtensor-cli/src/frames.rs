use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use vidtensor::{FilterConfig, Frame, Packed, Session, pack_bytes, pack_floats};

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Video file to decode
    path: PathBuf,

    /// Convert frames to this pixel format through a filter graph
    #[arg(long)]
    pixel_format: Option<String>,

    /// Filter chain run before the pixel format conversion
    #[arg(long, requires = "pixel_format")]
    chain: Option<String>,

    /// Start at the first frame at or after this many seconds
    #[arg(long)]
    seek: Option<f64>,

    /// Stop after this many frames
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Pack frames as normalized floats instead of bytes
    #[arg(long)]
    float: bool,

    /// Print one JSON object per frame instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
struct ChannelStats {
    min: f64,
    max: f64,
    mean: f64,
}

#[derive(Serialize, Debug)]
struct FrameReport {
    index: usize,
    timestamp: Option<i64>,
    seconds: Option<f64>,
    pixel_format: String,
    shape: [usize; 3],
    channels: Vec<ChannelStats>,
}

fn channel_stats<T: Copy + Into<f64>>(packed: &Packed<T>) -> Vec<ChannelStats> {
    (0..packed.channels)
        .map(|index| {
            let values = packed.channel(index);
            if values.is_empty() {
                return ChannelStats {
                    min: 0.0,
                    max: 0.0,
                    mean: 0.0,
                };
            }
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut sum = 0.0;
            for value in values.iter().map(|&v| v.into()) {
                min = min.min(value);
                max = max.max(value);
                sum += value;
            }
            ChannelStats {
                min,
                max,
                mean: sum / values.len() as f64,
            }
        })
        .collect()
}

fn report(index: usize, frame: &Frame, float: bool) -> anyhow::Result<FrameReport> {
    let (shape, channels) = if float {
        let packed = pack_floats(frame)?;
        (packed.shape(), channel_stats(&packed))
    } else {
        let packed = pack_bytes(frame)?;
        (packed.shape(), channel_stats(&packed))
    };
    Ok(FrameReport {
        index,
        timestamp: frame.timestamp().map(|pts| pts.0),
        seconds: frame.seconds(),
        pixel_format: frame.format.to_string(),
        shape,
        channels,
    })
}

fn write_text(out: &mut impl Write, report: &FrameReport) -> io::Result<()> {
    let [c, h, w] = report.shape;
    write!(out, "{:>6}", report.index)?;
    match (report.timestamp, report.seconds) {
        (Some(ts), Some(seconds)) => write!(out, "  ts={ts:<8} t={seconds:>9.3}s")?,
        _ => write!(out, "  ts={:<8} t={:>10}", "-", "-")?,
    }
    write!(out, "  {} {c}x{h}x{w}", report.pixel_format)?;
    for (index, stats) in report.channels.iter().enumerate() {
        write!(
            out,
            "  c{index}[{:.3}..{:.3} mean {:.3}]",
            stats.min, stats.max, stats.mean
        )?;
    }
    writeln!(out)
}

pub fn run(args: &FramesArgs) -> anyhow::Result<()> {
    let mut session = Session::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;

    if let Some(pixel_format) = &args.pixel_format {
        let mut config = FilterConfig::new(pixel_format);
        if let Some(chain) = &args.chain {
            config = config.with_chain(chain);
        }
        session = session
            .attach_filter(config)
            .context("failed to attach filter")?;
    }

    if let Some(seconds) = args.seek {
        session
            .seek(seconds)
            .with_context(|| format!("failed to seek to {seconds}s"))?;
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut out = io::stdout().lock();
    let mut index = 0;
    while index < limit {
        let Some(frame) = session.next_frame()? else {
            break;
        };
        let report = report(index, &frame, args.float)?;
        if args.json {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
        } else {
            write_text(&mut out, &report)?;
        }
        index += 1;
    }

    tracing::debug!(frames = index, "finished decoding");
    session.close();
    Ok(())
}
