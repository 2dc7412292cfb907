use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::{Level, info, trace};

mod host;
mod machine;

use host::capture::{RawDump, SampleLog};
use host::logging::{setup_logging_file, setup_logging_stdio};
use host::render::render_frame;
use machine::pong::Chip;
use machine::pong::pattern::{Bars, Blank, PixelSource, Rgb, Solid};
use machine::pong::video::{H_ACTIVE, TIMING_640X480_60};

/// Pong VGA chip simulator
/// Clocks the video timing core and samples the 8-bit output bus every edge
#[derive(Parser)]
#[command(name = "pong-vga")]
#[command(about = "A cycle-accurate simulator for a Pong-style VGA demo chip")]
struct Args {
    /// Clock edges to simulate (default: one full frame plus slack)
    #[arg(long, default_value_t = 420_010)]
    ticks: u64,

    /// Pixel clock period in nanoseconds
    #[arg(long, default_value_t = 40)]
    clock_period_ns: u64,

    /// Hold reset active for this many leading clock edges
    #[arg(long, default_value_t = 1)]
    reset_ticks: u64,

    /// Write a decoded sample log, one line per clock edge
    #[arg(long, value_name = "FILE")]
    capture: Option<PathBuf>,

    /// Write the raw output bus, one byte per clock edge
    #[arg(long, value_name = "FILE")]
    raw: Option<PathBuf>,

    /// After the run, render one visible frame as text
    #[arg(long, value_name = "FILE")]
    render: Option<PathBuf>,

    /// Pattern driven onto the color pins inside the visible area
    #[arg(long, value_enum, default_value = "bars")]
    pattern: Pattern,

    /// Write logs to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Pattern {
    Blank,
    White,
    Bars,
}

impl Pattern {
    fn source(self) -> Box<dyn PixelSource> {
        match self {
            Pattern::Blank => Box::new(Blank),
            Pattern::White => Box::new(Solid(Rgb::WHITE)),
            Pattern::Bars => Box::new(Bars { width: H_ACTIVE }),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::TRACE
    } else {
        Level::INFO
    };
    match &args.log_file {
        Some(path) => setup_logging_file(level, path)?,
        None => setup_logging_stdio(level),
    }

    info!("Pong VGA simulator starting...");

    let mut chip = Chip::new(TIMING_640X480_60, args.pattern.source())?;
    let mut capture = match &args.capture {
        Some(path) => Some(SampleLog::create(path, args.clock_period_ns)?),
        None => None,
    };
    let mut raw = match &args.raw {
        Some(path) => Some(RawDump::create(path)?),
        None => None,
    };

    info!("Reset");
    chip.rst_n = false;
    for _ in 0..args.reset_ticks {
        chip.step();
    }
    chip.rst_n = true;

    let start_time = Instant::now();
    let mut frames = 0_u64;
    let mut in_vsync = !chip.output().vsync();
    for tick in 0..args.ticks {
        chip.step();
        let word = chip.output();

        trace!(
            "{} ns: {} {} {:02b} {:02b} {:02b}",
            tick * args.clock_period_ns,
            u8::from(word.hsync()),
            u8::from(word.vsync()),
            word.red(),
            word.blue(),
            word.green(),
        );
        if let Some(capture) = &mut capture {
            capture.record(tick, word)?;
        }
        if let Some(raw) = &mut raw {
            raw.record(word)?;
        }

        // A falling edge on the vsync pin marks the start of a frame.
        let pulse = !word.vsync();
        if pulse && !in_vsync {
            frames += 1;
            trace!("vertical sync at line {}", chip.raster().y);
        }
        in_vsync = pulse;
    }

    if let Some(capture) = capture {
        capture.finish()?;
    }
    if let Some(raw) = raw {
        raw.finish()?;
    }
    if let Some(path) = &args.render {
        info!("Rendering one frame to {:?}", path);
        render_frame(&mut chip, path)?;
    }

    let elapsed = start_time.elapsed();
    info!("Simulation completed:");
    info!("  Clock edges: {}", args.ticks);
    info!("  Frames started: {}", frames);
    info!("  Time elapsed: {:?}", elapsed);
    if elapsed.as_secs_f64() > 0.0 {
        info!(
            "  Edges per second: {:.0}",
            args.ticks as f64 / elapsed.as_secs_f64()
        );
    }

    Ok(())
}
