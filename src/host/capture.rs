//! Recorders for the per-tick output samples. The text log carries the same
//! five decoded fields the original bench printed for every clock edge; the
//! raw dump keeps the packed bus byte per tick for waveform-style tooling.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::machine::pong::OutputWord;

/// One text line per clock edge:
/// `<time> ns: <hsync> <vsync> <red> <blue> <green>`, color fields as
/// two-digit binary.
pub struct SampleLog {
    out: BufWriter<File>,
    clock_period_ns: u64,
}

impl SampleLog {
    pub fn create(path: &Path, clock_period_ns: u64) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            clock_period_ns,
        })
    }

    pub fn record(&mut self, tick: u64, word: OutputWord) -> io::Result<()> {
        writeln!(
            self.out,
            "{} ns: {} {} {:02b} {:02b} {:02b}",
            tick * self.clock_period_ns,
            u8::from(word.hsync()),
            u8::from(word.vsync()),
            word.red(),
            word.blue(),
            word.green(),
        )
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}

const RAW_CHUNK: usize = 4096;

/// Packed bus bytes, one per tick, written through a plain-old-data view of
/// the sample buffer.
pub struct RawDump {
    out: BufWriter<File>,
    buf: Vec<OutputWord>,
}

impl RawDump {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            buf: Vec::with_capacity(RAW_CHUNK),
        })
    }

    pub fn record(&mut self, word: OutputWord) -> io::Result<()> {
        self.buf.push(word);
        if self.buf.len() == RAW_CHUNK {
            self.flush_chunk()?;
        }
        Ok(())
    }

    fn flush_chunk(&mut self) -> io::Result<()> {
        self.out.write_all(bytemuck::cast_slice(&self.buf))?;
        self.buf.clear();
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.flush_chunk()?;
        self.out.flush()
    }
}
