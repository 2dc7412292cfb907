pub mod pattern;
pub mod video;

use bytemuck::{Pod, Zeroable};

use crate::machine::generic::raster::{Raster, Timing, TimingError};
use crate::machine::pong::pattern::{PixelSource, Rgb};

/// The state of the eight output pins, packed the way the silicon drives
/// them: bit 7 hsync, bit 6 vsync, bits 5:4 red, bits 3:2 blue, bits 1:0
/// green. Sync pins are active low, so both read high while idle.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct OutputWord(pub u8);

impl OutputWord {
    pub const HSYNC: u8 = 1 << 7;
    pub const VSYNC: u8 = 1 << 6;

    /// Both syncs idle, all color pins low. This is also the reset value.
    pub const IDLE: OutputWord = OutputWord(Self::HSYNC | Self::VSYNC);

    fn pack(in_hsync: bool, in_vsync: bool, rgb: Rgb) -> Self {
        let mut word = 0;
        if !in_hsync {
            word |= Self::HSYNC;
        }
        if !in_vsync {
            word |= Self::VSYNC;
        }
        word |= (rgb.r & 0b11) << 4;
        word |= (rgb.b & 0b11) << 2;
        word |= rgb.g & 0b11;
        OutputWord(word)
    }

    /// Raw pin level: high while idle, low during the pulse.
    pub fn hsync(&self) -> bool {
        self.0 & Self::HSYNC != 0
    }

    /// Raw pin level: high while idle, low during the pulse.
    pub fn vsync(&self) -> bool {
        self.0 & Self::VSYNC != 0
    }

    pub fn red(&self) -> u8 {
        (self.0 >> 4) & 0b11
    }

    pub fn blue(&self) -> u8 {
        (self.0 >> 2) & 0b11
    }

    pub fn green(&self) -> u8 {
        self.0 & 0b11
    }

    pub fn rgb(&self) -> Rgb {
        Rgb {
            r: self.red(),
            g: self.green(),
            b: self.blue(),
        }
    }
}

/// The video timing path of the chip: the raster plus the pin-level
/// contract around it. `rst_n` is synchronous and level-sensitive; `ena`
/// freezes every register while low. The clock is implicit in `step`.
pub struct Chip {
    raster: Raster,
    source: Box<dyn PixelSource>,
    pub rst_n: bool,
    pub ena: bool,
}

impl Chip {
    pub fn new(timing: Timing, source: Box<dyn PixelSource>) -> Result<Self, TimingError> {
        Ok(Self {
            raster: Raster::new(timing)?,
            source,
            rst_n: true,
            ena: true,
        })
    }

    /// Apply one rising clock edge. All register updates commit here;
    /// nothing derived from them changes between edges.
    pub fn step(&mut self) {
        if !self.rst_n {
            self.raster.clear();
        } else if self.ena {
            self.raster.tick();
        }
    }

    /// Current pin state. A pure function of the registers and inputs, so it
    /// may be read any number of times between edges.
    pub fn output(&self) -> OutputWord {
        if !self.rst_n {
            return OutputWord::IDLE;
        }
        let rgb = if self.raster.visible() {
            self.source.pixel(self.raster.x, self.raster.y)
        } else {
            // Blanking shows black no matter what the source drives.
            Rgb::BLACK
        };
        OutputWord::pack(self.raster.hsync(), self.raster.vsync(), rgb)
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::pattern::{Blank, Solid};
    use super::video::TIMING_640X480_60;
    use super::*;

    fn white_chip() -> Chip {
        Chip::new(TIMING_640X480_60, Box::new(Solid(Rgb::WHITE))).unwrap()
    }

    #[test]
    fn test_reset_holds_pins_idle() {
        let mut chip = white_chip();
        chip.rst_n = false;
        for _ in 0..25 {
            chip.step();
            assert_eq!(chip.output(), OutputWord::IDLE);
            assert_eq!((chip.raster().x, chip.raster().y), (0, 0));
        }
    }

    #[test]
    fn test_counting_resumes_after_reset_release() {
        let mut chip = white_chip();
        chip.rst_n = false;
        chip.step();
        chip.rst_n = true;
        for n in 1..=800u16 {
            chip.step();
            assert_eq!(chip.raster().x, n % 800);
        }
        assert_eq!(chip.raster().y, 1);
    }

    #[test]
    fn test_enable_freezes_state() {
        let mut chip = white_chip();
        for _ in 0..37 {
            chip.step();
        }
        let frozen = chip.output();
        chip.ena = false;
        for _ in 0..100 {
            chip.step();
            assert_eq!(chip.raster().x, 37);
            assert_eq!(chip.output(), frozen);
        }
        chip.ena = true;
        chip.step();
        assert_eq!(chip.raster().x, 38);
    }

    #[test]
    fn test_blanking_forces_black() {
        let mut chip = white_chip();
        for _ in 0..TIMING_640X480_60.ticks_per_frame() {
            let word = chip.output();
            if chip.raster().visible() {
                assert_eq!(word.rgb(), Rgb::WHITE);
            } else {
                assert_eq!(word.rgb(), Rgb::BLACK);
            }
            chip.step();
        }
    }

    /// Walk the pins across the end of the first visible line: the last
    /// white pixel, the 16-tick front porch, then hsync dropping bit 7.
    #[test]
    fn test_line_edge_byte_sequence() {
        let mut chip = white_chip();
        for _ in 0..639 {
            chip.step();
        }
        let mut got = Vec::new();
        for _ in 0..18 {
            got.push(chip.output().0);
            chip.step();
        }
        let expected = hex!(
            "ff"                                            // x = 639, visible white
            "c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0 c0" // front porch
            "40"                                            // hsync pulse begins
        );
        assert_eq!(got, expected);
    }

    #[test]
    fn test_vsync_pulse_lines() {
        let mut chip = Chip::new(TIMING_640X480_60, Box::new(Blank)).unwrap();
        let mut pulse_lines = Vec::new();
        for _ in 0..TIMING_640X480_60.ticks_per_frame() {
            if chip.raster().x == 0 && !chip.output().vsync() {
                pulse_lines.push(chip.raster().y);
            }
            chip.step();
        }
        assert_eq!(pulse_lines, vec![490, 491]);
    }

    #[test]
    fn test_sync_pins_independent_of_source() {
        let mut white = white_chip();
        let mut blank = Chip::new(TIMING_640X480_60, Box::new(Blank)).unwrap();
        for _ in 0..2_000 {
            let (w, b) = (white.output(), blank.output());
            assert_eq!(w.hsync(), b.hsync());
            assert_eq!(w.vsync(), b.vsync());
            white.step();
            blank.step();
        }
    }
}
