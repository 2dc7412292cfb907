//! Renders one visible frame as text, one character per pixel, for eyeball
//! checks of what the color pins carried without attaching a display.

use std::fs;
use std::io;
use std::path::Path;

use crate::machine::generic::raster::ScanPhase;
use crate::machine::pong::Chip;

// Indexed by summed channel intensity, 0..=9.
const SHADES: [char; 10] = [' ', '.', '.', ':', ':', '+', '+', '%', '%', '%'];

/// Advance the chip to the top-left of the active area, then sample one full
/// frame off the output pins and write each visible line as a row of shade
/// characters.
pub fn render_frame(chip: &mut Chip, path: &Path) -> io::Result<()> {
    while (chip.raster().x, chip.raster().y) != (0, 0) {
        chip.step();
    }

    let t = chip.raster().t;
    let mut text = String::with_capacity((t.h_active as usize + 1) * t.v_active as usize);
    for _ in 0..t.ticks_per_frame() {
        let raster = chip.raster();
        if let (ScanPhase::Active(_), ScanPhase::Active(col)) = (raster.v_phase(), raster.h_phase())
        {
            let luma = chip.output().rgb().luma();
            text.push(SHADES[luma as usize]);
            if col + 1 == t.h_active {
                text.push('\n');
            }
        }
        chip.step();
    }
    fs::write(path, text)
}
