//! Video timing constants for the chip. The silicon drives a standard
//! 640x480 display from a 25 MHz pixel clock: 800 clocks per scan line and
//! 525 lines per frame, with the usual porch and pulse widths inside the
//! blanking intervals.

use crate::machine::generic::raster::Timing;

/// Visible columns per line.
pub const H_ACTIVE: u16 = 640;

/// Visible lines per frame.
pub const V_ACTIVE: u16 = 480;

pub const TIMING_640X480_60: Timing = Timing {
    h_active: H_ACTIVE,
    h_fp: 16,
    h_sync: 96,
    h_bp: 48, // Htot = 800
    v_active: V_ACTIVE,
    v_fp: 10,
    v_sync: 2,
    v_bp: 33, // Vtot = 525
};
