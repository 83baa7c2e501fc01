//! Load Pipeline
//!
//! The fixed-order sequence that turns a recognized RAM dump into an
//! annotated database:
//!
//! 1. Select the SH4 processor module.
//! 2. Create every peripheral block segment and its registers.
//! 3. Ask the chooser for the RAM window; cancelling aborts the load.
//! 4. Create the RAM segment and map the file bytes into it.
//! 5. Apply the SH7750 I/O port symbols from the embedded table.
//! 6. Write the auto-analysis option words.
//!
//! The order is observable through the host and is part of the contract:
//! peripheral annotations land before the RAM window exists, so a cancelled
//! load leaves no RAM segment behind.

use super::analysis::AnalysisOptions;
use super::chooser::{LoadAddressChooser, RAM_WINDOWS};
use super::database::{name_flags, AnalysisHost};
use super::error::LoaderError;
use super::format::RamImage;
use super::ioports::{self, DEFAULT_DEVICE};
use super::registers::{ItemWidth, PeripheralBlock, SegmentClass, PERIPHERAL_BLOCKS};

/// The RAM segment always spans the full 32 MiB window, whatever the dump size.
pub const RAM_WINDOW_SIZE: u32 = 0x02000000;

/// Name of the RAM segment.
pub const RAM_SEGMENT_NAME: &str = "RAM";

/// What a completed load wrote, for reporting.
#[derive(Debug, Clone, Copy)]
pub struct LoadSummary {
    /// Chosen RAM window base
    pub base: u32,
    /// Mapped file bytes
    pub image_len: u64,
    /// Segments created, RAM included
    pub segments: usize,
    /// Reference-table registers named
    pub registers: usize,
    /// I/O port symbols applied
    pub ports: usize,
}

/// Run the full load sequence against `host`.
pub fn load_image<H: AnalysisHost>(
    image: &RamImage,
    host: &mut H,
    chooser: &dyn LoadAddressChooser,
) -> Result<LoadSummary, LoaderError> {
    host.set_processor(image.format().processor);

    let mut registers = 0;
    for block in &PERIPHERAL_BLOCKS {
        add_peripheral_block(host, block)?;
        registers += block.registers.len();
    }
    log::info!(
        "created {} peripheral segments, {registers} registers",
        PERIPHERAL_BLOCKS.len()
    );

    let choice = chooser.choose().ok_or(LoaderError::Cancelled)?;
    let base = RAM_WINDOWS[choice];

    host.add_segment(base, base + RAM_WINDOW_SIZE, RAM_SEGMENT_NAME, SegmentClass::Data)?;
    host.map_file_bytes(0, base, base + image.len() as u32, true, image.bytes())?;
    log::info!("mapped {} bytes at 0x{base:08X}", image.len());

    let ports = ioports::read_ioports(DEFAULT_DEVICE)?;
    for port in &ports {
        apply_port(host, &port.name, port.address, &port.comment);
    }

    host.set_analysis_options(AnalysisOptions::for_ram_load());

    log::info!(
        "SEGA Dreamcast RAM loader v{}",
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoadSummary {
        base,
        image_len: image.len(),
        segments: PERIPHERAL_BLOCKS.len() + 1,
        registers,
        ports: ports.len(),
    })
}

/// Create one peripheral block: the segment, a byte item anchoring its
/// start, then every register with its width, name, and comment.
fn add_peripheral_block<H: AnalysisHost>(
    host: &mut H,
    block: &PeripheralBlock,
) -> Result<(), LoaderError> {
    host.add_segment(block.start, block.end, block.name, block.class)?;
    host.create_item(block.start, ItemWidth::Byte);

    for reg in block.registers {
        host.create_item(reg.address, reg.width);
        host.set_name(
            reg.address,
            reg.name,
            name_flags::PUBLIC | name_flags::AUTO | name_flags::NOWARN,
        );
        host.set_comment(reg.address, reg.comment);
    }
    Ok(())
}

/// Apply one I/O port symbol: decode the width suffix, mark the item when
/// the suffix gives a width, and name and comment the address.
fn apply_port<H: AnalysisHost>(host: &mut H, name: &str, address: u32, comment: &str) {
    let (width, stripped) = ioports::symbol_width(name);
    if let Some(width) = width {
        host.create_item(address, width);
    }
    host.set_name(address, stripped, name_flags::NOWARN);
    host.set_comment(address, comment);
}
