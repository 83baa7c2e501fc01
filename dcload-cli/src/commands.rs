// CLI command handlers
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

use crate::chooser::ConsoleChooser;
use dcload_core::loader::chooser::{FixedChooser, LoadAddressChooser, RAM_WINDOWS};
use dcload_core::loader::database::AnalysisDatabase;
use dcload_core::loader::error::LoaderError;
use dcload_core::loader::format::{probe, RamImage};
use dcload_core::loader::pipeline::load_image;
use dcload_core::loader::registers::{ItemWidth, PERIPHERAL_BLOCKS};

pub fn probe_dump(image: &Path) -> Result<()> {
    let len = fs::metadata(image)
        .with_context(|| format!("Failed to stat image: {}", image.display()))?
        .len();

    match probe(len) {
        Some(format) => {
            println!("Accepted: {}", image.display());
            println!("  Format: {}", format.format_name);
            println!("  Processor: {}", format.processor);
            println!("  Image size: 0x{:08X} bytes", format.image_len);
            Ok(())
        }
        None => bail!(
            "Rejected: {} ({} bytes is not a Dreamcast RAM dump)",
            image.display(),
            len
        ),
    }
}

pub fn load_dump(image: &Path, base: Option<&str>, output: Option<&Path>) -> Result<()> {
    println!("Reading RAM dump: {}", image.display());
    let image_data = RamImage::open(image)?;

    let format = image_data.format();
    println!("  Format: {}", format.format_name);
    println!("  Processor: {}", format.processor);

    // Resolve the RAM window up front so the spinner does not fight the
    // interactive prompt.
    let choice = match base {
        Some(text) => parse_base(text)?,
        None => match ConsoleChooser.choose() {
            Some(n) => n,
            None => return Err(LoaderError::Cancelled.into()),
        },
    };

    log::debug!("loading with RAM window 0x{:08X}", RAM_WINDOWS[choice]);

    let pb = create_progress_bar("Annotating database...");
    let mut db = AnalysisDatabase::new();
    let summary = load_image(&image_data, &mut db, &FixedChooser(choice))?;
    pb.finish_with_message("Load complete");

    println!("Database annotated");
    println!("  RAM window: 0x{:08X}", summary.base);
    println!("  Mapped bytes: 0x{:08X}", summary.image_len);
    println!("  Segments: {}", summary.segments);
    println!("  Registers named: {}", summary.registers);
    println!("  I/O ports applied: {}", summary.ports);

    if let Some(path) = output {
        let json = db
            .to_json_pretty()
            .context("Failed to serialize the memory map")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write memory map: {}", path.display()))?;
        println!("Memory map written to: {}", path.display());
    }

    Ok(())
}

pub fn print_registers() {
    for block in &PERIPHERAL_BLOCKS {
        println!(
            "{} [0x{:08X}, 0x{:08X}) {}",
            block.name,
            block.start,
            block.end,
            block.class.as_str()
        );
        for reg in block.registers {
            println!(
                "  0x{:08X}  {}  {:<12} {}",
                reg.address,
                width_letter(reg.width),
                reg.name,
                reg.comment
            );
        }
    }
}

fn width_letter(width: ItemWidth) -> char {
    match width {
        ItemWidth::Byte => 'B',
        ItemWidth::Word => 'W',
        ItemWidth::Dword => 'L',
    }
}

fn parse_base(text: &str) -> Result<usize> {
    let hex = text
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    let base = u32::from_str_radix(hex, 16)
        .with_context(|| format!("Invalid base address: {text}"))?;
    let index = RAM_WINDOWS
        .iter()
        .position(|&w| w == base)
        .ok_or_else(|| LoaderError::invalid_base(base, &RAM_WINDOWS))?;
    Ok(index)
}

fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb
}
