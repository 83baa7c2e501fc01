//! I/O Port Symbol Tables
//!
//! This module loads the supplemental I/O port symbols from the embedded
//! `sh3.cfg` resource and implements the SuperH symbol-naming convention:
//! a port name may carry a width suffix (`_B`, `_W`, `_L`, or `WB`) that
//! selects the item width and is stripped from the applied name.
//!
//! The resource groups ports into device sections (`.SH7750`, ...); the
//! Dreamcast load always asks for the `SH7750` table.

use super::error::LoaderError;
use super::registers::ItemWidth;

/// Device whose port table the Dreamcast load applies.
pub const DEFAULT_DEVICE: &str = "SH7750";

/// Embedded port table resource.
const PORT_CONFIG: &str = include_str!("../../resources/sh3.cfg");

/// One I/O port entry as read from the resource, name unstripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoPort {
    pub name: String,
    pub address: u32,
    pub comment: String,
}

/// Read the port table for `device` from the embedded resource.
pub fn read_ioports(device: &str) -> Result<Vec<IoPort>, LoaderError> {
    parse_ioports(PORT_CONFIG, device)
}

fn parse_ioports(text: &str, device: &str) -> Result<Vec<IoPort>, LoaderError> {
    let mut ports = Vec::new();
    let mut current: Option<&str> = None;
    let mut device_seen = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('.') {
            current = Some(section.trim());
            if current == Some(device) {
                device_seen = true;
            }
            continue;
        }
        if current != Some(device) {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (name, addr) = match (fields.next(), fields.next()) {
            (Some(name), Some(addr)) => (name, addr),
            _ => {
                return Err(LoaderError::PortConfig {
                    device: device.to_string(),
                    line: idx + 1,
                    message: format!("expected \"NAME ADDRESS comment\", got {line:?}"),
                })
            }
        };
        let address = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .ok_or_else(|| LoaderError::PortConfig {
                device: device.to_string(),
                line: idx + 1,
                message: format!("bad address {addr:?}"),
            })?;
        let comment = fields.collect::<Vec<_>>().join(" ");

        ports.push(IoPort {
            name: name.to_string(),
            address,
            comment,
        });
    }

    if !device_seen {
        return Err(LoaderError::UnknownDevice {
            device: device.to_string(),
        });
    }
    log::debug!("loaded {} ports for device {device}", ports.len());
    Ok(ports)
}

/// Decode the width suffix of a port name.
///
/// Returns the item width to mark (or `None` for an unknown `_` suffix,
/// which names the address without typing it) and the name with the suffix
/// stripped. Names shorter than two characters have no suffix to decode and
/// fall through to the longword default.
pub fn symbol_width(name: &str) -> (Option<ItemWidth>, &str) {
    if name.len() < 2 {
        return (Some(ItemWidth::Dword), name);
    }
    let tail_pos = name.len() - 2;
    let (head, tail) = name.split_at(tail_pos);
    if tail.starts_with('_') {
        let width = match tail {
            "_L" => Some(ItemWidth::Dword),
            "_W" => Some(ItemWidth::Word),
            "_B" => Some(ItemWidth::Byte),
            _ => None,
        };
        (width, head)
    } else if tail == "WB" {
        (Some(ItemWidth::Word), head)
    } else {
        (Some(ItemWidth::Dword), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_selects_width_and_strips() {
        assert_eq!(
            symbol_width("TMU_TCOR3_L"),
            (Some(ItemWidth::Dword), "TMU_TCOR3")
        );
        assert_eq!(
            symbol_width("INTC_IPRD_W"),
            (Some(ItemWidth::Word), "INTC_IPRD")
        );
        assert_eq!(
            symbol_width("TMU_TSTR2_B"),
            (Some(ItemWidth::Byte), "TMU_TSTR2")
        );
    }

    #[test]
    fn wb_tail_is_a_word_register() {
        assert_eq!(
            symbol_width("CPG_WTCNTWB"),
            (Some(ItemWidth::Word), "CPG_WTCNT")
        );
    }

    #[test]
    fn unknown_underscore_suffix_names_without_typing() {
        assert_eq!(symbol_width("FOO_X"), (None, "FOO"));
    }

    #[test]
    fn plain_names_default_to_dword() {
        assert_eq!(
            symbol_width("INTC_INTPRI00"),
            (Some(ItemWidth::Dword), "INTC_INTPRI00")
        );
        assert_eq!(symbol_width("A"), (Some(ItemWidth::Dword), "A"));
    }

    #[test]
    fn reads_the_sh7750_section() {
        let ports = read_ioports("SH7750").unwrap();
        assert_eq!(ports.len(), 14);
        let iprd = ports.iter().find(|p| p.name == "INTC_IPRD_W").unwrap();
        assert_eq!(iprd.address, 0xFFD00010);
        assert_eq!(iprd.comment, "Interrupt priority register D");
        // entries from the SH7705 section must not leak in
        assert!(!ports.iter().any(|p| p.address == 0xFFFFFE92));
    }

    #[test]
    fn unknown_device_is_an_error() {
        let err = read_ioports("SH7099").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnknownDevice { device } if device == "SH7099"
        ));
    }

    #[test]
    fn malformed_entries_name_the_line() {
        let text = ".SH7750\nSOLO\n";
        let err = parse_ioports(text, "SH7750").unwrap_err();
        match err {
            LoaderError::PortConfig { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }

        let text = ".SH7750\nFOO notahex comment\n";
        assert!(parse_ioports(text, "SH7750").is_err());
    }
}
