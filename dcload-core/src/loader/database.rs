//! Analysis Database Seam
//!
//! The loader writes its annotations through the [`AnalysisHost`] trait: the
//! segment/item/name/comment surface of whatever analysis database owns the
//! address space. [`AnalysisDatabase`] is the in-memory implementation used
//! by the CLI and by tests; a disassembler host would provide its own.

use std::collections::BTreeMap;

use serde::Serialize;

use super::analysis::AnalysisOptions;
use super::error::LoaderError;
use super::registers::{ItemWidth, SegmentClass};

/// Name flag bits, mirroring the host call sites.
pub mod name_flags {
    /// Name is visible outside its segment
    pub const PUBLIC: u32 = 0x0001;
    /// Name was produced by analysis, not the user
    pub const AUTO: u32 = 0x0002;
    /// Do not warn about replacing an existing name
    pub const NOWARN: u32 = 0x0004;
}

/// Host capability the loader annotates through.
pub trait AnalysisHost {
    /// Select the target processor module.
    fn set_processor(&mut self, name: &str);

    /// Create a named, classed segment over `[start, end)`.
    fn add_segment(
        &mut self,
        start: u32,
        end: u32,
        name: &str,
        class: SegmentClass,
    ) -> Result<(), LoaderError>;

    /// Mark a typed item at `address`.
    fn create_item(&mut self, address: u32, width: ItemWidth);

    /// Name `address`. Later calls replace earlier names.
    fn set_name(&mut self, address: u32, name: &str, flags: u32);

    /// Attach a comment to `address`.
    fn set_comment(&mut self, address: u32, comment: &str);

    /// Map file bytes into `[start, end)` of an existing segment.
    fn map_file_bytes(
        &mut self,
        file_offset: u64,
        start: u32,
        end: u32,
        patchable: bool,
        data: &[u8],
    ) -> Result<(), LoaderError>;

    /// Write the two global auto-analysis option words.
    fn set_analysis_options(&mut self, options: AnalysisOptions);
}

/// A named, classed address range.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub name: String,
    pub class: SegmentClass,
    pub start: u32,
    pub end: u32,
}

impl Segment {
    fn overlaps(&self, start: u32, end: u32) -> bool {
        start < self.end && self.start < end
    }
}

/// A name applied at an address.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolName {
    pub name: String,
    pub flags: u32,
}

/// A range of file bytes mapped into the address space.
#[derive(Debug, Clone, Serialize)]
pub struct MappedRegion {
    pub file_offset: u64,
    pub start: u32,
    pub end: u32,
    pub patchable: bool,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// In-memory model of the annotated address space.
#[derive(Debug, Default, Serialize)]
pub struct AnalysisDatabase {
    processor: Option<String>,
    segments: Vec<Segment>,
    items: BTreeMap<u32, ItemWidth>,
    names: BTreeMap<u32, SymbolName>,
    comments: BTreeMap<u32, String>,
    mapped: Vec<MappedRegion>,
    analysis: Option<AnalysisOptions>,
}

impl AnalysisDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processor(&self) -> Option<&str> {
        self.processor.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    pub fn item_at(&self, address: u32) -> Option<ItemWidth> {
        self.items.get(&address).copied()
    }

    pub fn name_at(&self, address: u32) -> Option<&str> {
        self.names.get(&address).map(|n| n.name.as_str())
    }

    pub fn name_entry(&self, address: u32) -> Option<&SymbolName> {
        self.names.get(&address)
    }

    pub fn comment_at(&self, address: u32) -> Option<&str> {
        self.comments.get(&address).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = (u32, &SymbolName)> {
        self.names.iter().map(|(addr, name)| (*addr, name))
    }

    pub fn mapped_regions(&self) -> &[MappedRegion] {
        &self.mapped
    }

    pub fn analysis_options(&self) -> Option<AnalysisOptions> {
        self.analysis
    }

    /// Pretty-printed JSON snapshot of the annotations (mapped bytes elided).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl AnalysisHost for AnalysisDatabase {
    fn set_processor(&mut self, name: &str) {
        self.processor = Some(name.to_string());
    }

    fn add_segment(
        &mut self,
        start: u32,
        end: u32,
        name: &str,
        class: SegmentClass,
    ) -> Result<(), LoaderError> {
        if end <= start || self.segments.iter().any(|s| s.overlaps(start, end)) {
            return Err(LoaderError::SegmentConflict {
                name: name.to_string(),
                start,
                end,
            });
        }
        self.segments.push(Segment {
            name: name.to_string(),
            class,
            start,
            end,
        });
        Ok(())
    }

    fn create_item(&mut self, address: u32, width: ItemWidth) {
        self.items.insert(address, width);
    }

    fn set_name(&mut self, address: u32, name: &str, flags: u32) {
        self.names.insert(
            address,
            SymbolName {
                name: name.to_string(),
                flags,
            },
        );
    }

    fn set_comment(&mut self, address: u32, comment: &str) {
        self.comments.insert(address, comment.to_string());
    }

    fn map_file_bytes(
        &mut self,
        file_offset: u64,
        start: u32,
        end: u32,
        patchable: bool,
        data: &[u8],
    ) -> Result<(), LoaderError> {
        let fits = self
            .segments
            .iter()
            .any(|s| s.start <= start && end <= s.end);
        if !fits || data.len() as u64 != u64::from(end - start) {
            return Err(LoaderError::MappingOutOfRange { start, end });
        }
        self.mapped.push(MappedRegion {
            file_offset,
            start,
            end,
            patchable,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn set_analysis_options(&mut self, options: AnalysisOptions) {
        self.analysis = Some(options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_segments_are_rejected() {
        let mut db = AnalysisDatabase::new();
        db.add_segment(0x1000, 0x2000, "A", SegmentClass::Data)
            .unwrap();
        let err = db
            .add_segment(0x1800, 0x2800, "B", SegmentClass::Data)
            .unwrap_err();
        assert!(matches!(err, LoaderError::SegmentConflict { .. }));
        // touching end-to-start is fine
        db.add_segment(0x2000, 0x3000, "C", SegmentClass::Bss)
            .unwrap();
        assert_eq!(db.segments().len(), 2);
    }

    #[test]
    fn mapping_must_fit_a_segment() {
        let mut db = AnalysisDatabase::new();
        db.add_segment(0x1000, 0x2000, "A", SegmentClass::Data)
            .unwrap();
        let bytes = vec![0xAA; 0x800];
        db.map_file_bytes(0, 0x1000, 0x1800, true, &bytes).unwrap();
        assert!(db
            .map_file_bytes(0, 0x1C00, 0x2400, true, &vec![0; 0x800])
            .is_err());
        assert_eq!(db.mapped_regions().len(), 1);
        assert_eq!(db.mapped_regions()[0].data.len(), 0x800);
    }

    #[test]
    fn later_names_replace_earlier_ones() {
        let mut db = AnalysisDatabase::new();
        db.set_name(0x10, "first", name_flags::PUBLIC);
        db.set_name(0x10, "second", name_flags::NOWARN);
        assert_eq!(db.name_at(0x10), Some("second"));
        assert_eq!(db.name_entry(0x10).unwrap().flags, name_flags::NOWARN);
    }
}
