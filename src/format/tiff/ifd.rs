//! IFD tree construction.
//!
//! The top-level IFDs form a singly linked chain starting at the header's
//! first offset. Entries tagged as sub-IFD pointers lead to child IFDs,
//! which are parsed recursively and owned by their parent.
//!
//! Offsets come from the file and are never trusted: every IFD and value is
//! bounds-checked, every IFD offset may be visited only once across the
//! whole walk, and the number and nesting depth of IFDs are capped by
//! [`ParseLimits`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::TiffError;
use crate::io::{checked_slice, ByteCursor, ByteOrder};

use super::entry::{IfdEntry, IFD_ENTRY_SIZE};
use super::parser::{TiffHeader, TiffMagic};
use super::tags::{FieldType, TiffTag};

/// Default cap on the total number of IFDs in a file.
pub const DEFAULT_MAX_IFDS: usize = 100;

/// Default cap on sub-IFD nesting below a top-level IFD.
pub const DEFAULT_MAX_SUB_IFD_DEPTH: usize = 10;

// =============================================================================
// ParseLimits
// =============================================================================

/// Resource limits for walking an untrusted IFD structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum number of IFDs, top-level and nested together
    pub max_ifds: usize,

    /// Maximum nesting depth of sub-IFDs (top-level IFDs are depth 0)
    pub max_sub_ifd_depth: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_ifds: DEFAULT_MAX_IFDS,
            max_sub_ifd_depth: DEFAULT_MAX_SUB_IFD_DEPTH,
        }
    }
}

// =============================================================================
// Ifd
// =============================================================================

/// One Image File Directory and the sub-IFDs reached from its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd<'a> {
    offset: u32,
    entries: Vec<IfdEntry<'a>>,
    sub_ifds: Vec<Ifd<'a>>,
    next_ifd: u32,
}

impl<'a> Ifd<'a> {
    /// Offset of this IFD in the buffer.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Entries in file order. Duplicate tags are kept.
    #[inline]
    pub fn entries(&self) -> &[IfdEntry<'a>] {
        &self.entries
    }

    /// Child IFDs in the order their pointers appear.
    #[inline]
    pub fn sub_ifds(&self) -> &[Ifd<'a>] {
        &self.sub_ifds
    }

    /// Stored offset of the next IFD. Only followed for top-level IFDs.
    #[inline]
    pub fn next_ifd(&self) -> u32 {
        self.next_ifd
    }

    /// First entry with the given tag in this IFD.
    pub fn entry(&self, tag: TiffTag) -> Option<&IfdEntry<'a>> {
        self.entries.iter().find(|e| e.tag == tag.as_u16())
    }

    pub fn has_entry(&self, tag: TiffTag) -> bool {
        self.entry(tag).is_some()
    }

    /// Depth-first search: own entries first, then each child in order.
    pub fn entry_recursive(&self, tag: TiffTag) -> Option<&IfdEntry<'a>> {
        self.entry(tag)
            .or_else(|| self.sub_ifds.iter().find_map(|ifd| ifd.entry_recursive(tag)))
    }

    pub fn has_entry_recursive(&self, tag: TiffTag) -> bool {
        self.entry_recursive(tag).is_some()
    }

    /// Collect this IFD and its descendants holding `tag`, in document order.
    fn collect_with_tag<'s>(&'s self, tag: TiffTag, out: &mut Vec<&'s Ifd<'a>>) {
        if self.has_entry(tag) {
            out.push(self);
        }
        for ifd in &self.sub_ifds {
            ifd.collect_with_tag(tag, out);
        }
    }

    /// Number of IFDs in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.sub_ifds.iter().map(Ifd::subtree_len).sum::<usize>()
    }
}

// =============================================================================
// TiffRootIfd
// =============================================================================

/// Root of a parsed directory tree.
///
/// The root carries no entries of its own; it owns the top-level IFDs in
/// chain order together with the header they were read with. Entries
/// borrow from the buffer, so the root cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffRootIfd<'a> {
    header: TiffHeader,
    ifds: Vec<Ifd<'a>>,
}

impl<'a> TiffRootIfd<'a> {
    #[inline]
    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    #[inline]
    pub fn magic(&self) -> TiffMagic {
        self.header.magic
    }

    /// Top-level IFDs in chain order.
    #[inline]
    pub fn ifds(&self) -> &[Ifd<'a>] {
        &self.ifds
    }

    /// Number of IFDs in the whole tree.
    pub fn total_ifd_count(&self) -> usize {
        self.ifds.iter().map(Ifd::subtree_len).sum()
    }

    /// First entry with `tag` anywhere in the tree, depth-first.
    pub fn entry_recursive(&self, tag: TiffTag) -> Option<&IfdEntry<'a>> {
        self.ifds.iter().find_map(|ifd| ifd.entry_recursive(tag))
    }

    pub fn has_entry_recursive(&self, tag: TiffTag) -> bool {
        self.entry_recursive(tag).is_some()
    }

    /// The IFD that names the camera: the first top-level IFD holding Make.
    ///
    /// Sub-IFDs are not searched, so a Make nested under an earlier IFD
    /// never shadows a later top-level one.
    pub fn camera_ifd(&self) -> Option<&Ifd<'a>> {
        self.ifds.iter().find(|ifd| ifd.has_entry(TiffTag::Make))
    }

    /// Every IFD in the tree holding `tag`, in document order.
    pub fn ifds_with_tag(&self, tag: TiffTag) -> Vec<&Ifd<'a>> {
        let mut found = Vec::new();
        for ifd in &self.ifds {
            ifd.collect_with_tag(tag, &mut found);
        }
        found
    }
}

// =============================================================================
// Tree Builder
// =============================================================================

/// Parse the header and the whole IFD tree with default limits.
pub fn parse_tiff(data: &[u8]) -> Result<TiffRootIfd<'_>, TiffError> {
    parse_tiff_with_limits(data, &ParseLimits::default())
}

/// Parse the header and the whole IFD tree.
///
/// Any out-of-bounds offset, truncated IFD, revisited offset or limit breach
/// aborts the build; no partial tree is returned.
pub fn parse_tiff_with_limits<'a>(
    data: &'a [u8],
    limits: &ParseLimits,
) -> Result<TiffRootIfd<'a>, TiffError> {
    let header = TiffHeader::parse(data)?;
    let mut walker = IfdWalker::new(data, header.byte_order, limits);

    let mut ifds = Vec::new();
    let mut next = header.first_ifd_offset;
    while next != 0 {
        let ifd = walker.parse_ifd(next, 0)?;
        next = ifd.next_ifd;
        ifds.push(ifd);
    }

    debug!(
        "Parsed {} top-level IFD(s), {} in total",
        ifds.len(),
        walker.parsed
    );

    Ok(TiffRootIfd { header, ifds })
}

/// State shared across one tree walk.
struct IfdWalker<'a, 'l> {
    data: &'a [u8],
    byte_order: ByteOrder,
    limits: &'l ParseLimits,
    visited: HashSet<u32>,
    parsed: usize,
}

impl<'a, 'l> IfdWalker<'a, 'l> {
    fn new(data: &'a [u8], byte_order: ByteOrder, limits: &'l ParseLimits) -> Self {
        Self {
            data,
            byte_order,
            limits,
            visited: HashSet::new(),
            parsed: 0,
        }
    }

    fn parse_ifd(&mut self, offset: u32, depth: usize) -> Result<Ifd<'a>, TiffError> {
        if depth > self.limits.max_sub_ifd_depth {
            return Err(TiffError::SubIfdTooDeep(self.limits.max_sub_ifd_depth));
        }
        if self.parsed >= self.limits.max_ifds {
            return Err(TiffError::TooManyIfds(self.limits.max_ifds));
        }
        if !self.visited.insert(offset) {
            return Err(TiffError::IfdCycle(offset as u64));
        }
        self.parsed += 1;

        let mut cursor = ByteCursor::at(self.data, offset as u64, self.byte_order)
            .map_err(|_| TiffError::InvalidIfdOffset(offset as u64))?;
        let entry_count = cursor
            .read_u16()
            .map_err(|_| TiffError::InvalidIfdOffset(offset as u64))?;

        // Entry table and next pointer must fit before any entry is read
        let table_len = entry_count as u64 * IFD_ENTRY_SIZE + 4;
        if checked_slice(self.data, cursor.position() as u64, table_len).is_err() {
            return Err(TiffError::TruncatedIfd {
                offset: offset as u64,
                entries: entry_count,
            });
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        let mut sub_ifds = Vec::new();
        for _ in 0..entry_count {
            let entry = IfdEntry::parse(&mut cursor)?;
            if entry.known_tag().is_some_and(TiffTag::is_sub_ifd_pointer) {
                self.parse_children(&entry, depth, &mut sub_ifds)?;
            }
            entries.push(entry);
        }
        let next_ifd = cursor.read_u32()?;

        debug!(
            "IFD at {}: {} entries, {} sub-IFDs, depth {}, next {}",
            offset,
            entries.len(),
            sub_ifds.len(),
            depth,
            next_ifd
        );

        Ok(Ifd {
            offset,
            entries,
            sub_ifds,
            next_ifd,
        })
    }

    fn parse_children(
        &mut self,
        entry: &IfdEntry<'a>,
        depth: usize,
        sub_ifds: &mut Vec<Ifd<'a>>,
    ) -> Result<(), TiffError> {
        if !matches!(entry.field_type, FieldType::Long | FieldType::Ifd) {
            warn!(
                "Ignoring sub-IFD pointer tag {} with field type {:?}",
                entry.tag, entry.field_type
            );
            return Ok(());
        }

        for child_offset in entry.get_u32_array()? {
            // A zero pointer is a placeholder some writers leave behind
            if child_offset == 0 {
                debug!("Skipping null sub-IFD pointer in tag {}", entry.tag);
                continue;
            }
            sub_ifds.push(self.parse_ifd(child_offset, depth + 1)?);
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
