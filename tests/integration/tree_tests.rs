//! Container and directory tree tests.
//!
//! Tests verify:
//! - Little-endian and big-endian files parse into the same tree
//! - The header magic is an allow-list
//! - IFD chains of any length are collected in order
//! - Out-of-bounds offsets, cycles and limit breaches are rejected

use rawprobe::{
    parse_tiff, parse_tiff_with_limits, probe, probe_with_limits, ByteOrder, ErrorKind,
    ParseLimits, ProbeError, TiffError, TiffMagic, TiffTag,
};

use super::test_utils::{patch_u32, IfdBuilder, TiffBuilder, TAG_EXIF_IFD};

fn sample_ifd() -> IfdBuilder {
    IfdBuilder::new()
        .short(256, &[4000])
        .long(257, &[3000])
        .make("NIKON CORPORATION")
        .model("NIKON D850")
        .sub_ifd(IfdBuilder::new().short(259, &[7]).long(273, &[0, 0]))
}

// =============================================================================
// Byte Order Tests
// =============================================================================

#[test]
fn test_little_and_big_endian_trees_match() {
    let le = TiffBuilder::new()
        .with_byte_order(ByteOrder::LittleEndian)
        .add_ifd(sample_ifd())
        .add_ifd(IfdBuilder::new().short(254, &[1]))
        .build();
    let be = TiffBuilder::new()
        .with_byte_order(ByteOrder::BigEndian)
        .add_ifd(sample_ifd())
        .add_ifd(IfdBuilder::new().short(254, &[1]))
        .build();

    assert_eq!(&le[..2], b"II");
    assert_eq!(&be[..2], b"MM");

    let le_root = parse_tiff(&le).unwrap();
    let be_root = parse_tiff(&be).unwrap();
    assert_eq!(le_root.byte_order(), ByteOrder::LittleEndian);
    assert_eq!(be_root.byte_order(), ByteOrder::BigEndian);
    assert_eq!(le_root.ifds().len(), be_root.ifds().len());
    assert_eq!(le_root.total_ifd_count(), be_root.total_ifd_count());

    for (a, b) in le_root.ifds().iter().zip(be_root.ifds()) {
        let tags_a: Vec<u16> = a.entries().iter().map(|e| e.tag).collect();
        let tags_b: Vec<u16> = b.entries().iter().map(|e| e.tag).collect();
        assert_eq!(tags_a, tags_b);
        assert_eq!(a.sub_ifds().len(), b.sub_ifds().len());
    }

    let width = |root: &rawprobe::TiffRootIfd<'_>| {
        root.ifds()[0]
            .entry(TiffTag::ImageWidth)
            .unwrap()
            .get_u32(0)
            .unwrap()
    };
    assert_eq!(width(&le_root), 4000);
    assert_eq!(width(&be_root), 4000);

    let le_kind = probe(&le).unwrap().kind();
    let be_kind = probe(&be).unwrap().kind();
    assert_eq!(le_kind, be_kind);
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_magic_allow_list() {
    for (magic, expected) in [
        (42, TiffMagic::Standard),
        (0x4F52, TiffMagic::OlympusRo),
        (0x5352, TiffMagic::OlympusRs),
        (0x0055, TiffMagic::Panasonic),
    ] {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let data = TiffBuilder::new()
                .with_byte_order(order)
                .with_magic(magic)
                .add_ifd(IfdBuilder::new().make("SONY"))
                .build();
            let root = parse_tiff(&data).unwrap();
            assert_eq!(root.magic(), expected);
        }
    }

    for magic in [0u16, 1, 41, 43, 0x55AA, 0xFFFF] {
        let data = TiffBuilder::new()
            .with_magic(magic)
            .add_ifd(IfdBuilder::new().make("SONY"))
            .build();
        let err = probe(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContainer, "magic {}", magic);
    }
}

#[test]
fn test_bad_byte_order_marker() {
    let mut data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY"))
        .build();
    data[0] = b'M';
    data[1] = b'I';

    assert!(matches!(
        probe(&data),
        Err(ProbeError::MalformedContainer { .. })
    ));
}

#[test]
fn test_short_buffers() {
    for len in 0..8 {
        let data = &b"II\x2a\x00\x08\x00\x00\x00"[..len];
        assert!(
            matches!(probe(data), Err(ProbeError::MalformedContainer { .. })),
            "length {}",
            len
        );
    }
}

// =============================================================================
// Chain Tests
// =============================================================================

#[test]
fn test_chain_length() {
    for k in 1..=6u16 {
        let mut builder = TiffBuilder::new();
        for i in 0..k {
            builder = builder.add_ifd(IfdBuilder::new().short(254, &[i]));
        }
        let (data, layout) = builder.build_with_layout();

        let root = parse_tiff(&data).unwrap();
        assert_eq!(root.ifds().len(), k as usize);
        assert_eq!(root.total_ifd_count(), k as usize);

        for (i, ifd) in root.ifds().iter().enumerate() {
            assert_eq!(ifd.offset(), layout.ifd_offsets[i]);
            let value = ifd.entry(TiffTag::NewSubfileType).unwrap().get_u16(0).unwrap();
            assert_eq!(value, i as u16);
        }
        assert_eq!(root.ifds().last().unwrap().next_ifd(), 0);
    }
}

#[test]
fn test_empty_chain() {
    let data = b"II\x2a\x00\x00\x00\x00\x00";
    let root = parse_tiff(data).unwrap();
    assert!(root.ifds().is_empty());

    // Nothing to route on
    assert_eq!(probe(data).unwrap_err(), ProbeError::NoDecoderMatched);
}

// =============================================================================
// Bounds Tests
// =============================================================================

#[test]
fn test_first_offset_out_of_bounds() {
    let mut data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY"))
        .build();
    let len = data.len() as u32;
    patch_u32(&mut data, 4, len + 100, ByteOrder::LittleEndian);

    let err = probe(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDirectory);
    assert_eq!(err.stage(), "directory");
}

#[test]
fn test_next_offset_out_of_bounds() {
    let (mut data, layout) = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY"))
        .build_with_layout();
    patch_u32(
        &mut data,
        layout.next_pointer_positions[0],
        0xFFFF_FFF0,
        ByteOrder::LittleEndian,
    );

    assert!(matches!(
        parse_tiff(&data),
        Err(TiffError::InvalidIfdOffset(_))
    ));
    assert_eq!(probe(&data).unwrap_err().kind(), ErrorKind::MalformedDirectory);
}

#[test]
fn test_truncated_entry_table() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().short(256, &[1]).short(257, &[1]))
        .build();

    // Drop the next pointer and half of the last entry
    let truncated = &data[..data.len() - 10];
    assert!(matches!(
        parse_tiff(truncated),
        Err(TiffError::TruncatedIfd { .. })
    ));
    assert_eq!(
        probe(truncated).unwrap_err().kind(),
        ErrorKind::MalformedDirectory
    );
}

#[test]
fn test_value_offset_out_of_bounds() {
    // ASCII value of 64 bytes at an offset past the end
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().raw(271, 2, 64, 0x0001_0000))
        .build();

    assert!(matches!(
        parse_tiff(&data),
        Err(TiffError::TruncatedValue { tag: 271, .. })
    ));
    assert_eq!(probe(&data).unwrap_err().kind(), ErrorKind::MalformedDirectory);
}

#[test]
fn test_unknown_field_type() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().raw(271, 99, 1, 0))
        .build();

    assert!(matches!(
        parse_tiff(&data),
        Err(TiffError::UnknownFieldType {
            tag: 271,
            field_type: 99
        })
    ));
}

// =============================================================================
// Cycle and Limit Tests
// =============================================================================

#[test]
fn test_chain_cycle() {
    let (mut data, layout) = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY"))
        .add_ifd(IfdBuilder::new().short(254, &[1]))
        .build_with_layout();
    // Second IFD points back at the first
    patch_u32(
        &mut data,
        layout.next_pointer_positions[1],
        layout.ifd_offsets[0],
        ByteOrder::LittleEndian,
    );

    assert!(matches!(parse_tiff(&data), Err(TiffError::IfdCycle(_))));
    assert_eq!(probe(&data).unwrap_err().kind(), ErrorKind::MalformedDirectory);
}

#[test]
fn test_self_referencing_next_pointer() {
    let (mut data, layout) = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY"))
        .build_with_layout();
    patch_u32(
        &mut data,
        layout.next_pointer_positions[0],
        layout.ifd_offsets[0],
        ByteOrder::LittleEndian,
    );

    assert_eq!(probe(&data).unwrap_err().kind(), ErrorKind::MalformedDirectory);
}

#[test]
fn test_self_referencing_sub_ifd() {
    // The only IFD is at offset 8; its Exif pointer names itself
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY").raw(TAG_EXIF_IFD, 4, 1, 8))
        .build();

    assert!(matches!(parse_tiff(&data), Err(TiffError::IfdCycle(8))));
    assert_eq!(probe(&data).unwrap_err().kind(), ErrorKind::MalformedDirectory);
}

#[test]
fn test_sub_ifd_depth_limit() {
    let nested = IfdBuilder::new().make("SONY").sub_ifd(
        IfdBuilder::new()
            .short(254, &[1])
            .sub_ifd(IfdBuilder::new().short(254, &[2])),
    );
    let data = TiffBuilder::new().add_ifd(nested).build();

    let root = parse_tiff(&data).unwrap();
    assert_eq!(root.total_ifd_count(), 3);

    let shallow = ParseLimits {
        max_sub_ifd_depth: 1,
        ..ParseLimits::default()
    };
    assert!(matches!(
        parse_tiff_with_limits(&data, &shallow),
        Err(TiffError::SubIfdTooDeep(1))
    ));
    assert_eq!(
        probe_with_limits(&data, &shallow).unwrap_err().kind(),
        ErrorKind::MalformedDirectory
    );
}

#[test]
fn test_ifd_count_limit() {
    let mut builder = TiffBuilder::new();
    for _ in 0..5 {
        builder = builder.add_ifd(IfdBuilder::new().make("SONY"));
    }
    let data = builder.build();

    let limits = ParseLimits {
        max_ifds: 4,
        ..ParseLimits::default()
    };
    assert!(matches!(
        parse_tiff_with_limits(&data, &limits),
        Err(TiffError::TooManyIfds(4))
    ));

    let limits = ParseLimits {
        max_ifds: 5,
        ..ParseLimits::default()
    };
    assert_eq!(parse_tiff_with_limits(&data, &limits).unwrap().ifds().len(), 5);
}

// =============================================================================
// Sub-IFD Tests
// =============================================================================

#[test]
fn test_sub_ifds_are_owned_by_parent() {
    let data = TiffBuilder::new()
        .add_ifd(
            IfdBuilder::new()
                .make("SONY")
                .sub_ifd(IfdBuilder::new().short(254, &[1]))
                .sub_ifd(IfdBuilder::new().short(254, &[2])),
        )
        .build();

    let root = parse_tiff(&data).unwrap();
    assert_eq!(root.ifds().len(), 1);
    let children = root.ifds()[0].sub_ifds();
    assert_eq!(children.len(), 2);
    assert_eq!(
        children[1]
            .entry(TiffTag::NewSubfileType)
            .unwrap()
            .get_u16(0)
            .unwrap(),
        2
    );
    assert_eq!(root.total_ifd_count(), 3);
}

#[test]
fn test_null_sub_ifd_pointer_is_skipped() {
    let data = TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make("SONY").raw(TAG_EXIF_IFD, 4, 1, 0))
        .build();

    let root = parse_tiff(&data).unwrap();
    assert!(root.ifds()[0].sub_ifds().is_empty());
}
