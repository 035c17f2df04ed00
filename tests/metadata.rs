use flac_retag::Error;
use flac_retag::metadata::{BlockHeader, BlockSize, BlockType};

#[test]
fn test_header_decode() {
    assert_eq!(
        BlockHeader::decode([0x84, 0x00, 0x01, 0x2C]).unwrap(),
        BlockHeader {
            last: true,
            block_type: BlockType::VorbisComment,
            size: BlockSize::from(300u16),
        }
    );

    assert_eq!(
        BlockHeader::decode([0x01, 0xFF, 0xFF, 0xFF]).unwrap(),
        BlockHeader {
            last: false,
            block_type: BlockType::Padding,
            size: BlockSize::try_from(BlockSize::MAX).unwrap(),
        }
    );

    assert_eq!(
        BlockHeader::decode([0xFF, 0x00, 0x00, 0x00]).unwrap(),
        BlockHeader {
            last: true,
            block_type: BlockType::Other(127),
            size: BlockSize::from(0u8),
        }
    );
}

#[test]
fn test_header_roundtrip() {
    for _ in 0..1000 {
        let header = BlockHeader {
            last: fastrand::bool(),
            block_type: BlockType::from(fastrand::u8(0..128)),
            size: BlockSize::try_from(fastrand::u32(0..=BlockSize::MAX)).unwrap(),
        };

        let bytes = header.encode().unwrap();
        assert_eq!(bytes[0] & 0x80 != 0, header.last);
        assert_eq!(bytes[0] & 0x7F, u8::from(header.block_type));
        assert_eq!(&bytes[1..], &header.size.to_be_bytes());
        assert_eq!(BlockHeader::decode(bytes).unwrap(), header);
    }
}

#[test]
fn test_block_types() {
    for tag in 0..128 {
        assert_eq!(u8::from(BlockType::from(tag)), tag);
    }

    // the last-block flag is never part of the type
    assert_eq!(BlockType::from(0x84), BlockType::VorbisComment);
    assert_eq!(BlockType::from(0x86), BlockType::Picture);

    assert_eq!(BlockType::VorbisComment.to_string(), "VORBIS_COMMENT");
    assert_eq!(BlockType::Other(9).to_string(), "RESERVED(9)");
}

#[test]
fn test_block_size() {
    assert!(BlockSize::try_from(16_777_215usize).is_ok());
    assert!(BlockSize::try_from(16_777_216usize).is_err());
    assert!(BlockSize::try_from(u64::MAX).is_err());

    assert_eq!(
        BlockSize::try_from(0x123456u32).unwrap().to_be_bytes(),
        [0x12, 0x34, 0x56]
    );

    let max = BlockSize::try_from(BlockSize::MAX).unwrap();
    assert_eq!(max.checked_add(BlockSize::from(1u8)), None);
    assert_eq!(BlockSize::from(0u8).checked_sub(BlockSize::from(1u8)), None);
    assert_eq!(
        BlockSize::from(10u8).checked_sub(BlockSize::from(4u8)),
        Some(BlockSize::from(6u8))
    );

    assert!(matches!(
        Error::from(BlockSize::try_from(1usize << 24).unwrap_err()),
        Error::ExcessiveBlockSize
    ));
}
