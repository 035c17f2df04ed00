// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! For locating the VORBIS_COMMENT block and its neighboring PADDING

use crate::Error;
use crate::metadata::{BlockHeader, BlockSize, BlockType};
use crate::scan::{BlockScanner, ScannedBlock};
use crate::stream::preserve_position;
use std::io::{Read, Seek};

/// Where a single metadata block sits in the file
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Extent {
    /// The block's position in the chain
    pub index: usize,
    /// Absolute offset of the block's header
    pub offset: u64,
    /// Whether the block is the final metadata block
    pub last: bool,
    /// Size of the block's contents, in bytes
    pub size: BlockSize,
}

impl Extent {
    /// Absolute offset of the block's contents
    pub fn payload_offset(&self) -> u64 {
        self.offset + u64::from(BlockHeader::SIZE)
    }
}

impl From<ScannedBlock> for Extent {
    fn from(block: ScannedBlock) -> Self {
        Self {
            index: block.index,
            offset: block.offset,
            last: block.header.last,
            size: block.header.size,
        }
    }
}

/// The placement of a file's comment block and reclaimable padding
///
/// `padding` is only populated when the PADDING block
/// directly follows the VORBIS_COMMENT block,
/// since padding anywhere else can't be reclaimed
/// without also moving the blocks in between.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Layout {
    /// The first VORBIS_COMMENT block, if any
    pub comment: Option<Extent>,
    /// The PADDING block immediately after `comment`, if any
    pub padding: Option<Extent>,
}

impl Layout {
    /// Whether a comment of `new_size` bytes can be written
    /// by resizing the adjacent padding block
    ///
    /// The padding must keep more than its own header's
    /// worth of bytes once the comment has grown into it.
    pub fn padding_fits(&self, new_size: u32) -> bool {
        match (self.comment, self.padding) {
            (Some(comment), Some(padding)) => {
                i64::from(new_size)
                    < i64::from(comment.size.get()) + i64::from(padding.size.get())
                        - i64::from(BlockHeader::SIZE)
            }
            _ => false,
        }
    }
}

/// Locates the comment block and any padding block that follows it
///
/// Scanning starts at the stream's current position,
/// which should be just after the "fLaC" tag,
/// and the stream is returned to that position afterward.
///
/// # Errors
///
/// Returns an error if the block chain is malformed
/// or any I/O error occurs.
pub fn find_layout<S: Read + Seek + ?Sized>(stream: &mut S) -> Result<Layout, Error> {
    preserve_position(stream, |stream| {
        let mut layout = Layout::default();

        for block in BlockScanner::new(stream) {
            let block = block?;

            match (block.header.block_type, layout.comment) {
                (BlockType::VorbisComment, None) => {
                    layout.comment = Some(block.into());
                }
                (BlockType::Padding, Some(comment)) if block.index == comment.index + 1 => {
                    layout.padding = Some(block.into());
                    break;
                }
                _ => { /* not relevant */ }
            }
        }

        Ok(layout)
    })
}
