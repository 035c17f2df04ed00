// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! For walking a FLAC file's chain of metadata blocks
//!
//! ```text
//! ┌──────────┬────────┬┄┄┄┄┄┄┄┄┬┄┄┄┬────────┬┄┄┄┄┄┄┄┄┬┄┄┄╮
//! │ FLAC Tag │ Block₀ │ Block₁ ┆ … ┆ Frame₀ │ Frame₁ ┆ … ┆ FLAC File
//! └──────────┼────────┼┄┄┄┄┄┄┄┄┴┄┄┄┴────────┴┄┄┄┄┄┄┄┄┴┄┄┄╯
//! ╭──────────╯        ╰────────────────────────╮
//! ├──────────────┬─────────────────────────────┤
//! │ Block Header │     Metadata Block Data     │           Metadata Block
//! └──────────────┴─────────────────────────────┘
//! ```

use crate::Error;
use crate::metadata::{BlockHeader, BlockType};
use crate::stream::{read_fixed_or_eof, stream_len};
use log::trace;
use std::io::{Read, Seek, SeekFrom};

/// A block located by the scanner
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScannedBlock {
    /// The block's position in the chain, starting from 0
    pub index: usize,
    /// Absolute offset of the block's header
    pub offset: u64,
    /// The block's decoded header
    pub header: BlockHeader,
}

impl ScannedBlock {
    /// Absolute offset of the block's contents
    pub fn payload_offset(&self) -> u64 {
        self.offset + u64::from(BlockHeader::SIZE)
    }

    /// Absolute offset one past the block's final byte
    pub fn end_offset(&self) -> u64 {
        self.payload_offset() + u64::from(self.header.size)
    }
}

/// An iterator over FLAC metadata block headers
///
/// Each yielded block leaves the stream positioned
/// at the start of that block's contents,
/// which the caller is free to read (or not).
/// The following call to `next` seeks past the contents
/// regardless of how much of them were consumed.
///
/// Iteration ends after the block marked as last,
/// or after the first error.
pub struct BlockScanner<S> {
    stream: S,
    stream_len: Option<u64>,
    next: Option<u64>,
    index: usize,
    finished: bool,
}

impl<S: Read + Seek> BlockScanner<S> {
    /// Scans blocks starting at the stream's current position,
    /// which should be just after the "fLaC" tag
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            stream_len: None,
            next: None,
            index: 0,
            finished: false,
        }
    }

    /// Returns mutable reference to the underlying stream
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    fn scan_block(&mut self) -> Result<ScannedBlock, Error> {
        let len = match self.stream_len {
            Some(len) => len,
            None => *self.stream_len.insert(stream_len(&mut self.stream)?),
        };

        let offset = match self.next {
            Some(next) => self.stream.seek(SeekFrom::Start(next))?,
            None => self.stream.stream_position()?,
        };

        let header = read_fixed_or_eof::<4, _>(&mut self.stream)?
            .ok_or(Error::UnterminatedBlockChain)
            .and_then(BlockHeader::decode)?;

        let block = ScannedBlock {
            index: self.index,
            offset,
            header,
        };

        if block.end_offset() > len {
            return Err(Error::TruncatedStream);
        }

        trace!(
            "{} block #{} at {} ({} bytes)",
            header.block_type,
            block.index,
            offset,
            header.size,
        );

        self.index += 1;
        self.next = Some(block.end_offset());
        self.finished = header.last;

        Ok(block)
    }
}

impl<S: Read + Seek> Iterator for BlockScanner<S> {
    type Item = Result<ScannedBlock, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let block = self.scan_block();
        if block.is_err() {
            // once we hit an error, stop any further reads
            self.finished = true;
        }
        Some(block)
    }
}

/// Returns iterator of block headers from the given stream
///
/// The stream should be positioned just after the "fLaC" tag.
pub fn scan_blocks<S: Read + Seek>(stream: S) -> BlockScanner<S> {
    BlockScanner::new(stream)
}

/// Finds the first block of the given type
///
/// On success, the stream is left positioned
/// at the start of that block's contents.
/// Returns `None` if no such block exists,
/// in which case the stream is left just past the final block.
pub fn find_block<S: Read + Seek + ?Sized>(
    stream: &mut S,
    block_type: BlockType,
) -> Result<Option<ScannedBlock>, Error> {
    let mut scanner = BlockScanner::new(stream);

    for block in scanner.by_ref() {
        let block = block?;
        if block.header.block_type == block_type {
            return Ok(Some(block));
        }
    }

    // leave the stream at the end of the metadata blocks
    if let Some(next) = scanner.next {
        scanner.stream.seek(SeekFrom::Start(next))?;
    }
    Ok(None)
}
