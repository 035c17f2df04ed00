// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! For replacing a FLAC file's VORBIS_COMMENT block in place

use crate::Error;
use crate::layout::{Extent, Layout, find_layout};
use crate::metadata::{BlockHeader, BlockSize, BlockType};
use crate::scan::find_block;
use crate::shift::{SetLen, shift_left, shift_right};
use crate::stream::{preserve_position, read_flac_tag, write_fully};
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom, Write};

pub use crate::shift::Options;

/// How a comment block was rewritten
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rewrite {
    /// The adjacent PADDING block was resized to absorb the difference,
    /// leaving the file's length unchanged
    Padded,
    /// Everything after the comment block was shifted
    /// to make room (or close the gap)
    Shifted,
}

/// Encodes a set of tags and writes them as the file's comment block
///
/// The stream should be positioned at the "fLaC" tag,
/// and is left just after it.
/// `encode` converts the tags to the VORBIS_COMMENT
/// block's contents.
///
/// # Errors
///
/// Returns [`Error::MissingFlacTag`] before anything is written
/// if the stream isn't a FLAC file,
/// or any error from [`rewrite_comment`].
pub fn write_flac_tags<F, E>(
    file: &mut F,
    fields: &BTreeMap<String, String>,
    encode: E,
) -> Result<Rewrite, Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
    E: FnOnce(&BTreeMap<String, String>) -> Vec<u8>,
{
    read_flac_tag(file)?;
    rewrite_comment(file, &encode(fields))
}

/// Replaces the contents of the file's comment block
///
/// The stream should be positioned just after the "fLaC" tag,
/// and is returned to that position afterward.
///
/// If the comment block is directly followed by a PADDING block
/// with enough space, the padding shrinks (or grows) to match
/// and nothing outside those two blocks is moved.
/// Otherwise, everything after the comment block is shifted
/// within the file to fit the new contents.
///
/// # Errors
///
/// Returns [`Error::ExcessiveBlockSize`] before anything is written
/// if `payload` doesn't fit in a metadata block,
/// [`Error::MissingVorbisComment`] if the file has no comment block
/// to replace, or any I/O error.
/// An error partway through a shift leaves the file corrupted.
pub fn rewrite_comment<F>(file: &mut F, payload: &[u8]) -> Result<Rewrite, Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
{
    rewrite_comment_with(file, payload, &Options::default())
}

/// Replaces the contents of the file's comment block using the given options
///
/// See [`rewrite_comment`] for details.
pub fn rewrite_comment_with<F>(
    file: &mut F,
    payload: &[u8],
    options: &Options,
) -> Result<Rewrite, Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
{
    let new_size = BlockSize::try_from(payload.len())?;

    preserve_position(file, |file| {
        let layout = find_layout(file)?;

        if let Layout {
            comment: Some(comment),
            padding: Some(padding),
        } = layout
            && layout.padding_fits(new_size.get())
            && let Some(padding_size) = resized_padding(comment, padding, new_size)
        {
            debug!(
                "rewriting {} byte comment as {} bytes, padding {} -> {}",
                comment.size, new_size, padding.size, padding_size,
            );
            write_padded(file, comment, padding, padding_size, payload, options)?;
            return Ok(Rewrite::Padded);
        }

        write_shifted(file, new_size, payload, options)?;
        Ok(Rewrite::Shifted)
    })
}

/// The padding's new size after the comment changes to `new_size`,
/// or `None` if it can't be represented
fn resized_padding(comment: Extent, padding: Extent, new_size: BlockSize) -> Option<BlockSize> {
    match new_size.cmp(&comment.size) {
        Ordering::Greater => padding.size.checked_sub(new_size.checked_sub(comment.size)?),
        Ordering::Less | Ordering::Equal => {
            padding.size.checked_add(comment.size.checked_sub(new_size)?)
        }
    }
}

/// Writes the new comment and relocated padding header,
/// keeping the two blocks' combined length unchanged
fn write_padded<F>(
    file: &mut F,
    comment: Extent,
    padding: Extent,
    padding_size: BlockSize,
    payload: &[u8],
    options: &Options,
) -> Result<(), Error>
where
    F: Write + Seek + ?Sized,
{
    let comment_header = BlockHeader {
        last: comment.last,
        block_type: BlockType::VorbisComment,
        size: BlockSize::try_from(payload.len())?,
    };
    let padding_header = BlockHeader {
        last: padding.last,
        block_type: BlockType::Padding,
        size: padding_size,
    };

    file.seek(SeekFrom::Start(comment.offset))?;
    write_fully(file, &comment_header.encode()?)?;
    write_fully(file, payload)?;
    write_fully(file, &padding_header.encode()?)?;

    // if the padding header moved backward, whatever sat
    // between it and the old padding contents is now padding
    let new_padding_start = file.stream_position()?;
    let old_padding_start = padding.payload_offset();
    if new_padding_start < old_padding_start {
        write_zeroes(file, old_padding_start - new_padding_start, options)?;
    }

    Ok(())
}

/// Rewrites the comment by shifting everything after it
fn write_shifted<F>(
    file: &mut F,
    new_size: BlockSize,
    payload: &[u8],
    options: &Options,
) -> Result<(), Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
{
    let comment = find_block(file, BlockType::VorbisComment)?.ok_or(Error::MissingVorbisComment)?;
    let old_size = comment.header.size;

    debug!(
        "rewriting {} byte comment at {} as {} bytes by shifting",
        old_size, comment.offset, new_size,
    );

    // the block's type and last flag stay as they are
    file.seek(SeekFrom::Start(comment.offset + 1))?;
    write_fully(file, &new_size.to_be_bytes())?;

    match new_size.cmp(&old_size) {
        Ordering::Less | Ordering::Equal => {
            write_fully(file, payload)?;
            match u64::from(old_size) - u64::from(new_size) {
                0 => Ok(()),
                surplus => shift_left(file, surplus, options),
            }
        }
        Ordering::Greater => {
            file.seek(SeekFrom::Start(comment.end_offset()))?;
            shift_right(file, u64::from(new_size) - u64::from(old_size), options)?;
            file.seek(SeekFrom::Start(comment.payload_offset()))?;
            write_fully(file, payload)
        }
    }
}

fn write_zeroes<W: Write + ?Sized>(w: &mut W, len: u64, options: &Options) -> Result<(), Error> {
    let zeroes = vec![0; options.buffer_size.min(len.try_into().unwrap_or(usize::MAX))];
    let mut remaining = len;

    while remaining > 0 {
        let chunk = remaining.min(zeroes.len() as u64) as usize;
        write_fully(w, &zeroes[0..chunk])?;
        remaining -= chunk as u64;
    }

    Ok(())
}
