// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A library for rewriting a FLAC file's VORBIS_COMMENT block in place
//!
//! FLAC files consist of a `fLaC` tag, a chain of metadata blocks
//! and then the encoded audio frames.
//! Replacing the comment block with one of a different size
//! either borrows space from an adjacent PADDING block or
//! shifts everything after the comment block forward or backward
//! within the same file.
//!
//! ```text
//! ┌──────────┬────────┬─────────┬─────────┬┄┄┄┬────────┬┄┄┄╮
//! │ FLAC Tag │ Block₀ │ COMMENT │ PADDING ┆ … ┆ Frame₀ ┆ … ┆
//! └──────────┴────────┴─────────┴─────────┴┄┄┄┴────────┴┄┄┄╯
//! ```
//!
//! No temporary file is used and the audio data is never
//! read into memory all at once.
//! The caller must have exclusive access to the file
//! for the duration of a write.

#![warn(missing_docs)]

pub mod layout;
pub mod metadata;
pub mod rewrite;
pub mod scan;
pub mod shift;
pub mod stream;
pub mod tags;

pub use rewrite::{Options, Rewrite, rewrite_comment, rewrite_comment_with, write_flac_tags};
pub use tags::{FileType, FlacTags, read_flac_tags};

/// A FLAC metadata error
#[derive(Debug)]
pub enum Error {
    /// A general I/O error from the underlying stream
    Io(std::io::Error),
    /// A UTF-8 formatting error
    Utf8(std::string::FromUtf8Error),
    /// A FLAC file missing its initial "fLaC" file tag
    MissingFlacTag,
    /// The block chain ended without a final block
    UnterminatedBlockChain,
    /// A fixed-size field was cut short by the end of the stream
    TruncatedStream,
    /// A block's contents did not match its declared size
    InvalidMetadataBlockSize,
    /// No VORBIS_COMMENT block to rewrite
    MissingVorbisComment,
    /// A block's contents are too large to fit its 24-bit size field
    ExcessiveBlockSize,
    /// The stream accepted fewer bytes than were written to it
    IncompleteWrite {
        /// Bytes actually written
        written: usize,
        /// Bytes we attempted to write
        expected: usize,
    },
    /// Invalid PICTURE type
    InvalidPictureType,
    /// A zero-length shift buffer
    InvalidBufferSize,
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::Utf8(error)
    }
}

impl From<metadata::BlockSizeOverflow> for Error {
    fn from(_: metadata::BlockSizeOverflow) -> Self {
        Self::ExcessiveBlockSize
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Utf8(e) => e.fmt(f),
            Self::MissingFlacTag => "missing FLAC tag".fmt(f),
            Self::UnterminatedBlockChain => "metadata blocks end without a final block".fmt(f),
            Self::TruncatedStream => "stream ended in the middle of a field".fmt(f),
            Self::InvalidMetadataBlockSize => "invalid metadata block size".fmt(f),
            Self::MissingVorbisComment => "no VORBIS_COMMENT block found".fmt(f),
            Self::ExcessiveBlockSize => "block size too large for 24-bit field".fmt(f),
            Self::IncompleteWrite { written, expected } => {
                write!(f, "incomplete write ({written} of {expected} bytes)")
            }
            Self::InvalidPictureType => "reserved PICTURE type".fmt(f),
            Self::InvalidBufferSize => "shift buffer size must be non-zero".fmt(f),
        }
    }
}
