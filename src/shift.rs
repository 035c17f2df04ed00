// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! For moving the tail end of a file forward or backward in place
//!
//! Both shifts work through a fixed-size buffer,
//! so memory use doesn't grow with the size of the file.
//!
//! Neither shift may be safely interrupted.
//! A file whose shift fails partway through will have
//! block sizes that no longer match their contents.

use crate::Error;
use crate::stream::{preserve_position, read_into, stream_len, write_fully};
use log::trace;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// Options for shifting file contents
#[derive(Clone, Debug)]
pub struct Options {
    pub(crate) buffer_size: usize,
}

impl Options {
    /// The default size of the buffer used to shift file contents
    pub const DEFAULT_BUFFER_SIZE: usize = 1 << 16;

    /// Assigns size of the buffer used to shift file contents, in bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferSize`] if the size is 0.
    pub fn buffer_size(self, buffer_size: usize) -> Result<Self, Error> {
        match buffer_size {
            0 => Err(Error::InvalidBufferSize),
            buffer_size => Ok(Self { buffer_size }),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
        }
    }
}

/// A stream whose total length can be changed
///
/// Shifting a file's contents left leaves stale bytes
/// at its end which must be cut off.
pub trait SetLen {
    /// Truncates or extends the stream to `len` bytes
    ///
    /// Any extended area is filled with zeroes.
    fn set_len(&mut self, len: u64) -> std::io::Result<()>;
}

impl SetLen for std::fs::File {
    #[inline]
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        std::fs::File::set_len(self, len)
    }
}

impl SetLen for Cursor<Vec<u8>> {
    #[inline]
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        resize_vec(self.get_mut(), len)
    }
}

impl SetLen for Cursor<&mut Vec<u8>> {
    #[inline]
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        resize_vec(self.get_mut(), len)
    }
}

impl<T: SetLen + ?Sized> SetLen for &mut T {
    #[inline]
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        (**self).set_len(len)
    }
}

fn resize_vec(v: &mut Vec<u8>, len: u64) -> std::io::Result<()> {
    v.resize(
        usize::try_from(len).map_err(|_| std::io::Error::from(std::io::ErrorKind::OutOfMemory))?,
        0,
    );
    Ok(())
}

/// Moves everything after the stream's current position
/// `offset` bytes closer to it, then truncates the stream by `offset` bytes
///
/// ```text
///  before: │ head ┃ gap (offset) │ tail ┆
///  after:  │ head ┃ tail ┆
/// ```
///
/// The stream's position is unchanged afterward.
///
/// # Errors
///
/// Returns [`Error::TruncatedStream`] if the gap
/// runs past the end of the stream,
/// or any I/O error from reading, writing or truncating.
pub fn shift_left<F>(file: &mut F, offset: u64, options: &Options) -> Result<(), Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
{
    if offset == 0 {
        return Ok(());
    }

    preserve_position(file, |file| {
        let len = stream_len(file)?;
        let mut source = file
            .stream_position()?
            .checked_add(offset)
            .filter(|source| *source <= len)
            .ok_or(Error::TruncatedStream)?;

        let mut buf = vec![0; options.buffer_size];

        // front-to-back, so every source chunk is read
        // before anything is written over it
        while source < len {
            let chunk_len = (len - source).min(buf.len() as u64) as usize;
            let chunk = &mut buf[0..chunk_len];

            file.seek(SeekFrom::Start(source))?;
            read_into(file, chunk)?;
            file.seek(SeekFrom::Start(source - offset))?;
            write_fully(file, chunk)?;

            trace!("shifted {} bytes from {} to {}", chunk.len(), source, source - offset);

            source += chunk.len() as u64;
        }

        file.set_len(len - offset).map_err(Error::Io)
    })
}

/// Moves everything after the stream's current position
/// `offset` bytes further from it
///
/// ```text
///  before: │ head ┃ tail ┆
///  after:  │ head ┃ gap (offset) │ tail ┆
/// ```
///
/// The gap's contents are left unspecified
/// and must be overwritten by the caller.
/// The stream's position is unchanged afterward.
///
/// # Errors
///
/// Returns any I/O error from reading or writing.
pub fn shift_right<F>(file: &mut F, offset: u64, options: &Options) -> Result<(), Error>
where
    F: Read + Write + Seek + SetLen + ?Sized,
{
    if offset == 0 {
        return Ok(());
    }

    preserve_position(file, |file| {
        let start = file.stream_position()?;
        let len = stream_len(file)?;

        if start >= len {
            // nothing to move, but the stream must still grow
            return file.set_len(start + offset).map_err(Error::Io);
        }

        let mut buf = vec![0; options.buffer_size];
        let mut end = len;

        // back-to-front, since each chunk's destination
        // overlaps the source of the chunk after it
        while end > start {
            let chunk_len = (end - start).min(buf.len() as u64) as usize;
            let chunk = &mut buf[0..chunk_len];
            let source = end - chunk_len as u64;

            file.seek(SeekFrom::Start(source))?;
            read_into(file, chunk)?;
            file.seek(SeekFrom::Start(source + offset))?;
            write_fully(file, chunk)?;

            trace!("shifted {} bytes from {} to {}", chunk.len(), source, source + offset);

            end = source;
        }

        Ok(())
    })
}
