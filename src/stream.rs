// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Primitive operations on seekable FLAC streams

use crate::Error;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// The tag every FLAC file begins with
pub const FLAC_TAG: &[u8; 4] = b"fLaC";

/// Reads exactly `N` bytes from the stream,
/// or `None` if the stream is already exhausted
///
/// # Errors
///
/// Returns [`Error::TruncatedStream`] if some,
/// but not all, of the `N` bytes are available.
pub fn read_fixed_or_eof<const N: usize, R: Read + ?Sized>(
    r: &mut R,
) -> Result<Option<[u8; N]>, Error> {
    let mut buf = [0; N];
    let mut filled = 0;

    while filled < N {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(amt) => filled += amt,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err)),
        }
    }

    match filled {
        0 if N > 0 => Ok(None),
        n if n == N => Ok(Some(buf)),
        _ => Err(Error::TruncatedStream),
    }
}

/// Reads exactly enough bytes to fill `buf`
///
/// Like [`Read::read_exact`], but a short read
/// is reported as [`Error::TruncatedStream`].
pub fn read_into<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    r.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => Error::TruncatedStream,
        _ => Error::Io(err),
    })
}

/// Writes the whole buffer to the stream
///
/// # Errors
///
/// Returns [`Error::IncompleteWrite`] if the stream
/// stops accepting bytes before the buffer is exhausted.
pub fn write_fully<W: Write + ?Sized>(w: &mut W, buf: &[u8]) -> Result<(), Error> {
    let mut written = 0;

    while written < buf.len() {
        match w.write(&buf[written..]) {
            Ok(0) => {
                return Err(Error::IncompleteWrite {
                    written,
                    expected: buf.len(),
                });
            }
            Ok(amt) => written += amt,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err)),
        }
    }

    Ok(())
}

/// Returns the total length of the stream, in bytes,
/// leaving its position unchanged
pub fn stream_len<S: Seek + ?Sized>(s: &mut S) -> Result<u64, Error> {
    let position = s.stream_position()?;
    let len = s.seek(SeekFrom::End(0))?;
    if position != len {
        s.seek(SeekFrom::Start(position))?;
    }
    Ok(len)
}

/// Applies `f` to the stream and returns it to its original position
///
/// The position is restored even if `f` fails,
/// in which case `f`'s error takes precedence
/// over any error from seeking back.
pub fn preserve_position<S, T>(
    s: &mut S,
    f: impl FnOnce(&mut S) -> Result<T, Error>,
) -> Result<T, Error>
where
    S: Seek + ?Sized,
{
    let position = s.stream_position()?;

    match f(s) {
        Ok(value) => {
            s.seek(SeekFrom::Start(position))?;
            Ok(value)
        }
        Err(err) => {
            let _ = s.seek(SeekFrom::Start(position));
            Err(err)
        }
    }
}

/// Reads and verifies the "fLaC" tag at the stream's current position
///
/// On success, the stream is left at the first metadata block.
///
/// # Errors
///
/// Returns [`Error::MissingFlacTag`] if the tag is
/// absent or the stream is too short to hold one.
pub fn read_flac_tag<R: Read + ?Sized>(r: &mut R) -> Result<(), Error> {
    match read_fixed_or_eof::<4, R>(r) {
        Ok(Some(tag)) if &tag == FLAC_TAG => Ok(()),
        Ok(_) | Err(Error::TruncatedStream) => Err(Error::MissingFlacTag),
        Err(err) => Err(err),
    }
}
