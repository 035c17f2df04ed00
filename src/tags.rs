// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! For reading a FLAC file's tags and cover art

use crate::Error;
use crate::metadata::BlockType;
use crate::scan::BlockScanner;
use crate::stream::{read_flac_tag, read_into};
use bitstream_io::{BigEndian, BitRead, BitReader, Endianness, LittleEndian};
use std::io::{ErrorKind, Read, Seek};

/// Vorbis comment tag fields
pub mod fields {
    /// Name of current work
    pub const TITLE: &str = "TITLE";

    /// Name of the artist generally responsible for the current work
    pub const ARTIST: &str = "ARTIST";

    /// Name of the collection the current work belongs to
    pub const ALBUM: &str = "ALBUM";

    /// Artist credited for the whole collection
    pub const ALBUM_ARTIST: &str = "ALBUMARTIST";

    /// The work's original composer
    pub const COMPOSER: &str = "COMPOSER";

    /// Genre of the current work
    pub const GENRE: &str = "GENRE";

    /// Release date of work
    pub const DATE: &str = "DATE";

    /// Generic comment
    pub const COMMENT: &str = "COMMENT";

    /// Lyrics of the current work
    pub const LYRICS: &str = "LYRICS";
}

/// The tags held in a Vorbis comment, plus any attached picture
///
/// This is the tag model shared by any container
/// which stores Vorbis comments.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VorbisTags {
    /// The vendor string
    pub vendor_string: String,
    /// The individual `FIELD=value` comment strings
    pub fields: Vec<String>,
    /// The first attached picture, if any
    pub picture: Option<Picture>,
}

impl VorbisTags {
    /// Decodes a VORBIS_COMMENT block's contents
    ///
    /// | Bits | Field | Meaning |
    /// |-----:|------:|---------|
    /// | 32   | vendor string len | length of vendor string, in bytes
    /// | `vendor string len`×8 | `vendor_string` | vendor string, in UTF-8
    /// | 32   | field count | number of vendor string fields
    /// | 32   | field₀ len | length of field₀, in bytes
    /// | `field₀ len`×8 | `fields₀` | first field value, in UTF-8
    /// | | | ⋮
    ///
    /// All lengths are little-endian.
    /// Comment strings lacking an `=` are kept in `fields`
    /// but never match a lookup.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let mut r = BitReader::endian(data, LittleEndian);

        let vendor_string = String::from_utf8(prefixed_field(&mut r, data.len())?)?;
        let count = r.read_to::<u32>().map_err(block_size_error)?;

        let mut fields = Vec::new();
        for _ in 0..count {
            fields.push(String::from_utf8(prefixed_field(&mut r, data.len())?)?);
        }

        Ok(Self {
            vendor_string,
            fields,
            picture: None,
        })
    }

    /// Given a field name, returns first matching value, if any
    ///
    /// Fields are matched case-insensitively
    ///
    /// # Example
    ///
    /// ```
    /// use flac_retag::tags::{VorbisTags, fields::{ARTIST, TITLE}};
    ///
    /// let tags = VorbisTags {
    ///     fields: vec![
    ///         "artist=Artist 1".to_owned(),
    ///         "ARTIST=Artist 2".to_owned(),
    ///     ],
    ///     ..VorbisTags::default()
    /// };
    ///
    /// assert_eq!(tags.get(ARTIST), Some("Artist 1"));
    /// assert_eq!(tags.get(TITLE), None);
    /// ```
    pub fn get(&self, field: &str) -> Option<&str> {
        self.all(field).next()
    }

    /// Given a field name, iterates over any matching values
    ///
    /// Fields are matched case-insensitively
    pub fn all(&self, field: &str) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(move |f| {
            f.split_once('=')
                .and_then(|(key, value)| key.eq_ignore_ascii_case(field).then_some(value))
        })
    }

    /// Returns track title, if any
    pub fn title(&self) -> Option<&str> {
        self.get(fields::TITLE)
    }

    /// Returns album name, if any
    pub fn album(&self) -> Option<&str> {
        self.get(fields::ALBUM)
    }

    /// Returns artist name, if any
    pub fn artist(&self) -> Option<&str> {
        self.get(fields::ARTIST)
    }

    /// Returns album artist name, if any
    pub fn album_artist(&self) -> Option<&str> {
        self.get(fields::ALBUM_ARTIST)
    }

    /// Returns composer name, if any
    pub fn composer(&self) -> Option<&str> {
        self.get(fields::COMPOSER)
    }

    /// Returns genre, if any
    pub fn genre(&self) -> Option<&str> {
        self.get(fields::GENRE)
    }

    /// Returns release date, if any
    pub fn date(&self) -> Option<&str> {
        self.get(fields::DATE)
    }

    /// Returns comment, if any
    pub fn comment(&self) -> Option<&str> {
        self.get(fields::COMMENT)
    }

    /// Returns lyrics, if any
    pub fn lyrics(&self) -> Option<&str> {
        self.get(fields::LYRICS)
    }
}

/// A PICTURE metadata block
///
/// | Bits | Field | Meaning |
/// |-----:|------:|---------|
/// | 32   | `picture_type` | picture type
/// | 32   | media type len | media type length, in bytes
/// | `media type len`×8 | `media_type` | picture's MIME type
/// | 32   | description len | description length, in bytes
/// | `description len`×8 | `description` | description of picture, in UTF-8
/// | 32   | `width` | width of picture, in pixels
/// | 32   | `height`| height of picture, in pixels
/// | 32   | `color_depth` | color depth of picture in bits-per-pixel
/// | 32   | `colors_used` | for indexed-color pictures, number of colors used
/// | 32   | data len | length of picture data, in bytes
/// | `data len`×8 | `data` | raw picture data
///
/// All values are big-endian.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Picture {
    /// The picture type
    pub picture_type: PictureType,
    /// The media type string as specified by RFC2046
    pub media_type: String,
    /// The description of the picture
    pub description: String,
    /// The width of the picture in pixels
    pub width: u32,
    /// The height of the picture in pixels
    pub height: u32,
    /// The color depth of the picture in bits per pixel
    pub color_depth: u32,
    /// For indexed-color pictures, the number of colors used
    pub colors_used: u32,
    /// The binary picture data
    pub data: Vec<u8>,
}

impl Picture {
    /// Decodes a PICTURE block's contents
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let mut r = BitReader::endian(data, BigEndian);

        Ok(Self {
            picture_type: PictureType::try_from(r.read_to::<u32>().map_err(block_size_error)?)?,
            media_type: String::from_utf8(prefixed_field(&mut r, data.len())?)?,
            description: String::from_utf8(prefixed_field(&mut r, data.len())?)?,
            width: r.read_to().map_err(block_size_error)?,
            height: r.read_to().map_err(block_size_error)?,
            color_depth: r.read_to().map_err(block_size_error)?,
            colors_used: r.read_to().map_err(block_size_error)?,
            data: prefixed_field(&mut r, data.len())?,
        })
    }
}

/// The kind of image held by a PICTURE block, from 0 to 20
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PictureType(u32);

impl PictureType {
    const NAMES: [&'static str; 21] = [
        "Other",
        "32×32 PNG Icon",
        "General File Icon",
        "Cover (front)",
        "Cover (back)",
        "Liner Notes",
        "Media Label",
        "Lead Artist",
        "Artist",
        "Conductor",
        "Band or Orchestra",
        "Composer",
        "Lyricist or Text Writer",
        "Recording Location",
        "During Recording",
        "During Performance",
        "Movie or Video Screen Capture",
        "A Bright Colored Fish",
        "Illustration",
        "Band or Artist Logotype",
        "Publisher or Studio Logotype",
    ];

    /// Front cover art
    pub const FRONT_COVER: Self = Self(3);

    /// Our numeric value
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PictureType {
    type Error = Error;

    fn try_from(u: u32) -> Result<Self, Error> {
        match usize::try_from(u) {
            Ok(i) if i < Self::NAMES.len() => Ok(Self(u)),
            _ => Err(Error::InvalidPictureType),
        }
    }
}

impl std::fmt::Display for PictureType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // only ever built from an in-range value
        f.write_str(Self::NAMES[self.0 as usize])
    }
}

/// The kind of file tags were read from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileType {
    /// A native FLAC file
    Flac,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Flac => f.write_str("FLAC"),
        }
    }
}

/// Tags read from a FLAC file
///
/// Wraps the shared Vorbis comment tag model
/// and exposes the same accessors.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FlacTags {
    vorbis: VorbisTags,
}

impl FlacTags {
    /// Returns the underlying Vorbis comment tags
    pub fn vorbis(&self) -> &VorbisTags {
        &self.vorbis
    }

    /// Consumes self and returns the underlying Vorbis comment tags
    pub fn into_vorbis(self) -> VorbisTags {
        self.vorbis
    }

    /// Given a field name, returns first matching value, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.vorbis.get(field)
    }

    /// All the raw `FIELD=value` comment strings
    pub fn fields(&self) -> &[String] {
        &self.vorbis.fields
    }

    /// The kind of file these tags came from
    pub fn file_type(&self) -> FileType {
        FileType::Flac
    }

    /// The comment block's vendor string
    pub fn vendor(&self) -> &str {
        &self.vorbis.vendor_string
    }

    /// Returns track title, if any
    pub fn title(&self) -> Option<&str> {
        self.vorbis.title()
    }

    /// Returns album name, if any
    pub fn album(&self) -> Option<&str> {
        self.vorbis.album()
    }

    /// Returns artist name, if any
    pub fn artist(&self) -> Option<&str> {
        self.vorbis.artist()
    }

    /// Returns album artist name, if any
    pub fn album_artist(&self) -> Option<&str> {
        self.vorbis.album_artist()
    }

    /// Returns composer name, if any
    pub fn composer(&self) -> Option<&str> {
        self.vorbis.composer()
    }

    /// Returns genre, if any
    pub fn genre(&self) -> Option<&str> {
        self.vorbis.genre()
    }

    /// Returns release date, if any
    pub fn date(&self) -> Option<&str> {
        self.vorbis.date()
    }

    /// Returns comment, if any
    pub fn comment(&self) -> Option<&str> {
        self.vorbis.comment()
    }

    /// Returns lyrics, if any
    pub fn lyrics(&self) -> Option<&str> {
        self.vorbis.lyrics()
    }

    /// Returns first attached picture, if any
    pub fn picture(&self) -> Option<&Picture> {
        self.vorbis.picture.as_ref()
    }
}

/// Reads tags and cover art from a FLAC file
///
/// The stream should be positioned at the "fLaC" tag.
/// Only the first VORBIS_COMMENT and first PICTURE block are used;
/// all other blocks are skipped without being read.
///
/// # Errors
///
/// Returns an error if the file isn't FLAC,
/// its block chain is malformed,
/// or a comment or picture block can't be decoded.
pub fn read_flac_tags<R: Read + Seek>(mut reader: R) -> Result<FlacTags, Error> {
    read_flac_tag(&mut reader)?;

    let mut vorbis: Option<VorbisTags> = None;
    let mut picture: Option<Picture> = None;
    let mut scanner = BlockScanner::new(reader);

    while let Some(block) = scanner.next() {
        let header = block?.header;

        match header.block_type {
            BlockType::VorbisComment if vorbis.is_none() => {
                vorbis = Some(VorbisTags::decode(&read_payload(
                    scanner.stream_mut(),
                    header.size.get(),
                )?)?);
            }
            BlockType::Picture if picture.is_none() => {
                picture = Some(Picture::decode(&read_payload(
                    scanner.stream_mut(),
                    header.size.get(),
                )?)?);
            }
            _ => { /* skipped by scanner */ }
        }
    }

    let mut vorbis = vorbis.unwrap_or_default();
    vorbis.picture = picture;
    Ok(FlacTags { vorbis })
}

fn read_payload<R: Read>(r: &mut R, size: u32) -> Result<Vec<u8>, Error> {
    let mut data = vec![0; size as usize];
    read_into(r, &mut data)?;
    Ok(data)
}

/// Reads a 32-bit length and that many bytes,
/// failing if the length runs past the end of the block
fn prefixed_field<E: Endianness>(r: &mut BitReader<&[u8], E>, limit: usize) -> Result<Vec<u8>, Error> {
    let size = r.read_to::<u32>().map_err(block_size_error)?;
    match usize::try_from(size) {
        Ok(size) if size <= limit => r.read_to_vec(size).map_err(block_size_error),
        _ => Err(Error::InvalidMetadataBlockSize),
    }
}

/// A block's contents ending early means its size was wrong
fn block_size_error(err: std::io::Error) -> Error {
    match err.kind() {
        ErrorKind::UnexpectedEof => Error::InvalidMetadataBlockSize,
        _ => Error::Io(err),
    }
}
