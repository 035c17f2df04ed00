// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![allow(dead_code)]

use std::collections::BTreeMap;

/// Assembles a FLAC file from raw blocks,
/// starting with a 34 byte STREAMINFO at offset 4
pub struct FlacBuilder {
    blocks: Vec<(u8, Vec<u8>)>,
    audio: Vec<u8>,
}

impl FlacBuilder {
    pub fn new() -> Self {
        Self {
            blocks: vec![(0, vec![0x11; 34])],
            audio: Vec::new(),
        }
    }

    pub fn block(mut self, block_type: u8, contents: Vec<u8>) -> Self {
        self.blocks.push((block_type, contents));
        self
    }

    pub fn comment(self, contents: Vec<u8>) -> Self {
        self.block(4, contents)
    }

    pub fn padding(self, size: usize) -> Self {
        self.block(1, vec![0; size])
    }

    pub fn audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = audio;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut flac = b"fLaC".to_vec();
        let last = self.blocks.len() - 1;

        for (i, (block_type, contents)) in self.blocks.into_iter().enumerate() {
            flac.push(if i == last { 0x80 } else { 0 } | block_type);
            flac.extend_from_slice(&(contents.len() as u32).to_be_bytes()[1..]);
            flac.extend(contents);
        }

        flac.extend(self.audio);
        flac
    }
}

/// Some bytes standing in for encoded audio frames
pub fn random_audio(len: usize) -> Vec<u8> {
    std::iter::repeat_with(|| fastrand::u8(..)).take(len).collect()
}

/// Builds a VORBIS_COMMENT block's contents
pub fn vorbis_comment(vendor: &str, fields: &[&str]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend((vendor.len() as u32).to_le_bytes());
    data.extend(vendor.as_bytes());
    data.extend((fields.len() as u32).to_le_bytes());
    for field in fields {
        data.extend((field.len() as u32).to_le_bytes());
        data.extend(field.as_bytes());
    }
    data
}

/// Encodes a tag map as a VORBIS_COMMENT block's contents
pub fn encode_tags(tags: &BTreeMap<String, String>) -> Vec<u8> {
    let fields = tags
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>();

    vorbis_comment(
        "test vendor",
        &fields.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    )
}

/// Parses the raw block chain of a FLAC file
/// as (offset, last, type, size) tuples
pub fn blocks(flac: &[u8]) -> Vec<(usize, bool, u8, usize)> {
    assert_eq!(&flac[0..4], b"fLaC");

    let mut blocks = Vec::new();
    let mut offset = 4;
    loop {
        let last = flac[offset] & 0x80 != 0;
        let block_type = flac[offset] & 0x7F;
        let size = u32::from_be_bytes([0, flac[offset + 1], flac[offset + 2], flac[offset + 3]])
            as usize;
        blocks.push((offset, last, block_type, size));
        offset += 4 + size;
        if last {
            return blocks;
        }
    }
}

/// Where the audio starts after the block chain
pub fn audio_offset(flac: &[u8]) -> usize {
    let (offset, _, _, size) = *blocks(flac).last().unwrap();
    offset + 4 + size
}
