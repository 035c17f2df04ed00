// Copyright 2025 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod common;

use common::{FlacBuilder, random_audio, vorbis_comment};
use std::io::{Cursor, Seek, SeekFrom};

#[test]
fn test_metadata_corruption() {
    use flac_retag::{read_flac_tags, rewrite_comment};

    let flac = FlacBuilder::new()
        .comment(vorbis_comment("vendor", &["TITLE=Title", "ARTIST=Artist"]))
        .padding(50)
        .audio(random_audio(200))
        .build();

    // ensure test file is okay
    assert!(read_flac_tags(Cursor::new(flac.as_slice())).is_ok());

    // flipping bits anywhere in the metadata area
    // may produce an error, but never a panic
    let metadata_range = 0..flac.len() - 200;

    for _ in 0..1000 {
        let mut flac = flac.clone();
        flac[fastrand::usize(metadata_range.clone())] ^= 1 << fastrand::u32(0..8);

        let _ = read_flac_tags(Cursor::new(flac.as_slice()));

        let mut cursor = Cursor::new(&mut flac);
        cursor.seek(SeekFrom::Start(4)).unwrap();
        let _ = rewrite_comment(&mut cursor, &random_audio(fastrand::usize(0..100)));
        assert_eq!(cursor.position(), 4);
    }
}
