mod common;

use common::{FlacBuilder, random_audio, vorbis_comment};
use flac_retag::tags::{Picture, PictureType, VorbisTags, fields};
use flac_retag::{Error, FileType, read_flac_tags};
use std::io::Cursor;

fn picture_block(picture_type: u32, media_type: &str, description: &str, data: &[u8]) -> Vec<u8> {
    let mut block = Vec::new();
    block.extend(picture_type.to_be_bytes());
    block.extend((media_type.len() as u32).to_be_bytes());
    block.extend(media_type.as_bytes());
    block.extend((description.len() as u32).to_be_bytes());
    block.extend(description.as_bytes());
    block.extend(32u32.to_be_bytes());
    block.extend(16u32.to_be_bytes());
    block.extend(24u32.to_be_bytes());
    block.extend(0u32.to_be_bytes());
    block.extend((data.len() as u32).to_be_bytes());
    block.extend(data);
    block
}

#[test]
fn test_read_tags() {
    let flac = FlacBuilder::new()
        .comment(vorbis_comment(
            "reference libFLAC 1.4.3",
            &[
                "title=Track Title",
                "ARTIST=Artist 1",
                "Artist=Artist 2",
                "ALBUM=Album Name",
                "AlbumArtist=Various",
                "COMPOSER=Composer",
                "GENRE=Genre",
                "DATE=2024",
                "COMMENT=a=b",
                "LYRICS=",
                "NOT A FIELD",
            ],
        ))
        .padding(64)
        .audio(random_audio(200))
        .build();

    let tags = read_flac_tags(Cursor::new(flac)).unwrap();

    assert_eq!(tags.vendor(), "reference libFLAC 1.4.3");
    assert_eq!(tags.title(), Some("Track Title"));
    assert_eq!(tags.artist(), Some("Artist 1"));
    assert_eq!(tags.album(), Some("Album Name"));
    assert_eq!(tags.album_artist(), Some("Various"));
    assert_eq!(tags.composer(), Some("Composer"));
    assert_eq!(tags.genre(), Some("Genre"));
    assert_eq!(tags.date(), Some("2024"));
    // only the first '=' separates key from value
    assert_eq!(tags.comment(), Some("a=b"));
    assert_eq!(tags.lyrics(), Some(""));
    assert_eq!(tags.get("composer"), Some("Composer"));
    assert_eq!(tags.get("MISSING"), None);
    assert_eq!(tags.picture(), None);

    // fields without a separator are kept but never matched
    assert_eq!(tags.fields().len(), 11);
    assert_eq!(tags.fields()[10], "NOT A FIELD");
    assert_eq!(tags.get("NOT A FIELD"), None);
    assert_eq!(tags.file_type(), FileType::Flac);
    assert_eq!(tags.file_type().to_string(), "FLAC");
    assert_eq!(
        tags.vorbis().all(fields::ARTIST).collect::<Vec<_>>(),
        vec!["Artist 1", "Artist 2"]
    );
}

#[test]
fn test_read_no_comment() {
    let flac = FlacBuilder::new().padding(10).build();
    let tags = read_flac_tags(Cursor::new(flac)).unwrap();
    assert_eq!(tags.vorbis(), &VorbisTags::default());
    assert_eq!(tags.title(), None);
}

#[test]
fn test_read_picture() {
    let flac = FlacBuilder::new()
        .block(6, picture_block(3, "image/png", "front", b"first"))
        .comment(vorbis_comment("vendor", &["TITLE=Foo"]))
        .block(6, picture_block(4, "image/jpeg", "back", b"second"))
        .build();

    let tags = read_flac_tags(Cursor::new(flac)).unwrap();
    assert_eq!(tags.title(), Some("Foo"));
    assert_eq!(
        tags.picture(),
        Some(&Picture {
            picture_type: PictureType::FRONT_COVER,
            media_type: "image/png".to_owned(),
            description: "front".to_owned(),
            width: 32,
            height: 16,
            color_depth: 24,
            colors_used: 0,
            data: b"first".to_vec(),
        })
    );
    assert_eq!(PictureType::FRONT_COVER.to_string(), "Cover (front)");
}

#[test]
fn test_read_invalid() {
    fn read(flac: Vec<u8>) -> Result<(), Error> {
        read_flac_tags(Cursor::new(flac)).map(|_| ())
    }

    let mut not_flac = FlacBuilder::new().build();
    not_flac[0..4].copy_from_slice(b"Xlac");
    assert!(matches!(read(not_flac), Err(Error::MissingFlacTag)));

    // field length runs past end of block
    let mut comment = vorbis_comment("vendor", &["TITLE=Foo"]);
    let field_len = comment.len() - 13;
    comment[field_len] = 200;
    assert!(matches!(
        read(FlacBuilder::new().comment(comment).build()),
        Err(Error::InvalidMetadataBlockSize)
    ));

    // more fields claimed than present
    let mut comment = vorbis_comment("vendor", &["TITLE=Foo"]);
    comment[10] = 2;
    assert!(matches!(
        read(FlacBuilder::new().comment(comment).build()),
        Err(Error::InvalidMetadataBlockSize)
    ));

    let mut comment = vorbis_comment("vendor", &["TITLE=Foo"]);
    comment[4] = 0xFF;
    assert!(matches!(
        read(FlacBuilder::new().comment(comment).build()),
        Err(Error::Utf8(_))
    ));

    assert!(matches!(
        read(
            FlacBuilder::new()
                .block(6, picture_block(21, "image/png", "", b""))
                .build()
        ),
        Err(Error::InvalidPictureType)
    ));

    let flac = FlacBuilder::new()
        .comment(vorbis_comment("vendor", &["TITLE=Foo"]))
        .build();
    assert!(matches!(
        read(flac[0..flac.len() - 2].to_vec()),
        Err(Error::TruncatedStream)
    ));
}

#[test]
fn test_vorbis_decode() {
    let tags = VorbisTags::decode(&vorbis_comment("", &[])).unwrap();
    assert_eq!(tags, VorbisTags::default());

    assert!(matches!(
        VorbisTags::decode(&[0, 0, 0]),
        Err(Error::InvalidMetadataBlockSize)
    ));
}
