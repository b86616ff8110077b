//! End-to-end tests over real directories of EXIF-tagged JPEGs.
//!
//! Files are synthesized with the EXIF writer, walked from disk in name
//! order, and matched brackets are hard-linked into an output directory.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use exif::experimental::Writer;
use exif::{Field, In, SRational, Tag, Value};
use hdr_finder::core::{BracketLinker, Finder, LinkOutcome};
use hdr_finder::error::{HdrFinderError, ScanError};
use predicates::prelude::*;
use std::io::Cursor;

fn jpeg(width: u32, height: u32, bias: (i32, i32)) -> Vec<u8> {
    let fields = [
        Field {
            tag: Tag::PixelXDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![width]),
        },
        Field {
            tag: Tag::PixelYDimension,
            ifd_num: In::PRIMARY,
            value: Value::Long(vec![height]),
        },
        Field {
            tag: Tag::ExposureBiasValue,
            ifd_num: In::PRIMARY,
            value: Value::SRational(vec![SRational {
                num: bias.0,
                denom: bias.1,
            }]),
        },
    ];

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
    bytes.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

fn shoot(dir: &TempDir, name: &str, width: u32, height: u32, bias: (i32, i32)) {
    dir.child(name).write_binary(&jpeg(width, height, bias)).unwrap();
}

#[test]
fn finds_bracket_on_disk() {
    let photos = TempDir::new().unwrap();
    shoot(&photos, "IMG_0001.JPG", 5184, 3456, (0, 1));
    shoot(&photos, "IMG_0002.JPG", 5184, 3456, (-2, 1));
    shoot(&photos, "IMG_0003.JPG", 5184, 3456, (2, 1));

    let result = Finder::builder().root(photos.path()).build().collect().unwrap();

    assert_eq!(result.brackets.len(), 1);
    assert_eq!(
        result.brackets[0].names(),
        vec!["IMG_0001.JPG", "IMG_0002.JPG", "IMG_0003.JPG"]
    );
    assert_eq!(result.summary.images_admitted, 3);
}

#[test]
fn sidecars_and_broken_files_are_skipped() {
    let photos = TempDir::new().unwrap();
    shoot(&photos, "IMG_0001.JPG", 640, 480, (0, 1));
    photos.child("IMG_0001.txt").write_str("notes").unwrap();
    photos
        .child("IMG_0002.JPG")
        .write_binary(b"definitely not a jpeg")
        .unwrap();
    shoot(&photos, "IMG_0003.JPG", 640, 480, (-1, 1));
    shoot(&photos, "IMG_0004.JPG", 640, 480, (1, 1));

    let result = Finder::builder().root(photos.path()).build().collect().unwrap();

    assert_eq!(result.brackets.len(), 1);
    assert_eq!(
        result.brackets[0].names(),
        vec!["IMG_0001.JPG", "IMG_0003.JPG", "IMG_0004.JPG"]
    );
    assert_eq!(result.summary.non_images_skipped, 1);
    assert_eq!(result.summary.extraction_failures, 1);
}

#[test]
fn subdirectories_are_walked_in_name_order() {
    let photos = TempDir::new().unwrap();
    photos.child("a").create_dir_all().unwrap();
    photos.child("b").create_dir_all().unwrap();
    shoot(&photos, "a/1.jpg", 640, 480, (0, 1));
    shoot(&photos, "a/2.jpg", 640, 480, (-1, 1));
    shoot(&photos, "b/1.jpg", 640, 480, (1, 1));

    let result = Finder::builder().root(photos.path()).build().collect().unwrap();

    // A bracket may span a directory boundary
    assert_eq!(result.brackets.len(), 1);
    let paths = result.brackets[0].paths();
    assert!(paths[0].ends_with("a/1.jpg"));
    assert!(paths[2].ends_with("b/1.jpg"));
    assert_eq!(result.summary.directories_skipped, 3);
}

#[test]
fn different_sizes_do_not_match() {
    let photos = TempDir::new().unwrap();
    shoot(&photos, "1.jpg", 640, 480, (0, 1));
    shoot(&photos, "2.jpg", 640, 480, (-1, 1));
    shoot(&photos, "3.jpg", 480, 640, (1, 1));

    let result = Finder::builder().root(photos.path()).build().collect().unwrap();

    assert!(result.brackets.is_empty());
    assert_eq!(result.summary.pending_images, 3);
}

#[test]
fn missing_root_is_an_error() {
    let photos = TempDir::new().unwrap();
    let missing = photos.child("nope");

    let err = Finder::builder()
        .root(missing.path())
        .build()
        .collect()
        .unwrap_err();

    assert!(matches!(
        err,
        HdrFinderError::Scan(ScanError::DirectoryNotFound { .. })
    ));
}

#[test]
fn linker_hard_links_each_match() {
    let photos = TempDir::new().unwrap();
    shoot(&photos, "IMG_0001.JPG", 640, 480, (0, 1));
    shoot(&photos, "IMG_0002.JPG", 640, 480, (-2, 1));
    shoot(&photos, "IMG_0003.JPG", 640, 480, (2, 1));

    let out = TempDir::new().unwrap();
    let linked = out.child("hdr");
    let linker = BracketLinker::create(linked.path()).unwrap();
    linked.assert(predicate::path::is_dir());

    let result = Finder::builder().root(photos.path()).build().collect().unwrap();
    let outcomes = linker.link(&result.brackets[0]);

    assert!(outcomes
        .iter()
        .all(|o| matches!(o, LinkOutcome::Linked(_))));
    for name in ["IMG_0001.JPG", "IMG_0002.JPG", "IMG_0003.JPG"] {
        linked.child(name).assert(predicate::path::exists());
    }

    // Running again leaves existing links alone
    let again = linker.link(&result.brackets[0]);
    assert!(again.iter().all(|o| matches!(o, LinkOutcome::Skipped(_))));
}
