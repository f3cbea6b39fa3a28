//! Aspect-ratio cropping integration tests.

mod common;

use std::fs::File;

use reframe::{AspectRatio, SequenceFile, TransformOptions};

#[test]
fn crops_width_to_a_narrower_ratio() {
    // 16x9 cropped to 4:3 keeps the height and trims the width to 12 with a
    // 2-column margin on each side.
    let frame: Vec<u8> = (0..9_u8)
        .flat_map(|row| (0..16_u8).map(move |col| row * 16 + col))
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.seq");
    let output = dir.path().join("output.seq");
    common::write_sequence(&input, 1, 9, 16, std::slice::from_ref(&frame));

    let mut sequence = SequenceFile::open(&input).unwrap();
    let mut destination = File::create(&output).unwrap();
    let ratio: AspectRatio = "4:3".parse().unwrap();
    sequence
        .geometry()
        .crop_aspect(&mut destination, ratio, &TransformOptions::new())
        .expect("crop failed");

    let (header, cropped) = common::read_sequence(&output);
    assert_eq!(header.width, 12);
    assert_eq!(header.height, 9);
    assert_eq!(header.frame_count, 1);

    // Each output pixel (row, col) equals the input pixel at
    // (row + crop_top, col + crop_left) with crop_top = 0, crop_left = 2.
    let expected: Vec<u8> = (0..9_u8)
        .flat_map(|row| (2..14_u8).map(move |col| row * 16 + col))
        .collect();
    assert_eq!(cropped[0], expected);
}

#[test]
fn crops_height_to_a_wider_ratio() {
    // 8x8 cropped to 2:1 keeps the width and trims the height to 4, centered
    // two rows down.
    let frame: Vec<u8> = (0..64_u8).collect();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.seq");
    let output = dir.path().join("output.seq");
    common::write_sequence(&input, 1, 8, 8, std::slice::from_ref(&frame));

    let mut sequence = SequenceFile::open(&input).unwrap();
    let mut destination = File::create(&output).unwrap();
    let ratio: AspectRatio = "2:1".parse().unwrap();
    sequence
        .geometry()
        .crop_aspect(&mut destination, ratio, &TransformOptions::new())
        .expect("crop failed");

    let (header, cropped) = common::read_sequence(&output);
    assert_eq!(header.width, 8);
    assert_eq!(header.height, 4);

    // Rows 2..6 of the input.
    let expected: Vec<u8> = (16..48_u8).collect();
    assert_eq!(cropped[0], expected);
}

#[test]
fn crops_every_channel_of_every_frame() {
    // 2 frames, 2 channels of 4x4 pixels, cropped to 1:1 (identity here) and
    // to 4:2 to exercise the multi-channel window copy.
    let frames: Vec<Vec<u8>> = (0..2_u8)
        .map(|frame| {
            (0..2_u8)
                .flat_map(|channel| {
                    (0..16_u8).map(move |pixel| channel * 100 + pixel + frame * 10)
                })
                .collect()
        })
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.seq");
    let output = dir.path().join("output.seq");
    common::write_sequence(&input, 2, 4, 4, &frames);

    let mut sequence = SequenceFile::open(&input).unwrap();
    let mut destination = File::create(&output).unwrap();
    let ratio: AspectRatio = "4:2".parse().unwrap();
    sequence
        .geometry()
        .crop_aspect(&mut destination, ratio, &TransformOptions::new())
        .expect("crop failed");

    let (header, cropped) = common::read_sequence(&output);
    assert_eq!(header.width, 4);
    assert_eq!(header.height, 2);
    assert_eq!(header.channels, 2);
    assert_eq!(header.frame_count, 2);

    // Rows 1..3 of each 4x4 plane survive.
    for (index, frame) in cropped.iter().enumerate() {
        let frame_bias = index as u8 * 10;
        let expected: Vec<u8> = (0..2_u8)
            .flat_map(|channel| {
                (4..12_u8).map(move |pixel| channel * 100 + pixel + frame_bias)
            })
            .collect();
        assert_eq!(frame, &expected, "frame {index}");
    }
}

#[test]
fn matching_ratio_copies_frames_unchanged() {
    let frames = common::patterned_frames(3, 16 * 9);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.seq");
    let output = dir.path().join("output.seq");
    common::write_sequence(&input, 1, 9, 16, &frames);

    let mut sequence = SequenceFile::open(&input).unwrap();
    let mut destination = File::create(&output).unwrap();
    let ratio: AspectRatio = "16:9".parse().unwrap();
    sequence
        .geometry()
        .crop_aspect(&mut destination, ratio, &TransformOptions::new())
        .expect("crop failed");

    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&input).unwrap(),
    );
}
