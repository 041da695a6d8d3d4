//! Integration tests for capture and segmentation
//!
//! These tests run the complete workflow on synthetic frames:
//! - Background capture on an empty scene
//! - Object capture from the centered square
//! - Block segmentation and overlay painting
//! - Command queue replay
//! - Configuration and image files on disk

use colorseg::constants::frame::{HEIGHT, WIDTH};
use colorseg::histogram::{sample, ReferenceSet};
use colorseg::image_io::{load_frame, save_image};
use colorseg::{
    segment, Command, CommandQueue, Label, Outcome, Region, SegmentationError, SegmenterConfig,
    Session,
};
use image::{Rgb, RgbImage};

/// Green-ish textured backdrop, like a wall under uneven light
fn empty_scene() -> RgbImage {
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let shade = ((x / 16 + y / 16) % 2) as u8 * 20;
        Rgb([30 + shade, 140 + shade, 60])
    })
}

/// The empty scene with a saturated red object covering `object`
fn scene_with_object(object: Region) -> RgbImage {
    let mut frame = empty_scene();
    for y in object.y..object.bottom() {
        for x in object.x..object.right() {
            frame.put_pixel(x, y, Rgb([230, 20, 25]));
        }
    }
    frame
}

// ============================================================================
// Classification Properties
// ============================================================================

#[test]
fn test_black_and_red_references() {
    let black = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
    let red = RgbImage::from_pixel(16, 16, Rgb([255, 0, 0]));

    let background: ReferenceSet = [sample(&black, (0, 0), (16, 16)).unwrap()]
        .into_iter()
        .collect();
    let object: ReferenceSet = [sample(&red, (0, 0), (16, 16)).unwrap()]
        .into_iter()
        .collect();

    let red_block = sample(&red, (0, 0), (8, 8)).unwrap();
    let black_block = sample(&black, (0, 0), (8, 8)).unwrap();
    assert_eq!(
        colorseg::segmentation::classify(&red_block, &background, &object),
        Label::Object
    );
    assert_eq!(
        colorseg::segmentation::classify(&black_block, &background, &object),
        Label::Background
    );
}

#[test]
fn test_segment_with_no_references_is_all_background() {
    let frame = scene_with_object(Region::new(100, 100, 64, 64));
    let empty = ReferenceSet::new();

    let overlay = segment(&frame, &empty, &empty, 8).unwrap();
    assert_eq!(overlay.dimensions(), (WIDTH, HEIGHT));
    assert!(overlay.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

// ============================================================================
// Session Workflow
// ============================================================================

#[test]
fn test_capture_and_segment_object() {
    let mut session = Session::default();

    let references = session.capture_background(&empty_scene()).unwrap();
    // 640x480 with 128px blocks: 5 columns, 3 full rows
    assert_eq!(references, 15);

    let centered = Region::centered(WIDTH, HEIGHT, 50);
    session
        .capture_object(&scene_with_object(centered), None)
        .unwrap();

    // Object moved elsewhere, aligned to the 8px block grid
    let placed = Region::new(400, 320, 48, 32);
    let frame = scene_with_object(placed);
    let grid = session.label_blocks(&frame).unwrap();

    assert_eq!((grid.columns(), grid.rows()), (80, 60));
    assert_eq!(grid.count(Label::Object), 6 * 4);
    for row in 40..44 {
        for column in 50..56 {
            assert_eq!(grid.get(column, row), Some(Label::Object));
        }
    }
    assert_eq!(grid.get(10, 10), Some(Label::Background));

    let overlay = session.segment(&frame).unwrap();
    assert_eq!(*overlay.get_pixel(420, 340), Rgb([255, 0, 0]));
    assert_eq!(*overlay.get_pixel(5, 5), Rgb([0, 0, 0]));
}

#[test]
fn test_recaptured_background_ignores_old_scene() {
    let mut session = Session::default();
    let red_wall = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([230, 20, 25]));

    // A red background first makes the red object indistinguishable
    session.capture_background(&red_wall).unwrap();
    let centered = Region::centered(WIDTH, HEIGHT, 50);
    session
        .capture_object(&scene_with_object(centered), None)
        .unwrap();
    let frame = scene_with_object(Region::new(0, 0, 64, 64));
    assert_eq!(session.label_blocks(&frame).unwrap().count(Label::Object), 0);

    // After recapturing on the real scene the red reference is gone
    session.capture_background(&empty_scene()).unwrap();
    assert_eq!(session.background().len(), 15);
    assert_eq!(
        session.label_blocks(&frame).unwrap().count(Label::Object),
        8 * 8
    );
}

#[test]
fn test_object_captures_accumulate() {
    let mut session = Session::default();
    session.capture_background(&empty_scene()).unwrap();

    let centered = Region::centered(WIDTH, HEIGHT, 50);
    let mut blue_object = empty_scene();
    for y in centered.y..centered.bottom() {
        for x in centered.x..centered.right() {
            blue_object.put_pixel(x, y, Rgb([20, 30, 220]));
        }
    }

    session
        .capture_object(&scene_with_object(centered), None)
        .unwrap();
    session.capture_object(&blue_object, None).unwrap();
    assert_eq!(session.object().len(), 2);

    // Both a red and a blue block are recognized
    let mut frame = scene_with_object(Region::new(0, 0, 8, 8));
    for y in 0..8 {
        for x in 8..16 {
            frame.put_pixel(x, y, Rgb([20, 30, 220]));
        }
    }
    let grid = session.label_blocks(&frame).unwrap();
    assert_eq!(grid.get(0, 0), Some(Label::Object));
    assert_eq!(grid.get(1, 0), Some(Label::Object));
    assert_eq!(grid.count(Label::Object), 2);
}

#[test]
fn test_capture_region_outside_frame() {
    let mut session = Session::default();
    let result = session.capture_object(&empty_scene(), Some(Region::new(700, 0, 10, 10)));

    let error = result.unwrap_err();
    assert!(matches!(error, SegmentationError::EmptyRegion { .. }));
    assert!(error.is_recoverable());
    assert!(session.object().is_empty());
}

// ============================================================================
// Command Dispatch
// ============================================================================

#[test]
fn test_key_sequence_replay() {
    let mut session = Session::default();
    let scene = empty_scene();
    let centered = Region::centered(WIDTH, HEIGHT, 50);
    let with_object = scene_with_object(centered);

    let mut queue = CommandQueue::from_keys("b");
    let outcomes = session.drain(&scene, &mut queue).unwrap();
    assert_eq!(outcomes, vec![Outcome::BackgroundCaptured { references: 15 }]);

    queue.extend([
        Command::CaptureObject { region: None },
        Command::CompareHalves,
        Command::ToggleRecognition,
        Command::Quit,
        Command::ToggleRecognition,
    ]);
    let outcomes = session.drain(&with_object, &mut queue).unwrap();

    assert_eq!(outcomes[0], Outcome::ObjectCaptured { references: 1 });
    assert!(matches!(outcomes[1], Outcome::Distance(d) if d >= 0.0 && d.is_finite()));
    assert_eq!(outcomes[2], Outcome::RecognitionToggled(true));
    assert_eq!(outcomes[3], Outcome::Quit);
    assert_eq!(queue.len(), 1);

    let rendered = session.render(&with_object).unwrap();
    assert_eq!(rendered.dimensions(), (WIDTH, HEIGHT));
}

#[test]
fn test_one_key_per_frame_continues_after_recoverable_error() {
    let mut session = Session::default();
    let tiny = RgbImage::from_pixel(64, 64, Rgb([0, 0, 0]));
    let scene = empty_scene();
    let mut queue = CommandQueue::new();

    // Background capture on a frame smaller than one block fails and is skipped
    queue.extend(Command::from_key('b'));
    let error = session.drain(&tiny, &mut queue).unwrap_err();
    assert!(error.is_recoverable());
    assert!(queue.is_empty());
    assert!(session.background().is_empty());

    queue.extend(Command::from_key('b'));
    assert_eq!(
        session.drain(&scene, &mut queue).unwrap(),
        vec![Outcome::BackgroundCaptured { references: 15 }]
    );

    // Unmapped keys leave the frame without a command
    queue.extend(Command::from_key('.'));
    assert!(session.drain(&scene, &mut queue).unwrap().is_empty());

    queue.extend(Command::from_key('q'));
    assert_eq!(session.drain(&scene, &mut queue).unwrap(), vec![Outcome::Quit]);
}

#[test]
fn test_explicit_background_regions() {
    let mut session = Session::default();
    let regions = vec![Region::new(0, 0, 100, 100), Region::new(500, 300, 200, 200)];

    let outcome = session
        .dispatch(
            &empty_scene(),
            Command::CaptureBackground {
                regions: Some(regions),
            },
        )
        .unwrap();
    assert_eq!(outcome, Outcome::BackgroundCaptured { references: 2 });
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_config_drives_session() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("colorseg.json");
    std::fs::write(
        &path,
        r##"{ "block_size": 16, "colors": { "background": "#0000FF", "object": "#FFFF00" } }"##,
    )
    .unwrap();

    let config = SegmenterConfig::from_json_file(&path).unwrap();
    let mut session = Session::new(config).unwrap();
    session.capture_background(&empty_scene()).unwrap();
    session
        .capture_object(&scene_with_object(Region::centered(WIDTH, HEIGHT, 50)), None)
        .unwrap();

    let frame = scene_with_object(Region::new(32, 32, 16, 16));
    let grid = session.label_blocks(&frame).unwrap();
    assert_eq!((grid.columns(), grid.rows()), (40, 30));

    let overlay = session.segment(&frame).unwrap();
    assert_eq!(*overlay.get_pixel(40, 40), Rgb([255, 255, 0]));
    assert_eq!(*overlay.get_pixel(0, 0), Rgb([0, 0, 255]));
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("colorseg.json");
    std::fs::write(&path, r#"{ "block_size": 0 }"#).unwrap();

    let result = SegmenterConfig::from_json_file(&path);
    assert!(matches!(
        result,
        Err(SegmentationError::InvalidParameter { .. })
    ));
}

#[test]
fn test_overlay_written_to_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let frame_path = dir.path().join("frame.png");
    let out_path = dir.path().join("overlay.png");
    save_image(&scene_with_object(Region::new(64, 64, 32, 32)), &frame_path).unwrap();

    let mut session = Session::default();
    session.capture_background(&empty_scene()).unwrap();
    session
        .capture_object(&scene_with_object(Region::centered(WIDTH, HEIGHT, 50)), None)
        .unwrap();

    let frame = load_frame(&frame_path).unwrap();
    save_image(&session.segment(&frame).unwrap(), &out_path).unwrap();

    let overlay = load_frame(&out_path).unwrap();
    assert_eq!(overlay.dimensions(), (WIDTH, HEIGHT));
    assert_eq!(*overlay.get_pixel(70, 70), Rgb([255, 0, 0]));
}
