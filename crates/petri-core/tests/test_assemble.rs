mod common;

use common::uniform_plane;
use petri_core::assemble::{assemble, save_hyperstack};
use petri_core::error::PetriError;
use petri_core::io::stack::StackReader;
use petri_core::plane::Calibration;
use petri_core::staging::StagingStore;

/// Stage `channels x frames` planes where each plane's uniform value encodes
/// its coordinate, and return the per-channel path lists.
fn stage_grid(
    store: &StagingStore,
    channels: usize,
    frames: usize,
) -> Vec<Vec<std::path::PathBuf>> {
    let mut staged = vec![Vec::new(); channels];
    for frame in 1..=frames {
        for (ch, paths) in staged.iter_mut().enumerate() {
            let value = (ch * 1000 + frame) as f32;
            let plane =
                uniform_plane(6, 4, value).with_calibration(Calibration::new(0.5, "um"));
            paths.push(store.stage(frame, ch, 0, &plane).unwrap());
        }
    }
    staged
}

#[test]
fn test_assemble_round_trips_staged_planes() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let staged = stage_grid(&store, 2, 3);

    let stack = assemble(&staged).unwrap();
    assert_eq!(stack.channels, 2);
    assert_eq!(stack.frames, 3);
    assert_eq!(stack.planes.len(), 6);

    for frame in 0..3 {
        for ch in 0..2 {
            let expected = (ch * 1000 + frame + 1) as f32;
            let plane = stack.plane(ch, frame);
            assert!(plane.data.iter().all(|&v| v == expected));
        }
    }
}

#[test]
fn test_assemble_imposes_channel_zero_calibration() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let staged = stage_grid(&store, 2, 2);

    let stack = assemble(&staged).unwrap();
    assert!((stack.calibration.pixel_width - 0.5).abs() < 1e-6);
    assert_eq!(stack.calibration.unit, "um");
}

#[test]
fn test_assemble_rejects_unequal_frame_counts() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let mut staged = stage_grid(&store, 2, 3);
    staged[1].pop();

    let result = assemble(&staged);
    assert!(matches!(
        result,
        Err(PetriError::DimensionMismatch {
            channel: 1,
            frames: 2,
            expected: 3,
        })
    ));
}

#[test]
fn test_assemble_rejects_empty_input() {
    assert!(matches!(assemble(&[]), Err(PetriError::EmptySequence)));
    assert!(matches!(
        assemble(&[Vec::new()]),
        Err(PetriError::EmptySequence)
    ));
}

#[test]
fn test_save_and_reopen_hyperstack() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let staged = stage_grid(&store, 2, 3);
    let stack = assemble(&staged).unwrap();

    let out = dir.path().join("result.tif");
    save_hyperstack(&stack, &out).unwrap();

    let mut reader = StackReader::open(&out).unwrap();
    assert_eq!(reader.channels(), 2);
    assert_eq!(reader.frames(), 3);
    let info = reader.info();
    assert_eq!(info.pages, 6);
    assert!((info.calibration.pixel_width - 0.5).abs() < 1e-5);
    assert_eq!(info.calibration.unit, "um");

    let plane = reader.read_plane(1, 2).unwrap();
    assert!(plane.data.iter().all(|&v| v == 1003.0));
}
