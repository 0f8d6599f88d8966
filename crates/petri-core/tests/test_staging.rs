mod common;

use common::uniform_plane;
use petri_core::io::plane_io::load_plane;
use petri_core::plane::Calibration;
use petri_core::staging::StagingStore;

#[test]
fn test_stage_writes_keyed_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let plane = uniform_plane(4, 4, 10.0);

    let path = store.stage(1, 0, 0, &plane).unwrap();
    assert!(path.exists());
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with(store.token()));
    assert!(name.ends_with("_frame1_channel0_Loc0.tif"));
    assert_eq!(path.parent().unwrap(), dir.path().join("temp_dir"));
}

#[test]
fn test_staged_plane_round_trips_calibration() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let plane = uniform_plane(4, 4, 321.0).with_calibration(Calibration::new(0.25, "um"));

    let path = store.stage(2, 1, 0, &plane).unwrap();
    let loaded = load_plane(&path).unwrap();
    assert_eq!(loaded.data, plane.data);
    assert!((loaded.calibration.pixel_width - 0.25).abs() < 1e-6);
    assert_eq!(loaded.calibration.unit, "um");
}

#[test]
fn test_full_unit_stages_one_file_per_plane() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    let plane = uniform_plane(4, 4, 5.0);

    for frame in 1..=3 {
        for channel in 0..2 {
            store.stage(frame, channel, 0, &plane).unwrap();
        }
    }

    let count = std::fs::read_dir(store.dir()).unwrap().count();
    assert_eq!(count, 6);
}

#[test]
fn test_cleanup_removes_only_own_token_and_location() {
    let dir = tempfile::tempdir().unwrap();
    let plane = uniform_plane(4, 4, 5.0);

    let store_a = StagingStore::create(dir.path()).unwrap();
    let a_loc0 = store_a.stage(1, 0, 0, &plane).unwrap();
    let a_loc1 = store_a.stage(1, 0, 1, &plane).unwrap();

    let store_b = StagingStore::create(dir.path()).unwrap();
    let b_loc0 = store_b.stage(1, 0, 0, &plane).unwrap();

    store_a.cleanup(0);
    assert!(!a_loc0.exists());
    assert!(a_loc1.exists());
    assert!(b_loc0.exists(), "other batch tokens must survive cleanup");
}

#[test]
fn test_cleanup_twice_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    store.stage(1, 0, 0, &uniform_plane(4, 4, 5.0)).unwrap();

    store.cleanup(0);
    let after_first = std::fs::read_dir(store.dir()).unwrap().count();
    store.cleanup(0);
    let after_second = std::fs::read_dir(store.dir()).unwrap().count();
    assert_eq!(after_first, 0);
    assert_eq!(after_second, 0);
}

#[test]
fn test_scratch_dir_removed_only_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::create(dir.path()).unwrap();
    store.stage(1, 0, 0, &uniform_plane(4, 4, 5.0)).unwrap();

    store.remove_dir_if_empty();
    assert!(store.dir().exists(), "non-empty scratch dir must survive");

    store.cleanup(0);
    store.remove_dir_if_empty();
    assert!(!store.dir().exists());
}
