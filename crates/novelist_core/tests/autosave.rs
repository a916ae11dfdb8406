use novelist_core::{
    from_json, run_autosave_once, spawn_autosave, AutoSaveTarget, PersistenceGateway,
    ProjectRegistry, SharedRegistry,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn shared_with_project(name: &str) -> SharedRegistry {
    let mut registry = ProjectRegistry::new();
    registry.create_project(name);
    let tree = registry.active_tree_mut().unwrap();
    let chapter = tree.add_chapter();
    tree.select_chapter(chapter, None).unwrap();
    tree.add_episode().unwrap();
    tree.load_episode(0, None).unwrap();
    tree.commit_episode_edit("opening", "波の音がした。");
    Arc::new(Mutex::new(registry))
}

#[test]
fn single_run_writes_snapshot_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("novel_data.json");
    let target = AutoSaveTarget {
        gateway: PersistenceGateway::new(&data_file),
        export_dir: Some(dir.path().join("exports")),
    };
    let shared = shared_with_project("Tide/Notes");

    run_autosave_once(&shared, &target).unwrap();

    let saved = from_json(&std::fs::read_to_string(&data_file).unwrap()).unwrap();
    assert_eq!(saved, *shared.lock().unwrap());
    let export =
        std::fs::read_to_string(dir.path().join("exports").join("Tide_Notes.txt")).unwrap();
    assert!(export.contains("波の音がした。"));
}

#[test]
fn run_without_export_dir_only_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let target = AutoSaveTarget {
        gateway: PersistenceGateway::new(dir.path().join("novel_data.json")),
        export_dir: None,
    };

    run_autosave_once(&shared_with_project("plain"), &target).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn background_saver_picks_up_later_edits_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("novel_data.json");
    let target = AutoSaveTarget {
        gateway: PersistenceGateway::new(&data_file),
        export_dir: None,
    };
    let shared = shared_with_project("tide");

    let handle = spawn_autosave(Arc::clone(&shared), target, Duration::from_millis(20)).unwrap();
    shared.lock().unwrap().create_project("second");

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut saved_projects = 0;
    while Instant::now() < deadline {
        if let Ok(text) = std::fs::read_to_string(&data_file) {
            if let Ok(registry) = from_json(&text) {
                saved_projects = registry.len();
                if saved_projects == 2 {
                    break;
                }
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    handle.stop();

    assert_eq!(saved_projects, 2);
}

#[test]
fn zero_period_is_rejected_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("novel_data.json");
    let target = AutoSaveTarget {
        gateway: PersistenceGateway::new(&data_file),
        export_dir: None,
    };

    let err = spawn_autosave(shared_with_project("tide"), target, Duration::ZERO).unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(!data_file.exists());
}
