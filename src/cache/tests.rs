use std::path::{Path, PathBuf};

use super::*;
use crate::library::{Mtime, ScanResult, TimestampMap, TrackRecord};

fn record(path: &str, title: &str) -> TrackRecord {
    TrackRecord {
        path: PathBuf::from(path),
        title: title.into(),
        artist: "Artist".into(),
        album: String::new(),
        duration_seconds: 12.5,
    }
}

fn snapshot(root: &str, titles: &[(&str, i64)]) -> Snapshot {
    let mut result = ScanResult::default();
    for (name, t) in titles {
        let p = format!("{root}/{name}");
        result.tracks.push(record(&p, name));
        result.timestamps.insert(PathBuf::from(&p), Mtime::from_nanos(*t));
    }
    result.extracted_count = result.tracks.len();
    Snapshot::from_result(Path::new(root), &result)
}

fn exercise_contract(store: &dyn SnapshotStore) {
    let a = Path::new("/music/a");
    let b = Path::new("/music/b");

    assert_eq!(store.get(a).unwrap(), None);

    let first = snapshot("/music/a", &[("x.mp3", 1), ("y.mp3", 2)]);
    store.put(a, first.clone()).unwrap();
    assert_eq!(store.get(a).unwrap(), Some(first));

    // Replacement is wholesale: nothing of the first snapshot survives.
    let second = snapshot("/music/a", &[("z.mp3", 3)]);
    store.put(a, second.clone()).unwrap();
    let got = store.get(a).unwrap().unwrap();
    assert_eq!(got, second);
    assert!(!got.timestamps.contains_key(Path::new("/music/a/x.mp3")));

    store.put(b, snapshot("/music/b", &[("w.mp3", 4)])).unwrap();
    store.delete(a).unwrap();
    assert_eq!(store.get(a).unwrap(), None);
    assert!(store.get(b).unwrap().is_some());

    // Deleting a missing key is fine.
    store.delete(a).unwrap();

    store.clear().unwrap();
    assert_eq!(store.get(b).unwrap(), None);
}

#[test]
fn memory_store_honours_contract() {
    exercise_contract(&MemoryStore::new());
}

#[test]
fn json_store_honours_contract() {
    let dir = tempfile::tempdir().unwrap();
    exercise_contract(&JsonStore::new(dir.path().join("snapshots.json")));
}

#[test]
fn json_store_persists_across_instances_and_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache").join("snapshots.json");
    let snap = snapshot("/music", &[("a.mp3", 100)]);

    JsonStore::new(&path)
        .put(Path::new("/music"), snap.clone())
        .unwrap();
    assert!(path.exists());

    let reopened = JsonStore::new(&path);
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(reopened.get(Path::new("/music")).unwrap(), Some(snap));
}

#[test]
fn json_store_reports_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshots.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let store = JsonStore::new(&path);
    assert!(matches!(
        store.get(Path::new("/music")),
        Err(CacheError::Json(_))
    ));
    // Clearing recovers a broken file.
    store.clear().unwrap();
    assert_eq!(store.get(Path::new("/music")).unwrap(), None);
}

#[test]
fn json_store_put_replaces_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshots.json");
    std::fs::write(&path, b"{ truncated").unwrap();

    let store = JsonStore::new(&path);
    let snap = snapshot("/music", &[("a.mp3", 100)]);
    store.put(Path::new("/music"), snap.clone()).unwrap();

    assert_eq!(store.get(Path::new("/music")).unwrap(), Some(snap));
}

#[test]
fn json_stores_sharing_a_file_keep_every_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshots.json");

    let writers: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|side| {
            let store = JsonStore::new(&path);
            std::thread::spawn(move || {
                for i in 0..40 {
                    let root = format!("/music/{side}/{i}");
                    store
                        .put(Path::new(&root), snapshot(&root, &[("a.mp3", i)]))
                        .unwrap();
                }
            })
        })
        .collect();
    for w in writers {
        w.join().unwrap();
    }

    let store = JsonStore::new(&path);
    for side in ["left", "right"] {
        for i in 0..40 {
            let root = format!("/music/{side}/{i}");
            assert!(
                store.get(Path::new(&root)).unwrap().is_some(),
                "lost snapshot for {root}"
            );
        }
    }
}

#[cfg(unix)]
#[test]
fn json_store_skips_paths_that_are_not_utf8() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path().join("snapshots.json"));

    let mut snap = snapshot("/music", &[("a.mp3", 100)]);
    let odd = Path::new("/music").join(OsStr::from_bytes(b"caf\xe9.mp3"));
    snap.tracks.push(TrackRecord::fallback(&odd));
    snap.timestamps.insert(odd.clone(), Mtime::from_nanos(7));

    store.put(Path::new("/music"), snap).unwrap();

    let got = store.get(Path::new("/music")).unwrap().unwrap();
    assert_eq!(got.tracks.len(), 1);
    assert_eq!(got.tracks[0].path, PathBuf::from("/music/a.mp3"));
    assert!(!got.timestamps.contains_key(&odd));

    // A root that cannot be a JSON key is not cached at all.
    let odd_root = Path::new("/").join(OsStr::from_bytes(b"m\xfcsik"));
    store.put(&odd_root, snapshot("/elsewhere", &[])).unwrap();
    assert_eq!(store.get(&odd_root).unwrap(), None);
}

#[test]
fn retain_encodable_keeps_ordinary_paths() {
    let mut snap = snapshot("/music", &[("a.mp3", 1), ("b.flac", 2)]);
    assert_eq!(snap.retain_encodable(), 0);
    assert_eq!(snap.tracks.len(), 2);
    assert_eq!(snap.timestamps.len(), 2);
}

#[test]
fn snapshot_serializes_with_camel_case_fields() {
    let snap = snapshot("/music", &[("a.mp3", 100)]);
    let v = serde_json::to_value(&snap).unwrap();

    assert_eq!(v["rootPath"], "/music");
    assert!(v["capturedAt"].as_u64().unwrap() > 0);
    assert_eq!(v["timestamps"]["/music/a.mp3"], 100);
    assert_eq!(v["tracks"][0]["durationSeconds"], 12.5);
    assert_eq!(v["tracks"][0]["title"], "a.mp3");
}

#[test]
fn snapshot_into_request_carries_prior_state() {
    let snap = snapshot("/music", &[("a.mp3", 100)]);
    let request = snap.clone().into_request();
    assert_eq!(request.root, PathBuf::from("/music"));
    assert_eq!(request.prior_tracks, snap.tracks);

    let mut expected = TimestampMap::new();
    expected.insert(PathBuf::from("/music/a.mp3"), Mtime::from_nanos(100));
    assert_eq!(request.prior_timestamps, expected);
}
