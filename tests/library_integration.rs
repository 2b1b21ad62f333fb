//! End-to-end checks: real files on disk, the SQLite store, and the library
//! manager restarted between steps the way the application restarts.

use std::fs;
use std::path::Path;
use std::time::Duration;

use onsong_library::library::{codec, SONGS_KEY};
use onsong_library::{
    FsTextReader, ImportOutcome, KeyValueStore, LibraryManager, PathPicker, SongId,
    SqliteStore,
};

fn open(path: &Path) -> LibraryManager<SqliteStore> {
    LibraryManager::load(SqliteStore::open(path).unwrap()).with_edit_debounce(Duration::ZERO)
}

fn import(manager: &mut LibraryManager<SqliteStore>, file: &Path) -> SongId {
    let mut picker = PathPicker::new(Some(file.to_path_buf()));
    match manager.import_file(&mut picker, &FsTextReader) {
        ImportOutcome::Imported(id) => id,
        other => panic!("import of {} failed: {other:?}", file.display()),
    }
}

#[test]
fn library_survives_restart_with_edits_and_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");
    let first = dir.path().join("Amazing Grace.onsong");
    let second = dir.path().join("Be Thou My Vision.onsong");
    fs::write(&first, "Title: Amazing Grace\n[G]Amazing [C]grace").unwrap();
    fs::write(&second, "Title: Be Thou My Vision\n[D]Be thou my [G]vision").unwrap();

    let (grace, vision) = {
        let mut manager = open(&db);
        let grace = import(&mut manager, &first);
        let vision = import(&mut manager, &second);
        manager.select_record(grace);
        manager.edit_content("Title: Amazing Grace\nKey: G");
        (grace, vision)
    };

    let mut manager = open(&db);
    let names: Vec<_> = manager.songs().iter().map(|song| song.name.as_str()).collect();
    assert_eq!(names, ["Amazing Grace.onsong", "Be Thou My Vision.onsong"]);
    assert_eq!(manager.get(grace).unwrap().content, "Title: Amazing Grace\nKey: G");
    assert_eq!(
        manager.get(vision).unwrap().uri,
        second.display().to_string()
    );
    assert_eq!(manager.selected(), None);

    assert!(manager.delete_song(grace));
    drop(manager);

    let manager = open(&db);
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.songs()[0].id, vision);
}

#[test]
fn source_file_is_not_reread_after_import() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");
    let file = dir.path().join("song.onsong");
    fs::write(&file, "original").unwrap();

    let mut manager = open(&db);
    let id = import(&mut manager, &file);
    fs::write(&file, "changed on disk").unwrap();
    fs::remove_file(&file).unwrap();
    drop(manager);

    let manager = open(&db);
    assert_eq!(manager.get(id).unwrap().content, "original");
}

#[test]
fn corrupt_blob_on_disk_loads_as_empty_and_is_replaced_on_next_import() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");
    SqliteStore::open(&db)
        .unwrap()
        .set(SONGS_KEY, "<<not json>>")
        .unwrap();
    let file = dir.path().join("X");
    fs::write(&file, "abc").unwrap();

    let mut manager = open(&db);
    assert!(manager.is_empty());

    import(&mut manager, &file);

    let blob = manager.store().get(SONGS_KEY).unwrap().unwrap();
    let stored = codec::decode(&blob).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "X");
    assert_eq!(stored[0].content, "abc");
}

#[test]
fn unreadable_import_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");
    let binary = dir.path().join("cover.png");
    fs::write(&binary, [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();

    let mut manager = open(&db);
    let mut picker = PathPicker::new(Some(binary));
    let outcome = manager.import_file(&mut picker, &FsTextReader);

    assert!(matches!(outcome, ImportOutcome::Failed(_)));
    assert!(manager.is_empty());
    assert_eq!(manager.store().get(SONGS_KEY).unwrap(), None);
}

#[test]
fn legacy_blob_without_ids_gets_ids_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");
    SqliteStore::open(&db)
        .unwrap()
        .set(
            SONGS_KEY,
            r#"[{"name":"A","uri":"file:///A","content":"1"},{"name":"A","uri":"file:///A2","content":"2"}]"#,
        )
        .unwrap();

    let mut manager = open(&db);
    assert_eq!(manager.len(), 2);
    let second = manager.songs()[1].id;
    assert_ne!(manager.songs()[0].id, second);

    manager.select_record(second);
    manager.edit_content("two");
    assert_eq!(manager.songs()[0].content, "1");

    let reloaded = open(&db);
    assert_eq!(reloaded.songs(), manager.songs());
}
