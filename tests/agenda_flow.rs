use agenda_manager::interchange::{export_to_path, import_from_path, import_into_store};
use agenda_manager::search::{run_search, PriorityFilter, SearchRequest};
use agenda_manager::{AgendaEntry, AgendaStore, Priority};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn seed(store: &mut AgendaStore) {
    for (title, description, when, priority) in [
        ("Laporan bulanan", "kirim ke kantor pusat", at(3, 9, 0), Priority::Tinggi),
        ("Olahraga pagi", "lari keliling taman", at(1, 6, 30), Priority::Rendah),
        ("Belanja mingguan", "", at(2, 17, 0), Priority::Sedang),
    ] {
        store
            .create(&AgendaEntry::new(title, description, when, priority))
            .unwrap();
    }
}

fn titles(entries: &[AgendaEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.title.as_str()).collect()
}

#[test]
fn file_store_survives_reopen_in_schedule_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("agenda.db");

    let mut store = AgendaStore::open(&path).unwrap();
    seed(&mut store);
    store.close().unwrap();

    let mut store = AgendaStore::open(&path).unwrap();
    let all = store.get_all().unwrap();
    assert_eq!(
        titles(&all),
        ["Olahraga pagi", "Belanja mingguan", "Laporan bulanan"]
    );
    assert_eq!(store.count().unwrap(), 3);

    let urgent_work = store.get_by_priority(Priority::Tinggi).unwrap();
    assert_eq!(titles(&urgent_work), ["Laporan bulanan"]);
    assert_eq!(urgent_work[0].scheduled_at, at(3, 9, 0));
    assert!(store.search("foo").unwrap().is_empty());
}

#[test]
fn detached_store_connects_on_first_use() {
    let dir = TempDir::new().unwrap();
    let mut store = AgendaStore::detached(dir.path().join("agenda.db"));
    assert!(!store.is_connected());
    assert_eq!(store.count().unwrap(), 0);
    assert!(store.is_connected());
}

#[test]
fn keyword_and_priority_filter_combine() {
    let mut store = AgendaStore::in_memory().unwrap();
    seed(&mut store);

    let request = SearchRequest::from_inputs("  PAGI ", PriorityFilter::All);
    let outcome = run_search(&mut store, &request).unwrap();
    assert_eq!(titles(&outcome.entries), ["Olahraga pagi"]);
    assert_eq!(outcome.status(), "Found 1 agenda | Search: \"PAGI\"");

    let request = SearchRequest::from_inputs("an", PriorityFilter::Only(Priority::Tinggi));
    let outcome = run_search(&mut store, &request).unwrap();
    assert_eq!(titles(&outcome.entries), ["Laporan bulanan"]);

    let request = SearchRequest::from_inputs("", PriorityFilter::Only(Priority::Urgent));
    let outcome = run_search(&mut store, &request).unwrap();
    assert!(outcome.entries.is_empty());
    assert_eq!(outcome.status(), "No agenda found | Filter: Urgent");
}

#[test]
fn export_wipe_import_restores_every_entry() {
    let dir = TempDir::new().unwrap();
    let mut store = AgendaStore::in_memory().unwrap();
    seed(&mut store);
    let original = store.get_all().unwrap();

    let written = export_to_path(&original, &dir.path().join("backup"), at(5, 12, 0)).unwrap();
    assert_eq!(written, dir.path().join("backup.json"));

    assert_eq!(store.delete_all().unwrap(), 3);
    assert_eq!(store.count().unwrap(), 0);

    let records = import_from_path(&written).unwrap();
    let report = import_into_store(&mut store, records);
    assert_eq!((report.succeeded, report.failed, report.total()), (3, 0, 3));

    let restored = store.get_all().unwrap();
    assert_eq!(titles(&restored), titles(&original));
    for (before, after) in original.iter().zip(&restored) {
        assert_eq!(before.description, after.description);
        assert_eq!(before.scheduled_at, after.scheduled_at);
        assert_eq!(before.priority, after.priority);
    }
}

#[test]
fn bare_list_import_skips_bad_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.json");
    std::fs::write(
        &path,
        r#"[
            {"id": 7, "judul": "Rapat tim", "deskripsi": "ruang 2",
             "tanggalWaktu": "2025-01-04 10:00:00", "prioritas": "Urgent"},
            {"judul": "Rapat tanpa waktu", "prioritas": "Sedang"},
            {"judul": "Rapat aneh", "tanggalWaktu": "2025-01-04 11:00:00",
             "prioritas": "Penting"}
        ]"#,
    )
    .unwrap();

    let mut store = AgendaStore::in_memory().unwrap();
    let report = import_into_store(&mut store, import_from_path(&path).unwrap());
    assert_eq!((report.succeeded, report.failed), (1, 2));

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Rapat tim");
    assert_eq!(all[0].priority, Priority::Urgent);
    assert_ne!(all[0].id, 7);
}

#[test]
fn malformed_file_imports_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"exportDate": "2025-01-05 12:00:00"}"#).unwrap();
    assert!(import_from_path(&path).is_err());
    assert!(import_from_path(&dir.path().join("missing.json")).is_err());
}
