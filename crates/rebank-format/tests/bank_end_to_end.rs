#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests driving the full load, extract, merge, and save
//! cycle against synthetic banks built chunk by chunk.

use rebank_format::{
    BnkFormat, HeaderSection, HierarchySection, SoundBank, SubResource, chunk, fnv1,
};
use std::fs;
use std::path::Path;

/// Header + index [(100, 0, 4), (200, 16, 3)] + padded payload +
/// hierarchy {count: 1, 4 blob bytes}.
fn fixture_bytes() -> Vec<u8> {
    let mut index_payload = Vec::new();
    for (id, offset, size) in [(100u32, 0u32, 4u32), (200, 16, 3)] {
        index_payload.extend_from_slice(&id.to_le_bytes());
        index_payload.extend_from_slice(&offset.to_le_bytes());
        index_payload.extend_from_slice(&size.to_le_bytes());
    }

    let mut data_payload = vec![0x01, 0x02, 0x03, 0x04];
    data_payload.resize(16, 0);
    data_payload.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

    let mut hirc_payload = 1u32.to_le_bytes().to_vec();
    hirc_payload.extend_from_slice(&[0x10, 0x20, 0x30, 0x40]);

    let mut out = Vec::new();
    chunk::write_chunk(&mut out, chunk::TAG_HEADER, HeaderSection::synthesize().payload())
        .expect("header chunk should write");
    chunk::write_chunk(&mut out, chunk::TAG_INDEX, &index_payload)
        .expect("index chunk should write");
    chunk::write_chunk(&mut out, chunk::TAG_DATA, &data_payload)
        .expect("data chunk should write");
    chunk::write_chunk(&mut out, chunk::TAG_HIERARCHY, &hirc_payload)
        .expect("hierarchy chunk should write");
    out
}

fn write_fixture(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, fixture_bytes()).expect("fixture should write");
    path
}

// --- Load and extract ---

#[test]
fn load_then_extract_all_resources() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    let out_dir = dir.path().join("out");
    let written = bank.extract(&out_dir, &[], "wem").expect("extract should succeed");

    assert_eq!(written.len(), 2);
    assert_eq!(written[0], out_dir.join("100.wem"));
    assert_eq!(written[1], out_dir.join("200.wem"));
    assert_eq!(
        fs::read(&written[0]).expect("resource file should read"),
        vec![0x01, 0x02, 0x03, 0x04]
    );
    assert_eq!(
        fs::read(&written[1]).expect("resource file should read"),
        vec![0xAA, 0xBB, 0xCC]
    );
}

#[test]
fn extract_selected_ids_only() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    let out_dir = dir.path().join("out");
    let written = bank
        .extract(&out_dir, &[200], "wem")
        .expect("extract should succeed");

    assert_eq!(written.len(), 1);
    assert!(out_dir.join("200.wem").exists());
    assert!(!out_dir.join("100.wem").exists());
}

#[test]
fn extract_unknown_id_fails() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    let result = bank.extract(dir.path().join("out"), &[999], "wem");
    assert!(matches!(
        result,
        Err(rebank_format::Error::ResourceNotFound(999))
    ));
}

#[test]
fn bulk_extract_writes_sections_in_chunk_form() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let bank = SoundBank::load(&bank_path).expect("load should succeed");
    let out_dir = dir.path().join("out");
    let written = bank
        .extract_bulk(&out_dir, "fixture")
        .expect("bulk extract should succeed");

    assert_eq!(written.len(), 3);

    let didx = fs::read(out_dir.join("fixture.didx")).expect("didx file should read");
    assert_eq!(&didx[0..4], b"DIDX");
    assert_eq!(u32::from_le_bytes([didx[4], didx[5], didx[6], didx[7]]), 24);

    let data = fs::read(out_dir.join("fixture.data")).expect("data file should read");
    assert_eq!(&data[0..4], b"DATA");
    assert_eq!(data.len(), 8 + 19);

    let hirc = fs::read(out_dir.join("fixture.hirc")).expect("hirc file should read");
    assert_eq!(&hirc[0..4], b"HIRC");
    assert_eq!(
        u32::from_le_bytes([hirc[8], hirc[9], hirc[10], hirc[11]]),
        1
    );
}

// --- Save and round-trip ---

#[test]
fn save_derives_archive_id_from_file_name() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    let saved_path = dir.path().join("bank.bnk");
    bank.save(&saved_path).expect("save should succeed");

    let reloaded = SoundBank::load(&saved_path).expect("reload should succeed");
    assert_eq!(reloaded.id(), fnv1("bank"));
    assert_eq!(reloaded.id(), 0x67f9_e01f);
}

#[test]
fn round_trip_preserves_index_and_payload() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    let saved_path = dir.path().join("renamed.bnk");
    bank.save(&saved_path).expect("save should succeed");

    let reloaded = SoundBank::load(&saved_path).expect("reload should succeed");
    assert_eq!(
        reloaded.index().expect("index present").entries(),
        bank.index().expect("index present").entries()
    );
    assert_eq!(
        reloaded.data().expect("payload present").raw(),
        bank.data().expect("payload present").raw()
    );
    // The ID tracks the new file name, everything else survives verbatim
    assert_eq!(reloaded.id(), fnv1("renamed"));
}

#[test]
fn format_trait_round_trip() {
    <SoundBank as BnkFormat>::verify_round_trip(&fixture_bytes())
        .expect("round trip should verify");
}

// --- Merge ---

#[test]
fn merge_save_reload_extracts_union() {
    let dir = tempfile::tempdir().expect("tempdir should create");

    let a = SoundBank::assemble(
        vec![
            SubResource::new(1, vec![0xA1; 17]),
            SubResource::new(2, vec![0xA2; 16]),
        ],
        Some(HierarchySection::new(2, vec![0x01, 0x02])),
    )
    .expect("assemble should succeed");
    let b = SoundBank::assemble(
        vec![
            SubResource::new(2, vec![0xB2; 5]),
            SubResource::new(3, vec![0xB3; 33]),
        ],
        Some(HierarchySection::new(1, vec![0x03])),
    )
    .expect("assemble should succeed");

    let mut merged = SoundBank::merge(&a, &b).expect("merge should succeed");
    let merged_path = dir.path().join("merged.bnk");
    merged.save(&merged_path).expect("save should succeed");

    let mut reloaded = SoundBank::load(&merged_path).expect("reload should succeed");
    assert_eq!(reloaded.id(), fnv1("merged"));

    let out_dir = dir.path().join("out");
    let written = reloaded
        .extract(&out_dir, &[], "wem")
        .expect("extract should succeed");
    assert_eq!(written.len(), 3);
    assert_eq!(
        fs::read(out_dir.join("1.wem")).expect("read should succeed"),
        vec![0xA1; 17]
    );
    assert_eq!(
        fs::read(out_dir.join("2.wem")).expect("read should succeed"),
        vec![0xB2; 5]
    );
    assert_eq!(
        fs::read(out_dir.join("3.wem")).expect("read should succeed"),
        vec![0xB3; 33]
    );

    // Offsets in the merged index are 16-byte aligned except after the end
    let entries = reloaded.index().expect("index present").entries();
    for entry in entries {
        assert_eq!(entry.offset % 16, 0);
    }
    assert_eq!(
        reloaded.hierarchy().expect("hierarchy present").entry_count(),
        3
    );
}

#[test]
fn replace_then_save_round_trips_new_bytes() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let bank_path = write_fixture(dir.path(), "fixture.bnk");

    let mut bank = SoundBank::load(&bank_path).expect("load should succeed");
    bank.replace(100, vec![0x5A; 21]).expect("replace should succeed");
    bank.correct_offsets().expect("correct_offsets should succeed");

    let saved_path = dir.path().join("patched.bnk");
    bank.save(&saved_path).expect("save should succeed");

    let mut reloaded = SoundBank::load(&saved_path).expect("reload should succeed");
    let out_dir = dir.path().join("out");
    reloaded
        .extract(&out_dir, &[100, 200], "wem")
        .expect("extract should succeed");

    assert_eq!(
        fs::read(out_dir.join("100.wem")).expect("read should succeed"),
        vec![0x5A; 21]
    );
    assert_eq!(
        fs::read(out_dir.join("200.wem")).expect("read should succeed"),
        vec![0xAA, 0xBB, 0xCC]
    );
}
