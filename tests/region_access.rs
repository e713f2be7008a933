//! Region read/write access, bounds checking, and mode enforcement.

use hybrid_mmap::{create_mmap, load_mmap, MappedFileHandle, MmapHandleError, OpenMode};
use std::fs;
use std::path::PathBuf;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("hybrid_mmap_region_{}_{}", name, std::process::id()));
    p
}

#[test]
fn write_then_read_back_within_one_mapping() {
    let path = tmp_path("write_then_read_back");
    let _ = fs::remove_file(&path);

    let mut handle = create_mmap(&path, 1024).expect("create");
    {
        let slice = handle.as_mut_slice(10, 6).expect("slice_mut");
        slice.copy_from_slice(b"ABCDEF");
    }
    handle.flush().expect("flush");

    let mut buf = [0u8; 6];
    handle.read_into(10, &mut buf).expect("read_into");
    assert_eq!(&buf, b"ABCDEF");
    assert_eq!(handle.as_slice(10, 6).expect("slice"), b"ABCDEF");

    handle.delete().expect("delete");
}

#[test]
fn empty_update_is_noop() {
    let path = tmp_path("empty_update");
    let _ = fs::remove_file(&path);

    let mut handle = create_mmap(&path, 64).expect("create");
    handle.update_region(64, b"").expect("empty write at end");
    handle.delete().expect("delete");
}

#[test]
fn out_of_bounds_access_reports_range() {
    let path = tmp_path("out_of_bounds");
    let _ = fs::remove_file(&path);

    let mut handle = create_mmap(&path, 1024).expect("create");

    let err = handle.as_slice(2048, 10).expect_err("must fail");
    match err {
        MmapHandleError::OutOfBounds { offset, len, total } => {
            assert_eq!((offset, len, total), (2048, 10, 1024));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        handle.as_slice(2048, 10).expect_err("must fail").to_string(),
        "range out of bounds: offset=2048, len=10, total=1024"
    );

    // Range ending past the region is rejected even when the offset is valid.
    assert!(handle.update_region(1020, b"12345").is_err());
    // Offset overflow must not wrap around.
    assert!(handle.as_slice(u64::MAX, 2).is_err());

    handle.delete().expect("delete");
}

#[test]
fn read_only_mapping_rejects_writes() {
    let path = tmp_path("read_only_rejects_writes");
    let _ = fs::remove_file(&path);

    let mut handle = create_mmap(&path, 128).expect("create");
    handle.update_region(0, b"seed").expect("update");
    handle.flush().expect("flush");
    handle.close(None).expect("close");

    let mut ro = load_mmap(&path, OpenMode::ReadOnly, 0).expect("open ro");
    let err = ro.update_region(0, b"nope").expect_err("must fail");
    assert!(matches!(err, MmapHandleError::InvalidMode(_)));
    assert_eq!(ro.as_slice(0, 4).expect("slice"), b"seed");
    ro.close(None).expect("close");

    let _ = fs::remove_file(&path);
}

#[test]
fn flush_range_persists_written_bytes() {
    let path = tmp_path("flush_range");
    let _ = fs::remove_file(&path);

    let mut handle = create_mmap(&path, 4096).expect("create");
    handle.update_region(100, b"RANGED").expect("update");
    handle.flush_range(100, 6).expect("flush_range");
    handle.flush_range(0, 0).expect("empty range");
    assert!(handle.flush_range(4000, 200).is_err());
    handle.close(None).expect("close");

    let ro = load_mmap(&path, OpenMode::ReadOnly, 0).expect("open ro");
    assert_eq!(ro.as_slice(100, 6).expect("slice"), b"RANGED");
    ro.close(None).expect("close");

    let _ = fs::remove_file(&path);
}

#[test]
fn buffer_handle_supports_region_access() {
    let mut handle = MappedFileHandle::from_buffer(vec![0u8; 32]);
    handle.update_region(4, b"heap").expect("update");

    let mut buf = [0u8; 4];
    handle.read_into(4, &mut buf).expect("read_into");
    assert_eq!(&buf, b"heap");

    // Range syncs are no-ops without a descriptor but still succeed.
    handle.flush_range(0, 32).expect("flush_range");
    handle.close(None).expect("close");
}
