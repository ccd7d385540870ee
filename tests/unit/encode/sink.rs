use super::*;

#[test]
fn filename_uses_prefix_millis_and_extension() {
    assert_eq!(
        suggested_filename("framed-photo", OutputFormat::Lossless, 1_700_000_000_123),
        "framed-photo-1700000000123.png"
    );
    assert_eq!(
        suggested_filename("x", OutputFormat::Lossy, 7),
        "x-7.jpg"
    );
    assert!(unix_millis_now() > 0);
}

#[test]
fn memory_output_keeps_last() {
    let mut out = MemoryOutput::new();
    assert!(out.last().is_none());
    out.accept(vec![1], "a.png").unwrap();
    out.accept(vec![2, 3], "b.png").unwrap();
    assert_eq!(out.last(), Some(("b.png", &[2u8, 3][..])));
    assert_eq!(out.count(), 2);
}

#[test]
fn directory_output_writes_files() {
    let dir = std::env::temp_dir().join(format!(
        "snapframe_dir_output_{}_{}",
        std::process::id(),
        unix_millis_now()
    ));
    let mut out = DirectoryOutput::new(&dir);
    out.accept(b"hello".to_vec(), "one.png").unwrap();
    assert_eq!(out.written(), &[dir.join("one.png")]);
    assert_eq!(std::fs::read(dir.join("one.png")).unwrap(), b"hello");
    assert_eq!(out.dir(), dir.as_path());
    std::fs::remove_dir_all(&dir).ok();
}
