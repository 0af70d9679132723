use super::*;

fn temp_prefix(name: &str) -> String {
    let dir = std::env::temp_dir().join(format!(
        "basvid_segment_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("out").to_string_lossy().into_owned()
}

fn read_segments(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| std::fs::read_to_string(format!("{prefix}_{i}.bas")).unwrap())
        .collect()
}

#[test]
fn lines_pack_under_the_byte_budget() {
    let prefix = temp_prefix("pack");
    let lines: Vec<String> = (0..7).map(|i| format!("aaaaaaaaa{i}")).collect();
    // Each line costs 10 + 1 separator bytes; 25-byte budget fits two.
    let count = write_segments(&lines, 25, &prefix, "bas").unwrap();
    assert_eq!(count, 4);
    for seg in read_segments(&prefix, count) {
        assert!(seg.len() <= 25, "segment of {} bytes over budget", seg.len());
    }
}

#[test]
fn concatenation_reconstructs_the_line_sequence() {
    let prefix = temp_prefix("concat");
    let lines = vec!["alpha", "beta", "gamma", "delta", "epsilon"];
    let count = write_segments(&lines, 12, &prefix, "bas").unwrap();
    let joined: String = read_segments(&prefix, count).concat();
    assert_eq!(joined, "alpha\nbeta\ngamma\ndelta\nepsilon\n");
}

#[test]
fn oversized_line_gets_its_own_segment() {
    let prefix = temp_prefix("oversized");
    let big = "x".repeat(40);
    let lines = vec!["small", big.as_str(), "tiny"];
    let count = write_segments(&lines, 25, &prefix, "bas").unwrap();
    assert_eq!(count, 3);
    let segs = read_segments(&prefix, count);
    assert_eq!(segs[0], "small\n");
    assert_eq!(segs[1], format!("{big}\n"));
    assert_eq!(segs[2], "tiny\n");
}

#[test]
fn empty_input_writes_no_segments() {
    let prefix = temp_prefix("empty");
    let count = write_segments(Vec::<String>::new(), 25, &prefix, "bas").unwrap();
    assert_eq!(count, 0);
    assert!(!std::path::Path::new(&format!("{prefix}_0.bas")).exists());
}

#[test]
fn zero_budget_is_invalid() {
    assert!(matches!(
        SegmentWriter::new("p", "bas", 0),
        Err(BasvidError::InvalidInput(_))
    ));
}

#[test]
fn unwritable_destination_reports_io_failure() {
    let prefix = temp_prefix("blocked");
    // Turn the would-be parent directory into a plain file.
    std::fs::write(format!("{prefix}dir"), b"not a directory").unwrap();
    let bad_prefix = format!("{prefix}dir/out");
    let err = write_segments(vec!["line"], 25, &bad_prefix, "bas").unwrap_err();
    assert!(matches!(err, BasvidError::Io(_)));
}

#[test]
fn incremental_writer_counts_segments() {
    let prefix = temp_prefix("incremental");
    let mut w = SegmentWriter::new(&prefix, "bas", 8).unwrap();
    w.push("abc").unwrap();
    w.push("def").unwrap();
    w.push("ghi").unwrap();
    // 4 bytes per line, budget 8: two lines per segment.
    assert_eq!(w.finish().unwrap(), 2);
}
