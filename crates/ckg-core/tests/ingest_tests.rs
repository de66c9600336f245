use ckg_core::knowledge::ingest::{parse_function_name, resolve_path};
use ckg_core::knowledge::{
    deduplicate, filter_core, prepare_findings, CsvRecords, Finding, FindingParser,
    KnowledgeError, Record, RecordSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn row(location: &str, path: &str) -> Record {
    Record::from([
        ("Name".to_string(), "Memory leak".to_string()),
        ("Start Line".to_string(), location.to_string()),
        ("Path".to_string(), path.to_string()),
    ])
}

fn finding(name: &str, path: &str) -> Finding {
    Finding::new(name, path, None, "", "memory_leak")
}

fn names(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.function_name.as_str()).collect()
}

#[test]
fn test_scenario_png_create_read_struct() {
    let root = Path::new("/work/libpng");
    let parser = FindingParser::new(root, "memory_leak");
    let rows = vec![row(
        "function 'png_create_read_struct' defined, see line 412",
        "/pngrutil.c",
    )];

    let findings = parser.parse(&rows).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].function_name, "png_create_read_struct");
    assert_eq!(findings[0].line_hint, Some(412));
    assert_eq!(findings[0].file_path, root.join("pngrutil.c"));
    assert_eq!(
        findings[0].description,
        "function 'png_create_read_struct' defined, see line 412"
    );
}

#[test]
fn test_name_extracted_exactly() {
    for name in ["a", "png_do_read", "x_1", "weird name with spaces"] {
        let location = format!("prefix function '{}' suffix line 3", name);
        assert_eq!(parse_function_name(&location).as_deref(), Some(name));
    }
}

#[test]
fn test_rows_without_function_are_dropped() {
    let parser = FindingParser::new("/r", "memory_leak");
    let rows = vec![
        row("variable 'x' at line 2", "a.c"),
        row("function 'kept' at line 5", "b.c"),
    ];
    let findings = parser.parse(&rows).unwrap();
    assert_eq!(names(&findings), vec!["kept"]);
}

#[test]
fn test_empty_input_is_not_an_error() {
    let parser = FindingParser::new("/r", "memory_leak");
    assert!(parser.parse(&[]).unwrap().is_empty());
}

#[test]
fn test_missing_path_column() {
    let parser = FindingParser::new("/r", "memory_leak");
    let rows = vec![Record::from([(
        "Start Line".to_string(),
        "function 'f' line 1".to_string(),
    )])];
    assert!(matches!(
        parser.parse(&rows),
        Err(KnowledgeError::Format { .. })
    ));
}

#[test]
fn test_absolute_relative_path_stays_under_root() {
    let root = PathBuf::from("/r");
    assert_eq!(resolve_path(&root, "/etc/x.c"), PathBuf::from("/r/etc/x.c"));
}

#[test]
fn test_deduplicate_keeps_first_seen_order() {
    let input = vec![
        finding("b", "/r/1.c"),
        finding("a", "/r/2.c"),
        finding("b", "/r/3.c"),
        finding("c", "/r/4.c"),
        finding("a", "/r/5.c"),
    ];
    let once = deduplicate(input);
    assert_eq!(names(&once), vec!["b", "a", "c"]);
    assert_eq!(once[0].file_path, PathBuf::from("/r/1.c"));

    let twice = deduplicate(once.clone());
    assert_eq!(twice, once);
}

#[test]
fn test_filter_is_idempotent() {
    let patterns = ["/contrib/", "/test", "pngtest"];
    let input = vec![
        finding("a", "/r/png.c"),
        finding("b", "/r/contrib/x.c"),
        finding("c", "/r/pngtest.c"),
        finding("d", "/r/pngread.c"),
    ];
    let once = filter_core(input, &patterns);
    assert_eq!(names(&once), vec!["a", "d"]);
    assert_eq!(filter_core(once.clone(), &patterns), once);
}

#[test]
fn test_filter_over_excludes_by_substring() {
    let kept = filter_core(vec![finding("f", "/r/src/testing.c")], &["/test"]);
    assert!(kept.is_empty());
}

#[test]
fn test_prepare_findings_from_csv() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("results.csv");
    fs::write(
        &csv_path,
        "Name,Path,Start Line\n\
         Leak,/png.c,\"function 'png_free' defined, see line 10\"\n\
         Leak,/png.c,\"function 'png_free' defined, see line 90\"\n\
         Leak,/contrib/tools/pngfix.c,\"function 'fix' defined, see line 3\"\n\
         Leak,/pngread.c,no function here\n\
         Leak,/pngread.c,\"function 'png_read_info' defined\"\n",
    )
    .unwrap();

    let rows = CsvRecords::new(&csv_path).records().unwrap();
    assert_eq!(rows.len(), 5);

    let parser = FindingParser::new(temp_dir.path(), "memory_leak");
    let findings = prepare_findings(&parser, &rows, &["/contrib/"]).unwrap();

    assert_eq!(names(&findings), vec!["png_free", "png_read_info"]);
    assert_eq!(findings[0].line_hint, Some(10));
    assert_eq!(findings[1].line_hint, None);
}

#[test]
fn test_missing_csv_is_io_error() {
    let err = CsvRecords::new("/definitely/not/results.csv")
        .records()
        .unwrap_err();
    assert!(matches!(err, KnowledgeError::Io { .. }));
}
