use ckg_core::knowledge::extractor::{extract_calls, extract_signature, CALL_KEYWORDS};
use ckg_core::knowledge::{
    CallExtractor, ExtractionFailure, ExtractorCapability, Finding, GraphBuilder, KnowledgeGraph,
    SourceLocator,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = root.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn finding(name: &str, path: &Path) -> Finding {
    Finding::new(name, path, None, format!("function '{}'", name), "memory_leak")
}

#[tokio::test]
async fn test_scenario_calls_and_signature() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "foo.c",
        "int foo(int x) {\n  return bar(x) + 1;\n}\n",
    );

    let (graph, stats) = GraphBuilder::new().build(vec![finding("foo", &path)]).await;
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.extraction_failures, 0);

    let node = graph.get("foo").unwrap();
    assert_eq!(node.calls, BTreeSet::from(["bar".to_string()]));
    assert!(node.signature.starts_with("int foo(int x)"));
    assert_eq!(node.file_path, path);
    assert!(node.is_extracted());
}

#[tokio::test]
async fn test_header_below_comment_or_prototype_is_not_a_call() {
    let temp_dir = TempDir::new().unwrap();
    let commented = write(
        temp_dir.path(),
        "commented.c",
        "/* foo: adds one */\nint foo(int x) {\n  return bar(x) + 1;\n}\n",
    );
    let declared = write(
        temp_dir.path(),
        "declared.c",
        "static int foo(int x);\n\nint foo(int x) {\n  return bar(x) + 1;\n}\n",
    );

    for path in [commented, declared] {
        let (graph, _) = GraphBuilder::new().build(vec![finding("foo", &path)]).await;
        let node = graph.get("foo").unwrap();
        assert_eq!(node.calls, BTreeSet::from(["bar".to_string()]), "{}", path.display());
        assert!(!node.is_recursive());
        assert_eq!(node.signature, "int foo(int x)");
    }
}

#[tokio::test]
async fn test_scenario_missing_file_gives_placeholder() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gone.c");

    let locator = SourceLocator::default();
    assert!(matches!(
        locator.locate(&path, "png_gone", Some(3)),
        Err(ExtractionFailure::Unreadable { .. })
    ));

    let (graph, stats) = GraphBuilder::new().build(vec![finding("png_gone", &path)]).await;
    assert_eq!(stats.extraction_failures, 1);

    let node = graph.get("png_gone").unwrap();
    assert!(node.source_text.is_empty());
    assert_eq!(node.signature, "<unknown> png_gone(...)");
    assert!(node.headers.is_empty());
    assert!(node.calls.is_empty());
    assert!(!node.is_extracted());

    // "no node" and "node with empty source" stay distinguishable
    assert!(graph.get("png_other").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_scenario_first_writer_wins_across_files() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(temp_dir.path(), "a.c", "void dup(void)\n{\n  first();\n}\n");
    let b = write(temp_dir.path(), "b.c", "void dup(void)\n{\n  second();\n}\n");

    let (graph, stats) = GraphBuilder::new()
        .build(vec![finding("dup", &a), finding("dup", &b)])
        .await;

    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.duplicates, 1);
    let node = graph.get("dup").unwrap();
    assert_eq!(node.file_path, a);
    assert!(node.calls.contains("first"));
}

#[tokio::test]
async fn test_extend_keeps_existing_nodes() {
    let temp_dir = TempDir::new().unwrap();
    let a = write(temp_dir.path(), "a.c", "void f(void)\n{\n  one();\n}\n");
    let b = write(temp_dir.path(), "b.c", "void f(void)\n{\n  two();\n}\n");

    let builder = GraphBuilder::new();
    let (mut graph, _) = builder.build(vec![finding("f", &a)]).await;
    let original = graph.get("f").unwrap().source_text.clone();

    let stats = builder.extend(&mut graph, vec![finding("f", &b)]).await;
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(graph.get("f").unwrap().source_text, original);
}

#[tokio::test]
async fn test_merge_follows_input_order_under_concurrency() {
    let temp_dir = TempDir::new().unwrap();
    let mut findings = Vec::new();
    for i in 0..40 {
        let name = format!("fn_{}", i);
        let body = format!("int {}(void)\n{{\n  return callee_{}();\n}}\n", name, i);
        let path = write(temp_dir.path(), &format!("f{}.c", i), &body);
        findings.push(finding(&name, &path));
    }

    let (graph, stats) = GraphBuilder::new().workers(4).build(findings).await;
    assert_eq!(stats.inserted, 40);

    let order: Vec<String> = graph.iter().map(|n| n.name.clone()).collect();
    let expected: Vec<String> = (0..40).map(|i| format!("fn_{}", i)).collect();
    assert_eq!(order, expected);
}

#[tokio::test]
async fn test_self_recursion_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "fact.c",
        "unsigned long\nfact(unsigned n)\n{\n   return n ? n * fact(n - 1) : 1;\n}\n",
    );

    let (graph, _) = GraphBuilder::new().build(vec![finding("fact", &path)]).await;
    let node = graph.get("fact").unwrap();
    assert!(node.is_recursive());
    assert_eq!(node.signature, "fact(unsigned n)");
    assert_eq!(node.span.unwrap().anchor, 2);
}

#[tokio::test]
async fn test_headers_recorded_even_when_function_missing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "h.c",
        "#include \"pngpriv.h\"\n#include <string.h>\nint other(void) { return 0; }\n",
    );

    let (graph, stats) = GraphBuilder::new()
        .build(vec![finding("png_absent", &path)])
        .await;
    assert_eq!(stats.extraction_failures, 1);

    let node = graph.get("png_absent").unwrap();
    assert!(node.source_text.is_empty());
    assert_eq!(
        node.headers,
        BTreeSet::from(["pngpriv.h".to_string(), "string.h".to_string()])
    );
    assert!(node.extraction_error.as_deref().unwrap().contains("png_absent"));
}

#[tokio::test]
async fn test_dangling_edges_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let outer = write(
        temp_dir.path(),
        "p.c",
        "void outer(void)\n{\n  inner();\n  malloc(4);\n}\n",
    );
    let inner = write(temp_dir.path(), "q.c", "void inner(void)\n{\n}\n");

    let (graph, _) = GraphBuilder::new()
        .build(vec![finding("outer", &outer), finding("inner", &inner)])
        .await;

    assert_eq!(graph.resolved_calls("outer").unwrap(), vec!["inner"]);
    assert!(graph.dangling_calls("outer").unwrap().contains(&"malloc".to_string()));
    assert_eq!(graph.callers("inner"), vec!["outer"]);
    assert!(graph.stats().dangling_edges >= 1);
}

struct FixedExtractor;

impl CallExtractor for FixedExtractor {
    fn extract_calls(&self, _source: &str) -> BTreeSet<String> {
        BTreeSet::from(["resolved_by_ast".to_string()])
    }

    fn capability(&self) -> ExtractorCapability {
        ExtractorCapability::Semantic
    }
}

#[tokio::test]
async fn test_custom_call_extractor() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "x.c", "void x(void)\n{\n  y();\n}\n");

    let builder = GraphBuilder::new().with_call_extractor(Arc::new(FixedExtractor));
    let (graph, _) = builder.build(vec![finding("x", &path)]).await;

    assert_eq!(
        graph.get("x").unwrap().calls,
        BTreeSet::from(["resolved_by_ast".to_string()])
    );
}

#[tokio::test]
async fn test_snapshot_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(temp_dir.path(), "s.c", "int s(void)\n{\n  return t();\n}\n");
    let missing = temp_dir.path().join("missing.c");

    let (graph, _) = GraphBuilder::new()
        .build(vec![finding("s", &path), finding("m", &missing)])
        .await;

    let snapshot = temp_dir.path().join("graph.json");
    graph.save(&snapshot).unwrap();
    let restored = KnowledgeGraph::load(&snapshot).unwrap();

    assert_eq!(restored.len(), 2);
    assert_eq!(restored.get("s").unwrap(), graph.get("s").unwrap());
    assert!(!restored.get("m").unwrap().is_extracted());
    assert_eq!(restored.stats(), graph.stats());
}

#[test]
fn test_locator_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let path = write(
        temp_dir.path(),
        "d.c",
        "static void d(void);\n\nvoid\nd (void)\n{\n}\n",
    );

    let locator = SourceLocator::default();
    let first = locator.locate(&path, "d", None).unwrap();
    for _ in 0..5 {
        assert_eq!(locator.locate(&path, "d", None).unwrap(), first);
    }
    assert_eq!(first.lines.anchor, 4);
}

#[test]
fn test_extractor_never_reports_keywords() {
    let inputs = [
        "if(x) return(y);",
        "while (a) for (;;) switch (b) {}",
        "sizeof(int) + sizeof (long)",
        "if_ok(1); returned(2); format(3);",
    ];
    for input in inputs {
        let calls = extract_calls(input);
        for keyword in CALL_KEYWORDS {
            assert!(!calls.contains(*keyword), "{} in {:?}", keyword, calls);
        }
    }
    assert!(extract_calls("if_ok(1); returned(2); format(3);").contains("format"));
}

#[test]
fn test_signature_fallback_sentinel() {
    assert_eq!(extract_signature("int y;\n", "missing"), "<unknown> missing(...)");
}
