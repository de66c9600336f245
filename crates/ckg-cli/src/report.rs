//! Console output for CLI commands.

use ckg_core::{BuildStats, GraphStats, KnowledgeGraph};
use color_eyre::Result;
use std::path::Path;

pub fn print_build_summary(build: &BuildStats, graph: &GraphStats, output: &Path) {
    println!("Built knowledge graph: {}", output.display());
    println!("  Findings:    {}", build.findings);
    println!("  Nodes:       {}", graph.nodes);
    println!("  Duplicates:  {}", build.duplicates);
    println!(
        "  Placeholders: {} (source not located)",
        graph.placeholders
    );
    println!(
        "  Call edges:  {} ({} to functions outside the graph)",
        graph.call_edges, graph.dangling_edges
    );
}

pub fn print_related(graph: &KnowledgeGraph, name: &str, limit: usize) -> Result<()> {
    let related = graph.related(name, limit)?;
    if related.is_empty() {
        println!("{} calls nothing that was recognized", name);
        return Ok(());
    }

    println!("Functions called by {}:", name);
    for callee in related {
        let marker = if graph.contains(&callee) {
            ""
        } else {
            " (external)"
        };
        println!("  - {}{}", callee, marker);
    }
    Ok(())
}
