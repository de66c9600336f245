mod report;

use ckg_core::knowledge::{CsvRecords, RawAnalyzerCsv, RecordSource};
use ckg_core::{
    prepare_findings, Config, FindingParser, GraphBuilder, KnowledgeGraph, LookupService,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Graph snapshot written by `build` and read by the query commands.
const DEFAULT_GRAPH_FILE: &str = "ckg-graph.json";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "ckg=info,ckg_core=info";

#[derive(Parser)]
#[command(name = "ckg")]
#[command(about = "Function knowledge graph from static-analysis findings", long_about = None)]
struct Cli {
    /// Config file (defaults to ./ckg.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root, overriding the configured one
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a knowledge graph from an analyzer results CSV
    Build {
        /// Results file with `Start Line` and `Path` columns
        results: PathBuf,
        /// Headerless analyzer output (name, location and path by position)
        #[arg(long)]
        raw: bool,
        /// Where to write the graph snapshot
        #[arg(short, long, default_value = DEFAULT_GRAPH_FILE)]
        output: PathBuf,
    },
    /// Print everything known about a function
    Show {
        name: String,
        #[arg(long, default_value = DEFAULT_GRAPH_FILE)]
        graph: PathBuf,
    },
    /// List functions called by a function
    Related {
        name: String,
        /// Maximum number of callees (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(long, default_value = DEFAULT_GRAPH_FILE)]
        graph: PathBuf,
    },
    /// Print graph statistics
    Stats {
        #[arg(long, default_value = DEFAULT_GRAPH_FILE)]
        graph: PathBuf,
    },
    /// Find a usage example of a function in test and sample programs
    Usage { name: String },
    /// Find constructor-style functions for a struct
    Constructors { struct_name: String },
    /// Write a default ckg.toml to the current directory
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        return init_config(force);
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => Config::load().wrap_err("failed to load configuration")?,
    };
    if let Some(root) = cli.root {
        config.project.root = root;
    }

    match cli.command {
        Commands::Build {
            results,
            raw,
            output,
        } => build(&config, &results, raw, &output).await,
        Commands::Show { name, graph } => {
            let graph = load_graph(&graph)?;
            print!("{}", graph.context_for(&name)?);
            Ok(())
        }
        Commands::Related { name, limit, graph } => {
            let graph = load_graph(&graph)?;
            let limit = limit.unwrap_or(config.extraction.related_limit);
            report::print_related(&graph, &name, limit)
        }
        Commands::Stats { graph } => {
            let graph = load_graph(&graph)?;
            println!("{}", serde_json::to_string_pretty(&graph.stats())?);
            Ok(())
        }
        Commands::Usage { name } => {
            let service = LookupService::new(&config.project.root, config.lookup.clone());
            match service.find_usage_example(&name)? {
                Some(example) => println!("{}", example),
                None => println!("No usage example found for {}", name),
            }
            Ok(())
        }
        Commands::Constructors { struct_name } => {
            let service = LookupService::new(&config.project.root, config.lookup.clone());
            let candidates = service.find_constructor_candidates(&struct_name)?;
            if candidates.is_empty() {
                println!("No constructor candidates found for {}", struct_name);
            }
            for candidate in candidates {
                println!("{}", candidate);
            }
            Ok(())
        }
        Commands::InitConfig { .. } => Ok(()),
    }
}

async fn build(config: &Config, results: &Path, raw: bool, output: &Path) -> Result<()> {
    tracing::info!(results = %results.display(), raw, "reading analyzer results");
    let rows = if raw {
        RawAnalyzerCsv::new(results).records()?
    } else {
        CsvRecords::new(results).records()?
    };

    let parser = FindingParser::new(&config.project.root, &config.project.category);
    let findings = prepare_findings(&parser, &rows, &config.filter.exclude_patterns)?;

    let builder = GraphBuilder::with_config(&config.extraction);
    let (graph, stats) = builder.build(findings).await;

    graph
        .save(output)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), nodes = graph.len(), "wrote graph snapshot");

    report::print_build_summary(&stats, &graph.stats(), output);
    Ok(())
}

fn load_graph(path: &Path) -> Result<KnowledgeGraph> {
    KnowledgeGraph::load(path).wrap_err_with(|| {
        format!(
            "failed to load graph from {} (run `ckg build` first)",
            path.display()
        )
    })
}

fn init_config(force: bool) -> Result<()> {
    let path = Path::new(ckg_core::config::DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, Config::default_config_string())
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
