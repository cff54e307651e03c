//! tkg CLI: query and traverse a trinity loaded from a seed document.
//!
//! Usage:
//!   tkg [--seed path] query "FIND INSTANCES OF CONCEPT Author" [--context renaissance]
//!   tkg [--seed path] traverse --graph instance --node hamlet --step classification:left
//!   tkg [--seed path] export
//!   tkg [--seed path] applicable <concept> <context>
//!   tkg [--seed path] relevant <instance> <context>
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tkg::{KnowledgeSeed, QueryStatus, TkgApi, TraversalStep};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tkg", version, about = "Trinitarian knowledge graph engine")]
struct Cli {
    /// Seed document (.yaml, .yml or .json); defaults to <config dir>/tkg/seed.yaml
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query string
    Query {
        /// e.g. "FIND RELATIONS OF TYPE wrote IN CONTEXT renaissance"
        query: String,
        /// Context to evaluate in (overrides IN CONTEXT)
        #[arg(long)]
        context: Option<String>,
    },
    /// Walk across graphs through adjunctions
    Traverse {
        /// Start graph: ontological, instance or context
        #[arg(long)]
        graph: String,
        /// Start node id
        #[arg(long)]
        node: String,
        /// Plan step as <adjunction>:<left|right>, repeatable
        #[arg(long = "step", value_name = "ADJUNCTION:DIRECTION")]
        steps: Vec<TraversalStep>,
    },
    /// Dump all three stores
    Export,
    /// Check whether a concept applies in a context
    Applicable { concept: String, context: String },
    /// Check whether an instance is relevant in a context
    Relevant { instance: String, context: String },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tkg=debug" } else { "tkg=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_api(seed: Option<PathBuf>) -> Result<TkgApi, String> {
    let path = match seed {
        Some(path) => path,
        None => match KnowledgeSeed::default_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                info!("no seed document found, starting empty");
                return KnowledgeSeed::default().build().map_err(|e| e.to_string());
            }
        },
    };
    let seed = KnowledgeSeed::load(&path).map_err(|e| e.to_string())?;
    info!(path = %path.display(), "loading seed");
    seed.build().map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_query(api: &TkgApi, query: &str, context: Option<&str>) -> i32 {
    match api.query(query, context) {
        Ok(envelope) => {
            let code = print_json(&envelope);
            if envelope.status == QueryStatus::Error {
                1
            } else {
                code
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_traverse(api: &TkgApi, graph: &str, node: &str, steps: &[TraversalStep]) -> i32 {
    match api.traverse(graph, node, steps) {
        Ok(trace) => print_json(&json!({
            "complete": trace.len() == steps.len() + 1,
            "trace": trace,
        })),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_applicable(api: &TkgApi, concept: &str, context: &str) -> i32 {
    match api.is_concept_applicable(concept, context) {
        Ok(applicable) => print_json(&json!({
            "concept": concept,
            "context": context,
            "applicable": applicable,
        })),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_relevant(api: &TkgApi, instance: &str, context: &str) -> i32 {
    match api.is_instance_relevant(instance, context) {
        Ok(relevant) => print_json(&json!({
            "instance": instance,
            "context": context,
            "relevant": relevant,
        })),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let api = match load_api(cli.seed) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Query { query, context } => cmd_query(&api, &query, context.as_deref()),
        Commands::Traverse { graph, node, steps } => cmd_traverse(&api, &graph, &node, &steps),
        Commands::Export => print_json(&api.export_knowledge()),
        Commands::Applicable { concept, context } => cmd_applicable(&api, &concept, &context),
        Commands::Relevant { instance, context } => cmd_relevant(&api, &instance, &context),
    };
    std::process::exit(code);
}
