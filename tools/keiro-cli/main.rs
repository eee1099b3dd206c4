use clap::{Parser, ValueEnum};
use keiro::prelude::*;
use std::fs;
use std::time::Instant;

/// Which direction the bridge runs in.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Syntax JSON in, flow model JSON out
    Analyze,
    /// Flow node JSON in, text edits JSON out
    Generate,
}

/// A bidirectional flow-graph model synthesis CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The synthesis direction
    #[arg(value_enum)]
    mode: Mode,

    /// Path to the input JSON: a function source (analyze) or a flow node (generate)
    input_path: String,

    /// Optional path to a semantic model JSON file
    #[arg(short, long)]
    semantic: Option<String>,

    /// Optional path to a catalog JSON file
    #[arg(short, long)]
    catalog: Option<String>,

    /// Target document path recorded in generated edits
    #[arg(short, long, default_value = "main.bal")]
    file: String,
}

fn main() {
    let cli = Cli::parse();

    let load_start = Instant::now();
    let input_json = fs::read_to_string(&cli.input_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read input file '{}': {}",
            &cli.input_path, e
        ))
    });

    let semantic = match &cli.semantic {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read semantic model '{}': {}", path, e))
            });
            serde_json::from_str::<StaticSemanticModel>(&json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse semantic model JSON: {}", e))
            })
        }
        None => StaticSemanticModel::new(),
    };

    let catalog = match &cli.catalog {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read catalog '{}': {}", path, e))
            });
            InMemoryCatalog::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to load catalog: {}", e)))
        }
        None => InMemoryCatalog::new(),
    };
    let load_duration = load_start.elapsed();

    let run_start = Instant::now();
    let output = match cli.mode {
        Mode::Analyze => {
            let source: FunctionSource = serde_json::from_str(&input_json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse syntax JSON: {}", e)));
            let analyzer = Analyzer::builder(&semantic, &catalog).build();
            let model = analyzer.analyze(&source);
            eprintln!(
                "Analyzed '{}': {} nodes, {} clients",
                source.name,
                model.nodes.len(),
                model.clients.len()
            );
            serde_json::to_string_pretty(&model)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize model: {}", e)))
        }
        Mode::Generate => {
            let node: FlowNode = serde_json::from_str(&input_json).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse flow node JSON: {}", e))
            });
            let ctx = SourceContext::new(&cli.file);
            let change = to_source(&node, &ctx, &catalog)
                .unwrap_or_else(|e| exit_with_error(&format!("Source synthesis failed: {}", e)));
            serde_json::to_string_pretty(&change)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize edits: {}", e)))
        }
    };
    let run_duration = run_start.elapsed();

    println!("{}", output);
    eprintln!("Loading: {:?}, synthesis: {:?}", load_duration, run_duration);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
