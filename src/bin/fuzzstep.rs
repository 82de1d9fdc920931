use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fuzzstep::logging::{init_tracing, init_tracing_json};
use fuzzstep::{log_error, Algorithm, AlgorithmRegistry, CtphEngine, FuzzConfig};

#[derive(Parser)]
#[command(name = "fuzzstep", about = "Context-triggered piecewise hashing")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fuzzy hash of each file
    Hash {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the edit distance between two signatures
    Compare { first: String, second: String },
    /// Print the distance of every pair of signatures as `i j distance`
    Matrix {
        #[arg(required = true)]
        signatures: Vec<String>,
    },
    /// Print the candidates closest to a query signature
    Search {
        query: String,
        #[arg(required = true)]
        candidates: Vec<String>,
    },
    /// List the algorithms available to `init` and `step`
    Algos,
    /// Start a stepping session and write its state to a file
    Init {
        /// Total number of bytes that will be stepped
        #[arg(long)]
        length: i64,
        /// State file to create or overwrite
        #[arg(long)]
        state: PathBuf,
        #[arg(long, default_value = "ctph")]
        algo: String,
    },
    /// Feed one byte to a stepping session
    Step {
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        byte: u8,
        #[arg(long, default_value = "ctph")]
        algo: String,
    },
}

fn lookup(registry: &AlgorithmRegistry, name: &str) -> anyhow::Result<Algorithm> {
    registry
        .get(name)
        .with_context(|| format!("available algorithms: {}", registry.names().join(", ")))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.json_logs {
        init_tracing_json();
    } else {
        init_tracing();
    }

    let config = match &cli.config {
        Some(path) => FuzzConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FuzzConfig::default(),
    };
    let registry = AlgorithmRegistry::with_defaults();

    match cli.command {
        Commands::Hash { files } => {
            for path in files {
                let sig = fuzzstep::hash_path(&path, &config.io)
                    .map_err(|e| log_error!(e, "hash"))
                    .with_context(|| format!("hashing {}", path.display()))?;
                println!("{}  {}", sig, path.display());
            }
        }
        Commands::Compare { first, second } => {
            let distance = fuzzstep::compare(&first, &second)?;
            let verdict = if distance <= config.similarity.max_distance {
                "similar"
            } else {
                "different"
            };
            println!("{distance} ({verdict})");
        }
        Commands::Matrix { signatures } => {
            let matrix = fuzzstep::pairwise_matrix(&signatures, config.similarity.max_pairs);
            for (i, j, distance) in matrix {
                match distance {
                    Some(d) => println!("{i} {j} {d}"),
                    None => println!("{i} {j} -"),
                }
            }
        }
        Commands::Search { query, candidates } => {
            let best = fuzzstep::top_k(
                &query,
                candidates.iter().map(String::as_str),
                config.similarity.top_k,
                config.similarity.max_distance,
            )?;
            for (candidate, distance) in best {
                println!("{distance}  {candidate}");
            }
        }
        Commands::Algos => {
            for name in registry.names() {
                println!("{name}");
            }
        }
        Commands::Init {
            length,
            state,
            algo,
        } => {
            let text = lookup(&registry, &algo)?.init_state(length)?;
            std::fs::write(&state, &text)
                .with_context(|| format!("writing {}", state.display()))?;
            println!("{text}");
        }
        Commands::Step { state, byte, algo } => {
            let current = std::fs::read_to_string(&state)
                .with_context(|| format!("reading {}", state.display()))?;
            let text = lookup(&registry, &algo)?.step_state(&current, byte)?;
            std::fs::write(&state, &text)
                .with_context(|| format!("writing {}", state.display()))?;

            let engine = CtphEngine::from_json(&text)?;
            match engine.render() {
                Ok(sig) => println!("{sig}"),
                Err(_) => println!("{text}"),
            }
        }
    }

    Ok(())
}
