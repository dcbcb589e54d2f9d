use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use tracing_subscriber::EnvFilter;

mod arith;
mod text;

use exemplar::lang::json::ValueJson;
use exemplar::lang::{Grammar, NumericGrammar, TextualGrammar, Value};
use exemplar::syn::{SearchBudget, SynthesisFailure, SynthesisFeatures, Synthesizer};

#[derive(Deserialize, Serialize, ValueEnum, Debug, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum GrammarKind {
    Numeric,
    Textual,
}

#[derive(Deserialize, Serialize)]
struct BenchmarkJson {
    grammar: GrammarKind,
    inputs: Vec<ValueJson>,
    outputs: Vec<ValueJson>,
}

#[macro_export]
macro_rules! benchmarks {
    ($($x:ident),*) => {
        HashMap::from([
            $((name_of!($x), $x())),*
        ])
    };
}

#[derive(Clone, Debug)]
struct Benchmark {
    grammar: GrammarKind,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
    budget: SearchBudget,

    /// Whether a consistent program is reachable within the benchmark's own
    /// budget; `None` when unknown (e.g. JSON-loaded benchmarks).
    solvable: Option<bool>,
}

#[derive(Serialize, Deserialize)]
struct SynthesisResultJson {
    status: String,
    program: Result<String, String>,
    program_size: usize,
    pool_size: usize,
    elapsed: f32,
}

#[derive(ValueEnum, Debug, Clone)]
enum RunMode {
    /// Full search: parsimony sort + observational-equivalence pruning
    Run,

    /// Ablation: no pruning of observational duplicates
    RunNoPrune,

    /// Ablation: no parsimony ordering of the candidate pool
    RunNoSort,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[clap(value_enum, default_value_t=RunMode::Run, long, short)]
    mode: RunMode,

    /// Load a benchmark from a JSON file with grammar, inputs, and outputs
    #[clap(long)]
    json: Option<String>,

    /// Override the benchmark's growth-round bound
    #[clap(long)]
    rounds: Option<usize>,

    /// Test suite name (used when not loading from JSON)
    suite: Option<String>,

    /// Benchmark name (used when not loading from JSON)
    benchmark: Option<String>,
}

fn load_benchmark_from_json(json_path: &str) -> Result<Benchmark, Box<dyn std::error::Error>> {
    let json_content =
        fs::read_to_string(json_path).map_err(|e| format!("Failed to read {}: {}", json_path, e))?;

    let benchmark_json: BenchmarkJson = serde_json::from_str(&json_content)
        .map_err(|e| format!("Failed to parse {}: {}", json_path, e))?;

    Ok(Benchmark {
        grammar: benchmark_json.grammar,
        inputs: benchmark_json.inputs.into_iter().map(Into::into).collect(),
        outputs: benchmark_json.outputs.into_iter().map(Into::into).collect(),
        budget: SearchBudget::default(),
        solvable: None,
    })
}

fn load_benchmark(args: &Args) -> Result<Benchmark, Box<dyn std::error::Error>> {
    if let Some(ref json_path) = args.json {
        load_benchmark_from_json(json_path)
    } else if let (Some(ref suite), Some(ref benchmark)) = (&args.suite, &args.benchmark) {
        let benchmarks = match suite.as_str() {
            "arith" => arith::benchmarks(),
            "text" => text::benchmarks(),
            _ => return Err("unknown test suite".into()),
        };

        benchmarks
            .get(benchmark.as_str())
            .map(|b| (*b).clone())
            .ok_or_else(|| {
                format!("benchmark '{}' not found in suite '{}'", benchmark, suite).into()
            })
    } else {
        Err("Either --json or both suite and benchmark must be provided".into())
    }
}

fn run_search<G: Grammar>(
    grammar: &G,
    benchmark: &Benchmark,
    features: SynthesisFeatures,
) -> (Result<(String, usize), SynthesisFailure>, usize) {
    let mut synth = Synthesizer::new(grammar, &benchmark.inputs, &benchmark.outputs, features);
    let result = synth
        .synthesize_term(&benchmark.budget)
        .map(|term| (grammar.print(&term), term.size()));
    (result, synth.pool_size())
}

fn run_benchmark(benchmark: Benchmark, features: SynthesisFeatures) -> SynthesisResultJson {
    eprintln!("============ inputs  ============\n{:?}\n", benchmark.inputs);
    eprintln!("============ outputs ============\n{:?}\n", benchmark.outputs);

    let time_start = std::time::Instant::now();
    let (result, pool_size) = match benchmark.grammar {
        GrammarKind::Numeric => run_search(&NumericGrammar, &benchmark, features),
        GrammarKind::Textual => run_search(&TextualGrammar, &benchmark, features),
    };
    let elapsed = time_start.elapsed().as_secs_f32();

    match (result, benchmark.solvable) {
        (Ok(_), Some(false)) | (Err(_), Some(true)) => SynthesisResultJson {
            status: "Failure".to_string(),
            program: Err("result not consistent with the ground truth".to_string()),
            program_size: 0,
            pool_size,
            elapsed,
        },
        (Ok((program, program_size)), _) => SynthesisResultJson {
            status: "Success".to_string(),
            program: Ok(program),
            program_size,
            pool_size,
            elapsed,
        },
        (Err(failure @ SynthesisFailure::BoundExhausted { .. }), _) => SynthesisResultJson {
            status: "BoundExhausted".to_string(),
            program: Err(failure.to_string()),
            program_size: 0,
            pool_size,
            elapsed,
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut benchmark = load_benchmark(&args).expect("failed to load benchmark");
    if let Some(rounds) = args.rounds {
        benchmark.budget.max_rounds = rounds;
    }

    let features = match args.mode {
        RunMode::Run => Default::default(),
        RunMode::RunNoPrune => SynthesisFeatures::default().difference(SynthesisFeatures::Prune),
        RunMode::RunNoSort => SynthesisFeatures::default().difference(SynthesisFeatures::Sort),
    };
    let result = run_benchmark(benchmark, features);

    serde_json::to_writer(io::stdout(), &result).expect("failed to write result");
    println!()
}
