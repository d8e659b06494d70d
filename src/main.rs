use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use log::warn;

use qlabs::artifacts::VisualizationType;
use qlabs::generation::{ExampleGenerator, GeneratorConfig, TextGenerationClient};
use qlabs::pipeline::{Pipeline, Response};
use qlabs::quantum::{Algorithm, ExampleCircuit};
use qlabs::session::SessionConfig;
use qlabs::simulators::LocalSimulator;

#[derive(Parser)]
#[command(name = "qlabs", version)]
#[command(about = "Build, simulate and inspect small quantum circuits")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a gate sequence such as "H 0; CX 0 1"
    Run {
        /// Semicolon-separated gate operations
        gates: String,
        /// Number of qubits
        #[arg(short = 'n', long, default_value_t = 2)]
        qubits: usize,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Run a named algorithm preset
    Algorithm {
        /// Algorithm name or key (teleportation, grover, deutsch-jozsa, shor, qft)
        name: Algorithm,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Run worked example 1 (Bell pair) or 2 (GHZ state)
    Example {
        number: usize,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Describe an algorithm, or list everything available
    Info { name: Option<Algorithm> },
}

#[derive(Args)]
struct RunOptions {
    /// probability, bloch, city or density
    #[arg(short, long, default_value = "probability")]
    visualization: VisualizationType,
    /// Bloch camera elevation in degrees
    #[arg(long, default_value_t = 30.0)]
    elevation: f64,
    /// Bloch camera azimuth in degrees
    #[arg(long, default_value_t = 30.0)]
    azimuth: f64,
    #[arg(short, long, default_value_t = 1024)]
    shots: u64,
    /// Fix the sampling seed
    #[arg(long)]
    seed: Option<u64>,
    /// Ask the configured text-generation service for example code
    #[arg(long)]
    generate: bool,
    /// Print the full response as JSON
    #[arg(long)]
    json: bool,
}

impl RunOptions {
    fn session_config(&self, qubits: usize, gates: &str) -> SessionConfig {
        let config = SessionConfig::new(qubits, gates)
            .with_visualization(self.visualization)
            .with_view(self.elevation, self.azimuth)
            .with_shots(self.shots);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    fn pipeline(&self) -> Pipeline<LocalSimulator> {
        let pipeline = Pipeline::default();
        if !self.generate {
            return pipeline;
        }

        match GeneratorConfig::from_env().and_then(TextGenerationClient::new) {
            Ok(client) => pipeline.with_generator(Box::new(client) as Box<dyn ExampleGenerator>),
            Err(e) => {
                warn!("continuing without example generation: {}", e);
                pipeline
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { gates, qubits, options } => {
            let config = options.session_config(qubits, &gates);
            let response = options.pipeline().handle(&config);
            report(response, options.json)?;
        }
        Commands::Algorithm { name, options } => {
            let config = options.session_config(SessionConfig::default().qubit_count, "");
            let response = options.pipeline().handle_algorithm(name, &config);
            report(response, options.json)?;
        }
        Commands::Example { number, options } => {
            let example = ExampleCircuit::from_number(number)
                .ok_or_else(|| anyhow!("no example {}, choose 1 or 2", number))?;
            let config = options.session_config(example.qubit_count(), example.gate_text());
            let response = options.pipeline().handle_example(example, &config);
            report(response, options.json)?;
        }
        Commands::Info { name: Some(algorithm) } => print_info(algorithm),
        Commands::Info { name: None } => {
            println!("Algorithms:");
            for algorithm in Algorithm::ALL {
                println!("  {:<15} {}", algorithm.key(), algorithm);
            }
            println!("Visualizations:");
            for kind in VisualizationType::ALL {
                println!("  {:<15} {}", kind.key(), kind);
            }
        }
    }
    Ok(())
}

fn report(response: Result<Response, qlabs::error::PipelineError>, json: bool) -> Result<()> {
    let response = response.map_err(|e| anyhow!(e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.circuit);
    println!("{}", response.artifact);
    if let Some(text) = &response.generated_example {
        println!("Generated example:\n{}", text);
    }
    if let Some(warning) = &response.generation_warning {
        println!("{}", warning);
    }
    Ok(())
}

fn print_info(algorithm: Algorithm) {
    let info = algorithm.info();
    println!("{}\n", algorithm);
    println!("Definition:\n{}\n", info.definition);
    println!("Features:\n{}\n", info.features);
    println!("Advantages:\n{}\n", info.advantages);
    println!("Disadvantages:\n{}", info.disadvantages);
}
