//! DataHopper CLI binary.
//!
//! Subcommands: `ask` (one question), `chat` (interactive loop), `serve` (HTTP API),
//! `graph` (print the research graph). A bare trailing question behaves like `ask`.

use clap::{Parser, Subcommand, ValueEnum};
use cli::{ask, build_runner, outcome_json, repl::run_chat_loop};
use datahopper::{generate_dot, generate_text, ResearchRunner, ResearchSettings};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "datahopper", version)]
#[command(about = "DataHopper: research a question across Google, Bing and Reddit")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Question to research when no subcommand is given
    #[arg(trailing_var_arg = true)]
    question: Vec<String>,

    /// Verbose: debug logs (graph waves, node timings, HTTP calls)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use canned search results and a placeholder model (no network, no API keys)
    #[arg(long, global = true)]
    offline: bool,

    /// Print the answer and raw search results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Do not print wave progress to stderr
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Research one question and print the answer
    Ask(AskArgs),
    /// Interactive loop: ask questions until `exit`
    Chat,
    /// Run the HTTP API (POST /research, GET /health)
    Serve(ServeArgs),
    /// Print the research graph structure
    Graph(GraphArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct AskArgs {
    /// The question
    #[arg(required = true, trailing_var_arg = true)]
    question: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address (default: 127.0.0.1:8000 or DATAHOPPER_ADDR)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct GraphArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = GraphFormat::Text)]
    format: GraphFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum GraphFormat {
    Text,
    Dot,
}

fn runner_or_exit(offline: bool, settings: &ResearchSettings) -> ResearchRunner {
    match build_runner(offline, settings) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("datahopper: {}", e);
            eprintln!("hint: set the API keys in .env or ~/.config/datahopper/config.toml, or pass --offline");
            std::process::exit(1);
        }
    }
}

async fn run_ask(
    runner: &ResearchRunner,
    question: &str,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = !args.quiet && !args.json;
    let outcome = ask(runner, question, progress).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
    } else {
        println!("{}", outcome.final_answer);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("datahopper", None::<&std::path::Path>).ok();
    let args = Args::parse();
    let _log_guard = config::init_tracing("datahopper", args.verbose)
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    let settings = ResearchSettings::from_env();

    match args.cmd.clone() {
        Some(Command::Serve(sa)) => {
            let runner = runner_or_exit(args.offline, &settings);
            if let Err(e) =
                serve::run_serve(sa.addr.as_deref(), runner, serve::ServeOptions::from_env()).await
            {
                eprintln!("serve error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Graph(ga)) => {
            let graph = datahopper::build_research_graph(&datahopper::ResearchDeps::offline())?;
            match ga.format {
                GraphFormat::Text => print!("{}", generate_text(&graph)),
                GraphFormat::Dot => print!("{}", generate_dot(&graph)),
            }
        }
        Some(Command::Chat) => {
            let runner = runner_or_exit(args.offline, &settings);
            let input = BufReader::new(tokio::io::stdin());
            run_chat_loop(&runner, input, &mut std::io::stdout(), !args.quiet).await?;
        }
        Some(Command::Ask(aa)) => {
            let runner = runner_or_exit(args.offline, &settings);
            if let Err(e) = run_ask(&runner, &aa.question.join(" "), &args).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            if args.question.is_empty() {
                eprintln!("datahopper: provide a question, or use `ask`, `chat`, `serve` or `graph`");
                std::process::exit(2);
            }
            let runner = runner_or_exit(args.offline, &settings);
            if let Err(e) = run_ask(&runner, &args.question.join(" "), &args).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
