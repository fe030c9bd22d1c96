use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use traitqa_cli::{init_logging, normalize_answer, questions_toml, run_batch, RunOptions};
use traitqa_core::TraitQaConfig;
use traitqa_units::TraitKind;

fn cli() -> Command {
    Command::new("traitqa")
        .version(traitqa_core::VERSION)
        .about("Extract plant traits from species descriptions with question answering")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .help("Log filter, e.g. info or traitqa_core=debug"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize one answer into the trait's canonical unit")
                .arg(
                    Arg::new("trait")
                        .long("trait")
                        .required(true)
                        .value_parser(value_parser!(TraitKind))
                        .help("height, leaf_length or leaf_width"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("answer")
                        .required(true)
                        .num_args(1..)
                        .help("Answer text"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Process a JSON-lines file of descriptions")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Input rows, one JSON object per line"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output results, one JSON object per line"),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .value_parser(value_parser!(usize))
                        .help("Rows processed in parallel"),
                )
                .arg(
                    Arg::new("model")
                        .long("model")
                        .action(ArgAction::Append)
                        .help("Additional model as NAME=ENDPOINT"),
                ),
        )
        .subcommand(
            Command::new("questions")
                .about("Print the question sets as TOML")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                ),
        )
}

fn run_options(args: &ArgMatches) -> Result<RunOptions> {
    Ok(RunOptions {
        config: args.get_one::<PathBuf>("config").cloned(),
        input: args
            .get_one::<PathBuf>("input")
            .cloned()
            .context("--input is required")?,
        output: args
            .get_one::<PathBuf>("output")
            .cloned()
            .context("--output is required")?,
        max_concurrent_rows: args.get_one::<usize>("concurrency").copied(),
        models: args
            .get_many::<String>("model")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
    })
}

async fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("normalize", args)) => {
            let kind = *args
                .get_one::<TraitKind>("trait")
                .context("--trait is required")?;
            let answer = args
                .get_many::<String>("answer")
                .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
                .unwrap_or_default();

            let output = normalize_answer(kind, &answer);
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{output}");
            }
        }
        Some(("run", args)) => {
            let options = run_options(args)?;
            let stats = run_batch(&options).await?;

            println!("Rows:                 {}", stats.total_rows);
            println!("Failed rows:          {}", stats.failed_rows);
            println!("Resolved predictions: {}", stats.resolved_predictions);
            println!("Excluded pairs:       {}", stats.excluded_pairs);
            println!("Elapsed:              {}ms", stats.elapsed_ms);
            println!("Results written to {}", options.output.display());

            if stats.failed_rows > 0 {
                bail!("{} of {} rows failed", stats.failed_rows, stats.total_rows);
            }
        }
        Some(("questions", args)) => {
            let config = match args.get_one::<PathBuf>("config") {
                Some(path) => TraitQaConfig::load(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => TraitQaConfig::default(),
            };
            print!("{}", questions_toml(&config.traits)?);
        }
        _ => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map_or("info", String::as_str);
    if let Err(e) = init_logging(level, matches.get_flag("log-json")) {
        eprintln!("{e:#}");
        std::process::exit(2);
    }

    if let Err(e) = dispatch(&matches).await {
        let message = format!("{e:#}");
        tracing::error!(error = %message, "traitqa failed");
        std::process::exit(1);
    }
}
