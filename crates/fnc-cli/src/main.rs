//! `fnc` - runtime-version control scenario runner

use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fnc_runtime::{run_scenario, RuntimeSettingsConfig, Scenario};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod render;

fn build_cli() -> Command {
    Command::new("fnc")
        .version(fnc_runtime::VERSION)
        .about("Functions runtime-version control")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("run")
                .about("Replay a settings scenario")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .short('s')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario file (.json, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("Runtime settings configuration (TOML)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("matrix")
                .about("Print the runtime-version compatibility matrix")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("run", args)) => run(args).await,
        Some(("matrix", args)) => {
            let matrix = render::matrix();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&matrix)?);
            } else {
                print!("{}", render::matrix_text(&matrix));
            }
            Ok(())
        }
        _ => anyhow::bail!("no subcommand given"),
    }
}

async fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let scenario_path = args
        .get_one::<PathBuf>("scenario")
        .context("--scenario is required")?;

    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => RuntimeSettingsConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RuntimeSettingsConfig::default(),
    };

    let scenario = Scenario::load(scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;
    tracing::info!(
        scenario = %scenario_path.display(),
        events = scenario.events.len(),
        "replaying scenario"
    );

    let report = run_scenario(&scenario, &config).await;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::report_text(&report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn log_json_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["fnc", "matrix", "--log-json"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn run_requires_scenario() {
        assert!(build_cli().try_get_matches_from(["fnc", "run"]).is_err());
    }
}
