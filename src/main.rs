/* 3rd party libraries */
use clap::{Arg, ArgMatches, Command};
use std::io::{self, BufReader};
use std::path::Path;

/* Custom libraries */
use elevator_dispatch::config::{self, Config, StatusFormat};
use elevator_dispatch::shared::ConfigError;
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::Dispatcher;

fn cli() -> Command<'static> {
    Command::new("elevator-dispatch")
        .about("Simulates elevators serving randomly arriving passengers")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("floors")
                .long("floors")
                .takes_value(true)
                .help("Number of floors, overrides the configuration"),
        )
        .arg(
            Arg::new("elevators")
                .long("elevators")
                .takes_value(true)
                .help("Number of elevators, overrides the configuration"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for the passenger generator"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print status reports as JSON lines"),
        )
}

fn parse_arg<T: std::str::FromStr>(
    matches: &ArgMatches,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidArgument(format!("--{} {}", name, value)))
        })
        .transpose()
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> Result<(), ConfigError> {
    if let Some(n_floors) = parse_arg::<u8>(matches, "floors")? {
        config.building.n_floors = n_floors;
    }
    if let Some(n_elevators) = parse_arg::<usize>(matches, "elevators")? {
        config.building.n_elevators = n_elevators;
    }
    if let Some(seed) = parse_arg::<u64>(matches, "seed")? {
        config.generator.seed = Some(seed);
    }
    if matches.is_present("json") {
        config.status.format = StatusFormat::Json;
    }
    Ok(())
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();

    // Load the configuration
    let config_path = Path::new(matches.value_of("config").unwrap_or("config.toml"));
    let mut config = unwrap_or_exit!(config::load_config_or_default(config_path));
    unwrap_or_exit!(apply_overrides(&mut config, &matches));

    // Start the simulation, stdin carries the shutdown signal
    let dispatcher = unwrap_or_exit!(Dispatcher::new(config));
    unwrap_or_exit!(dispatcher.run(BufReader::new(io::stdin()), io::stdout()));
}
