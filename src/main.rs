#[macro_use]
extern crate clap;

use std::error::Error;
use std::path::Path;

use clap::{App, Arg, ArgMatches};
use clap::arg_enum;
use log::{error, info};

use crcburst::libs::config_file::config_file::{load_configuration, ExperimentConfig};
use crcburst::libs::message_source::message_source::read_message;
use crcburst::libs::util::logging::initialise_logging;
use crcburst::libs::util::version::VERSION;
use crcburst::libs::validator::validator::Experiment;

const MESSAGE_FILE: &'static str = "message-file";
const BURST_LENGTH: &'static str = "burst-length";
const MAX_BURST_LENGTH: &'static str = "max-burst-length";
const TRIAL_COUNT: &'static str = "trial-count";
const DIVISOR: &'static str = "divisor";
const WORKERS: &'static str = "workers";
const CONFIG_FILE: &'static str = "config-file";

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Mode {
        Experiment,
        Sweep,
        ShowConfig
    }
}

fn parse_command_line<'a>() -> (ArgMatches<'a>, Mode) {
    let result = App::new("crcburst")
        .version(VERSION)
        .author("Matt Gumbley <matt.gumbley@gmail.com>")
        .about("Measures how often a CRC misses synthetic burst errors")

        .arg(Arg::from_usage("<mode> 'The mode to use, usually Experiment.'").possible_values(&Mode::variants()).default_value("Experiment"))

        .arg(Arg::with_name(MESSAGE_FILE)
            .short("f").long("file").help("The file whose bytes form the message to encode")
            .value_name("message file").takes_value(true))

        .arg(Arg::with_name(BURST_LENGTH)
            .short("n").long("burst").help("Sets the burst length in bits (at least 2)")
            .value_name("burst length").takes_value(true))

        .arg(Arg::with_name(MAX_BURST_LENGTH)
            .short("m").long("maxburst").help("Sets the longest burst tried in Sweep mode")
            .value_name("maximum burst length").takes_value(true))

        .arg(Arg::with_name(TRIAL_COUNT)
            .short("t").long("trials").help("Sets the number of trials (burst offsets 0 to trials-1)")
            .value_name("trial count").takes_value(true))

        .arg(Arg::with_name(DIVISOR)
            .short("d").long("divisor").help("Sets the generator polynomial as a bit string, e.g. 11111")
            .value_name("generator bit string").takes_value(true))

        .arg(Arg::with_name(WORKERS)
            .short("w").long("workers").help("Sets the number of threads running trials")
            .value_name("worker count").takes_value(true))

        .arg(Arg::with_name(CONFIG_FILE)
            .short("c").long("config").help("Reads settings from a TOML file; command line options override it")
            .value_name("config file").takes_value(true))

        .get_matches();

    let mode = value_t!(result.value_of("mode"), Mode).unwrap_or(Mode::Experiment);

    return (result, mode);
}

fn configuration(arguments: &ArgMatches) -> Result<ExperimentConfig, Box<dyn Error>> {
    let mut config = match arguments.value_of(CONFIG_FILE) {
        Some(path) => load_configuration(Path::new(path))?,
        None => ExperimentConfig::default(),
    };
    if let Some(divisor) = arguments.value_of(DIVISOR) {
        config.divisor = divisor.to_string();
        config.len_crc = divisor.len().saturating_sub(1);
    }
    if arguments.is_present(TRIAL_COUNT) {
        config.trial_count = value_t!(arguments, TRIAL_COUNT, usize)?;
    }
    if arguments.is_present(WORKERS) {
        config.workers = value_t!(arguments, WORKERS, usize)?;
    }
    config.validate()?;
    Ok(config)
}

fn run(arguments: ArgMatches, mode: Mode) -> Result<i32, Box<dyn Error>> {
    let config = configuration(&arguments)?;
    if mode == Mode::ShowConfig {
        info!("Effective configuration:\n{}", config.to_toml()?);
        return Ok(0)
    }

    let message_path = match arguments.value_of(MESSAGE_FILE) {
        Some(path) => path,
        None => return Err("A message file must be given with -f/--file".into()),
    };
    let burst_len = value_t!(arguments, BURST_LENGTH, usize)
        .map_err(|e| format!("A burst length must be given with -n/--burst: {}", e))?;

    let message = read_message(Path::new(message_path))?;
    info!("Message {} is {} bytes; divisor {}, {} trials, {} worker(s)",
          message_path, message.len(), config.divisor, config.trial_count, config.workers);
    let experiment = Experiment::new(&message, config.polynomial()?, config.len_crc, config.burst_policy())?;

    match mode {
        Mode::Sweep => {
            let max_burst_len = value_t!(arguments, MAX_BURST_LENGTH, usize).unwrap_or(burst_len);
            experiment.sweep(burst_len..=max_burst_len, config.trial_count, config.workers)?;
        }
        _ => {
            let report = experiment.run_parallel(burst_len, config.trial_count, config.workers)?;
            info!("Undetected errors: {} of {} trials", report.missed, report.total);
            info!("{}", report);
        }
    }
    Ok(0)
}

fn main() {
    initialise_logging("info");
    let (arguments, mode) = parse_command_line();

    match run(arguments, mode) {
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
        Ok(n) => {
            std::process::exit(n);
        }
    }
}
