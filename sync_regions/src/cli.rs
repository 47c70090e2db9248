use std::{num::NonZeroU64, path::PathBuf};

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use utils::{init_log, LogLevel};

use crate::config::*;

/// Set up definition of command options for clap
fn cli_model() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .author(crate_authors!())
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("warn")
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .action(ArgAction::SetTrue)
                .long("quiet")
                .conflicts_with("loglevel")
                .help("Silence all output"),
        )
        .arg(
            Arg::new("window")
                .short('w')
                .long("window")
                .value_parser(value_parser!(NonZeroU64))
                .value_name("INT")
                .default_value("10000")
                .help("Set sliding window size"),
        )
        .arg(
            Arg::new("output_dir")
                .short('d')
                .long("output-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("regions")
                .help("Set output directory for region files"),
        )
        .arg(
            Arg::new("point_file")
                .value_parser(value_parser!(PathBuf))
                .value_name("POINT_FILE")
                .required(true)
                .help("Input file with chromosome and point columns"),
        )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let window = m
        .get_one::<NonZeroU64>("window")
        .map(|x| u64::from(*x))
        .expect("Missing default window size");

    let output_dir = m
        .get_one::<PathBuf>("output_dir")
        .expect("Missing default output directory")
        .to_owned();

    let input = m
        .get_one::<PathBuf>("point_file")
        .expect("Missing point file")
        .to_owned();

    debug!("Window size: {}", window);
    Ok(Config::new(input, output_dir, window))
}
