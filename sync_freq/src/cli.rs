use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use anyhow::Context;

use sync_core::{config::FreqConfig, filter::RegionMap};
use utils::{file_prefix, init_log, LogLevel};

use crate::{config::*, io::*};

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
            Arg::new("populations")
                .short('p')
                .long("populations")
                .value_parser(value_parser!(String))
                .value_name("LIST")
                .default_value("pop1,pop2,pop3")
                .help("Comma separated population names, in the order of the SYNC count columns"),
        )
        .arg(
            Arg::new("depth")
                .short('D')
                .long("depth")
                .value_parser(value_parser!(u32))
                .value_name("INT")
                .default_value("30")
                .help("Set pooled depth per population"),
        )
        .arg(
            Arg::new("genotype")
                .action(ArgAction::SetTrue)
                .short('g')
                .long("genotype")
                .help("Add genotype calls (GT) to output"),
        )
        .arg(
            Arg::new("keep_ref_sites")
                .action(ArgAction::SetTrue)
                .long("keep-ref-sites")
                .help("Keep sites where the ALT allele is the same as the REF allele"),
        )
        .arg(
            Arg::new("diff")
                .long("diff")
                .value_parser(value_parser!(String))
                .value_name("POP1,POP2")
                .help("Add column with absolute difference in allele frequency between two populations"),
        )
        .arg(
            Arg::new("with_counts")
                .action(ArgAction::SetTrue)
                .long("with-counts")
                .help("Add per population A/T/C/G counts to the frequency table"),
        )
        .arg(
            Arg::new("skip_malformed")
                .action(ArgAction::SetTrue)
                .long("skip-malformed")
                .help("Skip malformed SYNC rows with a warning instead of stopping"),
        )
        .arg(
            Arg::new("regions")
                .short('r')
                .long("regions")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .conflicts_with("regions_dir")
                .help("Region file (start,end) used for all chromosomes"),
        )
        .arg(
            Arg::new("regions_dir")
                .short('R')
                .long("regions-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Directory with per chromosome region files (<chromosome>_regions.csv)"),
        )
        .arg(
            Arg::new("output_dir")
                .short('d')
                .long("output-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Set output directory [default: current directory]"),
        )
        .arg(
            Arg::new("prefix")
                .short('P')
                .long("prefix")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .help("Set prefix for output file names [default: input file name without .sync]"),
        )
        .arg(
            Arg::new("sync_file")
                .value_parser(value_parser!(PathBuf))
                .value_name("SYNC_FILE")
                .required(true)
                .help("Input SYNC file"),
        )
}

/// Split a comma separated list, i.e. "pop1, pop2"
fn split_list(s: &str) -> Vec<&str> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_diff(s: &str) -> anyhow::Result<(&str, &str)> {
    match split_list(s).as_slice() {
        [a, b] => Ok((*a, *b)),
        _ => Err(anyhow!(
            "Expected two comma separated populations for --diff, found {}",
            s
        )),
    }
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let pops = split_list(
        m.get_one::<String>("populations")
            .expect("Missing default population list"),
    );
    let depth = *m.get_one::<u32>("depth").expect("Missing default depth");
    let diff = match m.get_one::<String>("diff") {
        Some(s) => Some(parse_diff(s)?),
        None => None,
    };

    // Check settings before looking at any input
    let freq_cfg = FreqConfig::new(
        pops.as_slice(),
        depth,
        !m.get_flag("keep_ref_sites"),
        m.get_flag("genotype"),
        diff,
    )?;

    let input = m
        .get_one::<PathBuf>("sync_file")
        .expect("Missing SYNC file")
        .to_owned();

    let prefix = match m.get_one::<String>("prefix") {
        Some(p) => p.to_owned(),
        None => {
            let name = input
                .file_name()
                .and_then(|s| s.to_str())
                .ok_or_else(|| anyhow!("Could not get file name from {}", input.display()))?;
            file_prefix(name, "sync")
        }
    };

    let output_dir = m
        .get_one::<PathBuf>("output_dir")
        .map(|p| p.to_owned())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut cfg = Config::new(input, output_dir, prefix, freq_cfg);

    let regions = if let Some(p) = m.get_one::<PathBuf>("regions") {
        RegionMap::Global(
            read_region_file(p).with_context(|| "Could not read from region file")?,
        )
    } else if let Some(d) = m.get_one::<PathBuf>("regions_dir") {
        RegionMap::PerContig(
            read_region_dir(d).with_context(|| "Could not read from regions directory")?,
        )
    } else {
        info!("No regions supplied; the entire SYNC file will be converted");
        RegionMap::Unrestricted
    };
    cfg.set_regions(regions);

    cfg.set_with_counts(m.get_flag("with_counts"));
    if m.get_flag("skip_malformed") {
        cfg.set_policy(MalformedPolicy::Skip)
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists() {
        assert_eq!(split_list("pop1, pop2,,pop3"), vec!["pop1", "pop2", "pop3"]);
        assert_eq!(parse_diff("pop1,pop3").unwrap(), ("pop1", "pop3"));
        assert!(parse_diff("pop1").is_err());
        assert!(parse_diff("pop1,pop2,pop3").is_err());
    }

    #[test]
    fn model() {
        cli_model().debug_assert();
    }
}
