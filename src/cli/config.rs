//! Command line and environment
//!
//! A setting comes from its flag if given, then from the environment,
//! then falls back to its default.

use std::path::PathBuf;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use log::LevelFilter;

use crate::cli::lang::Lang;
use crate::lib::date::{Date, DateError};

pub const ENV_DATA_DIR: &str = "ICHIMAN_DATA_DIR";
pub const ENV_LANG: &str = "ICHIMAN_LANG";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Lang(String),
    #[error("invalid --today '{input}': {reason} ({})", reason.fix_hint())]
    Today { input: String, reason: DateError },
    #[error("could not read the current date: {0}")]
    Clock(DateError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub lang: Lang,
    pub today: Date,
    pub log_level: LevelFilter,
}

pub fn app() -> App<'static, 'static> {
    let habit = || Arg::with_name("habit").required(true).help("Name of the habit");
    App::new("ichiman")
        .version(crate_version!())
        .about("Track the time you spend on your habits, one day at a time")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .takes_value(true)
                .help("Directory holding the habit files [env: ICHIMAN_DATA_DIR] [default: data]"),
        )
        .arg(
            Arg::with_name("lang")
                .long("lang")
                .value_name("LANG")
                .takes_value(true)
                .help("Language of the messages, en or ja [env: ICHIMAN_LANG]"),
        )
        .arg(
            Arg::with_name("today")
                .long("today")
                .value_name("YYYY-MM-DD")
                .takes_value(true)
                .help("Use this date as the current day"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("More logging, repeat for debug output"),
        )
        .subcommand(SubCommand::with_name("list").about("List the tracked habits"))
        .subcommand(SubCommand::with_name("new").about("Start a new habit").arg(habit()))
        .subcommand(SubCommand::with_name("track").about("Enter the time for every missing day").arg(habit()))
        .subcommand(
            SubCommand::with_name("avg")
                .about("Average time per day")
                .arg(habit())
                .arg(
                    Arg::with_name("days")
                        .long("days")
                        .value_name("N")
                        .takes_value(true)
                        .help("Average of the last N recorded days only"),
                ),
        )
        .subcommand(
            SubCommand::with_name("goal")
                .about("Progress towards a total number of hours")
                .arg(habit())
                .arg(
                    Arg::with_name("hours")
                        .long("hours")
                        .value_name("H")
                        .takes_value(true)
                        .help("Goal in hours, asked for if missing"),
                ),
        )
        .subcommand(
            SubCommand::with_name("graph")
                .about("Draw the time spent per day as an SVG chart")
                .arg(habit())
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("FILE")
                        .takes_value(true)
                        .help("Where to write the chart [default: <habit>.svg]"),
                ),
        )
        .subcommand(SubCommand::with_name("show").about("Table of every recorded day").arg(habit()))
        .subcommand(
            SubCommand::with_name("export")
                .about("Copy the history with HH:MM:SS durations")
                .arg(habit())
                .arg(Arg::with_name("file").required(true).help("Destination file")),
        )
}

impl Config {
    /// Settings from the parsed command line and the given environment values
    pub fn new(
        matches: &ArgMatches,
        env_data_dir: Option<String>,
        env_lang: Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = matches
            .value_of("data-dir")
            .map(PathBuf::from)
            .or_else(|| env_data_dir.filter(|d| !d.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let lang = match matches.value_of("lang").map(String::from).or(env_lang) {
            Some(lang) => lang.parse::<Lang>().map_err(ConfigError::Lang)?,
            None => Lang::default(),
        };
        let today = match matches.value_of("today") {
            Some(input) => input.parse::<Date>().map_err(|reason| ConfigError::Today {
                input: input.to_string(),
                reason,
            })?,
            None => Date::today().map_err(ConfigError::Clock)?,
        };
        let log_level = match matches.occurrences_of("verbose") {
            0 => LevelFilter::Error,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        Ok(Self {
            data_dir,
            lang,
            today,
            log_level,
        })
    }
}
