mod cli;
mod lib;
mod load;

use std::io;
use std::path::PathBuf;

use log::debug;

use cli::{
    config::{self, Config},
    prompt::Prompt,
    session::{self, Session},
};
use load::store::Store;

fn main() {
    let matches = config::app().get_matches();
    let cfg = match Config::new(
        &matches,
        std::env::var(config::ENV_DATA_DIR).ok(),
        std::env::var(config::ENV_LANG).ok(),
    ) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ichiman: {}", e);
            std::process::exit(2);
        }
    };
    env_logger::Builder::new()
        .filter_level(cfg.log_level)
        .parse_default_env()
        .init();
    debug!("{:?}", cfg);

    if let Err(e) = run(&cfg, matches.subcommand()) {
        if !e.is_reported() {
            debug!("{:?}", e);
            eprintln!("ichiman: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cfg: &Config, (command, args): (&str, Option<&clap::ArgMatches>)) -> session::Result<()> {
    let stdin = io::stdin();
    let prompt = Prompt::new(stdin.lock(), io::stdout());
    let mut session = Session::new(prompt, Store::new(&cfg.data_dir), cfg.lang, cfg.today);
    let habit = args.and_then(|a| a.value_of("habit")).unwrap_or_default();
    let value = |name: &str| args.and_then(|a| a.value_of(name));
    match command {
        "list" => session.list(),
        "new" => session.new_habit(habit),
        "track" => session.track(habit),
        "avg" => session.averages(habit, value("days")),
        "goal" => session.goal(habit, value("hours")),
        "graph" => {
            let output = value("output")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("{}.svg", habit.trim().replace(' ', "_"))));
            session.graph(habit, &output)
        }
        "show" => session.show(habit),
        "export" => session.export(habit, &PathBuf::from(value("file").unwrap_or_default())),
        // clap only lets declared subcommands through
        _ => Ok(()),
    }
}
