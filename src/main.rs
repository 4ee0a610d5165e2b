//! mainguard: PreToolUse hook for Claude Code.
//!
//! Reads the hook request as JSON from stdin and answers through the exit
//! status: 0 allows the command, 2 blocks it (reason on stderr), 1 reports a
//! malformed request.

use std::io::Read;

use mainguard::config::Config;
use mainguard::eval::{Guard, Verdict};
use mainguard::git::GitOracle;
use mainguard::{hook, logging};

const USAGE: &str = "usage: mainguard [--dump-config]";

fn main() {
    let config = Config::load();

    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("--dump-config") => match config.to_toml() {
            Ok(dump) => {
                print!("{dump}");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("mainguard: {e}");
                std::process::exit(1);
            }
        },
        Some(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    logging::init(&config.settings);

    let verdict = run(&config);
    if let Some(reason) = verdict.reason() {
        eprintln!("{reason}");
    }
    std::process::exit(verdict.exit_code());
}

fn run(config: &Config) -> Verdict {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        let verdict = Verdict::Reject(format!("Error: {}", mainguard::Error::from(e)));
        logging::log_decision("", &verdict);
        return verdict;
    }

    let guard = match Guard::from_config(config) {
        Ok(guard) => guard,
        Err(e) => {
            let verdict = Verdict::Reject(format!("Error: {e}"));
            logging::log_decision(&input, &verdict);
            return verdict;
        }
    };

    let project_dir = std::env::var(&config.settings.project_dir_env).ok();
    let oracle = GitOracle::new(&config.git.program);
    hook::evaluate_request(
        &input,
        &guard,
        &config.settings,
        &oracle,
        project_dir.as_deref(),
    )
}
