use std::env;
use std::path::Path;

use itertools::Itertools;
use setlab::Session;
use setlab::store::FileStore;
use tracing_subscriber::EnvFilter;

use config::{Config, DEFAULT_LOG_FILTER};
use exec::ExecContext;

mod config;
mod exec;
mod repl;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    setup_tracing(&config.log_filter);

    let mut session = Session::open(FileStore::new(config.state_path.clone()));
    let args = env::args().collect_vec();
    let result: Result<(), Box<dyn std::error::Error>> = if args.len() == 1 {
        repl::repl(&mut session, &config.history_path).map_err(Into::into)
    } else {
        let path = Path::new(&args[1]);
        exec::exec_file(path, &mut ExecContext::default(), &mut session).map_err(Into::into)
    };
    session.close();
    result
}

fn setup_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
