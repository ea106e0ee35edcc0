use structopt::StructOpt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskflow::app::App;
use taskflow::cli::CommandLineArgs;
use taskflow::config::Config;
use taskflow::error::BoardError;
use taskflow::interface;
use taskflow::store::Store;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKFLOW_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("taskflow=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs { action, store_file } = CommandLineArgs::from_args();

    let mut config = Config::from_env()?;
    init_tracing();
    if store_file.is_some() {
        config.store_file = store_file;
    }

    let store = Store::open(&config.resolve_store_file()?)?;
    let mut app = App::new(store, &config)?;

    // Perform the action.
    let result = interface::dispatch(&mut app, action);
    if let Err(err) = &result {
        if !matches!(err, BoardError::Storage(_)) {
            app.notifications_mut().error(err.to_string());
        }
    }
    interface::print_notifications(&app.drain_notifications());

    match result {
        Ok(()) => Ok(()),
        Err(BoardError::Storage(err)) => Err(err),
        Err(_) => std::process::exit(1),
    }
}
