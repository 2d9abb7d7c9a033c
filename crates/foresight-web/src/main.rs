use anyhow::Result;
use clap::{Arg, ArgAction, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use foresight_web::config::AppConfig;
use foresight_web::handlers;
use foresight_web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(
            "FORESIGHT_LOG",
            "error,foresight=info,foresight_web=info,foresight_models=info",
        ))
        .init();

    let matches = Command::new("foresight")
        .version(clap::crate_version!())
        .about("Train, review and serve predictive models from the browser")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .help("Listen address. Overrides the address in the configuration file.")
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new("print_config")
                .long("print-config")
                .help("Print the default configuration as JSON and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("print_config") {
        println!("{}", AppConfig::template());
        return Ok(());
    }

    log::info!("starting application");
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("reading configuration from {}", path.display());
            AppConfig::load(path)?
        }
        None => {
            log::info!("no configuration file provided, using defaults");
            AppConfig::default()
        }
    };
    if let Some(listen) = matches.get_one::<String>("listen") {
        config.listen = listen.clone();
    }

    let state = AppState::bootstrap(config)?;

    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    let app = handlers::router(state.clone()).layer(session_layer);

    let listener = tokio::net::TcpListener::bind(&state.config.listen).await?;
    log::info!("listening on http://{}", state.config.listen);
    axum::serve(listener, app).await?;
    Ok(())
}
