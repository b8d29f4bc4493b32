use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod app;
mod controller;
mod inputter;
mod ui;

use dv::actions::LogActions;
use dv::datasets;
use dv::domain::{DEFAULT_PAGE_SIZE, DVConfig, DVError};
use dv::engine::TableEngine;

use app::{App, Status};
use controller::Controller;

/// A schema driven tabular data browser for dashboard collections.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Which bundled collection to browse.
    #[arg(value_enum, default_value_t = Collection::Files)]
    collection: Collection,

    /// Rows per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Append logs to this file (the terminal belongs to the UI).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Collection {
    Payments,
    Uploads,
    Files,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: &Cli) -> Result<(), DVError> {
    init_logging(cli.log_file.as_ref())?;
    info!("Starting dv with the {:?} collection!", cli.collection);

    let config = DVConfig::default().page_size(cli.page_size);
    match cli.collection {
        Collection::Payments => browse(
            "Payments",
            TableEngine::new(
                datasets::payments(),
                datasets::payment_columns(),
                config.clone().default_search_field("email".to_string()),
            )?,
            &config,
        ),
        Collection::Uploads => browse(
            "Uploads",
            TableEngine::new(
                datasets::uploads(),
                datasets::upload_columns(),
                config.clone().default_search_field("upload_name".to_string()),
            )?,
            &config,
        ),
        Collection::Files => browse(
            "Files",
            TableEngine::new(
                datasets::files(),
                datasets::file_columns(),
                config.clone().default_search_field("file_name".to_string()),
            )?,
            &config,
        ),
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), DVError> {
    let Some(path) = log_file else { return Ok(()) };
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn browse<T>(name: &str, engine: TableEngine<T>, config: &DVConfig) -> Result<(), DVError> {
    let controller = Controller::new(config);
    let mut app = App::new(name, engine, Box::new(LogActions));
    let mut terminal = ratatui::init();

    while app.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(app.raw_keyevents())? {
            app.update(message);
        }
    }

    Ok(())
}
