mod app;
mod catalog;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod server;
mod ui;

use anyhow::Context;
use app::{App, Screen};
use catalog::Catalog;
use clap::Parser;
use cli::{AdviceArgs, Cli, Commands, HistoryKind};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{HttpClassifier, OpenWeatherMapClient};
use db::Database;
use logic::{advisory, FertilizerPlanner, RankingOptions};
use models::{CropRecord, CropRequest, DiseaseRecord, FertilizerRecord, FertilizerRequest, SoilInput};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::de::DeserializeOwned;
use server::{build_router, AppState};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::screens::{CropHistoryScreen, DiseaseHistoryScreen, FertilizerHistoryScreen};

/// Headroom over the upload limit for the rest of a request body.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.take().unwrap_or(Commands::Dashboard {
        user: None,
        limit: 50,
    });

    match &command {
        Commands::Serve { host, port } => {
            let mut config = load_config(&cli)?;
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            serve(&cli, config).await
        }
        Commands::Crop(args) => run_crop(&cli, args),
        Commands::Fertilizer(args) => run_fertilizer(&cli, args),
        Commands::Soil { input } => {
            let request: SoilInput = read_request(input.as_ref())?;
            print_json(&logic::soil::analyze(&request)?)
        }
        Commands::History { kind, user, limit } => {
            let db = open_database(&cli)?;
            let user = user.as_deref();
            match kind {
                HistoryKind::Crop => print_json(&db.history::<CropRecord>(user, *limit)?),
                HistoryKind::Fertilizer => {
                    print_json(&db.history::<FertilizerRecord>(user, *limit)?)
                }
                HistoryKind::Disease => print_json(&db.history::<DiseaseRecord>(user, *limit)?),
            }
        }
        Commands::Dashboard { user, limit } => {
            let db = open_database(&cli)?;
            let app = App::new(db, user.clone(), *limit)?;
            run_dashboard(app)
        }
        Commands::Catalog => {
            let config = load_config(&cli)?;
            print!("{}", load_catalog(&config)?.to_yaml()?);
            Ok(())
        }
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Check => check(&cli).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    Config::load_or_default(cli.config.as_ref()).context("loading configuration")
}

fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    Catalog::load(config.advisor.catalog_path.as_deref()).context("loading catalog")
}

fn open_database(cli: &Cli) -> anyhow::Result<Database> {
    let path = Config::db_path(cli.data_dir.as_ref())?;
    Database::open(&path).with_context(|| format!("opening database at {}", path.display()))
}

fn ranking_options(config: &Config) -> RankingOptions {
    RankingOptions {
        top_n: config.advisor.top_n,
        cost_ratio: config.advisor.cost_ratio,
    }
}

fn planner(config: &Config) -> FertilizerPlanner {
    FertilizerPlanner::new().with_max_plans(config.advisor.max_fertilizer_plans)
}

fn read_request<T: DeserializeOwned>(input: Option<&PathBuf>) -> anyhow::Result<T> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("parsing request JSON")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_crop(cli: &Cli, args: &AdviceArgs) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let catalog = load_catalog(&config)?;
    let request: CropRequest = read_request(args.input.as_ref())?;
    let advice = advisory::crop_advice(&catalog, &ranking_options(&config), &request)?;

    if args.save {
        let db = open_database(cli)?;
        let user = request.user();
        let id = db.save_crop_recommendation(
            &user,
            &CropRecord {
                request,
                advice: advice.clone(),
            },
        )?;
        eprintln!("Saved crop recommendation {} for {}", id, user);
    }

    print_json(&advice)
}

fn run_fertilizer(cli: &Cli, args: &AdviceArgs) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let catalog = load_catalog(&config)?;
    let request: FertilizerRequest = read_request(args.input.as_ref())?;
    let advice = advisory::fertilizer_advice(&catalog, &planner(&config), &request)?;

    if args.save {
        let db = open_database(cli)?;
        let user = request.user();
        let id = db.save_fertilizer_recommendation(
            &user,
            &FertilizerRecord {
                request,
                advice: advice.clone(),
            },
        )?;
        eprintln!("Saved fertilizer recommendation {} for {}", id, user);
    }

    print_json(&advice)
}

async fn serve(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let catalog = Arc::new(load_catalog(&config)?);
    let db = open_database(cli)?;
    let upload_dir = config.upload_dir(cli.data_dir.as_ref())?;
    info!(
        "Catalog: {} crops, {} fertilizers, {} diseases",
        catalog.crops.len(),
        catalog.fertilizers.len(),
        catalog.diseases.len()
    );

    let mut state = AppState::new(db, catalog, upload_dir)
        .with_ranking(ranking_options(&config))
        .with_planner(planner(&config))
        .with_max_upload_bytes(config.server.max_upload_bytes);

    match config.openweathermap.clone().filter(|c| c.enabled) {
        Some(owm) => state = state.with_weather(OpenWeatherMapClient::new(owm)),
        None => warn!("OpenWeatherMap not configured, weather requests will fail"),
    }
    match config.classifier.clone().filter(|c| c.enabled) {
        Some(classifier) => {
            info!("Image classifier at {}", classifier.endpoint);
            state = state.with_classifier(Arc::new(HttpClassifier::new(classifier)));
        }
        None => warn!("Image classifier not configured, disease detection will fail"),
    }

    let app = build_router(state)
        .layer(RequestBodyLimitLayer::new(
            config.server.max_upload_bytes + BODY_LIMIT_HEADROOM,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

async fn check(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    println!("Config: OK");

    let catalog = load_catalog(&config)?;
    println!(
        "Catalog: OK ({} crops, {} fertilizers, {} diseases)",
        catalog.crops.len(),
        catalog.fertilizers.len(),
        catalog.diseases.len()
    );

    let db = open_database(cli)?;
    println!("Database: OK ({})", db.path().display());

    match config.openweathermap.clone() {
        Some(owm) => {
            let client = OpenWeatherMapClient::new(owm);
            match client.test_connection().await {
                Ok(true) => println!("OpenWeatherMap: OK"),
                Ok(false) => println!("OpenWeatherMap: REJECTED (check api_key)"),
                Err(e) => println!("OpenWeatherMap: OFFLINE ({})", e),
            }
        }
        None => println!("OpenWeatherMap: not configured"),
    }

    match config.classifier.clone() {
        Some(c) => {
            let client = HttpClassifier::new(c);
            match client.test_connection().await {
                Ok(true) => println!("Classifier: OK"),
                Ok(false) => println!("Classifier: ERROR"),
                Err(e) => println!("Classifier: OFFLINE ({})", e),
            }
        }
        None => println!("Classifier: not configured"),
    }

    Ok(())
}

fn run_dashboard(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = dashboard_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn dashboard_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let selected = app.list_state.selected_index;
            let status = app.status_message.as_deref();

            match app.screen {
                Screen::Crops => f.render_widget(
                    CropHistoryScreen::new(&app.crops)
                        .with_selection(selected)
                        .with_status(status),
                    area,
                ),
                Screen::Fertilizer => f.render_widget(
                    FertilizerHistoryScreen::new(&app.fertilizers)
                        .with_selection(selected)
                        .with_status(status),
                    area,
                ),
                Screen::Diseases => f.render_widget(
                    DiseaseHistoryScreen::new(&app.diseases)
                        .with_selection(selected)
                        .with_status(status),
                    area,
                ),
            }
        })?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit()
                    }
                    KeyCode::Char('r') => app.refresh(),
                    KeyCode::Tab => app.switch_screen(app.screen.next()),
                    KeyCode::Up => app.select_prev(),
                    KeyCode::Down => app.select_next(),
                    KeyCode::Char(c) => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        }
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
