use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mapmark::{
    app::{format_distance, MapApp},
    environment::{self, Environment},
    map_view::TileStyle,
    openstreetmap::Geocoder,
    render::{
        terminal::{TerminalMap, TerminalSidebar},
        LogNotifier,
    },
    storage::FileStorage,
    store::MarkerStore,
    utils::location::Position,
};
use ui_common::DEFAULT_ICON;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    debug: bool,

    /// Open the map at a shared link first
    #[arg(long, value_name = "URL")]
    at: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show all markers
    List,
    /// Add a marker
    Add {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        title: String,
        #[arg(short = 'D', long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// Remove the marker with the given id
    Remove { id: usize },
    /// Remove every marker
    Clear {
        /// Confirm removing all markers
        #[arg(long, action = clap::ArgAction::SetTrue)]
        yes: bool,
    },
    /// Center the map on a marker
    Zoom { id: usize },
    /// Write markers as JSON to a file or stdout
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Search for a place and mark it
    Search { query: String },
    /// Mark the current location
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
    /// Find the start and end of a route
    Route { from: String, to: String },
    /// Distance between two markers
    Measure { a: usize, b: usize },
    /// Print a link to the current map view
    Share {
        #[arg(long)]
        base: Option<String>,
    },
    /// Switch the map tiles (osm, sat or dark)
    Style { style: String },
}

macro_rules! print_err_and_exit {
    () => {
        |e| {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    mapmark::init_log(cli.debug);

    let env = environment::load().unwrap_or_else(print_err_and_exit!());

    run(cli, &env)
        .await
        .unwrap_or_else(print_err_and_exit!());
}

async fn run(cli: Cli, env: &Environment) -> anyhow::Result<()> {
    log::debug!("Using storage file {}", env.storage_path.display());
    let map = TerminalMap::new();
    let sidebar = TerminalSidebar::new();

    let mut store = MarkerStore::new(
        map.clone(),
        FileStorage::new(&env.storage_path),
        LogNotifier,
    );
    store.bind_sidebar(sidebar.clone());
    let mut app = MapApp::start(store, env.seed_examples);
    if let Some(url) = &cli.at {
        app.open_share_url(url);
    }

    let mut stdout = std::io::stdout();
    match cli.command {
        Command::List => {
            sidebar.print(&mut stdout)?;
            writeln!(stdout, "{} markers", app.store().count())?;
        }
        Command::Add {
            lat,
            lng,
            title,
            description,
            icon,
        } => {
            let created = app
                .store_mut()
                .create(Position::new(lat, lng), &title, &description, &icon)
                .context("Cannot add marker")?;
            writeln!(stdout, "Added marker {}", created.index)?;
        }
        Command::Remove { id } => {
            if app.store_mut().remove(id).is_none() {
                log::warn!("No marker with id {id}");
            }
            sidebar.print(&mut stdout)?;
        }
        Command::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to remove all markers without --yes");
            }
            app.store_mut().clear();
        }
        Command::Zoom { id } => {
            if !app.zoom_to(id) {
                anyhow::bail!("No marker with id {id}");
            }
            if let Some(popup) = map.open_popup_content() {
                writeln!(stdout, "{popup}")?;
            }
            writeln!(stdout, "{}", app.share_url(&env.share_base_url)?)?;
        }
        Command::Export { out } => {
            let Some(json) = app.store().export_json()? else {
                return Ok(());
            };
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Cannot write {}", path.display()))?;
                    log::info!("Exported {} markers to {}", app.store().count(), path.display());
                }
                None => writeln!(stdout, "{json}")?,
            }
        }
        Command::Search { query } => {
            let geocoder = Geocoder::new(&env.osm_base_url)?;
            if let Some(created) = app.search(&geocoder, &query).await {
                if let Some(marker) = app.store().get(created.index) {
                    writeln!(stdout, "{} at {}", marker.title, marker.position)?;
                }
            }
        }
        Command::Locate { lat, lng } => {
            let created = app
                .locate(Position::new(lat, lng))
                .context("Cannot mark location")?;
            writeln!(stdout, "Added marker {}", created.index)?;
        }
        Command::Route { from, to } => {
            let geocoder = Geocoder::new(&env.osm_base_url)?;
            let route = app.plan_route(&geocoder, &from, &to).await?;
            writeln!(stdout, "From: {} ({})", route.from.display_name, route.from.position)?;
            writeln!(stdout, "To:   {} ({})", route.to.display_name, route.to.position)?;
            writeln!(stdout, "{}", format_distance(&route.distance))?;
        }
        Command::Measure { a, b } => {
            let Some(distance) = app.measure(a, b) else {
                anyhow::bail!("Both markers {a} and {b} must exist");
            };
            writeln!(stdout, "{}", format_distance(&distance))?;
        }
        Command::Share { base } => {
            let base = base.unwrap_or_else(|| env.share_base_url.clone());
            writeln!(stdout, "{}", app.share_url(&base)?)?;
        }
        Command::Style { style } => {
            let style = style.parse::<TileStyle>()?;
            app.set_style(style);
            writeln!(stdout, "{}", style.url_template())?;
            writeln!(stdout, "{}", style.attribution())?;
        }
    }

    Ok(())
}
