use crate::{config::Config, setup::App};
use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand};
use floodwatch_application::{
    error::{AlertOnError, AppError},
    prelude as flows,
};
use floodwatch_core::{
    entities::*,
    gateways::{
        flood_zones::FloodZoneGateway, notify::LocalNotificationGateway, weather::WeatherGateway,
    },
    map::{MapOrchestrator, Popup},
    repositories::UserDataSubscriptions,
    session::Session,
    usecases,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "floodwatch", about = "Flood awareness on the command line", version)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Act on behalf of this user
    #[arg(long, global = true, value_name = "UID")]
    pub user: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the flood zones around a position
    Zones {
        #[arg(long, value_name = "LAT,LNG")]
        at: Coordinate,
    },
    /// Predict floods of the simulated rainfall
    Predict,
    /// Show the current weather
    Weather {
        #[arg(long)]
        city: Option<String>,
    },
    /// List the shelters
    Shelters {
        #[arg(long, default_value_t = ShelterOrder::Closest)]
        order: ShelterOrder,
        /// Position of the user
        #[arg(long, value_name = "LAT,LNG")]
        at: Option<Coordinate>,
    },
    /// Warn about predicted floods
    Alerts,
    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
    /// Manage saved addresses
    Address {
        #[command(subcommand)]
        action: AddressAction,
    },
    /// List issued flood alerts
    Notifications,
    /// Run a map session
    Map {
        /// Device location
        #[arg(long, value_name = "LAT,LNG")]
        at: Option<Coordinate>,
        /// Move the viewport, can be repeated
        #[arg(long = "move", value_name = "LAT,LNG")]
        moves: Vec<Coordinate>,
        /// Search a place and select it
        #[arg(long)]
        search: Option<String>,
        /// Plan a route to the closest shelter
        #[arg(long)]
        route_to_shelter: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    Show,
    Set {
        key: PreferenceKey,
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AddressAction {
    List,
    Add {
        /// Replace the home or work address
        #[arg(long)]
        role: Option<AddressRole>,
        #[arg(long, default_value = "")]
        title: String,
        /// Look up the address
        #[arg(long, conflicts_with_all = ["at", "address"])]
        place: Option<String>,
        #[arg(long, value_name = "LAT,LNG", requires = "address")]
        at: Option<Coordinate>,
        #[arg(long, requires = "at")]
        address: Option<String>,
    },
    Delete {
        id: String,
    },
}

pub fn run(cli: Cli, cfg: Config) -> Result<()> {
    let Cli { user, command, .. } = cli;
    let session = user.map(Session::signed_in).unwrap_or_default();
    let app = App::try_new(cfg)?;
    match command {
        Command::Zones { at } => show_flood_zones(&app, at),
        Command::Predict => predict(&app),
        Command::Weather { city } => show_weather(&app, city),
        Command::Shelters { order, at } => show_shelters(&app, order, at),
        Command::Alerts => send_alerts(&app, &session),
        Command::Prefs { action } => match action.unwrap_or(PrefsAction::Show) {
            PrefsAction::Show => show_preferences(&app, &session),
            PrefsAction::Set { key, value } => {
                flows::set_preference(&app.store, &session, key, value)
                    .or_alert("Failed to update the preferences")?;
                show_preferences(&app, &session)
            }
        },
        Command::Address { action } => manage_addresses(&app, &session, action),
        Command::Notifications => show_notifications(&app, &session),
        Command::Map {
            at,
            moves,
            search,
            route_to_shelter,
        } => run_map(&app, &session, at, moves, search, route_to_shelter),
    }
}

fn show_flood_zones(app: &App, at: Coordinate) -> Result<()> {
    let mut map = MapOrchestrator::new(app.cfg.map.clone(), vec![]);
    let Some(request) = map.viewport_changed(at) else {
        return Ok(());
    };
    let zones = app
        .flood_zones
        .fetch_flood_zones(&request.query)
        .map_err(AppError::from)
        .or_alert("Failed to fetch flood data")?;
    map.flood_zones_fetched(request.seq, zones);
    for zone in map.visible_flood_zones() {
        let style = zone.style();
        println!(
            "{:<8} {:>3} rings  stroke {} fill {}",
            zone.risk_level.label(),
            zone.polygon_rings.len(),
            style.stroke_color,
            style.fill_color
        );
    }
    Ok(())
}

fn predictions(app: &App) -> Result<Vec<FloodPrediction>> {
    Ok(flows::predict_floods(&*app.prediction, &simulated_rain_series())
        .or_alert("Failed to fetch the flood prediction")?)
}

fn predict(app: &App) -> Result<()> {
    for entry in usecases::prediction_timeline(&predictions(app)?) {
        let severity = entry
            .severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        println!("{}  {:<8}  {}", entry.date, severity, entry.description);
    }
    Ok(())
}

fn show_weather(app: &App, city: Option<String>) -> Result<()> {
    let city = city.unwrap_or_else(|| app.cfg.prediction.city.clone());
    let gateway = app.weather()?;
    let weather = gateway
        .current_weather(&city)
        .map_err(AppError::from)
        .or_alert("Failed to fetch the weather")?;
    let (min, max) = weather.temp_range_celsius();
    println!(
        "{}{}: {:.1} °C (feels like {:.1} °C, {:.1} - {:.1} °C)",
        weather.city,
        weather
            .country
            .as_deref()
            .map(|c| format!(", {c}"))
            .unwrap_or_default(),
        weather.temperature_celsius(),
        weather.feels_like_celsius(),
        min,
        max
    );
    if let Some(description) = &weather.description {
        println!("{description}");
    }
    println!(
        "Humidity {}%, pressure {} hPa, wind {:.1} m/s from {}°",
        weather.humidity, weather.pressure, weather.wind_speed, weather.wind_deg
    );
    Ok(())
}

fn show_shelters(app: &App, order: ShelterOrder, at: Option<Coordinate>) -> Result<()> {
    let sorted = usecases::sort_shelters(&app.cfg.shelters, order, at)
        .map_err(AppError::from)
        .or_alert("No location provided")?;
    for usecases::ShelterDistance { shelter, distance } in sorted {
        let distance = distance.map(|d| d.to_string()).unwrap_or_default();
        println!("{:<32} {:>10}  {}", shelter.title, distance, shelter.phone);
        println!("    {}", shelter.address);
    }
    Ok(())
}

fn send_alerts(app: &App, session: &Session) -> Result<()> {
    let preferences = flows::load_preferences(&app.store, session)
        .or_alert("Failed to load the preferences")?;
    let predictions = predictions(app)?;
    let sent = flows::send_flood_alerts(
        &app.store,
        session,
        &preferences,
        &*app.notifier,
        &*app.formatter,
        &mut flows::AlertGuard::default(),
        &predictions,
    )
    .or_alert("Failed to schedule notification and save to database.")?;
    app.notifier.flush();
    for record in sent {
        println!("{}", record.message);
    }
    Ok(())
}

fn show_preferences(app: &App, session: &Session) -> Result<()> {
    let preferences = flows::load_preferences(&app.store, session)
        .or_alert("Failed to load the preferences")?;
    for key in PreferenceKey::all() {
        println!("{key:<20} {}", preferences.get(key));
    }
    Ok(())
}

fn manage_addresses(app: &App, session: &Session, action: AddressAction) -> Result<()> {
    match action {
        AddressAction::List => {
            let book = flows::address_book(&app.store, session)
                .or_alert("Failed to load the addresses")?;
            for role in [AddressRole::Home, AddressRole::Work] {
                if let Some(a) = book.by_role(role) {
                    println!("{:<12} {:<16} {}", a.id, a.title, a.formatted_address);
                }
            }
            for a in &book.saved {
                println!("{:<12} {:<16} {}", a.id, a.title, a.formatted_address);
            }
        }
        AddressAction::Add {
            role,
            title,
            place,
            at,
            address,
        } => {
            let (coordinate, formatted_address) = match (place, at, address) {
                (Some(text), _, _) => {
                    let suggestion = flows::search_places(&*app.google_maps, &text)
                        .or_alert("Failed to fetch address suggestions")?
                        .into_iter()
                        .next()
                        .ok_or_else(|| anyhow!("No place found for '{text}'"))?;
                    let (details, _) = flows::select_place(&*app.google_maps, &suggestion)
                        .or_alert("Failed to retrieve address details")?;
                    (details.coordinate, details.formatted_address)
                }
                (None, Some(at), Some(address)) => (at, address),
                _ => return Err(anyhow!("Please provide all required details")),
            };
            let address = NewAddress {
                title,
                coordinate,
                formatted_address,
            };
            match flows::save_address(&app.store, session, role, address)
                .or_alert("Failed to save the address")?
            {
                Some(saved) => println!("Address saved successfully: {}", saved.id),
                None => println!("You must be signed in to save an address"),
            }
        }
        AddressAction::Delete { id } => {
            flows::delete_address(&app.store, session, &id)
                .or_alert("Failed to delete the address")?;
        }
    }
    Ok(())
}

fn show_notifications(app: &App, session: &Session) -> Result<()> {
    let records =
        flows::notifications(&app.store, session).or_alert("Failed to load the alerts")?;
    let today = Timestamp::now().date();
    for (record, days) in usecases::upcoming_alerts(&records, today) {
        println!("{} ({}) starts in {days} days", record.message, record.severity);
    }
    for record in &records {
        println!("{}  {:<8}  {}", record.date, record.severity, record.created_at);
    }
    Ok(())
}

fn run_map(
    app: &App,
    session: &Session,
    at: Option<Coordinate>,
    moves: Vec<Coordinate>,
    search: Option<String>,
    route_to_shelter: bool,
) -> Result<()> {
    let orchestrator = MapOrchestrator::new(app.cfg.map.clone(), app.cfg.shelters.clone());
    let mut map = flows::MapSession::new(orchestrator, app.map_gateways())
        .with_flood_alerts(app.flood_alerts(session));
    let handle = map.handle();

    let subscription = match session.user_id() {
        Some(uid) => Some(
            app.store
                .subscribe(uid, handle.user_data_listener())
                .map_err(AppError::from)
                .or_alert("Failed to load the user data")?,
        ),
        None => None,
    };

    handle.send(flows::MapCommand::DeviceLocation(at));
    for center in moves {
        handle.send(flows::MapCommand::MoveViewport(center));
    }
    if let Some(text) = search {
        let suggestion = flows::search_places(&*app.google_maps, &text)
            .or_alert("Failed to fetch address suggestions")?
            .into_iter()
            .next();
        if let Some(suggestion) = suggestion {
            handle.send(flows::MapCommand::SelectPlace(suggestion));
        }
    }
    handle.send(flows::MapCommand::Shutdown);
    map.run_blocking()?;

    if route_to_shelter {
        let closest = map
            .orchestrator()
            .closest_shelter()
            .map_err(AppError::from)
            .or_alert("No location provided")?
            .map(|(shelter, _)| shelter.clone());
        if let Some(shelter) = closest {
            handle.send(flows::MapCommand::SelectMarker(shelter.into()));
            handle.send(flows::MapCommand::StartRoute);
            handle.send(flows::MapCommand::Shutdown);
            map.run_blocking()?;
        }
    }
    if let Some(id) = subscription {
        app.store.unsubscribe(id);
    }

    app.notifier.flush();

    print_map(map.orchestrator());
    for record in map.issued_alerts() {
        println!("Alert: {}", record.message);
    }
    for alert in map.take_alerts() {
        eprintln!("{alert}");
    }
    Ok(())
}

fn print_map(map: &MapOrchestrator) {
    println!("Viewport: {}", map.viewport_center());
    println!("Flood zones: {}", map.visible_flood_zones().len());
    for marker in map.markers() {
        println!("  {:<14} {:<32} {}", marker.kind.name(), marker.title, marker.coordinate);
    }
    match map.popup() {
        Popup::None => {}
        Popup::Marker { marker, distance } => {
            let distance = distance.map(|d| d.to_string()).unwrap_or_default();
            println!("Selected: {} {distance}", marker.title);
        }
        Popup::RoutePending => println!("Calculating route..."),
        Popup::RouteSummary(plan) => println!("Route: {plan}"),
    }
}
