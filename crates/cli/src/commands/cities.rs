//! City commands.
//!
//! Every command goes through [`AppState::cities`], so it fails with
//! `Unauthorized` unless the session is signed in.

use chrono::{DateTime, Utc};
use clap::Args;
use worldwise_client::{AppError, AppState};
use worldwise_core::{City, CityId, NewCity, Position};

use super::CliError;

/// Arguments for `cities add`.
#[derive(Debug, Args)]
pub struct AddCity {
    /// City name
    #[arg(short, long)]
    pub name: String,

    /// Country name
    #[arg(short, long)]
    pub country: String,

    /// Country flag emoji
    #[arg(long, default_value = "")]
    pub emoji: String,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Visit date (RFC 3339, defaults to now)
    #[arg(short, long)]
    pub date: Option<DateTime<Utc>>,

    /// Notes about the visit
    #[arg(long)]
    pub notes: Option<String>,
}

impl AddCity {
    /// Validate the arguments into a city to create.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Position` if the coordinates are out of range.
    pub fn into_new_city(self) -> Result<NewCity, CliError> {
        Ok(NewCity {
            city_name: self.name,
            country: self.country,
            emoji: self.emoji,
            date: self.date.unwrap_or_else(Utc::now),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            position: Position::new(self.lat, self.lng)?,
        })
    }
}

fn format_row(city: &City) -> String {
    format!(
        "{:>10}  {} {:<20} {}",
        city.id,
        city.emoji,
        city.city_name,
        city.date.format("%B %-d, %Y")
    )
}

/// Print every cached city.
#[allow(clippy::print_stdout)]
pub fn list(state: &AppState) -> Result<(), CliError> {
    let snapshot = state.cities()?.state();
    if snapshot.has_error() {
        return Err(CliError::Unavailable(snapshot.error));
    }

    if snapshot.cities.is_empty() {
        println!("Add your first city by running `worldwise cities add`");
        return Ok(());
    }

    for city in &snapshot.cities {
        println!("{}", format_row(city));
    }
    Ok(())
}

/// Print the distinct countries.
#[allow(clippy::print_stdout)]
pub fn countries(state: &AppState) -> Result<(), CliError> {
    let snapshot = state.cities()?.state();
    if snapshot.has_error() {
        return Err(CliError::Unavailable(snapshot.error));
    }

    for country in snapshot.countries() {
        println!("{} {}", country.emoji, country.country);
    }
    Ok(())
}

/// Fetch and print one city.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState, id: CityId) -> Result<(), CliError> {
    let store = state.cities()?;
    store.get_city(id).await.map_err(AppError::from)?;

    let city = store
        .state()
        .current_city
        .ok_or_else(|| AppError::NotFound(format!("city {id}")))?;

    println!("{} {}", city.emoji, city.city_name);
    println!("  country:  {}", city.country);
    println!("  visited:  {}", city.date.format("%A, %B %-d, %Y"));
    println!("  position: {}", city.position);
    if let Some(notes) = &city.notes {
        println!("  notes:    {notes}");
    }
    Ok(())
}

/// Create a city and print its assigned ID.
#[allow(clippy::print_stdout)]
pub async fn add(state: &AppState, args: AddCity) -> Result<(), CliError> {
    let store = state.cities()?;
    let new_city = args.into_new_city()?;
    let city = store
        .create_city(&new_city)
        .await
        .map_err(AppError::from)?;

    println!("Added {} (id {})", city.city_name, city.id);
    Ok(())
}

/// Delete a city.
#[allow(clippy::print_stdout)]
pub async fn delete(state: &AppState, id: CityId) -> Result<(), CliError> {
    let store = state.cities()?;
    store.delete_city(id).await.map_err(AppError::from)?;

    println!("Deleted city {id} ({} left)", store.state().cities.len());
    Ok(())
}
