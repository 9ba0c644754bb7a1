//! Travel-Sample Document Models
//!
//! Document shapes follow the travel-sample dataset: airline, airport and
//! route documents use lowercase single-word JSON keys; profile documents
//! use camelCase. Create-request commands deserialize the HTTP body and
//! convert into the stored document type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Airline
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    pub name: String,
    pub callsign: String,
    pub iata: String,
    pub icao: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAirlineRequest {
    pub name: String,
    pub callsign: String,
    pub iata: String,
    pub icao: String,
    pub country: String,
}

impl CreateAirlineRequest {
    pub fn into_airline(self) -> Airline {
        Airline {
            name: self.name,
            callsign: self.callsign,
            iata: self.iata,
            icao: self.icao,
            country: self.country,
        }
    }
}

// ============================================================================
// Airport
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geo {
    pub alt: f64,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    #[serde(rename = "airportname")]
    pub airport_name: String,
    pub city: String,
    pub country: String,
    pub faa: String,
    pub icao: String,
    pub tz: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAirportRequest {
    #[serde(rename = "airportname")]
    pub airport_name: String,
    pub city: String,
    pub country: String,
    pub faa: String,
    pub icao: String,
    pub tz: String,
    pub geo: Geo,
}

impl CreateAirportRequest {
    pub fn into_airport(self) -> Airport {
        Airport {
            airport_name: self.airport_name,
            city: self.city,
            country: self.country,
            faa: self.faa,
            icao: self.icao,
            tz: self.tz,
            geo: self.geo,
        }
    }
}

// ============================================================================
// Route
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub day: u8,
    pub flight: String,
    pub utc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub airline: String,
    #[serde(rename = "airlineid")]
    pub airline_id: String,
    #[serde(rename = "sourceairport")]
    pub source_airport: String,
    #[serde(rename = "destinationairport")]
    pub destination_airport: String,
    pub stops: u32,
    pub equipment: String,
    pub distance: f64,
    #[serde(default)]
    pub schedule: Vec<Schedule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRouteRequest {
    pub airline: String,
    #[serde(rename = "airlineid")]
    pub airline_id: String,
    #[serde(rename = "sourceairport")]
    pub source_airport: String,
    #[serde(rename = "destinationairport")]
    pub destination_airport: String,
    pub stops: u32,
    pub equipment: String,
    pub distance: f64,
    #[serde(default)]
    pub schedule: Vec<Schedule>,
}

impl CreateRouteRequest {
    pub fn into_route(self) -> Route {
        Route {
            airline: self.airline,
            airline_id: self.airline_id,
            source_airport: self.source_airport,
            destination_airport: self.destination_airport,
            stops: self.stops,
            equipment: self.equipment,
            distance: self.distance,
            schedule: self.schedule,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// User profile document.
///
/// `pid` is immutable after creation. `balance` is the on-board credit,
/// fixed-point with 2 decimal places; it is mutated only by direct profile
/// updates or by the transfer coordinator. `password` holds the caller
/// supplied (already hashed) secret and never leaves the store in an API
/// response - handlers project through [`ProfileView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub pid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub balance: Decimal,
}

/// Profile projection returned by the API (no password).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub pid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub balance: Decimal,
}

impl From<&Profile> for ProfileView {
    fn from(profile: &Profile) -> Self {
        Self {
            pid: profile.pid,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            balance: profile.balance,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Initial on-board credit; defaults to zero.
    #[serde(default)]
    pub balance: Option<crate::money::StrictAmount>,
}

impl CreateProfileRequest {
    /// Build the stored document. The server assigns the identity.
    pub fn into_profile(self, pid: Uuid) -> Profile {
        Profile {
            pid,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            balance: self.balance.map(|a| a.inner()).unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl UpdateProfileRequest {
    /// Apply the update onto an existing document. Identity and balance are
    /// preserved - the balance only moves through the transfer coordinator
    /// or explicit funding, never a profile edit.
    pub fn apply_to(self, existing: &Profile) -> Profile {
        Profile {
            pid: existing.pid,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            balance: existing.balance,
        }
    }
}
