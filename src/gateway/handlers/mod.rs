//! Gateway request handlers, grouped by document type

pub mod airline;
pub mod airport;
pub mod health;
pub mod profile;
pub mod route;
pub mod transfer;

pub use airline::{
    airlines_to_airport, create_airline, delete_airline, get_airline, list_airlines,
    update_airline,
};
pub use airport::{
    create_airport, delete_airport, direct_connections, get_airport, list_airports,
    update_airport,
};
pub use health::health_check;
pub use profile::{create_profile, delete_profile, get_profile, list_profiles, update_profile};
pub use route::{create_route, delete_route, get_route, update_route};
pub use transfer::create_transfer;
