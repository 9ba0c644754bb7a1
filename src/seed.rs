//! Demo Dataset Seeding
//!
//! Loads a small travel-sample slice so the API answers queries out of the
//! box. Seeding is idempotent: documents that already exist are left alone.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Airline, Airport, Geo, Profile, Route, Schedule};
use crate::store::{DocumentStore, StoreError, collections, insert_typed};

/// Stable identities for the two funded demo profiles
pub const DEMO_PID_ADA: Uuid = Uuid::from_u128(0x8f14f5f8_0c3d_4c09_9d04_ab8f7a3c1001);
pub const DEMO_PID_ALAN: Uuid = Uuid::from_u128(0x8f14f5f8_0c3d_4c09_9d04_ab8f7a3c1002);

async fn seed_doc<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
    doc: &T,
) -> Result<(), StoreError> {
    match insert_typed(store, collection, key, doc).await {
        Ok(_) | Err(StoreError::AlreadyExists { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

pub async fn seed_demo_data(store: &dyn DocumentStore) -> Result<(), StoreError> {
    let airlines = [
        (
            "airline_10",
            Airline {
                name: "40-Mile Air".to_string(),
                callsign: "MILE-AIR".to_string(),
                iata: "Q5".to_string(),
                icao: "MLA".to_string(),
                country: "United States".to_string(),
            },
        ),
        (
            "airline_137",
            Airline {
                name: "Air France".to_string(),
                callsign: "AIRFRANS".to_string(),
                iata: "AF".to_string(),
                icao: "AFR".to_string(),
                country: "France".to_string(),
            },
        ),
        (
            "airline_1355",
            Airline {
                name: "British Airways".to_string(),
                callsign: "SPEEDBIRD".to_string(),
                iata: "BA".to_string(),
                icao: "BAW".to_string(),
                country: "United Kingdom".to_string(),
            },
        ),
    ];
    for (key, airline) in &airlines {
        seed_doc(store, collections::AIRLINE, key, airline).await?;
    }

    let airports = [
        (
            "airport_3469",
            Airport {
                airport_name: "San Francisco Intl".to_string(),
                city: "San Francisco".to_string(),
                country: "United States".to_string(),
                faa: "SFO".to_string(),
                icao: "KSFO".to_string(),
                tz: "America/Los_Angeles".to_string(),
                geo: Geo {
                    alt: 13.0,
                    lat: 37.618972,
                    lon: -122.374889,
                },
            },
        ),
        (
            "airport_3797",
            Airport {
                airport_name: "John F Kennedy Intl".to_string(),
                city: "New York".to_string(),
                country: "United States".to_string(),
                faa: "JFK".to_string(),
                icao: "KJFK".to_string(),
                tz: "America/New_York".to_string(),
                geo: Geo {
                    alt: 13.0,
                    lat: 40.639751,
                    lon: -73.778925,
                },
            },
        ),
        (
            "airport_1382",
            Airport {
                airport_name: "Charles De Gaulle".to_string(),
                city: "Paris".to_string(),
                country: "France".to_string(),
                faa: "CDG".to_string(),
                icao: "LFPG".to_string(),
                tz: "Europe/Paris".to_string(),
                geo: Geo {
                    alt: 392.0,
                    lat: 49.012779,
                    lon: 2.55,
                },
            },
        ),
    ];
    for (key, airport) in &airports {
        seed_doc(store, collections::AIRPORT, key, airport).await?;
    }

    let routes = [
        (
            "route_10000",
            Route {
                airline: "AF".to_string(),
                airline_id: "airline_137".to_string(),
                source_airport: "SFO".to_string(),
                destination_airport: "CDG".to_string(),
                stops: 0,
                equipment: "388".to_string(),
                distance: 8998.0,
                schedule: vec![Schedule {
                    day: 1,
                    flight: "AF083".to_string(),
                    utc: "15:35:00".to_string(),
                }],
            },
        ),
        (
            "route_10001",
            Route {
                airline: "BA".to_string(),
                airline_id: "airline_1355".to_string(),
                source_airport: "JFK".to_string(),
                destination_airport: "CDG".to_string(),
                stops: 0,
                equipment: "744".to_string(),
                distance: 5834.0,
                schedule: vec![Schedule {
                    day: 3,
                    flight: "BA211".to_string(),
                    utc: "09:10:00".to_string(),
                }],
            },
        ),
        (
            "route_10002",
            Route {
                airline: "Q5".to_string(),
                airline_id: "airline_10".to_string(),
                source_airport: "SFO".to_string(),
                destination_airport: "JFK".to_string(),
                stops: 0,
                equipment: "73W".to_string(),
                distance: 4139.0,
                schedule: vec![],
            },
        ),
    ];
    for (key, route) in &routes {
        seed_doc(store, collections::ROUTE, key, route).await?;
    }

    // Two funded demo profiles for exercising the transfer endpoint.
    // Fixed pids keep reseeding idempotent and make the demo scriptable.
    let profiles = [
        Profile {
            pid: DEMO_PID_ADA,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "$2b$12$demo.hash.placeholder.ada".to_string(),
            balance: Decimal::new(50000, 2),
        },
        Profile {
            pid: DEMO_PID_ALAN,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: "alan@example.com".to_string(),
            password: "$2b$12$demo.hash.placeholder.alan".to_string(),
            balance: Decimal::new(20000, 2),
        },
    ];
    for profile in &profiles {
        seed_doc(
            store,
            collections::PROFILE,
            &profile.pid.to_string(),
            profile,
        )
        .await?;
        info!(
            "Seeded profile {} ({} {}) balance={}",
            profile.pid, profile.first_name, profile.last_name, profile.balance
        );
    }

    info!("Demo dataset seeded");
    Ok(())
}
