use serde::Serialize;
use tracing::{info, instrument};

use crate::models::{Car, Delegation, RepositoryResult, PROFILE_OPERATION};
use crate::services::DelegationEndpoint;

pub const SEED_DELEGATION_ID: &str = "DELEG#001";
pub const DEFAULT_SEED_CAR_COUNT: usize = 50;

const MAKES: [&str; 5] = ["Toyota", "Honda", "Ford", "Chevrolet", "Nissan"];
const MODELS: [&str; 5] = ["Camry", "Civic", "Mustang", "Impala", "Altima"];
const COLORS: [&str; 5] = ["Blue", "Red", "Black", "White", "Green"];
const YEARS: [i32; 3] = [2023, 2024, 2025];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub delegation_id: String,
    pub delegations: usize,
    pub cars: usize,
}

/// The Barcelona profile used as seed data
pub fn sample_profile(delegation_id: &str) -> Delegation {
    Delegation::new(delegation_id, PROFILE_OPERATION)
        .with_attribute("name", "Barcelona Central")
        .with_attribute("address", "Carrer de la Marina, 15")
        .with_attribute("city", "Barcelona")
        .with_attribute("availableCarQty", 12)
        .with_attribute("phone", "+34 931 234 567")
        .with_attribute("email", "central@renting.com")
}

/// Deterministic fleet: operation `car#<year>#<nnn>` with attributes cycling
/// through fixed value lists
pub fn generate_cars(delegation_id: &str, count: usize) -> Vec<Car> {
    (0..count)
        .map(|i| {
            let year = YEARS[i % YEARS.len()];
            Car {
                delegation_id: delegation_id.to_string(),
                operation: format!("car#{}#{:03}", year, i + 1),
                make: MAKES[i % MAKES.len()].to_string(),
                model: MODELS[(i / MAKES.len()) % MODELS.len()].to_string(),
                year,
                color: COLORS[(i * 3) % COLORS.len()].to_string(),
                rented: i % 4 == 0,
                price: 10 + ((i * 7) % 41) as i32,
            }
        })
        .collect()
}

/// Save the sample profile and `car_count` generated cars. Saves are
/// upserts, so seeding twice leaves the same data.
#[instrument(skip(endpoint))]
pub async fn seed_delegation_fleet(
    endpoint: &DelegationEndpoint,
    delegation_id: &str,
    car_count: usize,
) -> RepositoryResult<SeedSummary> {
    endpoint
        .save_delegation(&sample_profile(delegation_id))
        .await?;

    let cars = generate_cars(delegation_id, car_count);
    for car in &cars {
        endpoint.save_car(car).await?;
    }

    info!(delegation_id, cars = cars.len(), "Seed data written");

    Ok(SeedSummary {
        delegation_id: delegation_id.to_string(),
        delegations: 1,
        cars: cars.len(),
    })
}
