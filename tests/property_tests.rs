use proptest::prelude::*;
use renting_rs::models::{Car, Delegation, User};
use renting_rs::repositories::{InMemoryItemStore, Repository, TableRepository};
use std::collections::BTreeMap;
use std::sync::Arc;

prop_compose! {
    fn arb_key_part()(value in "[A-Za-z0-9#_-]{1,24}") -> String {
        value
    }
}

prop_compose! {
    fn arb_car()(
        delegation_id in arb_key_part(),
        operation in arb_key_part(),
        make in prop_oneof![
            Just("Toyota"), Just("Honda"), Just("Ford"), Just("Chevrolet"), Just("Nissan"),
        ],
        model in "[A-Za-z ]{1,20}",
        year in 1990i32..2030,
        color in "[A-Za-z]{3,10}",
        rented in any::<bool>(),
        price in 0i32..10_000,
    ) -> Car {
        Car {
            delegation_id,
            operation,
            make: make.to_string(),
            model,
            year,
            color,
            rented,
            price,
        }
    }
}

prop_compose! {
    fn arb_delegation()(
        delegation_id in arb_key_part(),
        operation in arb_key_part(),
        city in "[A-Za-z ]{0,20}",
        available in 0i64..500,
        open in any::<bool>(),
    ) -> Delegation {
        Delegation::new(delegation_id, operation)
            .with_attribute("city", city)
            .with_attribute("availableCarQty", available)
            .with_attribute("open", open)
    }
}

prop_compose! {
    fn arb_user()(
        user_id in arb_key_part(),
        username in "[a-z]{1,12}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        full_name in "[A-Za-z ]{1,30}",
        phone in "[0-9+ -]{0,15}",
    ) -> User {
        User {
            user_id,
            operation: "profile".to_string(),
            username,
            email,
            full_name,
            phone,
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn delegations_repository() -> TableRepository {
    TableRepository::new(Arc::new(InMemoryItemStore::delegations()))
}

proptest! {
    #[test]
    fn test_car_save_then_get_round_trips(car in arb_car()) {
        runtime().block_on(async {
            let repository = delegations_repository();
            repository.save(&car).await.unwrap();

            let loaded: Option<Car> = repository.get(&car.delegation_id, &car.operation).await.unwrap();
            prop_assert_eq!(loaded, Some(car));
            Ok(())
        })?;
    }

    #[test]
    fn test_delegation_bag_round_trips(delegation in arb_delegation()) {
        runtime().block_on(async {
            let repository = delegations_repository();
            repository.save(&delegation).await.unwrap();

            let loaded: Option<Delegation> = repository
                .get(&delegation.delegation_id, &delegation.operation)
                .await
                .unwrap();
            prop_assert_eq!(loaded, Some(delegation));
            Ok(())
        })?;
    }

    #[test]
    fn test_user_round_trips(user in arb_user()) {
        runtime().block_on(async {
            let repository = TableRepository::new(Arc::new(InMemoryItemStore::users()));
            repository.save(&user).await.unwrap();

            let loaded: Option<User> = repository.get(&user.user_id, "profile").await.unwrap();
            prop_assert_eq!(loaded, Some(user));
            Ok(())
        })?;
    }

    #[test]
    fn test_last_save_wins(first in arb_car(), second in arb_car()) {
        runtime().block_on(async {
            let repository = delegations_repository();
            let second = Car {
                delegation_id: first.delegation_id.clone(),
                operation: first.operation.clone(),
                ..second
            };

            repository.save(&first).await.unwrap();
            repository.save(&second).await.unwrap();

            let loaded: Option<Car> = repository.get(&first.delegation_id, &first.operation).await.unwrap();
            prop_assert_eq!(loaded, Some(second));
            Ok(())
        })?;
    }

    #[test]
    fn test_listing_returns_exactly_the_saved_type(
        cars in prop::collection::vec(arb_car(), 0..12),
        delegations in prop::collection::vec(arb_delegation(), 0..12),
    ) {
        runtime().block_on(async {
            let repository = delegations_repository();

            // Keys may collide across the two generators; the last save at a
            // key decides which type lives there
            let mut expected: BTreeMap<(String, String), Option<Car>> = BTreeMap::new();
            for car in &cars {
                repository.save(car).await.unwrap();
                expected.insert((car.delegation_id.clone(), car.operation.clone()), Some(car.clone()));
            }
            for delegation in &delegations {
                repository.save(delegation).await.unwrap();
                expected.insert((delegation.delegation_id.clone(), delegation.operation.clone()), None);
            }

            let expected_cars: Vec<Car> = expected.into_values().flatten().collect();
            let listed: Vec<Car> = repository.list_all().await.unwrap();
            prop_assert_eq!(listed, expected_cars.clone());

            for car in &expected_cars {
                let partition: Vec<Car> = repository.list_by_partition(&car.delegation_id).await.unwrap();
                prop_assert!(partition.contains(car));
                prop_assert!(partition.iter().all(|c| c.delegation_id == car.delegation_id));
            }
            Ok(())
        })?;
    }
}
