use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use renting_rs::models::{Booking, Car, Delegation, TableFamily};
use renting_rs::repositories::keys::{decode_stored, to_stored_item};
use renting_rs::repositories::{
    InMemoryItemStore, ListLimits, Repository, TableRepository, TableSpec,
};
use renting_rs::services::seed::{generate_cars, sample_profile, SEED_DELEGATION_ID};

fn sample_booking() -> Booking {
    serde_json::from_value(serde_json::json!({
        "userId": "USER#001",
        "operation": "booking#2025#001",
        "car": serde_json::to_value(&generate_cars(SEED_DELEGATION_ID, 1)[0]).unwrap(),
        "status": "ACTIVE",
        "startDate": "2025-10-01",
        "endDate": "2025-10-07",
        "totalToPayment": "456.56",
        "statusPayment": "PAID",
        "statusBooking": "CREATED",
        "pickUpDelegation": serde_json::to_value(sample_profile(SEED_DELEGATION_ID)).unwrap()
    }))
    .unwrap()
}

fn seeded_repository(rt: &Runtime, cars: usize) -> TableRepository {
    let repository = TableRepository::new(Arc::new(InMemoryItemStore::delegations()))
        .with_limits(ListLimits {
            page_size: 100,
            max_list_items: cars.max(1),
        });

    rt.block_on(async {
        repository
            .save(&sample_profile(SEED_DELEGATION_ID))
            .await
            .unwrap();
        for car in generate_cars(SEED_DELEGATION_ID, cars) {
            repository.save(&car).await.unwrap();
        }
    });
    repository
}

fn bench_record_codec(c: &mut Criterion) {
    let delegations = TableSpec::new(TableFamily::Delegations, "Delegations");
    let users = TableSpec::new(TableFamily::Users, "Users");
    let car = generate_cars(SEED_DELEGATION_ID, 1).remove(0);
    let profile = sample_profile(SEED_DELEGATION_ID);
    let booking = sample_booking();

    let mut group = c.benchmark_group("record_codec");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("car_encode", |b| {
        b.iter(|| black_box(to_stored_item(&delegations, black_box(&car)).unwrap()))
    });

    let car_item = to_stored_item(&delegations, &car).unwrap();
    group.bench_function("car_decode", |b| {
        b.iter(|| black_box(decode_stored::<Car>(&delegations, car_item.clone()).unwrap()))
    });

    let profile_item = to_stored_item(&delegations, &profile).unwrap();
    group.bench_function("delegation_decode", |b| {
        b.iter(|| {
            black_box(decode_stored::<Delegation>(&delegations, profile_item.clone()).unwrap())
        })
    });

    let booking_item = to_stored_item(&users, &booking).unwrap();
    group.bench_function("booking_decode", |b| {
        b.iter(|| black_box(decode_stored::<Booking>(&users, booking_item.clone()).unwrap()))
    });

    group.finish();
}

fn bench_listing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("listing");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));

    for dataset_size in [100, 500, 999].iter() {
        let repository = seeded_repository(&rt, *dataset_size);

        group.bench_with_input(
            BenchmarkId::new("list_by_partition", dataset_size),
            dataset_size,
            |b, _| {
                b.iter(|| {
                    rt.block_on(async {
                        let cars: Vec<Car> = repository
                            .list_by_partition(SEED_DELEGATION_ID)
                            .await
                            .unwrap();
                        black_box(cars)
                    })
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("list_all", dataset_size),
            dataset_size,
            |b, _| {
                b.iter(|| {
                    rt.block_on(async {
                        let cars: Vec<Car> = repository.list_all().await.unwrap();
                        black_box(cars)
                    })
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_record_codec, bench_listing);
criterion_main!(benches);
