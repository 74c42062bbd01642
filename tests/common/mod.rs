// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for integration tests: a small Oran listings catalogue
//! exercising every facet (communes, districts, transactions, room sizes,
//! amenities, prices and publication dates).

use samsar::engine::SearchEngine;
use samsar::types::{AmenityKey, Listing, TransactionKind};

pub const NOW_MS: i64 = 1_756_000_000_000;

const DAY_MS: i64 = 86_400_000;

#[allow(clippy::too_many_arguments)]
fn listing(
    id: u64,
    ref_code: &str,
    title: &str,
    kind: TransactionKind,
    category: &str,
    price: &str,
    location: &str,
    beds: u32,
    area: f64,
    age_days: i64,
    photos: usize,
    amenities: &[AmenityKey],
) -> Listing {
    Listing {
        id,
        ref_code: ref_code.into(),
        title: title.into(),
        transaction_kind: kind,
        location_type: None,
        category: Some(category.into()),
        description: None,
        price: price.into(),
        location: location.into(),
        beds,
        baths: 1,
        area,
        created_at: Some(NOW_MS - age_days * DAY_MS),
        images: (0..photos).map(|i| format!("photo-{i}.jpg")).collect(),
        amenities: Some(amenities.iter().copied().collect()),
    }
}

pub fn fixture_listings() -> Vec<Listing> {
    vec![
        listing(
            1,
            "ORN-1001",
            "Appartement vue mer à Canastel",
            TransactionKind::Sale,
            "Appartement",
            "2 500 000 DZD",
            "Canastel, Bir El Djir",
            2,
            95.0,
            3,
            5,
            &[AmenityKey::VueMer, AmenityKey::Balcon, AmenityKey::DoubleAscenseur],
        ),
        listing(
            2,
            "ORN-1002",
            "Appartement standing Akid Lotfi",
            TransactionKind::Sale,
            "Appartement",
            "2 600 000 DZD",
            "Akid Lotfi - Bir El Djir",
            2,
            100.0,
            10,
            3,
            &[AmenityKey::DoubleAscenseur, AmenityKey::Parking, AmenityKey::Interphone],
        ),
        listing(
            3,
            "ORN-1003",
            "Villa avec jardin et piscine",
            TransactionKind::Sale,
            "Villa",
            "14,5 millions",
            "Maraval, Oran",
            4,
            260.0,
            25,
            8,
            &[AmenityKey::Jardin, AmenityKey::Piscine, AmenityKey::Garage],
        ),
        listing(
            4,
            "ORN-1004",
            "Studio meublé proche USTO",
            TransactionKind::RentMonthly,
            "Appartement",
            "45 000",
            "USTO, Bir El Djir",
            1,
            38.0,
            1,
            2,
            &[AmenityKey::Meuble, AmenityKey::Internet],
        ),
        listing(
            5,
            "ORN-1005",
            "Duplex terrasse vue dégagée",
            TransactionKind::Sale,
            "Duplex",
            "5 800 000",
            "Es Senia",
            3,
            150.0,
            45,
            6,
            &[AmenityKey::Terrasse, AmenityKey::Garage, AmenityKey::CuisineEquipee],
        ),
        listing(
            6,
            "ORN-1006",
            "Appartement F3 bord de mer",
            TransactionKind::RentNightly,
            "Appartement",
            "12 000",
            "Ain El Turck",
            2,
            80.0,
            2,
            4,
            &[AmenityKey::VueMer, AmenityKey::Climatisation],
        ),
    ]
}

pub fn fixture_communes() -> Vec<String> {
    vec![
        "Oran".into(),
        "Bir El Djir".into(),
        "Es Senia".into(),
        "Ain El Turck".into(),
    ]
}

pub fn fixture_engine() -> SearchEngine {
    SearchEngine::new(fixture_listings(), fixture_communes(), vec![])
}
