// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The filterable facets actually available for a candidate set.
//!
//! Built once per page load from the static catalogues plus whatever values
//! occur in the current listings. A commune with no listings still shows up
//! (it came from the catalogue); a district only the listings know about
//! shows up too.

use crate::location::{parse_location, LocationHints};
use crate::text::normalize;
use crate::types::{Listing, TransactionKind};

/// Available filter dimensions for the current candidate set.
#[derive(Debug, Clone, Default)]
pub struct FacetCatalogue {
    pub communes: Vec<String>,
    /// (district, commune) pairs.
    pub districts: Vec<(String, String)>,
    pub categories: Vec<String>,
    /// Room tokens observed via bed counts ("Studio", "F3", ...).
    pub rooms: Vec<String>,
    pub transactions: Vec<TransactionKind>,
}

impl FacetCatalogue {
    /// Derive the catalogue from static data plus the candidate set.
    pub fn build(listings: &[Listing], hints: &LocationHints) -> Self {
        let mut communes: Vec<String> = hints.communes().to_vec();
        let mut districts: Vec<(String, String)> = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        let mut rooms: Vec<String> = Vec::new();
        let mut transactions: Vec<TransactionKind> = Vec::new();

        let mut push_unique = |list: &mut Vec<String>, value: String| {
            if !value.is_empty() && !list.iter().any(|v| normalize(v) == normalize(&value)) {
                list.push(value);
            }
        };

        for (_, (commune, district)) in hints.iter() {
            if !districts.iter().any(|(d, _)| normalize(d) == normalize(district)) {
                districts.push((district.clone(), commune.clone()));
            }
        }

        for listing in listings {
            let parsed = parse_location(&listing.location, hints.communes());
            push_unique(&mut communes, parsed.commune.clone());
            if !parsed.district.is_empty()
                && !districts.iter().any(|(d, _)| normalize(d) == normalize(&parsed.district))
            {
                districts.push((parsed.district.clone(), parsed.commune.clone()));
            }
            if let Some(category) = &listing.category {
                push_unique(&mut categories, category.clone());
            }
            push_unique(&mut rooms, listing.room_label());
            if !transactions.contains(&listing.transaction_kind) {
                transactions.push(listing.transaction_kind);
            }
            // Generic rent is offered whenever any rental variant occurs.
            if listing.transaction_kind.is_rental()
                && !transactions.contains(&TransactionKind::Rent)
            {
                transactions.push(TransactionKind::Rent);
            }
        }

        communes.sort();
        districts.sort();
        categories.sort();
        rooms.sort();
        FacetCatalogue { communes, districts, categories, rooms, transactions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AmenityKey;
    use std::collections::BTreeSet;

    fn listing(kind: TransactionKind, category: &str, location: &str, beds: u32) -> Listing {
        Listing {
            id: 0,
            ref_code: format!("R-{location}-{beds}"),
            title: String::new(),
            transaction_kind: kind,
            location_type: None,
            category: Some(category.to_string()),
            description: None,
            price: "1 000 000".into(),
            location: location.to_string(),
            beds,
            baths: 1,
            area: 90.0,
            created_at: None,
            images: vec![],
            amenities: Some(BTreeSet::from([AmenityKey::Balcon])),
        }
    }

    #[test]
    fn test_catalogue_union_of_static_and_observed() {
        let communes: Vec<String> = vec!["Oran".into(), "Bir El Djir".into()];
        let listings = vec![
            listing(TransactionKind::Sale, "Appartement", "Canastel, Bir El Djir", 2),
            listing(TransactionKind::RentMonthly, "Villa", "Es Senia", 4),
        ];
        let hints = LocationHints::build(
            &communes,
            &[("Maraval".into(), "Oran".into())],
            listings.iter().map(|l| l.location.as_str()),
        );
        let facets = FacetCatalogue::build(&listings, &hints);

        assert!(facets.communes.contains(&"Oran".to_string()));
        // "Es Senia" is not in the static list; it arrives as a district here
        assert!(facets.districts.iter().any(|(d, _)| d == "Maraval"));
        assert!(facets.districts.iter().any(|(d, _)| d == "Canastel"));
        assert_eq!(facets.categories, vec!["Appartement".to_string(), "Villa".to_string()]);
        assert!(facets.rooms.contains(&"F3".to_string()));
        assert!(facets.rooms.contains(&"F5".to_string()));
        // Generic rent offered because a rental variant occurs
        assert!(facets.transactions.contains(&TransactionKind::Rent));
        assert!(facets.transactions.contains(&TransactionKind::RentMonthly));
    }
}
