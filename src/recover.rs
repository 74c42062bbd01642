// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Filter relaxation for empty result sets.
//!
//! When the evaluator returns nothing, the advisor proposes up to four
//! minimal relaxations in filter-state order: drop the district, drop the
//! commune, nudge the room count, raise the price ceiling, clear included
//! amenities, clear excluded amenities. Each action carries a concrete hint
//! ("jusqu'à 2 875 000 DA") so the UI can preview it, and applying an action
//! always produces a different filter state than the one that failed.

use crate::types::{parse_rooms, Filters, RoomSpec};
use serde::{Deserialize, Serialize};

/// Most actions offered for one empty-result state.
const MAX_ACTIONS: usize = 4;
/// Price ceiling relaxation factor.
const PRICE_RELAX_FACTOR: f64 = 1.15;
/// Room nudges stay within this piece range.
const ROOM_MIN: u8 = 1;
const ROOM_MAX: u8 = 6;

/// What a recovery action does, mechanically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryKind {
    DropDistrict,
    DropCommune,
    RoomDown,
    RoomUp,
    RaisePriceMax,
    ClearIncludedAmenities,
    ClearExcludedAmenities,
    ResetAll,
}

/// A proposed relaxation, generated fresh per empty-result state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryAction {
    pub key: String,
    pub label: String,
    pub hint: String,
    pub kind: RecoveryKind,
}

impl RecoveryAction {
    /// Apply this action to a filter state, returning the relaxed copy.
    pub fn apply(&self, filters: &Filters) -> Filters {
        let mut next = filters.clone();
        match self.kind {
            RecoveryKind::DropDistrict => next.district = String::new(),
            RecoveryKind::DropCommune => {
                next.commune = String::new();
                next.district = String::new();
            }
            RecoveryKind::RoomDown | RecoveryKind::RoomUp => {
                if let Some(token) = nudged_room_token(&filters.rooms, self.kind) {
                    next.rooms = token;
                }
            }
            RecoveryKind::RaisePriceMax => {
                if let Some(max) = filters.price_max {
                    next.price_max = Some((max * PRICE_RELAX_FACTOR).round());
                }
            }
            RecoveryKind::ClearIncludedAmenities => next.included_amenities.clear(),
            RecoveryKind::ClearExcludedAmenities => next.excluded_amenities.clear(),
            RecoveryKind::ResetAll => {
                next = Filters { sort: filters.sort, view: filters.view, ..Filters::default() };
            }
        }
        next
    }
}

/// Nudge a numeric room token by one piece, staying within 1-6. Studio and
/// non-numeric tokens never nudge.
fn nudged_room_token(token: &str, kind: RecoveryKind) -> Option<String> {
    let Some(RoomSpec::Pieces { count, plus }) = parse_rooms(token) else {
        return None;
    };
    let next = match kind {
        RecoveryKind::RoomDown if count > ROOM_MIN => count - 1,
        RecoveryKind::RoomUp if count < ROOM_MAX => count + 1,
        _ => return None,
    };
    let letter = token.chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or('F');
    Some(format!("{letter}{next}{}", if plus { "+" } else { "" }))
}

/// Propose relaxations for an empty result set. Up to four applicable
/// actions in filter-state order; if none apply but some filter is active, a
/// single reset-everything action.
pub fn recover(filters: &Filters) -> Vec<RecoveryAction> {
    let mut actions: Vec<RecoveryAction> = Vec::new();

    if !filters.district.is_empty() {
        actions.push(RecoveryAction {
            key: "drop-district".into(),
            label: "Élargir au-delà du quartier".into(),
            hint: format!("Retirer « {} »", filters.district),
            kind: RecoveryKind::DropDistrict,
        });
    }
    if !filters.commune.is_empty() {
        actions.push(RecoveryAction {
            key: "drop-commune".into(),
            label: "Chercher dans toutes les communes".into(),
            hint: format!("Retirer « {} »", filters.commune),
            kind: RecoveryKind::DropCommune,
        });
    }
    if let Some(token) = nudged_room_token(&filters.rooms, RecoveryKind::RoomDown) {
        actions.push(RecoveryAction {
            key: "room-down".into(),
            label: "Une pièce de moins".into(),
            hint: format!("Essayer {token}"),
            kind: RecoveryKind::RoomDown,
        });
    }
    if let Some(token) = nudged_room_token(&filters.rooms, RecoveryKind::RoomUp) {
        actions.push(RecoveryAction {
            key: "room-up".into(),
            label: "Une pièce de plus".into(),
            hint: format!("Essayer {token}"),
            kind: RecoveryKind::RoomUp,
        });
    }
    if let Some(max) = filters.price_max {
        let raised = (max * PRICE_RELAX_FACTOR).round();
        actions.push(RecoveryAction {
            key: "raise-price-max".into(),
            label: "Élargir le budget de 15%".into(),
            hint: format!("Jusqu'à {} DA", format_amount(raised)),
            kind: RecoveryKind::RaisePriceMax,
        });
    }
    if !filters.included_amenities.is_empty() {
        actions.push(RecoveryAction {
            key: "clear-included".into(),
            label: "Retirer les équipements exigés".into(),
            hint: format!("{} équipement(s)", filters.included_amenities.len()),
            kind: RecoveryKind::ClearIncludedAmenities,
        });
    }
    if !filters.excluded_amenities.is_empty() {
        actions.push(RecoveryAction {
            key: "clear-excluded".into(),
            label: "Retirer les exclusions".into(),
            hint: format!("{} exclusion(s)", filters.excluded_amenities.len()),
            kind: RecoveryKind::ClearExcludedAmenities,
        });
    }

    if actions.is_empty() {
        if filters.active_count() > 0 {
            actions.push(RecoveryAction {
                key: "reset-all".into(),
                label: "Réinitialiser la recherche".into(),
                hint: "Tout effacer et repartir de zéro".into(),
                kind: RecoveryKind::ResetAll,
            });
        }
        return actions;
    }
    actions.truncate(MAX_ACTIONS);
    actions
}

/// Group an amount with spaces: 2875000 → "2 875 000".
fn format_amount(value: f64) -> String {
    let digits = format!("{}", value.max(0.0).round() as u64);
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
