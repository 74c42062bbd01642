// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the listings search engine.
//!
//! A [`Listing`] is immutable for the duration of a browsing session and
//! arrives from the relational store as JSON. [`Filters`] is the one mutable
//! piece of session state; everything else in the crate is a pure function
//! over `(listings, filters)` snapshots.
//!
//! Money and dates come in dirty. Prices are display strings ("2 500 000
//! DZD", "2.5M") parsed best-effort by [`parse_money`]; an unparsable price
//! or a missing `createdAt` never excludes a listing, it just stops
//! contributing to the predicate or score that needed it.

use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Transaction kind of a listing. The five rental variants all satisfy the
/// generic rent filter; a specific variant filter only matches exactly (or
/// via the raw `locationType` text on the listing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Rent,
    RentMonthly,
    RentSixMonths,
    RentTwelveMonths,
    RentNightly,
    RentShortStay,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 7] = [
        TransactionKind::Sale,
        TransactionKind::Rent,
        TransactionKind::RentMonthly,
        TransactionKind::RentSixMonths,
        TransactionKind::RentTwelveMonths,
        TransactionKind::RentNightly,
        TransactionKind::RentShortStay,
    ];

    /// Display label, French-first like the rest of the UI vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Sale => "Vente",
            TransactionKind::Rent => "Location",
            TransactionKind::RentMonthly => "Location par mois",
            TransactionKind::RentSixMonths => "Location 6 mois",
            TransactionKind::RentTwelveMonths => "Location 12 mois",
            TransactionKind::RentNightly => "Location par nuit",
            TransactionKind::RentShortStay => "Location courte durée",
        }
    }

    /// Folded cue terms that signal this kind inside free text.
    pub fn cue_terms(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Sale => &["vente", "achat", "acheter", "sale", "buy", "بيع", "للبيع"],
            TransactionKind::Rent => &["location", "louer", "rent", "kra", "كراء", "للكراء"],
            TransactionKind::RentMonthly => &["par mois", "mensuel", "monthly", "شهري"],
            TransactionKind::RentSixMonths => &["6 mois", "six mois"],
            TransactionKind::RentTwelveMonths => &["12 mois", "douze mois"],
            TransactionKind::RentNightly => &["par nuit", "nuitee", "nightly", "ليلة"],
            TransactionKind::RentShortStay => &["courte duree", "court sejour", "short stay"],
        }
    }

    pub fn is_rental(self) -> bool {
        !matches!(self, TransactionKind::Sale)
    }
}

// =============================================================================
// AMENITIES
// =============================================================================

/// Closed catalogue of listing amenities. Fixed at 29 keys; nothing is ever
/// inferred beyond this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityKey {
    DoubleAscenseur,
    VueMer,
    Balcon,
    DeuxBalcons,
    Garage,
    Parking,
    Jardin,
    Piscine,
    Climatisation,
    ChauffageCentral,
    CuisineEquipee,
    Meuble,
    Terrasse,
    Gardiennage,
    Interphone,
    PorteBlindee,
    DoubleVitrage,
    PanneauxSolaires,
    BacheEau,
    ChauffeEau,
    Internet,
    FibreOptique,
    CameraSurveillance,
    Cave,
    Cellier,
    Buanderie,
    Dressing,
    SalleSport,
    ProcheCommodites,
}

impl AmenityKey {
    pub const ALL: [AmenityKey; 29] = [
        AmenityKey::DoubleAscenseur,
        AmenityKey::VueMer,
        AmenityKey::Balcon,
        AmenityKey::DeuxBalcons,
        AmenityKey::Garage,
        AmenityKey::Parking,
        AmenityKey::Jardin,
        AmenityKey::Piscine,
        AmenityKey::Climatisation,
        AmenityKey::ChauffageCentral,
        AmenityKey::CuisineEquipee,
        AmenityKey::Meuble,
        AmenityKey::Terrasse,
        AmenityKey::Gardiennage,
        AmenityKey::Interphone,
        AmenityKey::PorteBlindee,
        AmenityKey::DoubleVitrage,
        AmenityKey::PanneauxSolaires,
        AmenityKey::BacheEau,
        AmenityKey::ChauffeEau,
        AmenityKey::Internet,
        AmenityKey::FibreOptique,
        AmenityKey::CameraSurveillance,
        AmenityKey::Cave,
        AmenityKey::Cellier,
        AmenityKey::Buanderie,
        AmenityKey::Dressing,
        AmenityKey::SalleSport,
        AmenityKey::ProcheCommodites,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AmenityKey::DoubleAscenseur => "Ascenseur",
            AmenityKey::VueMer => "Vue mer",
            AmenityKey::Balcon => "Balcon",
            AmenityKey::DeuxBalcons => "Deux balcons",
            AmenityKey::Garage => "Garage",
            AmenityKey::Parking => "Parking",
            AmenityKey::Jardin => "Jardin",
            AmenityKey::Piscine => "Piscine",
            AmenityKey::Climatisation => "Climatisation",
            AmenityKey::ChauffageCentral => "Chauffage central",
            AmenityKey::CuisineEquipee => "Cuisine équipée",
            AmenityKey::Meuble => "Meublé",
            AmenityKey::Terrasse => "Terrasse",
            AmenityKey::Gardiennage => "Gardiennage",
            AmenityKey::Interphone => "Interphone",
            AmenityKey::PorteBlindee => "Porte blindée",
            AmenityKey::DoubleVitrage => "Double vitrage",
            AmenityKey::PanneauxSolaires => "Panneaux solaires",
            AmenityKey::BacheEau => "Bâche à eau",
            AmenityKey::ChauffeEau => "Chauffe-eau",
            AmenityKey::Internet => "Internet",
            AmenityKey::FibreOptique => "Fibre optique",
            AmenityKey::CameraSurveillance => "Caméras de surveillance",
            AmenityKey::Cave => "Cave",
            AmenityKey::Cellier => "Cellier",
            AmenityKey::Buanderie => "Buanderie",
            AmenityKey::Dressing => "Dressing",
            AmenityKey::SalleSport => "Salle de sport",
            AmenityKey::ProcheCommodites => "Proche commodités",
        }
    }

    /// Folded cue terms that signal this amenity inside a query.
    pub fn cue_terms(self) -> &'static [&'static str] {
        match self {
            AmenityKey::DoubleAscenseur => &["ascenseur", "elevator", "اسانسير", "مصعد"],
            AmenityKey::VueMer => &["vue mer", "vue sur mer", "sea view", "اطلالة على البحر"],
            AmenityKey::Balcon => &["balcon", "balcony", "بلكون"],
            AmenityKey::DeuxBalcons => &["deux balcons", "2 balcons", "double balcon"],
            AmenityKey::Garage => &["garage", "قراج"],
            AmenityKey::Parking => &["parking", "موقف"],
            AmenityKey::Jardin => &["jardin", "garden", "حديقة"],
            AmenityKey::Piscine => &["piscine", "pool", "مسبح"],
            AmenityKey::Climatisation => &["climatisation", "climatiseur", "clim", "مكيف"],
            AmenityKey::ChauffageCentral => &["chauffage central", "chauffage"],
            AmenityKey::CuisineEquipee => &["cuisine equipee", "cuisine amenagee"],
            AmenityKey::Meuble => &["meuble", "furnished", "مفروشة"],
            AmenityKey::Terrasse => &["terrasse", "terrace"],
            AmenityKey::Gardiennage => &["gardiennage", "gardien", "حراسة"],
            AmenityKey::Interphone => &["interphone", "intercom"],
            AmenityKey::PorteBlindee => &["porte blindee", "porte securisee"],
            AmenityKey::DoubleVitrage => &["double vitrage"],
            AmenityKey::PanneauxSolaires => &["panneaux solaires", "solaire"],
            AmenityKey::BacheEau => &["bache a eau", "bache eau", "citerne"],
            AmenityKey::ChauffeEau => &["chauffe eau", "chauffe-eau"],
            AmenityKey::Internet => &["internet", "wifi"],
            AmenityKey::FibreOptique => &["fibre optique", "fibre"],
            AmenityKey::CameraSurveillance => &["camera", "cameras", "surveillance"],
            AmenityKey::Cave => &["cave"],
            AmenityKey::Cellier => &["cellier"],
            AmenityKey::Buanderie => &["buanderie"],
            AmenityKey::Dressing => &["dressing"],
            AmenityKey::SalleSport => &["salle de sport", "salle sport", "gym"],
            AmenityKey::ProcheCommodites => &["proche commodites", "commodites"],
        }
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

/// A candidate listing, as supplied by the relational store. Immutable for
/// the duration of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: u64,
    /// Public reference code ("ORN-1042"). Behavior counters are keyed by its
    /// folded form.
    #[serde(rename = "ref")]
    pub ref_code: String,
    pub title: String,
    pub transaction_kind: TransactionKind,
    /// Raw transaction text from the source. When present it is the source of
    /// truth for the specific rental sub-types.
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Display price string, money-parseable ("2 500 000 DZD", "4.5M").
    pub price: String,
    /// Free-form address string ("Canastel, Bir El Djir").
    pub location: String,
    pub beds: u32,
    pub baths: u32,
    pub area: f64,
    /// Epoch milliseconds. Absent or dirty timestamps pass the
    /// published-within predicate and earn no freshness score.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Option<BTreeSet<AmenityKey>>,
}

impl Listing {
    /// Behavior-store key for this listing.
    pub fn behavior_key(&self) -> String {
        normalize(&self.ref_code)
    }

    pub fn amenity_set(&self) -> &BTreeSet<AmenityKey> {
        static EMPTY: BTreeSet<AmenityKey> = BTreeSet::new();
        self.amenities.as_ref().unwrap_or(&EMPTY)
    }

    /// Room label inferred from the bed count: `beds + 1` pieces, or Studio
    /// for at most one bed.
    pub fn room_label(&self) -> String {
        if self.beds <= 1 {
            "Studio".to_string()
        } else {
            format!("F{}", self.beds + 1)
        }
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Published-within window, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishedWithin {
    #[default]
    All,
    Days7,
    Days30,
    Days90,
}

impl PublishedWithin {
    pub fn days(self) -> Option<u32> {
        match self {
            PublishedWithin::All => None,
            PublishedWithin::Days7 => Some(7),
            PublishedWithin::Days30 => Some(30),
            PublishedWithin::Days90 => Some(90),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    PriceAsc,
    PriceDesc,
    AreaDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Mutable session filter state. Created once with defaults, then mutated by
/// user interaction, intent extraction, suggestions, preset toggles and
/// recovery actions. Never persisted server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub query: String,
    /// `None` means "all transactions".
    pub transaction: Option<TransactionKind>,
    pub category: Option<String>,
    pub published_within: PublishedWithin,
    pub photos_only: bool,
    /// Empty string means unset.
    pub commune: String,
    pub district: String,
    /// Room token: "F3", "T2+", "Studio", or empty for unset.
    pub rooms: String,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub area_min: Option<f64>,
    pub area_max: Option<f64>,
    pub beds_min: Option<u32>,
    pub baths_min: Option<u32>,
    pub included_amenities: BTreeSet<AmenityKey>,
    pub excluded_amenities: BTreeSet<AmenityKey>,
    pub sort: SortMode,
    pub view: ViewMode,
}

impl Default for Filters {
    fn default() -> Self {
        Filters {
            query: String::new(),
            transaction: None,
            category: None,
            published_within: PublishedWithin::All,
            photos_only: false,
            commune: String::new(),
            district: String::new(),
            rooms: String::new(),
            price_min: None,
            price_max: None,
            area_min: None,
            area_max: None,
            beds_min: None,
            baths_min: None,
            included_amenities: BTreeSet::new(),
            excluded_amenities: BTreeSet::new(),
            sort: SortMode::Relevance,
            view: ViewMode::Grid,
        }
    }
}

impl Filters {
    /// How many filters differ from their defaults. Query text counts as one;
    /// sort and view modes never count.
    pub fn active_count(&self) -> usize {
        let mut n = 0;
        n += usize::from(!self.query.trim().is_empty());
        n += usize::from(self.transaction.is_some());
        n += usize::from(self.category.is_some());
        n += usize::from(self.published_within != PublishedWithin::All);
        n += usize::from(self.photos_only);
        n += usize::from(!self.commune.is_empty());
        n += usize::from(!self.district.is_empty());
        n += usize::from(!self.rooms.is_empty());
        n += usize::from(self.price_min.is_some());
        n += usize::from(self.price_max.is_some());
        n += usize::from(self.area_min.is_some());
        n += usize::from(self.area_max.is_some());
        n += usize::from(self.beds_min.is_some());
        n += usize::from(self.baths_min.is_some());
        n += usize::from(!self.included_amenities.is_empty());
        n += usize::from(!self.excluded_amenities.is_empty());
        n
    }
}

// =============================================================================
// ROOM TOKENS
// =============================================================================

/// Parsed room token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSpec {
    Studio,
    /// `count` pieces, with an optional "or more" suffix ("F3+").
    Pieces { count: u8, plus: bool },
}

/// Parse a room token: "F3", "t2+", "Studio". Returns `None` for anything
/// else, including out-of-range digits.
pub fn parse_rooms(token: &str) -> Option<RoomSpec> {
    let folded = normalize(token);
    if folded == "studio" {
        return Some(RoomSpec::Studio);
    }
    let mut chars = folded.chars();
    let letter = chars.next()?;
    if letter != 'f' && letter != 't' {
        return None;
    }
    let digit = chars.next()?.to_digit(10)?;
    if digit == 0 {
        return None;
    }
    match chars.next() {
        None => Some(RoomSpec::Pieces { count: digit as u8, plus: false }),
        Some('+') if chars.next().is_none() => {
            Some(RoomSpec::Pieces { count: digit as u8, plus: true })
        }
        _ => None,
    }
}

// =============================================================================
// MONEY
// =============================================================================

/// Parse a display money string into dinars.
///
/// Accepts grouped thousands ("2 500 000 DZD", "2,500,000"), plain numbers,
/// and the million shorthand ("2.5M", "3 millions"). Returns `None` when no
/// leading numeric run is found; the caller treats that as "predicate
/// passes", never as an exclusion.
pub fn parse_money(raw: &str) -> Option<f64> {
    let folded = normalize(raw);
    let mut run = String::new();
    let mut started = false;
    let mut rest_at = folded.len();
    for (i, c) in folded.char_indices() {
        if c.is_ascii_digit() {
            started = true;
            run.push(c);
        } else if started && (c == ' ' || c == ',' || c == '.') {
            run.push(c);
        } else if started {
            rest_at = i;
            break;
        }
    }
    if run.is_empty() {
        return None;
    }
    let run = run.trim_end_matches([' ', ',', '.']);

    // A separator followed by 1-2 trailing digits is a decimal point;
    // everything else is thousands grouping.
    let mut integer = String::new();
    let mut fraction = String::new();
    if let Some(pos) = run.rfind([',', '.']) {
        let tail = &run[pos + 1..];
        if !tail.is_empty() && tail.len() <= 2 && tail.chars().all(|c| c.is_ascii_digit()) {
            integer = run[..pos].chars().filter(char::is_ascii_digit).collect();
            fraction = tail.to_string();
        }
    }
    if integer.is_empty() && fraction.is_empty() {
        integer = run.chars().filter(char::is_ascii_digit).collect();
    }
    if integer.is_empty() {
        integer.push('0');
    }
    let mut value: f64 = format!("{integer}.{fraction}0").parse().ok()?;

    // Million shorthand: "2.5m", "3 millions", "2,5 M DZD"
    let rest = folded[rest_at..].trim_start();
    let first_word = rest.split_whitespace().next().unwrap_or("");
    if first_word == "m" || first_word.starts_with("million") {
        value *= 1_000_000.0;
    }
    Some(value)
}

// =============================================================================
// SUGGESTIONS
// =============================================================================

/// Facet a suggestion belongs to, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    SmartQuery,
    Transaction,
    Category,
    Commune,
    District,
    Room,
}

/// An autocomplete candidate. Recomputed on every keystroke; no identity
/// beyond the current render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestion {
    pub key: String,
    pub facet: FacetKind,
    pub label: String,
    pub value: String,
    pub match_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commune: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<String>,
}

impl SearchSuggestion {
    /// Merge this suggestion's facet values into a filter state.
    pub fn apply(&self, filters: &Filters) -> Filters {
        let mut next = filters.clone();
        match self.facet {
            FacetKind::SmartQuery => next.query = self.value.clone(),
            FacetKind::Transaction => next.transaction = self.transaction,
            FacetKind::Category => next.category = self.category.clone(),
            FacetKind::Commune => {
                if let Some(c) = &self.commune {
                    next.commune = c.clone();
                }
            }
            FacetKind::District => {
                if let Some(d) = &self.district {
                    next.district = d.clone();
                }
                if let Some(c) = &self.commune {
                    next.commune = c.clone();
                }
            }
            FacetKind::Room => {
                if let Some(r) = &self.rooms {
                    next.rooms = r.clone();
                }
            }
        }
        next
    }
}
