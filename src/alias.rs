// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Static synonym and transliteration table.
//!
//! Place names around Oran circulate in at least three spellings (French
//! cadastre, Arabic, and whatever the listing author typed), and transaction
//! vocabulary mixes French, Arabic and English. The table seeds reciprocal
//! links inside each group: asking for the variants of any member returns all
//! the others.
//!
//! The table is closed. Nothing is learned at runtime; unknown tokens simply
//! have no variants beyond themselves and their compacted form.

use crate::text::{compact, normalize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Synonym groups. Every member of a group is an alias of every other member.
const ALIAS_GROUPS: &[&[&str]] = &[
    // Communes and their transliterations
    &["oran", "wahran", "wehran", "el bahia", "وهران"],
    &["bir el djir", "bir el jir", "bir djir", "بئر الجير"],
    &["es senia", "es-senia", "la senia", "السانية"],
    &["ain el turck", "ain el turk", "ain turk", "عين الترك"],
    &["mers el kebir", "mers el-kebir", "المرسى الكبير"],
    &["arzew", "arzeu", "أرزيو"],
    &["gdyel", "gdeyel"],
    &["misserghin", "misserghine"],
    &["sidi chami", "sidi chahmi"],
    // District spelling variants
    &["canastel", "kanastel"],
    &["maraval", "marraval"],
    &["usto", "ousto"],
    &["gambetta", "gambeta"],
    &["akid lotfi", "akid-lotfi"],
    &["point du jour", "pont du jour"],
    &["seddikia", "sedikia"],
    // Transaction vocabulary
    &["vente", "achat", "acheter", "sale", "buy", "بيع", "للبيع"],
    &["location", "louer", "rent", "kra", "كراء", "للكراء", "إيجار"],
    &["par mois", "mensuel", "monthly", "شهري"],
    &["par nuit", "nuitee", "nightly", "ليلة"],
    &["courte duree", "court sejour", "short stay"],
    // Categories
    &["appartement", "apartment", "appart", "شقة"],
    &["villa", "فيلا"],
    &["studio", "استوديو"],
    &["terrain", "أرض"],
    &["local", "local commercial", "محل"],
    &["niveau de villa", "niveau villa"],
];

fn alias_map() -> &'static HashMap<String, Vec<String>> {
    static MAP: OnceLock<HashMap<String, Vec<String>>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for group in ALIAS_GROUPS {
            for member in *group {
                let key = normalize(member);
                let others: Vec<String> = group
                    .iter()
                    .filter(|m| **m != *member)
                    .map(|m| normalize(m))
                    .collect();
                map.entry(key).or_default().extend(others);
            }
        }
        map
    })
}

/// All search variants of a token: the folded token itself, its compacted
/// form, every alias from the static table, and the compacted aliases.
///
/// The result is deduplicated and deterministic. Tokens outside the table get
/// `[token, compact(token)]` (or just `[token]` when compaction is a no-op).
pub fn variants_of(token: &str) -> Vec<String> {
    let folded = normalize(token);
    let mut out: Vec<String> = Vec::new();
    let mut push = |out: &mut Vec<String>, v: String| {
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    };
    push(&mut out, folded.clone());
    push(&mut out, compact(&folded));
    if let Some(aliases) = alias_map().get(&folded) {
        for alias in aliases {
            push(&mut out, alias.clone());
            push(&mut out, compact(alias));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reciprocal_links() {
        assert!(variants_of("oran").contains(&"wahran".to_string()));
        assert!(variants_of("wahran").contains(&"oran".to_string()));
    }

    #[test]
    fn test_compacted_variants() {
        let v = variants_of("bir el djir");
        assert!(v.contains(&"bireldjir".to_string()));
        assert!(v.contains(&"bir el jir".to_string()));
        assert!(v.contains(&"birdjir".to_string()));
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(variants_of("canapé"), vec!["canape".to_string()]);
        assert_eq!(
            variants_of("rez de chaussée"),
            vec!["rez de chaussee".to_string(), "rezdechaussee".to_string()]
        );
    }

    #[test]
    fn test_transaction_synonyms_cross_language() {
        let v = variants_of("rent");
        assert!(v.contains(&"location".to_string()));
        assert!(v.contains(&"كراء".to_string()));
    }
}
