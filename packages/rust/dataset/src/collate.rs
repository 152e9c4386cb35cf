//! Locale-aware ordering and matching of place names.
//!
//! Names are compared in tiers, the way a collator does for Latin scripts:
//! base letters first (accents and case ignored), then accents, then case
//! (lowercase before uppercase), then raw codepoints as a final tie-break.
//! This keeps "Capão" next to "Capao" and ahead of "Capivari" instead of
//! after every unaccented name.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Precomputed collation key for one string.
///
/// Field order is the comparison order, so the derived `Ord` is the
/// collation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    base: Vec<char>,
    accents: Vec<char>,
    case: Vec<bool>,
    raw: String,
}

/// Build the collation key for `s`.
pub fn sort_key(s: &str) -> SortKey {
    let mut base = Vec::with_capacity(s.len());
    let mut accents = Vec::with_capacity(s.len());
    let mut case = Vec::with_capacity(s.len());

    for c in s.nfd() {
        accents.extend(c.to_lowercase());
        if is_combining_mark(c) {
            continue;
        }
        base.extend(c.to_lowercase());
        case.push(c.is_uppercase());
    }

    SortKey {
        base,
        accents,
        case,
        raw: s.to_string(),
    }
}

/// Compare two names in collation order.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sort names in place in collation order.
pub fn sort(names: &mut [String]) {
    names.sort_by_cached_key(|name| sort_key(name));
}

/// Whether `names` is already in collation order.
pub fn is_sorted(names: &[String]) -> bool {
    names
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Reduce `s` to its base letters: decomposed, accents dropped, lowercased.
///
/// Used for search matching, where "capao" must find "Capão do Leão".
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        sort(&mut v);
        v
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        assert_eq!(
            sorted(&["Pelotas", "Água Santa", "Alegrete", "Bagé"]),
            vec!["Água Santa", "Alegrete", "Bagé", "Pelotas"]
        );
    }

    #[test]
    fn accent_is_a_secondary_difference() {
        assert_eq!(compare("Capao", "Capão"), Ordering::Less);
        assert_eq!(compare("Capão", "Capivari"), Ordering::Less);
        assert_eq!(compare("Turuçu", "Turvo"), Ordering::Less);
    }

    #[test]
    fn case_is_a_tertiary_difference() {
        assert_eq!(compare("pelotas", "Pelotas"), Ordering::Less);
        assert_eq!(compare("Pelotas", "pelotasx"), Ordering::Less);
    }

    #[test]
    fn spaces_sort_before_letters() {
        assert_eq!(
            sorted(&["São Sepé", "São Borja", "Santa Maria", "Sant'Ana do Livramento"]),
            vec!["Sant'Ana do Livramento", "Santa Maria", "São Borja", "São Sepé"]
        );
    }

    #[test]
    fn equal_strings_compare_equal() {
        assert_eq!(compare("Capão do Leão", "Capão do Leão"), Ordering::Equal);
    }

    #[test]
    fn precomposed_and_decomposed_forms_share_a_base() {
        let decomposed = "Capa\u{303}o";
        assert_eq!(fold(decomposed), fold("Capão"));
        assert_ne!(compare(decomposed, "Capão"), Ordering::Equal);
    }

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Capão do Leão"), "capao do leao");
        assert_eq!(fold("ÁGUA SANTA"), "agua santa");
    }

    #[test]
    fn sorting_sorted_input_is_noop() {
        let once = sorted(&["Turuçu", "Canguçu", "Arroio do Padre", "Capão do Leão"]);
        let mut twice = once.clone();
        sort(&mut twice);
        assert_eq!(once, twice);
        assert!(is_sorted(&once));
    }
}
