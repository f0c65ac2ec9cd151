//! Catalog title normalization.
//!
//! Raw MovieLens titles carry the release year as a parenthesized suffix,
//! e.g. `"Toy Story (1995)"`. Callers refer to movies by the bare title, so
//! the suffix is stripped once when the catalog is built and the stored
//! title is the only form ever matched against.

/// Split a raw title into its normalized form and the stripped year.
///
/// Example: `"  Heat (1995) "` -> `("Heat", Some(1995))`
///          `"Cosmos"`         -> `("Cosmos", None)`
///
/// Only a trailing `(dddd)` group is removed; parentheses elsewhere in the
/// title (`"Seven (a.k.a. Se7en) (1995)"`) are kept.
pub fn normalize_title(raw: &str) -> (String, Option<u16>) {
    let trimmed = raw.trim();
    match split_year_suffix(trimmed) {
        Some((rest, year)) => (rest.trim().to_string(), Some(year)),
        None => (trimmed.to_string(), None),
    }
}

fn split_year_suffix(title: &str) -> Option<(&str, u16)> {
    let inner = title.strip_suffix(')')?;
    let start = inner.rfind('(')?;
    let year_str = &inner[start + 1..];
    if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = year_str.parse::<u16>().ok()?;
    Some((&title[..start], year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_year_and_whitespace() {
        assert_eq!(
            normalize_title("Toy Story (1995)"),
            ("Toy Story".to_string(), Some(1995))
        );
        assert_eq!(
            normalize_title("  Babylon 5 (1994) "),
            ("Babylon 5".to_string(), Some(1994))
        );
    }

    #[test]
    fn test_normalize_keeps_inner_parentheses() {
        assert_eq!(
            normalize_title("Ghostbusters (a.k.a. Ghost Busters) (1984)"),
            ("Ghostbusters (a.k.a. Ghost Busters)".to_string(), Some(1984))
        );
    }

    #[test]
    fn test_normalize_ignores_non_year_suffix() {
        assert_eq!(
            normalize_title("Paris (Director's Cut)"),
            ("Paris (Director's Cut)".to_string(), None)
        );
        assert_eq!(normalize_title("Movie (19)"), ("Movie (19)".to_string(), None));
    }

    #[test]
    fn test_title_that_is_only_a_year() {
        assert_eq!(normalize_title("(2012)"), ("".to_string(), Some(2012)));
    }
}
