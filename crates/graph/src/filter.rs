use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use voyage_itinerary::{date::parse_optional_day, SailingOfferRow};

/// Allow/deny decision for a row, supplied by the caller
pub trait RowFilter {
    fn is_allowed(&self, row: &SailingOfferRow) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&SailingOfferRow) -> bool,
{
    fn is_allowed(&self, row: &SailingOfferRow) -> bool {
        self(row)
    }
}

/// Filter that admits every row
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RowFilter for AllowAll {
    fn is_allowed(&self, _row: &SailingOfferRow) -> bool {
        true
    }
}

/// Composite visibility key: offer code, ship and sail day, upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RowKey(String);

impl RowKey {
    pub fn new(offer_code: &str, ship: &str, sail_date: &str) -> Self {
        Self(format!(
            "{}|{}|{}",
            offer_code.trim(),
            ship.trim(),
            sail_date.trim()
        ))
        .normalized()
    }

    /// Key of a row as the visibility store records it
    pub fn for_row(row: &SailingOfferRow) -> Self {
        let sailing = &row.sailing;
        let ship = sailing
            .ship_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(sailing.ship_name.as_deref())
            .unwrap_or_default();
        let raw_date = sailing.sail_date.as_deref().unwrap_or_default();
        let date = parse_optional_day(Some(raw_date))
            .map_or_else(|| raw_date.trim().to_string(), |d| d.to_string());
        Self::new(row.offer_code(), ship, &date)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalized(self) -> Self {
        Self(self.0.trim().to_uppercase())
    }
}

impl From<String> for RowKey {
    fn from(raw: String) -> Self {
        Self(raw).normalized()
    }
}

impl From<RowKey> for String {
    fn from(key: RowKey) -> Self {
        key.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-side record of rows the user has hidden
pub trait VisibilityStore: Send + Sync {
    fn is_hidden(&self, key: &RowKey) -> Result<bool>;
}

/// In-memory set of hidden row keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HiddenRows {
    keys: HashSet<RowKey>,
}

impl HiddenRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(&mut self, key: RowKey) {
        self.keys.insert(key);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<RowKey> for HiddenRows {
    fn from_iter<I: IntoIterator<Item = RowKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl VisibilityStore for HiddenRows {
    fn is_hidden(&self, key: &RowKey) -> Result<bool> {
        Ok(self.keys.contains(key))
    }
}

/// Default filter used when the caller passes none: consult the store
///
/// A failing store counts as unavailable and the row stays visible.
pub struct VisibilityFilter<'a> {
    store: &'a dyn VisibilityStore,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(store: &'a dyn VisibilityStore) -> Self {
        Self { store }
    }
}

impl RowFilter for VisibilityFilter<'_> {
    fn is_allowed(&self, row: &SailingOfferRow) -> bool {
        let key = RowKey::for_row(row);
        match self.store.is_hidden(&key) {
            Ok(hidden) => !hidden,
            Err(err) => {
                log::warn!("Visibility store unavailable for {key}: {err}");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use voyage_itinerary::Sailing;

    fn row(code: &str, ship: &str, date: &str) -> SailingOfferRow {
        SailingOfferRow::new(
            code,
            Sailing::default()
                .ship_code(ship)
                .sail_date(date)
                .departure_port("Miami"),
        )
    }

    #[test]
    fn test_row_key_is_upper_cased_and_day_precise() {
        let key = RowKey::for_row(&row(" 25feb104", "al", "2025-03-01T16:00:00"));
        assert_eq!(key.as_str(), "25FEB104|AL|2025-03-01");
        assert_eq!(key, RowKey::from("25feb104|al|2025-03-01".to_string()));
    }

    #[test]
    fn test_row_key_falls_back_to_ship_name() {
        let r = SailingOfferRow::new(
            "X1",
            Sailing::default()
                .ship_name("Icon of the Seas")
                .sail_date("2025-03-01"),
        );
        assert_eq!(RowKey::for_row(&r).as_str(), "X1|ICON OF THE SEAS|2025-03-01");
    }

    #[test]
    fn test_hidden_rows_deny_matching_rows() {
        let hidden: HiddenRows = [RowKey::new("a1", "x", "2025-06-01")].into_iter().collect();
        let filter = VisibilityFilter::new(&hidden);

        assert!(!filter.is_allowed(&row("A1", "X", "2025-06-01")));
        assert!(filter.is_allowed(&row("A1", "X", "2025-06-08")));
        assert!(filter.is_allowed(&row("A2", "X", "2025-06-01")));
    }

    #[test]
    fn test_failing_store_allows_rows() {
        struct Broken;
        impl VisibilityStore for Broken {
            fn is_hidden(&self, _key: &RowKey) -> Result<bool> {
                Err(GraphError::collaborator("store offline"))
            }
        }

        let filter = VisibilityFilter::new(&Broken);
        assert!(filter.is_allowed(&row("A1", "X", "2025-06-01")));
    }

    #[test]
    fn test_closures_act_as_filters() {
        let only_x = |r: &SailingOfferRow| r.sailing.ship_code.as_deref() == Some("X");
        assert!(only_x.is_allowed(&row("A1", "X", "2025-06-01")));
        assert!(!only_x.is_allowed(&row("A1", "Y", "2025-06-01")));
        assert!(AllowAll.is_allowed(&row("A1", "Y", "2025-06-01")));
    }

    #[test]
    fn test_hidden_rows_load_from_json() {
        let hidden: HiddenRows =
            serde_json::from_str(r#"["a1|x|2025-06-01", " B1|Y|2025-06-08 "]"#).unwrap();
        assert_eq!(hidden.len(), 2);
        assert!(hidden.is_hidden(&RowKey::new("B1", "y", "2025-06-08")).unwrap());
    }
}
