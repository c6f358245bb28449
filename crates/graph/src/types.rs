use serde::{Deserialize, Serialize};
use std::fmt;
use voyage_itinerary::{EndSource, NaiveDate};

/// Why a node cannot be reached by the chain search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Rejected by the caller's filter or hidden in the visibility store
    Denied,

    /// Missing ship, start date or departure port; cannot form an edge
    Unroutable,
}

/// Node in the sailing graph
///
/// Built fresh for every analysis call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Position of the row in the caller's input
    pub index: usize,

    pub start_date: Option<NaiveDate>,
    pub start_location: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_location: Option<String>,

    /// Rule that produced `end_date`
    pub end_source: EndSource,

    /// Lower-cased ship code or name, used for back-to-back matching
    pub ship_key: String,

    /// Ship name for display
    pub ship_label: String,

    /// Trimmed offer code; a chain never repeats one
    pub offer_code: String,

    /// Dense id of `offer_code` within the node table
    pub offer_id: u32,

    pub exclusion: Option<Exclusion>,
}

impl GraphNode {
    /// Whether the node may appear as a successor in a chain
    #[must_use]
    pub const fn allowed(&self) -> bool {
        self.exclusion.is_none()
    }

    /// Whether the node has the end data needed for outgoing connections
    ///
    /// A same-day end is a display approximation only; it never feeds a
    /// connection, otherwise the row would chain into other offers on the
    /// same physical sailing.
    #[must_use]
    pub const fn has_outgoing(&self) -> bool {
        self.end_date.is_some()
            && self.end_location.is_some()
            && !matches!(self.end_source, EndSource::SameDay)
    }

    /// Lightweight summary for chain output
    #[must_use]
    pub fn summary(&self) -> ChainNode {
        ChainNode {
            index: self.index,
            offer_code: self.offer_code.clone(),
            ship_label: self.ship_label.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            start_location: self.start_location.clone(),
            end_location: self.end_location.clone(),
        }
    }
}

/// Ship component of an adjacency key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShipSlot {
    /// Same ship only (back-to-back)
    Exact(String),

    /// Any ship in port that day (side-by-side)
    Any,
}

/// Bucket key of the adjacency index: where and when a sailing departs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdjacencyKey {
    pub date: NaiveDate,

    /// Lower-cased port name
    pub location: String,

    pub ship: ShipSlot,
}

impl AdjacencyKey {
    pub fn new(date: NaiveDate, location: &str, ship: ShipSlot) -> Self {
        Self {
            date,
            location: location.trim().to_lowercase(),
            ship,
        }
    }
}

impl fmt::Display for AdjacencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ship {
            ShipSlot::Exact(ship) => write!(f, "{}|{}|{}", self.date, self.location, ship),
            ShipSlot::Any => write!(f, "{}|{}|*", self.date, self.location),
        }
    }
}

/// How two consecutive sailings connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Same ship, same port
    BackToBack,

    /// Different ship, same port
    SideBySide,
}

/// Edge between two sailings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub kind: ConnectionKind,

    /// Days spent in port between disembarking and boarding (0 or 1)
    pub layover_days: u32,
}

/// Summary of one sailing inside an extracted chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainNode {
    pub index: usize,
    pub offer_code: String,
    pub ship_label: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
}

/// Ordered sequence of sailings sailed one after another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub nodes: Vec<ChainNode>,
}

impl Chain {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Row indices in sailing order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(|n| n.index)
    }

    pub fn offer_codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.offer_code.as_str())
    }
}

/// Canonical set of offer ids consumed along a path
///
/// Kept sorted so two paths that consumed the same offers in a different
/// order share a memo entry. Branches copy on insert and never share
/// mutable state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UsedOffers(Vec<u32>);

impl UsedOffers {
    #[must_use]
    pub fn contains(&self, offer_id: u32) -> bool {
        self.0.binary_search(&offer_id).is_ok()
    }

    /// Copy of this set with one more offer
    #[must_use]
    pub fn with(&self, offer_id: u32) -> Self {
        match self.0.binary_search(&offer_id) {
            Ok(_) => self.clone(),
            Err(pos) => {
                let mut ids = Vec::with_capacity(self.0.len() + 1);
                ids.extend_from_slice(&self.0[..pos]);
                ids.push(offer_id);
                ids.extend_from_slice(&self.0[pos..]);
                Self(ids)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u32> for UsedOffers {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut ids: Vec<u32> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_key_displays_as_joined_string() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        let exact = AdjacencyKey::new(date, " Rome ", ShipSlot::Exact("x".to_string()));
        let any = AdjacencyKey::new(date, "ROME", ShipSlot::Any);

        assert_eq!(exact.to_string(), "2025-06-08|rome|x");
        assert_eq!(any.to_string(), "2025-06-08|rome|*");
        assert_eq!(exact.location, any.location);
    }

    #[test]
    fn test_used_offers_are_canonical() {
        let a = UsedOffers::default().with(3).with(1).with(2);
        let b: UsedOffers = [2, 3, 1, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.contains(1) && a.contains(2) && a.contains(3));
        assert!(!a.contains(4));
    }

    #[test]
    fn test_used_offers_copy_on_insert() {
        let base = UsedOffers::default().with(5);
        let branch = base.with(7);
        assert!(!base.contains(7));
        assert!(branch.contains(5) && branch.contains(7));
        assert_eq!(base.with(5), base);
    }
}
