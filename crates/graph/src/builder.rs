use crate::filter::RowFilter;
use crate::types::{Exclusion, GraphNode, UsedOffers};
use std::collections::{HashMap, HashSet};
use voyage_itinerary::{resolve_endpoints, ItineraryParser, SailingOfferRow};

/// Nodes of one analysis run, indexed like the input rows
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: Vec<GraphNode>,
    offer_ids: HashMap<String, u32>,
}

impl NodeTable {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn allowed(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.allowed())
    }

    /// Dense id of an offer code, if any node carries it
    pub fn offer_id(&self, offer_code: &str) -> Option<u32> {
        self.offer_ids.get(offer_code.trim()).copied()
    }

    /// Number of distinct offer codes among allowed nodes; no chain is longer
    pub fn allowed_offer_count(&self) -> usize {
        self.allowed()
            .map(|n| n.offer_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of distinct offer codes among rows the filter admits.
    ///
    /// Unlike [`Self::allowed_offer_count`] this includes unroutable rows,
    /// which still report depth 1 as isolated roots. No depth exceeds it.
    pub fn admitted_offer_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.exclusion != Some(Exclusion::Denied))
            .map(|n| n.offer_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Seed set for a resumed chain; codes no node carries are dropped
    pub fn used_offers<S: AsRef<str>>(&self, codes: &[S]) -> UsedOffers {
        codes
            .iter()
            .filter_map(|code| self.offer_id(code.as_ref()))
            .collect()
    }
}

/// Build the node table from raw offer rows
pub struct NodeTableBuilder<'a> {
    filter: &'a dyn RowFilter,
    parser: Option<&'a dyn ItineraryParser>,
}

impl<'a> NodeTableBuilder<'a> {
    pub fn new(filter: &'a dyn RowFilter) -> Self {
        Self {
            filter,
            parser: None,
        }
    }

    /// Use a structured itinerary parser for night-count inference
    #[must_use]
    pub fn with_parser(mut self, parser: Option<&'a dyn ItineraryParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn build(&self, rows: &[SailingOfferRow]) -> NodeTable {
        let mut offer_ids: HashMap<String, u32> = HashMap::new();
        let mut nodes = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let endpoints = resolve_endpoints(row, self.parser);
            let ship_key = row.sailing.ship_key();
            let offer_code = row.offer_code().to_string();

            let next_id = u32::try_from(offer_ids.len()).unwrap_or(u32::MAX);
            let offer_id = *offer_ids.entry(offer_code.clone()).or_insert(next_id);

            let exclusion = if !self.filter.is_allowed(row) {
                Some(Exclusion::Denied)
            } else if ship_key.is_empty()
                || endpoints.start_date.is_none()
                || endpoints.start_location.is_none()
            {
                Some(Exclusion::Unroutable)
            } else {
                None
            };

            nodes.push(GraphNode {
                index,
                start_date: endpoints.start_date,
                start_location: endpoints.start_location,
                end_date: endpoints.end_date,
                end_location: endpoints.end_location,
                end_source: endpoints.end_source,
                ship_key,
                ship_label: row.sailing.ship_label(),
                offer_code,
                offer_id,
                exclusion,
            });
        }

        let table = NodeTable { nodes, offer_ids };

        log::debug!(
            "Built node table: {} nodes, {} allowed, {} distinct offers",
            table.len(),
            table.allowed().count(),
            table.allowed_offer_count()
        );

        table
    }
}
