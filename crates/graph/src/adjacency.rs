use crate::builder::NodeTable;
use crate::config::TurnaroundPolicy;
use crate::types::{AdjacencyKey, ConnectionEdge, ConnectionKind, GraphNode, ShipSlot};
use std::cmp::Reverse;
use std::collections::HashMap;
use voyage_itinerary::date::add_nights;

/// Legal next sailing from some node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Successor {
    pub index: usize,
    pub edge: ConnectionEdge,
}

/// Departure buckets: (day, port, ship) -> node indices departing there
///
/// With side-by-side enabled every node is also filed under the `*` ship
/// slot, so a lookup finds every ship leaving that port that day.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    buckets: HashMap<AdjacencyKey, Vec<usize>>,
    side_by_side: bool,
}

impl AdjacencyIndex {
    pub fn build(table: &NodeTable, side_by_side: bool) -> Self {
        let mut buckets: HashMap<AdjacencyKey, Vec<usize>> = HashMap::new();

        for node in table.allowed() {
            let (Some(date), Some(location)) = (node.start_date, node.start_location.as_deref())
            else {
                continue;
            };

            buckets
                .entry(AdjacencyKey::new(
                    date,
                    location,
                    ShipSlot::Exact(node.ship_key.clone()),
                ))
                .or_default()
                .push(node.index);

            if side_by_side {
                buckets
                    .entry(AdjacencyKey::new(date, location, ShipSlot::Any))
                    .or_default()
                    .push(node.index);
            }
        }

        let nodes = table.nodes();
        for bucket in buckets.values_mut() {
            bucket.sort_by_key(|&idx| (Reverse(nodes[idx].start_date), idx));
        }

        log::debug!(
            "Built adjacency index: {} buckets (side-by-side: {})",
            buckets.len(),
            side_by_side
        );

        Self {
            buckets,
            side_by_side,
        }
    }

    pub fn side_by_side(&self) -> bool {
        self.side_by_side
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Nodes departing under a key, most recent first
    pub fn bucket(&self, key: &AdjacencyKey) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Allowed successors of `node`, deduplicated, in exploration order.
    ///
    /// Order: exact-ship bucket, then the `*` bucket, for the arrival day and
    /// (under [`TurnaroundPolicy::AllowNextDay`]) the day after. Offer-code
    /// exclusivity is path-dependent and left to the caller.
    pub fn successors(
        &self,
        table: &NodeTable,
        node: &GraphNode,
        policy: TurnaroundPolicy,
    ) -> Vec<Successor> {
        if !node.has_outgoing() {
            return Vec::new();
        }
        let (Some(end_date), Some(end_location)) = (node.end_date, node.end_location.as_deref())
        else {
            return Vec::new();
        };

        let mut slots = Vec::with_capacity(2);
        if !node.ship_key.is_empty() {
            slots.push(ShipSlot::Exact(node.ship_key.clone()));
        }
        if self.side_by_side {
            slots.push(ShipSlot::Any);
        }

        let nodes = table.nodes();
        let mut found: Vec<Successor> = Vec::new();

        for layover_days in 0..=policy.max_layover_days() {
            let Ok(day) = add_nights(end_date, layover_days) else {
                continue;
            };

            for slot in &slots {
                let key = AdjacencyKey::new(day, end_location, slot.clone());
                for &candidate in self.bucket(&key) {
                    if candidate == node.index || found.iter().any(|s| s.index == candidate) {
                        continue;
                    }

                    let next = &nodes[candidate];
                    if !next.allowed() || next.start_date != Some(day) {
                        continue;
                    }

                    let kind = if next.ship_key == node.ship_key {
                        ConnectionKind::BackToBack
                    } else {
                        ConnectionKind::SideBySide
                    };

                    found.push(Successor {
                        index: candidate,
                        edge: ConnectionEdge { kind, layover_days },
                    });
                }
            }
        }

        found
    }
}
