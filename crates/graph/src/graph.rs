use crate::adjacency::AdjacencyIndex;
use crate::builder::NodeTable;
use crate::config::TurnaroundPolicy;
use crate::types::{ConnectionEdge, ConnectionKind};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Explicit connection graph over the sailings of one analysis
///
/// Node weights are row indices. Only edges that can appear in some chain
/// are kept: both ends allowed, and the two sailings carry different offers.
pub struct SailingGraph {
    pub graph: DiGraph<usize, ConnectionEdge>,
}

/// One edge, flattened for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    #[serde(flatten)]
    pub edge: ConnectionEdge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub allowed: usize,
    pub edges: usize,
    pub back_to_back: usize,
    pub side_by_side: usize,
    pub cyclic: bool,
}

impl SailingGraph {
    pub fn build(table: &NodeTable, index: &AdjacencyIndex, policy: TurnaroundPolicy) -> Self {
        let mut graph = DiGraph::with_capacity(table.len(), table.len());

        // Row i becomes NodeIndex i
        for node in table.nodes() {
            graph.add_node(node.index);
        }

        for node in table.allowed() {
            for successor in index.successors(table, node, policy) {
                let next = &table.nodes()[successor.index];
                if next.offer_id == node.offer_id {
                    continue;
                }
                graph.add_edge(
                    NodeIndex::new(node.index),
                    NodeIndex::new(successor.index),
                    successor.edge,
                );
            }
        }

        log::debug!(
            "Built sailing graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { graph }
    }

    /// Row indices reachable in one step, in edge insertion order
    pub fn successors(&self, row: usize) -> Vec<usize> {
        if row >= self.graph.node_count() {
            return Vec::new();
        }
        let mut next: Vec<usize> = self
            .graph
            .edges(NodeIndex::new(row))
            .map(|e| self.graph[e.target()])
            .collect();
        // petgraph walks edges newest first
        next.reverse();
        next
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.graph
            .edge_references()
            .map(|e| Connection {
                from: self.graph[e.source()],
                to: self.graph[e.target()],
                edge: *e.weight(),
            })
            .collect()
    }

    /// Summary counts; `cyclic` is possible with zero-night sailings
    pub fn stats(&self, table: &NodeTable) -> GraphStats {
        let count = |kind: ConnectionKind| {
            self.graph
                .edge_weights()
                .filter(|edge| edge.kind == kind)
                .count()
        };

        GraphStats {
            nodes: self.graph.node_count(),
            allowed: table.allowed().count(),
            edges: self.graph.edge_count(),
            back_to_back: count(ConnectionKind::BackToBack),
            side_by_side: count(ConnectionKind::SideBySide),
            cyclic: is_cyclic_directed(&self.graph),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeTableBuilder;
    use crate::filter::AllowAll;
    use pretty_assertions::assert_eq;
    use voyage_itinerary::{Sailing, SailingOfferRow};

    fn row(code: &str, ship: &str, from: &str, to: &str, start: &str, end: &str) -> SailingOfferRow {
        SailingOfferRow::new(
            code,
            Sailing::default()
                .ship_code(ship)
                .departure_port(from)
                .arrival_port(to)
                .sail_date(start)
                .end_date(end),
        )
    }

    fn build(rows: &[SailingOfferRow], side_by_side: bool) -> (NodeTable, SailingGraph) {
        let table = NodeTableBuilder::new(&AllowAll).build(rows);
        let index = AdjacencyIndex::build(&table, side_by_side);
        let graph = SailingGraph::build(&table, &index, TurnaroundPolicy::SameDay);
        (table, graph)
    }

    #[test]
    fn test_build_sailing_graph() {
        let rows = vec![
            row("A1", "X", "Lisbon", "Rome", "2025-06-01", "2025-06-08"),
            row("A2", "X", "Rome", "Lisbon", "2025-06-08", "2025-06-15"),
            row("B1", "Y", "Rome", "Athens", "2025-06-08", "2025-06-15"),
        ];

        let (table, graph) = build(&rows, true);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.successors(0), vec![1, 2]);
        assert!(graph.successors(1).is_empty());
        assert!(graph.successors(9).is_empty());

        let stats = graph.stats(&table);
        assert_eq!(
            stats,
            GraphStats {
                nodes: 3,
                allowed: 3,
                edges: 2,
                back_to_back: 1,
                side_by_side: 1,
                cyclic: false,
            }
        );
    }

    #[test]
    fn test_same_offer_edges_are_dropped() {
        let rows = vec![
            row("A1", "X", "Miami", "Miami", "2025-01-01", "2025-01-05"),
            row("A1", "X", "Miami", "Miami", "2025-01-05", "2025-01-09"),
        ];
        let (_, graph) = build(&rows, false);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_zero_night_sailings_form_cycle() {
        // Explicit zero-night sailings can loop back onto each other
        let rows = vec![
            row("A", "X", "Miami", "Miami", "2025-01-01", "2025-01-01"),
            row("B", "X", "Miami", "Miami", "2025-01-01", "2025-01-01"),
        ];

        let (table, graph) = build(&rows, false);
        assert!(graph.stats(&table).cyclic);

        let connections = graph.connections();
        assert_eq!(connections.len(), 2);
        assert!(connections
            .iter()
            .all(|c| c.edge.kind == ConnectionKind::BackToBack && c.edge.layover_days == 0));
    }

    #[test]
    fn test_same_day_approximation_has_no_outgoing_edges() {
        // Two offers on one physical sailing, neither with an end date
        let undated = |code: &str| {
            SailingOfferRow::new(
                code,
                Sailing::default()
                    .ship_code("X")
                    .departure_port("Miami")
                    .sail_date("2025-01-01"),
            )
        };
        let rows = vec![undated("A"), undated("B")];

        let (table, graph) = build(&rows, true);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.stats(&table).cyclic);
        assert!(table.nodes().iter().all(|n| n.end_date.is_some() && !n.has_outgoing()));
    }
}
