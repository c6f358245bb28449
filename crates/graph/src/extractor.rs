use crate::adjacency::AdjacencyIndex;
use crate::builder::NodeTable;
use crate::config::TurnaroundPolicy;
use crate::types::{Chain, UsedOffers};

/// Materializes the longest chain itself, not just its length
///
/// Paths are not memoized: a partial path found under one set of used
/// offers is not valid under another. The search instead keeps a running
/// best and stops once a chain as long as the number of distinct offers
/// has been found.
pub struct ChainExtractor<'a> {
    table: &'a NodeTable,
    index: &'a AdjacencyIndex,
    policy: TurnaroundPolicy,
    seed: UsedOffers,
    limit: usize,
}

impl<'a> ChainExtractor<'a> {
    pub fn new(
        table: &'a NodeTable,
        index: &'a AdjacencyIndex,
        policy: TurnaroundPolicy,
        seed: UsedOffers,
    ) -> Self {
        Self {
            table,
            index,
            policy,
            seed,
            limit: table.allowed_offer_count().max(1),
        }
    }

    /// Longest chain starting at `start`.
    ///
    /// Ties keep the first chain found in bucket order. An excluded start
    /// yields just itself; an unknown index yields an empty chain.
    pub fn longest_from(&self, start: usize) -> Chain {
        let path = self.longest_path_from(start);
        self.to_chain(&path)
    }

    /// Longest chain over every allowed start; ties keep the lowest start
    pub fn longest_overall(&self) -> Chain {
        let mut best: Vec<usize> = Vec::new();

        for node in self.table.allowed() {
            let path = self.longest_path_from(node.index);
            if path.len() > best.len() {
                best = path;
            }
            if best.len() >= self.limit {
                break;
            }
        }

        self.to_chain(&best)
    }

    fn longest_path_from(&self, start: usize) -> Vec<usize> {
        let Some(node) = self.table.get(start) else {
            log::warn!(
                "Chain start {start} out of range ({} sailings)",
                self.table.len()
            );
            return Vec::new();
        };

        if !node.allowed() {
            return vec![start];
        }

        let mut path = vec![start];
        let mut best = path.clone();
        self.explore(start, &self.seed.with(node.offer_id), &mut path, &mut best);
        best
    }

    fn explore(&self, node: usize, used: &UsedOffers, path: &mut Vec<usize>, best: &mut Vec<usize>) {
        if path.len() > best.len() {
            best.clone_from(path);
        }
        if best.len() >= self.limit {
            return;
        }

        let current = &self.table.nodes()[node];
        if !current.has_outgoing() {
            return;
        }

        for successor in self.index.successors(self.table, current, self.policy) {
            let next = &self.table.nodes()[successor.index];
            if used.contains(next.offer_id) {
                continue;
            }

            path.push(successor.index);
            self.explore(successor.index, &used.with(next.offer_id), path, best);
            path.pop();

            if best.len() >= self.limit {
                return;
            }
        }
    }

    fn to_chain(&self, path: &[usize]) -> Chain {
        Chain {
            nodes: path
                .iter()
                .map(|&idx| self.table.nodes()[idx].summary())
                .collect(),
        }
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

    fn extract<F>(rows: &[SailingOfferRow], side_by_side: bool, run: F) -> Vec<usize>
    where
        F: FnOnce(&ChainExtractor<'_>) -> Chain,
    {
        let table = NodeTableBuilder::new(&AllowAll).build(rows);
        let index = AdjacencyIndex::build(&table, side_by_side);
        let extractor =
            ChainExtractor::new(&table, &index, TurnaroundPolicy::SameDay, UsedOffers::default());
        run(&extractor).indices().collect()
    }

    #[test]
    fn test_picks_longer_branch() {
        // From A: short branch via B (dead end), long branch via C -> D
        let rows = vec![
            row("A", "X", "Miami", "Nassau", "2025-01-01", "2025-01-04"),
            row("B", "X", "Nassau", "Miami", "2025-01-04", "2025-01-07"),
            row("C", "Y", "Nassau", "Freeport", "2025-01-04", "2025-01-07"),
            row("D", "Y", "Freeport", "Miami", "2025-01-07", "2025-01-10"),
        ];

        assert_eq!(extract(&rows, true, |e| e.longest_from(0)), vec![0, 2, 3]);
        assert_eq!(extract(&rows, false, |e| e.longest_from(0)), vec![0, 1]);
    }

    #[test]
    fn test_skips_repeated_offer() {
        let rows = vec![
            row("A", "X", "Miami", "Miami", "2025-01-01", "2025-01-05"),
            row("A", "X", "Miami", "Miami", "2025-01-05", "2025-01-09"),
        ];
        assert_eq!(extract(&rows, false, |e| e.longest_from(0)), vec![0]);
    }

    #[test]
    fn test_overall_prefers_lowest_start_on_ties() {
        let rows = vec![
            row("A", "X", "Miami", "Miami", "2025-01-01", "2025-01-05"),
            row("B", "X", "Miami", "Miami", "2025-01-05", "2025-01-09"),
            row("C", "Y", "Tampa", "Tampa", "2025-02-01", "2025-02-05"),
            row("D", "Y", "Tampa", "Tampa", "2025-02-05", "2025-02-09"),
        ];
        assert_eq!(extract(&rows, false, |e| e.longest_overall()), vec![0, 1]);
    }

    #[test]
    fn test_overall_finds_longest_anywhere() {
        let rows = vec![
            row("A", "X", "Miami", "Miami", "2025-01-01", "2025-01-05"),
            row("B", "Y", "Tampa", "Tampa", "2025-02-01", "2025-02-05"),
            row("C", "Y", "Tampa", "Tampa", "2025-02-05", "2025-02-09"),
            row("D", "Y", "Tampa", "Tampa", "2025-02-09", "2025-02-12"),
        ];
        assert_eq!(
            extract(&rows, false, |e| e.longest_overall()),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_excluded_and_unknown_starts() {
        let rows = vec![
            row("A", "X", "Miami", "Miami", "2025-01-01", "2025-01-05"),
            row("B", "X", "Miami", "Miami", "2025-01-05", "2025-01-09"),
        ];
        let deny_a = |r: &SailingOfferRow| r.offer_code() != "A";
        let table = NodeTableBuilder::new(&deny_a).build(&rows);
        let index = AdjacencyIndex::build(&table, false);
        let extractor =
            ChainExtractor::new(&table, &index, TurnaroundPolicy::SameDay, UsedOffers::default());

        let from_denied: Vec<usize> = extractor.longest_from(0).indices().collect();
        assert_eq!(from_denied, vec![0]);
        assert!(extractor.longest_from(7).is_empty());
    }

    #[test]
    fn test_chain_summary_fields() {
        let rows = vec![
            row("A", "X", "Miami", "Nassau", "2025-01-01", "2025-01-04"),
            row("B", "X", "Nassau", "Miami", "2025-01-04", "2025-01-07"),
        ];
        let table = NodeTableBuilder::new(&AllowAll).build(&rows);
        let index = AdjacencyIndex::build(&table, false);
        let chain =
            ChainExtractor::new(&table, &index, TurnaroundPolicy::SameDay, UsedOffers::default())
                .longest_from(0);

        assert_eq!(chain.offer_codes().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(chain.nodes[1].ship_label, "X");
        assert_eq!(chain.nodes[0].end_date, chain.nodes[1].start_date);
        assert_eq!(chain.nodes[1].start_location.as_deref(), Some("Nassau"));
    }
}
