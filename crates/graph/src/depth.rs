use crate::adjacency::AdjacencyIndex;
use crate::builder::NodeTable;
use crate::config::TurnaroundPolicy;
use crate::types::{Exclusion, UsedOffers};
use std::collections::{BTreeMap, HashMap};

/// Row index -> length of the longest chain starting at that row
pub type DepthMap = BTreeMap<usize, usize>;

/// Memoized longest-chain depth per node
///
/// The memo is keyed on the node *and* the offers already consumed on the
/// way there: the same sailing can reach a shorter chain when an offer it
/// needs was spent earlier on the path.
pub struct DepthComputer<'a> {
    table: &'a NodeTable,
    index: &'a AdjacencyIndex,
    policy: TurnaroundPolicy,
    memo: HashMap<(usize, UsedOffers), usize>,
}

impl<'a> DepthComputer<'a> {
    pub fn new(table: &'a NodeTable, index: &'a AdjacencyIndex, policy: TurnaroundPolicy) -> Self {
        Self {
            table,
            index,
            policy,
            memo: HashMap::new(),
        }
    }

    /// Depth of every allowed node; unroutable nodes count as isolated roots.
    ///
    /// `seed` holds offers already consumed by an existing chain being
    /// resumed. Denied nodes are left out of the map.
    pub fn compute(&mut self, seed: &UsedOffers) -> DepthMap {
        let table = self.table;
        let mut depths = DepthMap::new();

        for node in table.nodes() {
            match node.exclusion {
                None => {
                    let depth = self.depth_from(node.index, seed);
                    depths.insert(node.index, depth);
                }
                Some(Exclusion::Unroutable) => {
                    depths.insert(node.index, 1);
                }
                Some(Exclusion::Denied) => {}
            }
        }

        log::debug!(
            "Computed {} depths ({} memo entries)",
            depths.len(),
            self.memo.len()
        );

        depths
    }

    /// Longest chain length starting at `root`, given offers already used
    pub fn depth_from(&mut self, root: usize, seed: &UsedOffers) -> usize {
        let Some(node) = self.table.get(root) else {
            return 0;
        };
        let used = seed.with(node.offer_id);
        self.dfs(root, &used)
    }

    /// `used` already contains the offer of `node`
    fn dfs(&mut self, node: usize, used: &UsedOffers) -> usize {
        let key = (node, used.clone());
        if let Some(&depth) = self.memo.get(&key) {
            return depth;
        }

        let table = self.table;
        let current = &table.nodes()[node];
        let mut best = 1;

        if current.has_outgoing() {
            for successor in self.index.successors(table, current, self.policy) {
                let next = &table.nodes()[successor.index];
                if used.contains(next.offer_id) {
                    continue;
                }

                let branch = 1 + self.dfs(successor.index, &used.with(next.offer_id));
                best = best.max(branch);
            }
        }

        self.memo.insert(key, best);
        best
    }
}
