use crate::adjacency::AdjacencyIndex;
use crate::builder::{NodeTable, NodeTableBuilder};
use crate::config::{AnalyzerConfig, SettingsStore, TurnaroundPolicy};
use crate::depth::{DepthComputer, DepthMap};
use crate::extractor::ChainExtractor;
use crate::filter::{AllowAll, RowFilter, VisibilityFilter, VisibilityStore};
use crate::graph::SailingGraph;
use crate::throttle::InvocationThrottle;
use crate::types::{Chain, UsedOffers};
use voyage_itinerary::{ItineraryParser, SailingOfferRow};

/// Per-call analysis options
#[derive(Default, Clone)]
pub struct ChainOptions<'a> {
    /// Cross-ship connections; `None` takes the analyzer config default
    pub allow_side_by_side: Option<bool>,

    /// Caller predicate; when absent the visibility store decides
    pub filter: Option<&'a dyn RowFilter>,

    /// Offers already spent by a chain being resumed
    pub initial_used_offer_codes: Vec<String>,

    /// Run depth analysis even when auto-run is disabled
    pub force: bool,

    /// Overrides the configured turnaround policy
    pub turnaround: Option<TurnaroundPolicy>,
}

impl<'a> ChainOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn side_by_side(mut self, enabled: bool) -> Self {
        self.allow_side_by_side = Some(enabled);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: &'a dyn RowFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn used_offers<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_used_offer_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn turnaround(mut self, policy: TurnaroundPolicy) -> Self {
        self.turnaround = Some(policy);
        self
    }
}

/// Everything one invocation needs, built fresh from the rows
struct Prepared {
    table: NodeTable,
    index: AdjacencyIndex,
    policy: TurnaroundPolicy,
    seed: UsedOffers,
}

/// Entry point for chain analysis over a snapshot of offer rows
///
/// Holds the collaborators and the extraction throttle. Every call builds
/// its own node table and adjacency index, so one analyzer can serve
/// unrelated row sets.
pub struct ChainAnalyzer {
    config: AnalyzerConfig,
    settings: Option<Box<dyn SettingsStore>>,
    visibility: Option<Box<dyn VisibilityStore>>,
    parser: Option<Box<dyn ItineraryParser>>,
    throttle: InvocationThrottle,
}

impl ChainAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let throttle = InvocationThrottle::from_config(&config.throttle);
        Self {
            config,
            settings: None,
            visibility: None,
            parser: None,
            throttle,
        }
    }

    /// Host settings consulted for auto-run; defaults to the config value
    #[must_use]
    pub fn with_settings(mut self, settings: Box<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Box<dyn VisibilityStore>) -> Self {
        self.visibility = Some(visibility);
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Box<dyn ItineraryParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Longest-chain depth for every usable row.
    ///
    /// Returns an empty map when auto-run is off and `force` is not set.
    /// Rows denied by the filter are absent; rows that cannot connect
    /// anywhere have depth 1.
    pub fn compute_depths(&self, rows: &[SailingOfferRow], options: &ChainOptions<'_>) -> DepthMap {
        if !options.force && !self.auto_run_enabled() {
            log::info!("Auto-run disabled; skipping depth analysis");
            return DepthMap::new();
        }

        let prepared = self.prepare(rows, options);
        let depths = DepthComputer::new(&prepared.table, &prepared.index, prepared.policy)
            .compute(&prepared.seed);

        log::info!(
            "Computed depths for {} of {} sailings (max depth {})",
            depths.len(),
            rows.len(),
            depths.values().copied().max().unwrap_or(0)
        );

        depths
    }

    /// Longest chain starting at row `start`; empty when throttled
    pub fn longest_chain_from(
        &self,
        rows: &[SailingOfferRow],
        options: &ChainOptions<'_>,
        start: usize,
    ) -> Chain {
        if !self.admit("longest_chain_from") {
            return Chain::default();
        }

        let prepared = self.prepare(rows, options);
        let chain = self.extractor(&prepared).longest_from(start);

        log::info!("Longest chain from row {start}: {} sailings", chain.len());
        chain
    }

    /// Longest chain over all start rows; empty when throttled
    pub fn longest_chain_overall(
        &self,
        rows: &[SailingOfferRow],
        options: &ChainOptions<'_>,
    ) -> Chain {
        if !self.admit("longest_chain_overall") {
            return Chain::default();
        }

        let prepared = self.prepare(rows, options);
        let chain = self.extractor(&prepared).longest_overall();

        log::info!(
            "Longest chain overall: {} sailings ({} rows)",
            chain.len(),
            rows.len()
        );
        chain
    }

    /// Explicit connection graph for inspection and reporting
    pub fn connection_graph(
        &self,
        rows: &[SailingOfferRow],
        options: &ChainOptions<'_>,
    ) -> (NodeTable, SailingGraph) {
        let prepared = self.prepare(rows, options);
        let graph = SailingGraph::build(&prepared.table, &prepared.index, prepared.policy);
        (prepared.table, graph)
    }

    fn auto_run_enabled(&self) -> bool {
        let Some(settings) = self.settings.as_deref() else {
            return self.config.auto_run;
        };

        match settings.auto_run_enabled() {
            Ok(enabled) => enabled,
            Err(err) => {
                log::warn!("Settings store unavailable, assuming auto-run: {err}");
                true
            }
        }
    }

    fn admit(&self, operation: &str) -> bool {
        let admitted = self.throttle.admit();
        if !admitted {
            log::warn!("{operation} throttled: too many calls in a short window");
        }
        admitted
    }

    fn extractor<'p>(&self, prepared: &'p Prepared) -> ChainExtractor<'p> {
        ChainExtractor::new(
            &prepared.table,
            &prepared.index,
            prepared.policy,
            prepared.seed.clone(),
        )
    }

    fn prepare(&self, rows: &[SailingOfferRow], options: &ChainOptions<'_>) -> Prepared {
        let visibility_filter = self
            .visibility
            .as_deref()
            .map(|store| VisibilityFilter::new(store));
        let filter: &dyn RowFilter = match (options.filter, visibility_filter.as_ref()) {
            (Some(filter), _) => filter,
            (None, Some(visibility)) => visibility,
            (None, None) => &AllowAll,
        };

        let table = NodeTableBuilder::new(filter)
            .with_parser(self.parser.as_deref())
            .build(rows);

        let side_by_side = options
            .allow_side_by_side
            .unwrap_or(self.config.allow_side_by_side);
        let index = AdjacencyIndex::build(&table, side_by_side);
        let policy = options.turnaround.unwrap_or(self.config.turnaround);
        let seed = table.used_offers(&options.initial_used_offer_codes);

        log::debug!(
            "Prepared analysis: {} rows, side-by-side {}, turnaround {:?}, {} seeded offers",
            rows.len(),
            side_by_side,
            policy,
            seed.len()
        );

        Prepared {
            table,
            index,
            policy,
            seed,
        }
    }
}

impl Default for ChainAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GraphError, Result};
    use crate::filter::{HiddenRows, RowKey};
    use pretty_assertions::assert_eq;
    use voyage_itinerary::Sailing;

    struct FailingSettings;

    impl SettingsStore for FailingSettings {
        fn auto_run_enabled(&self) -> Result<bool> {
            Err(GraphError::collaborator("settings offline"))
        }
    }

    struct FixedSettings(bool);

    impl SettingsStore for FixedSettings {
        fn auto_run_enabled(&self) -> Result<bool> {
            Ok(self.0)
        }
    }

    fn row(code: &str, ship: &str, start: &str, end: &str) -> SailingOfferRow {
        SailingOfferRow::new(
            code,
            Sailing::default()
                .ship_code(ship)
                .departure_port("Miami")
                .arrival_port("Miami")
                .sail_date(start)
                .end_date(end),
        )
    }

    fn rows() -> Vec<SailingOfferRow> {
        vec![
            row("A", "X", "2025-01-01", "2025-01-05"),
            row("B", "X", "2025-01-05", "2025-01-09"),
            row("C", "Y", "2025-01-09", "2025-01-12"),
        ]
    }

    #[test]
    fn test_auto_run_disabled_needs_force() {
        let analyzer =
            ChainAnalyzer::default().with_settings(Box::new(FixedSettings(false)));

        assert!(analyzer.compute_depths(&rows(), &ChainOptions::new()).is_empty());

        let forced = analyzer.compute_depths(&rows(), &ChainOptions::new().force(true));
        assert_eq!(forced[&0], 2);
    }

    #[test]
    fn test_settings_failure_assumes_auto_run() {
        let analyzer = ChainAnalyzer::default().with_settings(Box::new(FailingSettings));
        assert_eq!(analyzer.compute_depths(&rows(), &ChainOptions::new()).len(), 3);
    }

    #[test]
    fn test_config_auto_run_without_settings_store() {
        let config = AnalyzerConfig {
            auto_run: false,
            ..AnalyzerConfig::default()
        };
        let analyzer = ChainAnalyzer::new(config);
        assert!(analyzer.compute_depths(&rows(), &ChainOptions::new()).is_empty());
    }

    #[test]
    fn test_side_by_side_option_overrides_config() {
        let analyzer = ChainAnalyzer::default();

        let exact = analyzer.compute_depths(&rows(), &ChainOptions::new());
        let cross = analyzer.compute_depths(&rows(), &ChainOptions::new().side_by_side(true));
        assert_eq!(exact[&0], 2);
        assert_eq!(cross[&0], 3);
    }

    #[test]
    fn test_visibility_store_used_without_filter() {
        let hidden: HiddenRows = [RowKey::new("B", "X", "2025-01-05")].into_iter().collect();
        let analyzer = ChainAnalyzer::default().with_visibility(Box::new(hidden));

        let depths = analyzer.compute_depths(&rows(), &ChainOptions::new());
        assert!(!depths.contains_key(&1));
        assert_eq!(depths[&0], 1);

        // An explicit filter replaces the store entirely
        let allow = |_: &SailingOfferRow| true;
        let depths = analyzer.compute_depths(&rows(), &ChainOptions::new().filter(&allow));
        assert_eq!(depths[&0], 2);
    }

    #[test]
    fn test_extraction_is_throttled() {
        let config = AnalyzerConfig {
            throttle: crate::config::ThrottleConfig {
                max_calls: 2,
                window_ms: 60_000,
            },
            ..AnalyzerConfig::default()
        };
        let analyzer = ChainAnalyzer::new(config);
        let options = ChainOptions::new();

        assert_eq!(analyzer.longest_chain_from(&rows(), &options, 0).len(), 2);
        assert_eq!(analyzer.longest_chain_overall(&rows(), &options).len(), 2);
        assert!(analyzer.longest_chain_from(&rows(), &options, 0).is_empty());

        // Depth analysis is not throttled
        assert_eq!(analyzer.compute_depths(&rows(), &options).len(), 3);
    }

    #[test]
    fn test_used_offers_seed_extraction() {
        let analyzer = ChainAnalyzer::default();
        let options = ChainOptions::new().used_offers(["B"]);
        let chain = analyzer.longest_chain_from(&rows(), &options, 0);
        assert_eq!(chain.offer_codes().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn test_connection_graph() {
        let analyzer = ChainAnalyzer::default();
        let (table, graph) =
            analyzer.connection_graph(&rows(), &ChainOptions::new().side_by_side(true));
        let stats = graph.stats(&table);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.back_to_back, 1);
        assert_eq!(stats.side_by_side, 1);
    }
}
