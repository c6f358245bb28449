//! # Voyage Graph
//!
//! Back-to-back and side-by-side chain analysis over cruise offer rows.
//!
//! ## Features
//!
//! - **Depth analysis** - longest feasible chain length from every sailing
//! - **Chain extraction** - the longest chain itself, from a row or overall
//! - **Offer exclusivity** - no offer code is used twice in one chain
//! - **Side-by-side** - optional connections onto a different ship in the same port
//!
//! ## Architecture
//!
//! ```text
//! SailingOfferRow[]
//!     │
//!     ├──> Node Table Builder
//!     │      ├─ Resolve endpoints (voyage-itinerary)
//!     │      ├─ Intern offer codes
//!     │      └─ Mark denied / unroutable rows
//!     │
//!     ├──> Adjacency Index
//!     │      └─ (day, port, ship | *) -> departing rows
//!     │
//!     ├──> Depth Computer (memo keyed on node + used offers)
//!     │
//!     ├──> Chain Extractor (running-max DFS, throttled)
//!     │
//!     └──> Sailing Graph (petgraph, for stats and export)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use voyage_graph::{ChainAnalyzer, ChainOptions};
//! use voyage_itinerary::{Sailing, SailingOfferRow};
//!
//! let rows = vec![
//!     SailingOfferRow::new(
//!         "A1",
//!         Sailing::default()
//!             .ship_code("X")
//!             .departure_port("Lisbon")
//!             .arrival_port("Rome")
//!             .sail_date("2025-06-01")
//!             .end_date("2025-06-08"),
//!     ),
//!     SailingOfferRow::new(
//!         "A2",
//!         Sailing::default()
//!             .ship_code("X")
//!             .departure_port("Rome")
//!             .arrival_port("Lisbon")
//!             .sail_date("2025-06-08")
//!             .end_date("2025-06-15"),
//!     ),
//! ];
//!
//! let analyzer = ChainAnalyzer::default();
//! let depths = analyzer.compute_depths(&rows, &ChainOptions::new());
//! assert_eq!(depths[&0], 2);
//!
//! let chain = analyzer.longest_chain_from(&rows, &ChainOptions::new(), 0);
//! assert_eq!(chain.offer_codes().collect::<Vec<_>>(), vec!["A1", "A2"]);
//! ```

mod adjacency;
mod analyzer;
mod builder;
mod config;
mod depth;
mod error;
mod extractor;
mod filter;
mod graph;
mod throttle;
mod types;

pub use adjacency::{AdjacencyIndex, Successor};
pub use analyzer::{ChainAnalyzer, ChainOptions};
pub use builder::{NodeTable, NodeTableBuilder};
pub use config::{AnalyzerConfig, SettingsStore, ThrottleConfig, TurnaroundPolicy, AUTO_RUN_ENV};
pub use depth::{DepthComputer, DepthMap};
pub use error::{GraphError, Result};
pub use extractor::ChainExtractor;
pub use filter::{AllowAll, HiddenRows, RowFilter, RowKey, VisibilityFilter, VisibilityStore};
pub use graph::{Connection, GraphStats, SailingGraph};
pub use throttle::InvocationThrottle;
pub use types::{
    AdjacencyKey, Chain, ChainNode, ConnectionEdge, ConnectionKind, Exclusion, GraphNode,
    ShipSlot, UsedOffers,
};
