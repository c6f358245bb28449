//! # Voyage Itinerary
//!
//! Input model and endpoint resolution for back-to-back chain analysis.
//!
//! ## Pipeline
//!
//! ```text
//! SailingOfferRow
//!     │
//!     ├──> Start day + departure port (required)
//!     │
//!     └──> End resolution (first match wins)
//!            ├─ explicit end/disembark date
//!            ├─ start + nights (structured parser, then "<N> Night")
//!            └─ start day (single-day approximation)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use voyage_itinerary::{resolve_endpoints, Sailing, SailingOfferRow};
//!
//! let row = SailingOfferRow::new(
//!     "25FEB104",
//!     Sailing::default()
//!         .ship_code("AL")
//!         .sail_date("2025-03-01")
//!         .itinerary("7 Night Western Caribbean")
//!         .departure_port("Port Canaveral"),
//! );
//!
//! let endpoints = resolve_endpoints(&row, None);
//! assert_eq!(endpoints.end_date.unwrap().to_string(), "2025-03-08");
//! ```

pub mod date;
mod endpoints;
mod error;
mod nights;
mod types;

pub use endpoints::{resolve_endpoints, EndSource, Endpoints};
pub use error::{ItineraryError, Result};
pub use nights::{infer_night_count, match_night_count, ItineraryParser};
pub use types::{Offer, Sailing, SailingOfferRow};

// Re-export the calendar type used throughout the public API
pub use chrono::NaiveDate;
