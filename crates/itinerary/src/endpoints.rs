use crate::date::{add_nights, parse_optional_day};
use crate::nights::{infer_night_count, ItineraryParser};
use crate::types::{non_empty, SailingOfferRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a sailing's end date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndSource {
    /// Explicit end/disembark date on the row
    Explicit,
    /// Start date plus an inferred night count
    Nights(u32),
    /// No night count; end assumed on the start day
    SameDay,
    /// Nothing to resolve from
    Unresolved,
}

/// Normalized start and end of one sailing, day precision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub start_date: Option<NaiveDate>,
    pub start_location: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_location: Option<String>,
    pub end_source: EndSource,
}

impl Endpoints {
    /// All fields empty; the sailing cannot take part in any connection
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            start_date: None,
            start_location: None,
            end_date: None,
            end_location: None,
            end_source: EndSource::Unresolved,
        }
    }

    /// Number of nights between start and end, when both are known
    #[must_use]
    pub fn nights(&self) -> Option<i64> {
        Some((self.end_date? - self.start_date?).num_days())
    }
}

/// Resolve the endpoints of one row.
///
/// An explicit end date wins. Without one the end is the start date plus the
/// night count inferred from the itinerary text (structured parser first,
/// then the `<N> Night` pattern). With no night count at all the sailing is
/// assumed to end on its start day. Rows without a usable start date resolve
/// to [`Endpoints::unresolved`].
pub fn resolve_endpoints(
    row: &SailingOfferRow,
    parser: Option<&dyn ItineraryParser>,
) -> Endpoints {
    let sailing = &row.sailing;

    let Some(start_date) = parse_optional_day(sailing.sail_date.as_deref()) else {
        return Endpoints::unresolved();
    };

    let start_location = non_empty(sailing.departure_port.as_deref()).map(str::to_string);
    let end_location = non_empty(sailing.arrival_port.as_deref())
        .map(str::to_string)
        .or_else(|| start_location.clone());

    let endpoints = |end_date, end_source| Endpoints {
        start_date: Some(start_date),
        start_location: start_location.clone(),
        end_date,
        end_location: end_location.clone(),
        end_source,
    };

    if non_empty(sailing.end_date.as_deref()).is_some() {
        // An explicit but unreadable end date is still authoritative
        let end_date = parse_optional_day(sailing.end_date.as_deref());
        return endpoints(end_date, EndSource::Explicit);
    }

    let nights = non_empty(sailing.itinerary.as_deref())
        .and_then(|text| infer_night_count(parser, text));

    match nights {
        Some(nights) => match add_nights(start_date, nights) {
            Ok(end_date) => endpoints(Some(end_date), EndSource::Nights(nights)),
            Err(err) => {
                log::debug!("Dropping end date: {err}");
                endpoints(None, EndSource::Nights(nights))
            }
        },
        None => endpoints(Some(start_date), EndSource::SameDay),
    }
}
