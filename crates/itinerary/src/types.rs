use serde::{Deserialize, Serialize};

/// One sailing paired with the casino offer attached to it
///
/// Field names follow the camelCase export produced upstream, so a JSON dump
/// of offer rows deserializes directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SailingOfferRow {
    #[serde(default)]
    pub offer: Offer,

    #[serde(default)]
    pub sailing: Sailing,
}

impl SailingOfferRow {
    /// Create a row from an offer code and a sailing
    pub fn new(offer_code: impl Into<String>, sailing: Sailing) -> Self {
        Self {
            offer: Offer::with_code(offer_code),
            sailing,
        }
    }

    /// Trimmed offer code, empty when the offer carries none
    #[must_use]
    pub fn offer_code(&self) -> &str {
        self.offer.offer_code.as_deref().map_or("", str::trim)
    }
}

/// Casino offer details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    /// Offer code (e.g., "25FEB104")
    pub offer_code: Option<String>,

    /// Human readable offer name
    pub offer_name: Option<String>,
}

impl Offer {
    /// Create an offer carrying only a code
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            offer_code: Some(code.into()),
            offer_name: None,
        }
    }
}

/// Sailing details as exported by the offer scraper
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Sailing {
    /// Ship code (e.g., "AL")
    pub ship_code: Option<String>,

    /// Ship name (e.g., "Allure of the Seas")
    pub ship_name: Option<String>,

    /// Departure date; day precision is all that matters
    pub sail_date: Option<String>,

    /// Explicit end/disembark date
    #[serde(alias = "disembarkDate", alias = "returnDate")]
    pub end_date: Option<String>,

    /// Free-text itinerary (e.g., "7 Night Western Caribbean")
    #[serde(alias = "itineraryDescription")]
    pub itinerary: Option<String>,

    /// Departure port name
    pub departure_port: Option<String>,

    /// Arrival port name, when different from the departure port
    pub arrival_port: Option<String>,
}

impl Sailing {
    /// Builder: set ship code
    #[must_use]
    pub fn ship_code(mut self, code: impl Into<String>) -> Self {
        self.ship_code = Some(code.into());
        self
    }

    /// Builder: set ship name
    #[must_use]
    pub fn ship_name(mut self, name: impl Into<String>) -> Self {
        self.ship_name = Some(name.into());
        self
    }

    /// Builder: set sail date
    #[must_use]
    pub fn sail_date(mut self, date: impl Into<String>) -> Self {
        self.sail_date = Some(date.into());
        self
    }

    /// Builder: set explicit end date
    #[must_use]
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Builder: set itinerary description
    #[must_use]
    pub fn itinerary(mut self, text: impl Into<String>) -> Self {
        self.itinerary = Some(text.into());
        self
    }

    /// Builder: set departure port
    #[must_use]
    pub fn departure_port(mut self, port: impl Into<String>) -> Self {
        self.departure_port = Some(port.into());
        self
    }

    /// Builder: set arrival port
    #[must_use]
    pub fn arrival_port(mut self, port: impl Into<String>) -> Self {
        self.arrival_port = Some(port.into());
        self
    }

    /// Lower-cased ship identity, code preferred over name
    #[must_use]
    pub fn ship_key(&self) -> String {
        non_empty(self.ship_code.as_deref())
            .or_else(|| non_empty(self.ship_name.as_deref()))
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Display label for the ship, name preferred over code
    #[must_use]
    pub fn ship_label(&self) -> String {
        non_empty(self.ship_name.as_deref())
            .or_else(|| non_empty(self.ship_code.as_deref()))
            .unwrap_or_default()
            .to_string()
    }
}

/// Trim and drop empty strings
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ship_key_prefers_code_and_lowercases() {
        let sailing = Sailing::default()
            .ship_code("  AL ")
            .ship_name("Allure of the Seas");
        assert_eq!(sailing.ship_key(), "al");
        assert_eq!(sailing.ship_label(), "Allure of the Seas");

        let by_name = Sailing::default().ship_name("Wonder Of The Seas");
        assert_eq!(by_name.ship_key(), "wonder of the seas");

        let blank_code = Sailing::default().ship_code("   ").ship_name("Icon");
        assert_eq!(blank_code.ship_key(), "icon");

        assert_eq!(Sailing::default().ship_key(), "");
    }

    #[test]
    fn test_deserializes_camel_case_export() {
        let raw = r#"{
            "offer": {"offerCode": " 25FEB104 ", "offerName": "Feb Free Play"},
            "sailing": {
                "shipCode": "AL",
                "sailDate": "2025-03-01",
                "disembarkDate": "2025-03-08T07:00:00",
                "itineraryDescription": "7 Night Western Caribbean",
                "departurePort": "Port Canaveral"
            }
        }"#;

        let row: SailingOfferRow = serde_json::from_str(raw).unwrap();
        assert_eq!(row.offer_code(), "25FEB104");
        assert_eq!(row.sailing.end_date.as_deref(), Some("2025-03-08T07:00:00"));
        assert_eq!(
            row.sailing.itinerary.as_deref(),
            Some("7 Night Western Caribbean")
        );
        assert_eq!(row.sailing.arrival_port, None);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let row: SailingOfferRow = serde_json::from_str("{}").unwrap();
        assert_eq!(row.offer_code(), "");
        assert_eq!(row.sailing, Sailing::default());
    }
}
