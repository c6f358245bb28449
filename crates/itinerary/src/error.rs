use thiserror::Error;

/// Result type for itinerary operations
pub type Result<T> = std::result::Result<T, ItineraryError>;

/// Errors raised while normalizing sailing data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItineraryError {
    /// Date string could not be read as a calendar day
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    /// Adding nights to a date left the supported calendar range
    #[error("Date overflow: {date} + {nights} nights")]
    DateOverflow { date: String, nights: u32 },
}

impl ItineraryError {
    /// Create an invalid date error
    pub fn invalid_date(raw: impl Into<String>) -> Self {
        Self::InvalidDate(raw.into())
    }
}
