use regex::Regex;
use std::sync::OnceLock;

/// Structured itinerary parser supplied by the host application
///
/// Implementations are best-effort: `None` means "could not tell", never an
/// error.
pub trait ItineraryParser: Send + Sync {
    /// Extract the number of nights from a free-text itinerary
    fn night_count(&self, itinerary: &str) -> Option<u32>;
}

impl<F> ItineraryParser for F
where
    F: Fn(&str) -> Option<u32> + Send + Sync,
{
    fn night_count(&self, itinerary: &str) -> Option<u32> {
        self(itinerary)
    }
}

fn night_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,4})\s*-?\s*nights?\b")
            .unwrap_or_else(|err| unreachable!("night pattern must compile: {err}"))
    })
}

/// Match `<N> Night` (case-insensitive) in raw itinerary text.
///
/// Zero-night matches are ignored.
#[must_use]
pub fn match_night_count(text: &str) -> Option<u32> {
    night_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&nights| nights > 0)
}

/// Night count from the structured parser, falling back to the text pattern
pub fn infer_night_count(parser: Option<&dyn ItineraryParser>, itinerary: &str) -> Option<u32> {
    parser
        .and_then(|p| p.night_count(itinerary))
        .filter(|&nights| nights > 0)
        .or_else(|| match_night_count(itinerary))
}
