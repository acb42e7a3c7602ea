use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::WatchError;
use crate::model::{FlightOffer, OfferResponse};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

const BODY_PREVIEW_CHARS: usize = 500;

/// First 500 characters of a response body, for error messages.
pub fn body_preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Decodes one day's response body. A blank body means no offers that day.
pub fn parse_offers(body: &str) -> Result<Vec<FlightOffer>, WatchError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let response: OfferResponse =
        serde_json::from_str(body).map_err(|e| WatchError::JsonParse {
            detail: e.to_string(),
            body: body_preview(body),
        })?;
    Ok(response.flight_offer)
}

/// Wall-clock time of a timestamp in the zone it was written in. Offsets are
/// kept, not converted to UTC, so the result is the airport's local time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn departure_hour(offer: &FlightOffer) -> Option<u32> {
    parse_timestamp(&offer.outbound_flight.departure_date_time).map(|dt| dt.hour())
}
