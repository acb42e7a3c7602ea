use chrono::{Datelike, Days, NaiveDate};

use crate::error::WatchError;
use crate::model::FlightOffer;
use crate::parse;

/// Number of consecutive departure dates searched per run.
pub const SCAN_DAYS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passengers {
    pub adults: u32,
    pub children: u32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 2,
            children: 0,
        }
    }
}

/// Inclusive bounds on the local departure hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl Default for HourRange {
    fn default() -> Self {
        Self { start: 0, end: 24 }
    }
}

impl HourRange {
    pub fn parse(s: &str) -> Result<Self, WatchError> {
        let invalid = || WatchError::InvalidHourRange(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start: u32 = start.trim().parse().map_err(|_| invalid())?;
        let end: u32 = end.trim().parse().map_err(|_| invalid())?;
        if end > 24 || start > end {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub passengers: Passengers,
    pub max_price: f64,
    pub hours: HourRange,
    pub recipients: Vec<String>,
}

pub fn validate_airport(code: &str) -> Result<(), WatchError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(WatchError::InvalidAirport(code.to_string()));
    }
    Ok(())
}

/// Accepts `YYYYMMDD` as well as `YYYY-MM-DD`, nothing in between.
pub fn parse_date(s: &str) -> Result<NaiveDate, WatchError> {
    let s = s.trim();
    let digit_or_dash = |i: usize, b: &u8| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    };
    let fmt = match s.len() {
        8 if s.bytes().all(|b| b.is_ascii_digit()) => "%Y%m%d",
        10 if s.as_bytes().iter().enumerate().all(|(i, b)| digit_or_dash(i, b)) => "%Y-%m-%d",
        _ => return Err(WatchError::InvalidDate(s.to_string())),
    };
    NaiveDate::parse_from_str(s, fmt).map_err(|_| WatchError::InvalidDate(s.to_string()))
}

pub fn format_api_date(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

pub fn add_days(date: NaiveDate, n: u64) -> NaiveDate {
    date + Days::new(n)
}

pub fn scan_dates(start: NaiveDate) -> Vec<NaiveDate> {
    (0..SCAN_DAYS).map(|i| add_days(start, i)).collect()
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), WatchError> {
        validate_airport(&self.origin)?;
        validate_airport(&self.destination)?;

        if !self.max_price.is_finite() || self.max_price < 0.0 {
            return Err(WatchError::Validation(format!(
                "--max-price must be a non-negative amount, got {}",
                self.max_price
            )));
        }

        if self.hours.start > self.hours.end || self.hours.end > 24 {
            return Err(WatchError::InvalidHourRange(format!(
                "{}-{}",
                self.hours.start, self.hours.end
            )));
        }

        if self.recipients.is_empty() {
            return Err(WatchError::MissingArgument("--email"));
        }

        Ok(())
    }

    pub fn to_url_params(&self, date: NaiveDate) -> Vec<(String, String)> {
        vec![
            ("origin".to_string(), self.origin.clone()),
            ("destination".to_string(), self.destination.clone()),
            ("originDepartureDate".to_string(), format_api_date(date)),
            ("directFlight".to_string(), "true".to_string()),
            ("adults".to_string(), self.passengers.adults.to_string()),
            ("children".to_string(), self.passengers.children.to_string()),
        ]
    }

    /// Price must be strictly below the ceiling and the departure hour inside
    /// the range. Offers with an unreadable departure time never pass.
    pub fn admits(&self, offer: &FlightOffer) -> bool {
        if !(offer.price_one_passenger() < self.max_price) {
            return false;
        }
        match parse::departure_hour(offer) {
            Some(hour) => self.hours.contains(hour),
            None => {
                tracing::debug!(
                    "skipping {}: unreadable departure time \"{}\"",
                    offer.outbound_flight.flight_number,
                    offer.outbound_flight.departure_date_time
                );
                false
            }
        }
    }
}
