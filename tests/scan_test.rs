use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use farewatch::error::WatchError;
use farewatch::fetch::OfferSource;
use farewatch::mail::Mailer;
use farewatch::model::FlightOffer;
use farewatch::query::{format_api_date, HourRange, Passengers, SearchRequest};
use farewatch::report::SUBJECT;
use serde_json::json;

/// Serves canned offers per `YYYYMMDD` day and records every lookup.
#[derive(Default)]
struct CannedSource {
    days: HashMap<String, Vec<FlightOffer>>,
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl CannedSource {
    fn with_day(mut self, day: &str, offers: Vec<FlightOffer>) -> Self {
        self.days.insert(day.to_string(), offers);
        self
    }

    fn failing_on(mut self, day: &str) -> Self {
        self.failing.insert(day.to_string());
        self
    }
}

impl OfferSource for CannedSource {
    async fn offers_for(
        &self,
        _request: &SearchRequest,
        date: NaiveDate,
    ) -> Result<Vec<FlightOffer>, WatchError> {
        let day = format_api_date(date);
        self.calls.borrow_mut().push(day.clone());
        if self.failing.contains(&day) {
            return Err(WatchError::HttpStatus {
                status: 500,
                body: "{\"error\":\"upstream\"}".into(),
            });
        }
        Ok(self.days.get(&day).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<(String, String, String)>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, text: &str, html: &str) -> Result<(), WatchError> {
        if self.fail {
            return Err(WatchError::Mail("connection refused".into()));
        }
        self.sent
            .borrow_mut()
            .push((subject.to_string(), text.to_string(), html.to_string()));
        Ok(())
    }
}

fn request() -> SearchRequest {
    SearchRequest {
        origin: "ORY".into(),
        destination: "LIS".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        passengers: Passengers::default(),
        max_price: 200.0,
        hours: HourRange { start: 9, end: 17 },
        recipients: vec!["me@example.com".into()],
    }
}

fn offer(flight: &str, price: f64, departure: &str) -> FlightOffer {
    serde_json::from_value(json!({
        "outboundFlight": {
            "flightNumber": flight,
            "departureDateTime": departure,
            "arrivalDateTime": departure
        },
        "pricingInfoSum": {
            "totalPriceAllPassengers": price * 2.0,
            "totalPriceOnePassenger": price,
            "currencyCode": "EUR"
        },
        "deeplink": { "href": format!("https://www.transavia.com/nl-NL/{flight}") }
    }))
    .unwrap()
}

#[tokio::test]
async fn queries_fifteen_days_in_order() {
    let source = CannedSource::default();
    farewatch::scan(&request(), &source).await;

    let calls = source.calls.borrow();
    assert_eq!(calls.len(), 15);
    assert_eq!(calls[0], "20240601");
    assert_eq!(calls[14], "20240615");
    let mut sorted = calls.clone();
    sorted.sort();
    assert_eq!(*calls, sorted);
}

#[tokio::test]
async fn worked_example_admits_only_cheap_daytime_offer() {
    let source = CannedSource::default().with_day(
        "20240601",
        vec![
            offer("TO 1", 150.0, "2024-06-01T10:00:00"),
            offer("TO 2", 150.0, "2024-06-01T20:00:00"),
            offer("TO 3", 250.0, "2024-06-01T10:00:00"),
        ],
    );
    let report = farewatch::scan(&request(), &source).await;

    assert_eq!(report.len(), 1);
    assert_eq!(report.matches()[0].offer.outbound_flight.flight_number, "TO 1");
}

#[tokio::test]
async fn rows_follow_day_then_api_order() {
    let source = CannedSource::default()
        .with_day(
            "20240603",
            vec![offer("C", 100.0, "2024-06-03T11:00:00")],
        )
        .with_day(
            "20240601",
            vec![
                offer("A", 120.0, "2024-06-01T16:00:00"),
                offer("B", 80.0, "2024-06-01T09:00:00"),
            ],
        );
    let report = farewatch::scan(&request(), &source).await;

    let order: Vec<&str> = report
        .matches()
        .iter()
        .map(|m| m.offer.outbound_flight.flight_number.as_str())
        .collect();
    assert_eq!(order, ["A", "B", "C"]);
    assert_eq!(format_api_date(report.matches()[2].date), "20240603");
}

#[tokio::test]
async fn failed_day_does_not_stop_the_scan() {
    let source = CannedSource::default()
        .failing_on("20240601")
        .failing_on("20240605")
        .with_day("20240606", vec![offer("TO 9", 50.0, "2024-06-06T12:00:00")]);
    let report = farewatch::scan(&request(), &source).await;

    assert_eq!(source.calls.borrow().len(), 15);
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn no_match_sends_nothing() {
    let source = CannedSource::default().with_day(
        "20240602",
        vec![offer("TO 1", 500.0, "2024-06-02T10:00:00")],
    );
    let req = request();
    let report = farewatch::scan(&req, &source).await;
    let mailer = RecordingMailer::default();

    let sent = farewatch::notify(&req, &report, &mailer).await.unwrap();

    assert!(!sent);
    assert!(mailer.sent.borrow().is_empty());
}

#[tokio::test]
async fn matches_are_sent_in_one_message() {
    let source = CannedSource::default()
        .with_day("20240601", vec![offer("TO 1", 150.0, "2024-06-01T10:00:00")])
        .with_day(
            "20240610",
            vec![
                offer("TO 2", 99.0, "2024-06-10T09:30:00"),
                offer("TO 3", 199.0, "2024-06-10T17:10:00"),
            ],
        );
    let req = request();
    let report = farewatch::scan(&req, &source).await;
    let mailer = RecordingMailer::default();

    let sent = farewatch::notify(&req, &report, &mailer).await.unwrap();

    assert!(sent);
    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    let (subject, text, html) = &sent[0];
    assert_eq!(subject, SUBJECT);
    assert_eq!(text.matches("Vol TO").count(), 3);
    assert_eq!(html.matches("<tr><td>").count(), 3);
    assert!(text.contains("https://www.transavia.com/fr-FR/TO 1"));
    assert!(!text.contains("nl-NL"));
    assert!(!html.contains("nl-NL"));
    assert!(html.contains("Vols ORY &rarr; LIS"));
}

#[tokio::test]
async fn mail_failure_is_returned() {
    let source = CannedSource::default()
        .with_day("20240601", vec![offer("TO 1", 150.0, "2024-06-01T10:00:00")]);
    let req = request();
    let report = farewatch::scan(&req, &source).await;
    let mailer = RecordingMailer {
        fail: true,
        ..Default::default()
    };

    let err = farewatch::notify(&req, &report, &mailer).await.unwrap_err();
    assert!(matches!(err, WatchError::Mail(_)));
}
