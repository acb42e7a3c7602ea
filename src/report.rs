use chrono::NaiveDate;

use crate::model::FlightOffer;
use crate::parse;
use crate::query::{SearchRequest, SCAN_DAYS};
use crate::table::format_price;

pub const SUBJECT: &str = "Vols disponibles";

#[derive(Debug, Clone)]
pub struct Match {
    pub date: NaiveDate,
    pub offer: FlightOffer,
}

/// Rows collected over the scan window, kept both as plain text and as HTML
/// table rows. Appended to in scan order and never reordered.
#[derive(Debug, Default)]
pub struct Report {
    text: String,
    html: String,
    matches: Vec<Match>,
}

pub fn rewrite_deeplink(href: &str) -> String {
    href.replace("nl-NL", "fr-FR")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn french_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn clock(raw: &str) -> String {
    parse::parse_timestamp(raw)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: NaiveDate, offer: FlightOffer) {
        let flight = &offer.outbound_flight;
        let pricing = &offer.pricing_info_sum;
        let link = rewrite_deeplink(&offer.deeplink.href);
        let day = french_date(date);
        let departure = clock(&flight.departure_date_time);
        let arrival = clock(&flight.arrival_date_time);
        let one = format_price(pricing.total_price_one_passenger, &pricing.currency_code);
        let all = format_price(pricing.total_price_all_passengers, &pricing.currency_code);

        self.text.push_str(&format!(
            "Vol {} le {day} : départ à {departure}, arrivée à {arrival}, \
             {one} par personne ({all} au total). Réserver : {link}\n",
            flight.flight_number
        ));

        self.html.push_str(&format!(
            "<tr><td>{day}</td><td>{}</td><td>{departure}</td><td>{arrival}</td>\
             <td>{}</td><td>{}</td><td><a href=\"{}\">Réserver</a></td></tr>\n",
            escape_html(&flight.flight_number),
            escape_html(&one),
            escape_html(&all),
            escape_html(&link),
        ));

        self.matches.push(Match { date, offer });
    }

    pub fn has_results(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn text_rows(&self) -> &str {
        &self.text
    }

    pub fn html_rows(&self) -> &str {
        &self.html
    }

    pub fn text_document(&self, request: &SearchRequest) -> String {
        format!(
            "Vols {} -> {}\n{}\n\n{}",
            request.origin,
            request.destination,
            search_summary(request),
            self.text
        )
    }

    pub fn html_document(&self, request: &SearchRequest) -> String {
        format!(
            "<html><body>\n\
             <h2>Vols {} &rarr; {}</h2>\n\
             <p>{}</p>\n\
             <table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">\n\
             <thead><tr><th>Date</th><th>Vol</th><th>Départ</th><th>Arrivée</th>\
             <th>Prix par personne</th><th>Prix total</th><th>Lien</th></tr></thead>\n\
             <tbody>\n{}</tbody>\n\
             </table>\n\
             </body></html>\n",
            escape_html(&request.origin),
            escape_html(&request.destination),
            escape_html(&search_summary(request)),
            self.html
        )
    }
}

fn search_summary(request: &SearchRequest) -> String {
    format!(
        "Recherche sur {SCAN_DAYS} jours à partir du {}, {} adulte(s), {} enfant(s), \
         prix maximum {} par personne, départ entre {}h et {}h.",
        french_date(request.start_date),
        request.passengers.adults,
        request.passengers.children,
        format_price(request.max_price, "EUR"),
        request.hours.start,
        request.hours.end,
    )
}
