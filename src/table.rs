use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::report::{rewrite_deeplink, Report};

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn format_price(amount: f64, currency: &str) -> String {
    let a = format_amount(amount);
    match currency {
        "EUR" => format!("{a} €"),
        "USD" => format!("${a}"),
        "GBP" => format!("£{a}"),
        _ => format!("{a} {currency}"),
    }
}

pub fn render(report: &Report) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Date", "Flight", "Depart", "Arrive", "Per person", "Total", "Link",
        ]);

    for m in report.matches() {
        let flight = &m.offer.outbound_flight;
        let pricing = &m.offer.pricing_info_sum;
        table.add_row(vec![
            m.date.format("%Y-%m-%d").to_string(),
            flight.flight_number.clone(),
            flight.departure_date_time.clone(),
            flight.arrival_date_time.clone(),
            format_price(pricing.total_price_one_passenger, &pricing.currency_code),
            format_price(pricing.total_price_all_passengers, &pricing.currency_code),
            rewrite_deeplink(&m.offer.deeplink.href),
        ]);
    }

    table.to_string()
}
