use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundFlight {
    pub flight_number: String,
    pub departure_date_time: String,
    pub arrival_date_time: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInfoSum {
    pub total_price_all_passengers: f64,
    pub total_price_one_passenger: f64,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Deeplink {
    pub href: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub outbound_flight: OutboundFlight,
    pub pricing_info_sum: PricingInfoSum,
    pub deeplink: Deeplink,
}

impl FlightOffer {
    pub fn price_one_passenger(&self) -> f64 {
        self.pricing_info_sum.total_price_one_passenger
    }

    pub fn currency(&self) -> &str {
        &self.pricing_info_sum.currency_code
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    #[serde(default)]
    pub flight_offer: Vec<FlightOffer>,
}
