use std::time::Duration;

use chrono::NaiveDate;
use wreq::Client;

use crate::error::{self, WatchError};
use crate::model::FlightOffer;
use crate::parse;
use crate::query::SearchRequest;

#[derive(Clone)]
pub struct FetchOptions {
    pub base_url: String,
    pub api_key: String,
    pub proxy: Option<String>,
    pub timeout: u64,
}

/// Where one day's offers come from. The scan only talks to this trait so it
/// can run against canned responses.
#[allow(async_fn_in_trait)]
pub trait OfferSource {
    async fn offers_for(
        &self,
        request: &SearchRequest,
        date: NaiveDate,
    ) -> Result<Vec<FlightOffer>, WatchError>;
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(options: &FetchOptions) -> Result<Self, WatchError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

        if let Some(ref proxy) = options.proxy {
            builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
        }

        let client = builder.build().map_err(error::from_http_error)?;

        Ok(Self {
            client,
            base_url: options.base_url.clone(),
            api_key: options.api_key.clone(),
        })
    }

    pub async fn fetch_body(&self, params: &[(String, String)]) -> Result<String, WatchError> {
        let response = self
            .client
            .get(self.base_url.as_str())
            .header("apikey", self.api_key.as_str())
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(error::from_http_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(error::from_http_error)?;

        match status {
            204 => Ok(String::new()),
            _ if status >= 400 => Err(WatchError::HttpStatus {
                status,
                body: parse::body_preview(&body),
            }),
            _ => Ok(body),
        }
    }
}

impl OfferSource for ApiClient {
    async fn offers_for(
        &self,
        request: &SearchRequest,
        date: NaiveDate,
    ) -> Result<Vec<FlightOffer>, WatchError> {
        let params = request.to_url_params(date);
        tracing::debug!("GET {} {:?}", self.base_url, params);
        let body = self.fetch_body(&params).await?;
        parse::parse_offers(&body)
    }
}
