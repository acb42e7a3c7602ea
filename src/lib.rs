pub mod config;
pub mod error;
pub mod fetch;
pub mod mail;
pub mod model;
pub mod parse;
pub mod query;
pub mod report;
pub mod table;

use error::WatchError;
use fetch::OfferSource;
use mail::Mailer;
use query::SearchRequest;
use report::Report;

/// Walks the scan window one day at a time. A failed day is logged and
/// skipped; it never aborts the remaining days.
pub async fn scan<S: OfferSource>(request: &SearchRequest, source: &S) -> Report {
    let mut report = Report::new();

    for date in query::scan_dates(request.start_date) {
        let offers = match source.offers_for(request, date).await {
            Ok(offers) => offers,
            Err(e) => {
                tracing::warn!("{}: {e}", query::format_api_date(date));
                continue;
            }
        };

        let total = offers.len();
        let before = report.len();
        for offer in offers {
            if request.admits(&offer) {
                report.push(date, offer);
            }
        }
        tracing::info!(
            "{}: {} of {total} offer(s) matched",
            query::format_api_date(date),
            report.len() - before
        );
    }

    report
}

/// Mails the report if it has any rows. Returns whether a message was sent.
pub async fn notify<M: Mailer>(
    request: &SearchRequest,
    report: &Report,
    mailer: &M,
) -> Result<bool, WatchError> {
    if !report.has_results() {
        return Ok(false);
    }
    mailer
        .send(
            report::SUBJECT,
            &report.text_document(request),
            &report.html_document(request),
        )
        .await?;
    Ok(true)
}
