use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER, USER_AGENT};
use tracing::{debug, warn};

use super::models::{ApiError, TimeseriesResponse, REQUEST_SUCCEEDED};
use crate::models::Observation;
use crate::utils::JobsError;

/// BLS public data API (v2) client
pub struct BlsClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl BlsClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.bls.gov/publicAPI/v2";

    /// Create a new BLS API client
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
        );
        headers
    }

    /// Map a non-success HTTP status to an ApiError
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => ApiError::BadRequest(body_text),
            401 => ApiError::Unauthorized(body_text),
            403 => ApiError::Forbidden(body_text),
            404 => ApiError::NotFound(body_text),
            429 => {
                warn!("Rate limited by BLS, retry after {:?} s", retry_after_secs);
                ApiError::RateLimited { retry_after_secs }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// GET /timeseries/data/{series_id}
    ///
    /// Fetches one series for the inclusive year range in a single request.
    ///
    /// # Returns
    /// * `Ok(Vec<Observation>)` - Monthly observations, in the order BLS listed them
    /// * `Err(JobsError)` - Network, API or parse failure; never a partial result
    pub async fn get_series(
        &self,
        series_id: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<Observation>, JobsError> {
        let url = format!("{}/timeseries/data/{}", self.base_url, series_id);
        debug!("GET {} ({}-{})", url, start_year, end_year);

        let response = self
            .http_client
            .get(&url)
            .headers(Self::create_headers())
            .query(&[
                ("registrationkey", self.api_key.clone()),
                ("startyear", start_year.to_string()),
                ("endyear", end_year.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await.into());
        }

        let body = response.text().await?;
        parse_series_body(&body, series_id)
    }
}

/// Decode a BLS response body into observations for `series_id`
pub fn parse_series_body(body: &str, series_id: &str) -> Result<Vec<Observation>, JobsError> {
    let envelope: TimeseriesResponse = serde_json::from_str(body)?;

    if envelope.status != REQUEST_SUCCEEDED {
        return Err(ApiError::RequestNotProcessed {
            status: envelope.status,
            messages: envelope.message,
        }
        .into());
    }

    if let Some(ms) = envelope.response_time {
        debug!("BLS processed the request in {} ms", ms);
    }
    for message in &envelope.message {
        warn!("BLS: {}", message);
    }

    let results = envelope
        .results
        .ok_or_else(|| JobsError::Parse("Response has no Results block".to_string()))?;

    let series = results
        .series
        .into_iter()
        .find(|s| s.series_id == series_id)
        .ok_or_else(|| JobsError::Parse(format!("Series '{}' missing from response", series_id)))?;

    let mut observations = Vec::with_capacity(series.data.len());
    for row in &series.data {
        match Observation::from_bls_row(&row.year, &row.period, &row.value)? {
            Some(obs) => observations.push(obs),
            None => debug!("Skipping non-monthly period {} {}", row.year, row.period),
        }
    }

    debug!("Parsed {} observations for {}", observations.len(), series_id);
    Ok(observations)
}
