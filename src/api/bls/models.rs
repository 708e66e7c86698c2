use serde::Deserialize;
use thiserror::Error;

/// `status` value the BLS API reports for a processed request
pub const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

/// Top-level envelope from GET /timeseries/data/{series_id}
#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesResponse {
    pub status: String,
    #[serde(rename = "responseTime", default)]
    pub response_time: Option<u64>,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: Option<TimeseriesResults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesResults {
    #[serde(default)]
    pub series: Vec<SeriesData>,
}

/// One series block; `data` is newest first as BLS sends it
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesData {
    #[serde(rename = "seriesID")]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// A raw data row. Every field arrives as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPoint {
    pub year: String,
    /// `M01`..`M12` for months, `M13` for the annual average
    pub period: String,
    #[serde(rename = "periodName", default)]
    pub period_name: Option<String>,
    pub value: String,
}

/// Failures reported by the BLS API itself
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 403 Forbidden (BLS answers this for revoked registration keys)
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited. Retry after {}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// HTTP 200, but the envelope status says the request was not served
    #[error("Request not processed ({status}): {}", .messages.join("; "))]
    RequestNotProcessed { status: String, messages: Vec<String> },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!("{} s", secs),
        None => "an unknown delay".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_envelope() {
        let body = r#"{
            "status": "REQUEST_SUCCEEDED",
            "responseTime": 142,
            "message": [],
            "Results": {
                "series": [{
                    "seriesID": "LNS14000000",
                    "data": [
                        {"year": "2024", "period": "M03", "periodName": "March",
                         "latest": "true", "value": "3.8", "footnotes": [{}]}
                    ]
                }]
            }
        }"#;

        let response: TimeseriesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, REQUEST_SUCCEEDED);
        assert_eq!(response.response_time, Some(142));

        let series = &response.results.unwrap().series[0];
        assert_eq!(series.series_id, "LNS14000000");
        assert_eq!(series.data[0].period, "M03");
        assert_eq!(series.data[0].period_name.as_deref(), Some("March"));
        assert_eq!(series.data[0].value, "3.8");
    }

    #[test]
    fn test_deserialize_failure_envelope_without_results() {
        let body = r#"{"status": "REQUEST_NOT_PROCESSED", "responseTime": 3,
                       "message": ["The key provided by the User is invalid."], "Results": {}}"#;

        let response: TimeseriesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, "REQUEST_NOT_PROCESSED");
        assert_eq!(response.message.len(), 1);
        assert!(response.results.unwrap().series.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::RateLimited { retry_after_secs: Some(30) };
        assert_eq!(err.to_string(), "Rate Limited. Retry after 30 s");

        let err = ApiError::RequestNotProcessed {
            status: "REQUEST_NOT_PROCESSED".to_string(),
            messages: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Request not processed (REQUEST_NOT_PROCESSED): a; b");
    }
}
