use tracing::info;

use crate::api::bls::BlsClient;
use crate::config::Config;
use crate::models::RenderedChart;
use crate::services::chart_service;
use crate::utils::JobsError;

/// Fetch the configured series and render it. The chart is only drawn
/// after a successful fetch, so a failed run leaves no output behind.
pub async fn run(config: &Config) -> Result<RenderedChart, JobsError> {
    let client = if config.base_url == BlsClient::DEFAULT_BASE_URL {
        BlsClient::new(config.api_key.clone())
    } else {
        BlsClient::with_base_url(config.api_key.clone(), config.base_url.clone())
    };

    info!(
        "Fetching {} for {}-{}",
        config.series_id, config.start_year, config.end_year
    );
    let observations = client
        .get_series(&config.series_id, config.start_year, config.end_year)
        .await?;
    info!("Received {} observations", observations.len());

    chart_service::render_chart(&observations, &config.series_id, &config.style, &config.output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bls::ApiError;
    use crate::models::ChartStyle;
    use crate::utils::stub_server::StubServer;
    use std::path::Path;

    fn test_config(base_url: &str, output: &Path) -> Config {
        Config {
            api_key: "test-key".to_string(),
            series_id: "LNS14000000".to_string(),
            start_year: 2023,
            end_year: 2024,
            base_url: base_url.to_string(),
            output_path: output.to_path_buf(),
            style: ChartStyle::default(),
        }
    }

    #[tokio::test]
    async fn test_http_error_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.png");
        let server = StubServer::start("503 Service Unavailable", "maintenance");

        let err = run(&test_config(&server.base_url, &output)).await.unwrap_err();

        assert!(matches!(err, JobsError::Api(ApiError::ServerError(503, _))));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_empty_series_is_insufficient_data() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.png");
        let body = r#"{"status": "REQUEST_SUCCEEDED", "responseTime": 5,
                       "message": ["No Data Available for Series LNS14000000 Year: 2024"],
                       "Results": {"series": [{"seriesID": "LNS14000000", "data": []}]}}"#;
        let server = StubServer::start("200 OK", body);

        let err = run(&test_config(&server.base_url, &output)).await.unwrap_err();

        assert!(matches!(err, JobsError::EmptyData(_)));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_fetch_then_render() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("chart.svg");
        let body = r#"{"status": "REQUEST_SUCCEEDED", "responseTime": 5, "message": [],
                       "Results": {"series": [{"seriesID": "LNS14000000", "data": [
                           {"year": "2024", "period": "M02", "periodName": "February", "latest": "true", "value": "3.9"},
                           {"year": "2024", "period": "M01", "periodName": "January", "value": "3.7"},
                           {"year": "2023", "period": "M13", "periodName": "Annual", "value": "3.6"},
                           {"year": "2023", "period": "M12", "periodName": "December", "value": "3.7"}
                       ]}]}}"#;
        let server = StubServer::start("200 OK", body);

        let chart = run(&test_config(&server.base_url, &output)).await.unwrap();

        assert!(output.exists());
        let periods: Vec<&str> = chart.points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-12", "2024-01", "2024-02"]);
    }
}
