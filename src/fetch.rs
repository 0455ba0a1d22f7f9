use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

// Connecting, sending and reading the response all share this window.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("invalid status code {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("could not read the response body from {url}: {source}")]
    Read { url: String, source: reqwest::Error },
}

pub fn metrics_url(server: &str) -> String {
    format!("https://{}/api/v2/metrics/", server.trim_end_matches('/'))
}

/// One authenticated GET against the Tower metrics endpoint. Certificate
/// verification is disabled: these servers routinely run self-signed certs.
/// No retries; the caller decides whether to abort.
pub async fn fetch_metrics(server: &str, api_token: &str) -> Result<String, FetchError> {
    let url = metrics_url(server);

    let client = Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    let response = client
        .get(&url)
        .bearer_auth(api_token)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status { url, status });
    }

    response
        .text()
        .await
        .map_err(|source| FetchError::Read { url, source })
}
