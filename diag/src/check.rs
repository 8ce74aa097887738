use anyhow::{Context, Result};
use reqwest::Client;

/// GETs a deployed relay endpoint with `?query=` and returns status and body.
pub async fn check_endpoint(url: &str, query: &str) -> Result<(u16, String)> {
    let response = Client::new()
        .get(url)
        .query(&[("query", query)])
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;
    Ok((status, body))
}
