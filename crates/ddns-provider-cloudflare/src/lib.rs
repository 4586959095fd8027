// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS reconciler.
//
// ## Behavior
//
// - One HTTP request per trait call (list or update)
// - Full error propagation; a failed call ends the pass
// - HTTP timeout configured (30 seconds by default)
// - Dry-run mode: GET requests are made, the PUT is only logged
// - Both A and AAAA record support
// - Zone identifier and token are taken as given, never checked locally
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records/?type=...&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::config::DdnsConfig;
use ddns_core::traits::{DnsProvider, DnsRecord, RecordType, RecordUpdate, UpdateResult};
use ddns_core::{Error, Result, Stage};
use serde::Deserialize;
use std::time::Duration;

/// Body of a successful record listing
#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    result: Vec<CloudflareRecord>,
}

/// One entry of `result`; fields we don't read are ignored
#[derive(Debug, Deserialize)]
struct CloudflareRecord {
    id: String,
    #[serde(rename = "type", default)]
    record_type: String,
    #[serde(default)]
    name: String,
    content: String,
}

impl From<CloudflareRecord> for DnsRecord {
    fn from(record: CloudflareRecord) -> Self {
        DnsRecord {
            id: record.id,
            record_type: record.record_type,
            name: record.name,
            content: record.content,
        }
    }
}

/// Cloudflare DNS provider
///
/// Scoped to one zone. Stateless and single-shot: every call is one request.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the record listing
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone the managed records live in
    zone_id: String,

    /// API base URL, without trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone identifier from the Cloudflare dashboard
    /// - `api_base`: API base URL (normally `https://api.cloudflare.com/client/v4`)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform GET requests but skip PUT updates
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let api_base: String = api_base.into();

        Ok(Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider for the zone, token, endpoint and timeout in `config`
    pub fn from_config(config: &DdnsConfig, dry_run: bool) -> Result<Self> {
        if dry_run {
            tracing::info!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.api_token.clone(),
            config.zone_identifier.clone(),
            config.endpoints.api_base.clone(),
            config.timeout(),
            dry_run,
        )
    }

    /// Whether PUT requests are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records/", self.api_base, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/zones/{}/dns_records/{}", self.api_base, self.zone_id, record_id)
    }

    /// Turn a non-success response into an error, logging a hint for the
    /// status codes that usually mean a setup problem
    async fn status_error(stage: Stage, response: reqwest::Response) -> Error {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        match status.as_u16() {
            401 | 403 => tracing::debug!(
                "Authentication failed while {}: invalid API token, wrong zone or insufficient permissions",
                stage
            ),
            404 => tracing::debug!("Not found while {}: check zone_identifier", stage),
            429 => tracing::debug!("Rate limit exceeded while {}", stage),
            500..=599 => tracing::debug!("Cloudflare server error while {}: {}", stage, error_text),
            _ => tracing::debug!("Cloudflare error response: {}", error_text),
        }

        Error::Status {
            stage,
            status: status.as_u16(),
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List records by type and exact name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records/?type=A&name=www.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(
        &self,
        record_type: RecordType,
        hostname: &str,
    ) -> Result<Vec<DnsRecord>> {
        let stage = Stage::CheckRecord(record_type);

        tracing::debug!("Looking up {} record for {}", record_type, hostname);

        let response = self
            .client
            .get(self.records_url())
            .query(&[("type", record_type.as_str()), ("name", hostname)])
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::from_reqwest(stage, e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(stage, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::from_reqwest(stage, e))?;

        let parsed: ListRecordsResponse = serde_json::from_str(&body)
            .map_err(|e| Error::invalid_response(stage, e.to_string()))?;

        tracing::debug!(
            "Found {} {} record(s) for {}",
            parsed.result.len(),
            record_type,
            hostname
        );

        Ok(parsed.result.into_iter().map(DnsRecord::from).collect())
    }

    /// Overwrite one record
    ///
    /// # API Call (skipped in dry-run mode)
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// {"type": "A", "name": "www", "content": "1.2.3.4", "ttl": 300, "proxied": false}
    /// ```
    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<UpdateResult> {
        let stage = Stage::UpdateRecord(update.record_type);
        let url = self.record_url(record_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(update).unwrap_or_default()
            );
            return Ok(UpdateResult::DryRun);
        }

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(update)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(stage, e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(stage, response).await);
        }

        tracing::info!(
            "DNS record {} updated successfully: {} -> {}",
            record_id,
            update.record_type,
            update.content
        );
        Ok(UpdateResult::Applied)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_mock_provider(mock_server: &MockServer, dry_run: bool) -> CloudflareProvider {
        CloudflareProvider::new(
            "test_token_12345",
            "zone123",
            mock_server.uri(),
            Duration::from_secs(5),
            dry_run,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records/"))
            .and(query_param("type", "A"))
            .and(query_param("name", "www.example.com"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "errors": [],
                "result": [
                    {
                        "id": "372e67954025e0ba6aaa6d586b9e0b59",
                        "type": "A",
                        "name": "www.example.com",
                        "content": "203.0.113.1",
                        "ttl": 300,
                        "proxied": false
                    }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let records = provider
            .list_records(RecordType::A, "www.example.com")
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "372e67954025e0ba6aaa6d586b9e0b59");
        assert_eq!(records[0].record_type, "A");
        assert_eq!(records[0].content, "203.0.113.1");
    }

    #[tokio::test]
    async fn test_list_records_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records/"))
            .and(query_param("type", "AAAA"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "result": []})),
            )
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let records = provider
            .list_records(RecordType::Aaaa, "www.example.com")
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_records_auth_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{"code": 10000, "message": "Authentication error"}],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let err = provider
            .list_records(RecordType::A, "www.example.com")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "Error checking A record. HTTP 403");
    }

    #[tokio::test]
    async fn test_list_records_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone123/dns_records/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": null})),
            )
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let err = provider
            .list_records(RecordType::A, "www.example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidResponse { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_update_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone123/dns_records/rec-1"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .and(body_json(serde_json::json!({
                "type": "A",
                "name": "www",
                "content": "203.0.113.9",
                "ttl": 300,
                "proxied": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "result": {"id": "rec-1", "type": "A", "content": "203.0.113.9"}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let update = RecordUpdate::new(RecordType::A, "www", "203.0.113.9");

        let result = provider.update_record("rec-1", &update).await.unwrap();
        assert_eq!(result, UpdateResult::Applied);
    }

    #[tokio::test]
    async fn test_update_record_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone123/dns_records/rec-6"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, false);
        let update = RecordUpdate::new(RecordType::Aaaa, "www", "2001:db8::9");

        let err = provider.update_record("rec-6", &update).await.unwrap_err();
        assert_eq!(err.to_string(), "Error updating AAAA record. HTTP 400");
    }

    #[tokio::test]
    async fn test_dry_run_skips_put() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let provider = create_mock_provider(&mock_server, true);
        let update = RecordUpdate::new(RecordType::A, "www", "203.0.113.9");

        let result = provider.update_record("rec-1", &update).await.unwrap();
        assert_eq!(result, UpdateResult::DryRun);
    }
}
