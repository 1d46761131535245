//! ARM REST client for the `Microsoft.Compute/skus` listing.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sku_core::config::RemoteSection;

use crate::client::{ListSkusFuture, ResourceSkuClient};
use crate::error::{SkuError, SkuResult};
use crate::sku::ResourceSku;

/// Lists SKUs for a subscription through Azure Resource Manager.
#[derive(Debug, Clone)]
pub struct ArmSkuClient {
    http: Client,
    endpoint: String,
    subscription_id: String,
    api_version: String,
    token: String,
}

/// Most listing pages followed for one region.
const MAX_PAGES: u32 = 1000;

/// One page of the listing.
#[derive(Debug, Deserialize)]
pub(crate) struct SkuPage {
    #[serde(default)]
    pub(crate) value: Vec<ResourceSku>,
    #[serde(rename = "nextLink", default)]
    pub(crate) next_link: Option<String>,
}

/// Follows `nextLink` pagination, refusing repeated links and runaway
/// page counts.
#[derive(Debug, Default)]
struct PageCursor {
    pages: u32,
    seen: HashSet<String>,
}

impl PageCursor {
    /// Record one fetched page and return the link to fetch next, if any.
    fn advance(&mut self, next_link: Option<String>) -> SkuResult<Option<String>> {
        self.pages += 1;
        let Some(next) = next_link.filter(|link| !link.is_empty()) else {
            return Ok(None);
        };
        if self.pages >= MAX_PAGES {
            return Err(SkuError::Pagination(format!(
                "gave up after {} pages",
                self.pages
            )));
        }
        if !self.seen.insert(next.clone()) {
            return Err(SkuError::Pagination(format!("nextLink {next:?} repeated")));
        }
        Ok(Some(next))
    }
}

impl ArmSkuClient {
    pub fn new(
        endpoint: &str,
        subscription_id: &str,
        api_version: &str,
        token: &str,
        request_timeout: Duration,
    ) -> SkuResult<Self> {
        if subscription_id.trim().is_empty() {
            return Err(SkuError::Credentials("no subscription id configured".to_string()));
        }
        if token.trim().is_empty() {
            return Err(SkuError::Credentials("empty bearer token".to_string()));
        }
        let http = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_id: subscription_id.to_string(),
            api_version: api_version.to_string(),
            token: token.to_string(),
        })
    }

    /// Build from a `[remote]` section, reading the token from the
    /// environment variable it names.
    pub fn from_config(remote: &RemoteSection) -> SkuResult<Self> {
        let token = std::env::var(&remote.token_env).ok();
        Self::from_config_with_token(remote, token)
    }

    pub fn from_config_with_token(remote: &RemoteSection, token: Option<String>) -> SkuResult<Self> {
        let subscription_id = remote
            .subscription_id
            .as_deref()
            .ok_or_else(|| SkuError::Credentials("no subscription id configured".to_string()))?;
        let token = token.ok_or_else(|| {
            SkuError::Credentials(format!("environment variable {} is not set", remote.token_env))
        })?;
        let request_timeout = remote
            .request_timeout()
            .map_err(|e| SkuError::Config(e.to_string()))?;
        Self::new(
            &remote.endpoint,
            subscription_id,
            &remote.api_version,
            &token,
            request_timeout,
        )
    }

    pub fn skus_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Compute/skus",
            self.endpoint, self.subscription_id
        )
    }

    async fn list_all(&self, region: &str) -> SkuResult<Vec<ResourceSku>> {
        let filter = format!("location eq '{region}'");
        let mut request = self
            .http
            .get(self.skus_url())
            .bearer_auth(&self.token)
            .query(&[("api-version", self.api_version.as_str()), ("$filter", filter.as_str())]);

        let mut skus = Vec::new();
        let mut cursor = PageCursor::default();
        loop {
            let response = request.send().await?;
            let page: SkuPage = parse_json_response(response).await?;
            skus.extend(page.value);

            match cursor.advance(page.next_link)? {
                Some(next) => request = self.http.get(next).bearer_auth(&self.token),
                None => break,
            }
        }

        debug!(region, pages = cursor.pages, skus = skus.len(), "sku listing fetched");
        Ok(skus)
    }
}

impl ResourceSkuClient for ArmSkuClient {
    fn list_skus<'a>(&'a self, region: &'a str, cancel: &'a CancellationToken) -> ListSkusFuture<'a> {
        Box::pin(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(SkuError::Cancelled),
                result = self.list_all(region) => result,
            }
        })
    }
}

async fn parse_json_response(response: reqwest::Response) -> SkuResult<SkuPage> {
    let status = response.status();
    if status.is_success() {
        let body = response.bytes().await?;
        return Ok(serde_json::from_slice(&body)?);
    }

    Err(api_error(status.as_u16(), response.text().await))
}

/// Error for a non-2xx response. A body that could not be read is noted in
/// place of the body.
fn api_error<E: fmt::Display>(status: u16, body: Result<String, E>) -> SkuError {
    let body = body.unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    SkuError::Api { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteSection {
        RemoteSection {
            subscription_id: Some("sub-123".to_string()),
            ..RemoteSection::default()
        }
    }

    #[test]
    fn builds_listing_url() {
        let client = ArmSkuClient::from_config_with_token(&remote(), Some("t0ken".to_string())).unwrap();
        assert_eq!(
            client.skus_url(),
            "https://management.azure.com/subscriptions/sub-123/providers/Microsoft.Compute/skus"
        );
    }

    #[test]
    fn trailing_slash_on_endpoint_is_dropped() {
        let client = ArmSkuClient::new(
            "http://localhost:8080/",
            "sub",
            "2021-07-01",
            "t",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.skus_url(),
            "http://localhost:8080/subscriptions/sub/providers/Microsoft.Compute/skus"
        );
    }

    #[test]
    fn missing_token_is_a_credentials_error() {
        let err = ArmSkuClient::from_config_with_token(&remote(), None).unwrap_err();
        assert!(matches!(err, SkuError::Credentials(ref m) if m.contains("AZURE_ACCESS_TOKEN")));

        let err = ArmSkuClient::from_config_with_token(&remote(), Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, SkuError::Credentials(_)));
    }

    #[test]
    fn missing_subscription_is_a_credentials_error() {
        let err = ArmSkuClient::from_config_with_token(&RemoteSection::default(), Some("t".to_string()))
            .unwrap_err();
        assert!(matches!(err, SkuError::Credentials(_)));
    }

    #[test]
    fn bad_request_timeout_is_a_config_error() {
        let remote = RemoteSection {
            request_timeout: "later".to_string(),
            ..remote()
        };
        let err = ArmSkuClient::from_config_with_token(&remote, Some("t".to_string())).unwrap_err();
        assert!(matches!(err, SkuError::Config(_)));
    }

    #[test]
    fn decodes_listing_page() {
        let json = r#"{
            "value": [
                {
                    "resourceType": "virtualMachines",
                    "name": "Standard_D2s_v3",
                    "locations": ["eastus"],
                    "capabilities": [
                        {"name": "vCPUs", "value": "2"},
                        {"name": "MemoryGB", "value": "8"}
                    ]
                },
                {"resourceType": "disks", "name": "Premium_LRS", "locations": ["eastus"]}
            ],
            "nextLink": "https://management.azure.com/next?page=2"
        }"#;
        let page: SkuPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[0].vcpu().unwrap(), 2);
        assert_eq!(page.next_link.as_deref(), Some("https://management.azure.com/next?page=2"));
    }

    #[test]
    fn cursor_follows_distinct_links_until_the_last_page() {
        let mut cursor = PageCursor::default();
        assert_eq!(
            cursor.advance(Some("https://arm/next?page=2".to_string())).unwrap(),
            Some("https://arm/next?page=2".to_string())
        );
        assert_eq!(
            cursor.advance(Some("https://arm/next?page=3".to_string())).unwrap(),
            Some("https://arm/next?page=3".to_string())
        );
        assert_eq!(cursor.advance(Some(String::new())).unwrap(), None);
        assert_eq!(cursor.pages, 3);
    }

    #[test]
    fn cursor_rejects_repeated_link() {
        let mut cursor = PageCursor::default();
        let link = "https://arm/next?page=2".to_string();
        assert!(cursor.advance(Some(link.clone())).unwrap().is_some());
        let err = cursor.advance(Some(link)).unwrap_err();
        assert!(matches!(err, SkuError::Pagination(ref m) if m.contains("repeated")));
    }

    #[test]
    fn cursor_caps_page_count() {
        let mut cursor = PageCursor::default();
        let failure = (0..MAX_PAGES)
            .map(|page| cursor.advance(Some(format!("https://arm/next?page={page}"))))
            .find(Result::is_err);
        assert!(matches!(failure, Some(Err(SkuError::Pagination(_)))));
        assert_eq!(cursor.pages, MAX_PAGES);
    }

    #[test]
    fn api_error_keeps_status_when_body_is_unreadable() {
        let err = api_error(503, Err::<String, _>("connection reset"));
        match err {
            SkuError::Api { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("connection reset"));
            }
            other => panic!("expected api error, got {other:?}"),
        }

        assert!(matches!(
            api_error::<String>(404, Ok("not here".to_string())),
            SkuError::Api { status: 404, ref body } if body == "not here"
        ));
    }

    #[tokio::test]
    async fn cancelled_before_request_returns_cancelled() {
        let client = ArmSkuClient::new(
            "http://127.0.0.1:9",
            "sub",
            "2021-07-01",
            "t",
            Duration::from_secs(5),
        )
        .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = client.list_skus("eastus", &cancel).await;
        assert!(matches!(result, Err(SkuError::Cancelled)));
    }
}
