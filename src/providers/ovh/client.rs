use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use url::{ParseError, Url};

use crate::dns::{DnsFieldType, DnsRecord};
use crate::providers::ovh::error::{ApiError, InitError, OvhClientError};
use crate::providers::ovh::signing;
use crate::providers::ovh::types::{OvhErrorBody, RecordRequest};

pub const DEFAULT_ENDPOINT: &str = "ovh-eu";

const ENDPOINTS: [(&str, &str); 7] = [
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

#[derive(Clone)]
pub struct OvhConfig {
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: String,
    pub zone: String,
    pub endpoint: Option<String>,
}

impl fmt::Debug for OvhConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OvhConfig")
            .field("application_key", &"***")
            .field("application_secret", &"***")
            .field("consumer_key", &"***")
            .field("zone", &self.zone)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Client for the records of one zone. Holds no record state: every read
/// goes back to the API.
pub struct OvhClient {
    config: OvhConfig,
    api_root: String,
    client: Client,
    time_delta: Mutex<Option<i64>>,
}

/// Maps an endpoint alias or an absolute URL to the API root, without a
/// trailing slash. Empty means the default region.
pub fn resolve_endpoint(endpoint: Option<&str>) -> Result<String, InitError> {
    let endpoint = match endpoint.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => DEFAULT_ENDPOINT,
    };

    if let Some((_, root)) = ENDPOINTS.iter().find(|(alias, _)| *alias == endpoint) {
        return Ok(root.to_string());
    }

    match Url::parse(endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(endpoint.trim_end_matches('/').to_string())
        }
        _ => Err(InitError::UnknownEndpoint(endpoint.to_string())),
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl OvhClient {
    pub fn new(config: OvhConfig) -> Result<Self, OvhClientError> {
        Self::build(config).map_err(|e| {
            error!("Error creating OVH client: {e}");
            OvhClientError::ClientInit(e)
        })
    }

    fn build(config: OvhConfig) -> Result<Self, InitError> {
        if config.application_key.is_empty() {
            return Err(InitError::MissingCredential("application key"));
        }
        if config.application_secret.is_empty() {
            return Err(InitError::MissingCredential("application secret"));
        }
        if config.consumer_key.is_empty() {
            return Err(InitError::MissingCredential("consumer key"));
        }

        let api_root = resolve_endpoint(config.endpoint.as_deref())?;

        let mut application = HeaderValue::from_str(&config.application_key)?;
        application.set_sensitive(true);
        let mut consumer = HeaderValue::from_str(&config.consumer_key)?;
        consumer.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("X-Ovh-Application", application);
        headers.insert("X-Ovh-Consumer", consumer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            config,
            api_root,
            client,
            time_delta: Mutex::new(None),
        })
    }

    pub fn zone(&self) -> &str {
        &self.config.zone
    }

    /// Record collection URL, or one record's URL. The zone is a single
    /// percent-encoded path segment.
    fn record_url(&self, id: Option<u64>) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_root)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments
                .pop_if_empty()
                .extend(["domain", "zone", self.config.zone.as_str(), "record"]);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    /// Server time adjusted by the delta measured on the first call.
    async fn timestamp(&self) -> Result<i64, ApiError> {
        let mut delta = self.time_delta.lock().await;
        if let Some(delta) = *delta {
            return Ok(unix_now() + delta);
        }

        let server_time: i64 = self
            .client
            .get(format!("{}/auth/time", self.api_root))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let local_time = unix_now();
        debug!("OVH clock delta: {}s", server_time - local_time);
        *delta = Some(server_time - local_time);
        Ok(server_time)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        let timestamp = self.timestamp().await?;
        let sig = signing::signature(
            &self.config.application_secret,
            &self.config.consumer_key,
            method.as_str(),
            url.as_str(),
            body.as_deref().unwrap_or_default(),
            timestamp,
        );

        let mut request = self
            .client
            .request(method, url)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", sig);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error: OvhErrorBody = response.json().await.unwrap_or(OvhErrorBody {
            class: None,
            message: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        });
        Err(ApiError::Api {
            status,
            class: error.class,
            message: error.message,
        })
    }

    async fn list_ids(
        &self,
        sub_domain: &str,
        field_type: Option<DnsFieldType>,
    ) -> Result<Vec<u64>, ApiError> {
        let mut url = self.record_url(None)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(field_type) = field_type {
                query.append_pair("fieldType", field_type.as_str());
            }
            query.append_pair("subDomain", sub_domain);
        }
        Ok(self.send(Method::GET, url, None).await?.json().await?)
    }

    async fn fetch(&self, id: u64) -> Result<DnsRecord, ApiError> {
        let url = self.record_url(Some(id))?;
        Ok(self.send(Method::GET, url, None).await?.json().await?)
    }

    async fn write(
        &self,
        method: Method,
        id: Option<u64>,
        req: &RecordRequest<'_>,
    ) -> Result<Response, ApiError> {
        let url = self.record_url(id)?;
        let body = serde_json::to_string(req)?;
        self.send(method, url, Some(body)).await
    }

    async fn create(&self, req: &RecordRequest<'_>) -> Result<DnsRecord, ApiError> {
        Ok(self.write(Method::POST, None, req).await?.json().await?)
    }

    /// Ids of the records matching `sub_domain`, restricted to `field_type`
    /// when one is given.
    pub async fn find_record_ids(
        &self,
        sub_domain: &str,
        field_type: Option<DnsFieldType>,
    ) -> Result<Vec<u64>, OvhClientError> {
        self.list_ids(sub_domain, field_type).await.map_err(|e| {
            error!("Error getting record ID: {e}");
            OvhClientError::Lookup(e)
        })
    }

    /// `Ok(None)` when the API answers 404 for this id.
    pub async fn get_record_by_id(&self, id: u64) -> Result<Option<DnsRecord>, OvhClientError> {
        match self.fetch(id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                warn!("Record {id} not found");
                Ok(None)
            }
            Err(e) => {
                error!("Error getting record: {e}");
                Err(OvhClientError::Lookup(e))
            }
        }
    }

    /// First record matching `sub_domain` and `field_type`.
    pub async fn find_record(
        &self,
        sub_domain: &str,
        field_type: Option<DnsFieldType>,
    ) -> Result<Option<DnsRecord>, OvhClientError> {
        let ids = self.find_record_ids(sub_domain, field_type).await?;
        match ids.first() {
            Some(id) => self.get_record_by_id(*id).await,
            None => Ok(None),
        }
    }

    pub async fn create_record(
        &self,
        sub_domain: &str,
        target: &str,
        field_type: DnsFieldType,
        ttl: u32,
    ) -> Result<DnsRecord, OvhClientError> {
        let req = RecordRequest {
            field_type,
            sub_domain,
            target,
            ttl,
        };
        self.create(&req).await.map_err(|e| {
            error!("Error creating record: {e}");
            OvhClientError::Create(e)
        })
    }

    /// Updates record `id` and returns it as re-read after the write, since
    /// the update response does not carry the record.
    pub async fn update_record(
        &self,
        sub_domain: &str,
        id: u64,
        target: &str,
        field_type: DnsFieldType,
        ttl: u32,
    ) -> Result<DnsRecord, OvhClientError> {
        let req = RecordRequest {
            field_type,
            sub_domain,
            target,
            ttl,
        };
        self.write(Method::PUT, Some(id), &req).await.map_err(|e| {
            error!("Error updating record: {e}");
            OvhClientError::Update(e)
        })?;

        self.get_record_by_id(id)
            .await?
            .ok_or(OvhClientError::UpdateVanished(id))
    }

    /// Deletes the first matching record. Nothing to delete is not an error.
    pub async fn delete_record(
        &self,
        sub_domain: &str,
        field_type: DnsFieldType,
    ) -> Result<(), OvhClientError> {
        let Some(record) = self.find_record(sub_domain, Some(field_type)).await? else {
            warn!("No record found, nothing to delete");
            return Ok(());
        };

        debug!("Deleting record {record:?}");
        let url = self.record_url(Some(record.id)).map_err(OvhClientError::Delete)?;
        self.send(Method::DELETE, url, None).await.map_err(|e| {
            error!("Error deleting record: {e}");
            OvhClientError::Delete(e)
        })?;
        Ok(())
    }

    /// Creates the record when absent, otherwise updates the one found.
    /// The lookup is repeated on every call.
    pub async fn upsert_record(
        &self,
        sub_domain: &str,
        target: &str,
        field_type: DnsFieldType,
        ttl: u32,
    ) -> Result<DnsRecord, OvhClientError> {
        match self.find_record(sub_domain, Some(field_type)).await? {
            None => {
                debug!("No record found, creating it...");
                self.create_record(sub_domain, target, field_type, ttl).await
            }
            Some(record) => {
                debug!("Record found, updating it... {record:?}");
                self.update_record(sub_domain, record.id, target, field_type, ttl)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(endpoint: Option<&str>) -> OvhConfig {
        OvhConfig {
            application_key: "appKey".to_string(),
            application_secret: "appSecret".to_string(),
            consumer_key: "consumerKey".to_string(),
            zone: "foo.bar".to_string(),
            endpoint: endpoint.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_default_endpoint() {
        assert_eq!(resolve_endpoint(None).unwrap(), "https://eu.api.ovh.com/1.0");
        assert_eq!(resolve_endpoint(Some("")).unwrap(), "https://eu.api.ovh.com/1.0");
        assert_eq!(resolve_endpoint(Some("  ")).unwrap(), "https://eu.api.ovh.com/1.0");
    }

    #[test]
    fn test_resolve_endpoint_alias_and_url() {
        assert_eq!(resolve_endpoint(Some("ovh-ca")).unwrap(), "https://ca.api.ovh.com/1.0");
        assert_eq!(
            resolve_endpoint(Some("ovh-us")).unwrap(),
            "https://api.us.ovhcloud.com/1.0"
        );
        assert_eq!(
            resolve_endpoint(Some("http://127.0.0.1:8080/")).unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_resolve_unknown_endpoint() {
        assert_matches!(
            resolve_endpoint(Some("ovh-mars")),
            Err(InitError::UnknownEndpoint(e)) if e == "ovh-mars"
        );
        assert_matches!(
            resolve_endpoint(Some("ftp://eu.api.ovh.com")),
            Err(InitError::UnknownEndpoint(_))
        );
    }

    #[test]
    fn test_new_rejects_bad_credentials() {
        let mut cfg = config(None);
        cfg.application_secret = String::new();
        assert_matches!(
            OvhClient::new(cfg).err(),
            Some(OvhClientError::ClientInit(InitError::MissingCredential(
                "application secret"
            )))
        );

        let mut cfg = config(None);
        cfg.consumer_key = "bad\nkey".to_string();
        assert_matches!(
            OvhClient::new(cfg).err(),
            Some(OvhClientError::ClientInit(InitError::InvalidHeader(_)))
        );
    }

    #[test]
    fn test_new_rejects_unknown_endpoint() {
        assert_matches!(
            OvhClient::new(config(Some("nowhere"))).err(),
            Some(OvhClientError::ClientInit(InitError::UnknownEndpoint(_)))
        );
    }

    #[test]
    fn test_record_url() {
        let client = OvhClient::new(config(None)).unwrap();
        assert_eq!(client.zone(), "foo.bar");
        assert_eq!(
            client.record_url(None).unwrap().as_str(),
            "https://eu.api.ovh.com/1.0/domain/zone/foo.bar/record"
        );
        assert_eq!(
            client.record_url(Some(5115496087)).unwrap().as_str(),
            "https://eu.api.ovh.com/1.0/domain/zone/foo.bar/record/5115496087"
        );
    }

    #[test]
    fn test_record_url_under_root_without_path() {
        let client = OvhClient::new(config(Some("http://127.0.0.1:8080/"))).unwrap();
        assert_eq!(
            client.record_url(Some(1)).unwrap().as_str(),
            "http://127.0.0.1:8080/domain/zone/foo.bar/record/1"
        );
    }

    #[test]
    fn test_record_url_encodes_zone() {
        let mut cfg = config(None);
        cfg.zone = "foo/bar?x#y".to_string();
        let client = OvhClient::new(cfg).unwrap();
        let url = client.record_url(None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://eu.api.ovh.com/1.0/domain/zone/foo%2Fbar%3Fx%23y/record"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let out = format!("{:?}", config(None));
        assert!(!out.contains("appSecret"));
        assert!(!out.contains("consumerKey"));
        assert!(out.contains("foo.bar"));
    }
}
