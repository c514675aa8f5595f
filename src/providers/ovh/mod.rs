//! OVH zone-record provider implementation

pub mod client;
pub mod error;
pub mod signing;
pub mod types;


pub use client::{OvhClient, OvhConfig};
pub use error::OvhClientError;

// --- DNSProvider trait implementation for OvhClient ---
use crate::dns::{DNSProvider, DnsFieldType, DnsRecord};
use crate::error::Error;
use async_trait::async_trait;

#[async_trait]
impl DNSProvider for OvhClient {
    fn zone(&self) -> &str {
        OvhClient::zone(self)
    }

    async fn upsert_record(
        &self,
        sub_domain: &str,
        target: &str,
        field_type: DnsFieldType,
        ttl: u32,
    ) -> Result<DnsRecord, Error> {
        Ok(OvhClient::upsert_record(self, sub_domain, target, field_type, ttl).await?)
    }

    async fn delete_record(&self, sub_domain: &str, field_type: DnsFieldType) -> Result<(), Error> {
        Ok(OvhClient::delete_record(self, sub_domain, field_type).await?)
    }
}
