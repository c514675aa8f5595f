use crate::dns::record::{DnsFieldType, DnsRecord};
use crate::error::Error;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DNSProvider: Send + Sync {
    fn zone(&self) -> &str;
    async fn upsert_record(
        &self,
        sub_domain: &str,
        target: &str,
        field_type: DnsFieldType,
        ttl: u32,
    ) -> Result<DnsRecord, Error>;
    async fn delete_record(&self, sub_domain: &str, field_type: DnsFieldType) -> Result<(), Error>;
}
