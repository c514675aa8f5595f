pub mod provider;
pub mod record;

pub use provider::DNSProvider;
pub use record::{DEFAULT_TTL, DnsFieldType, DnsRecord};
