use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TTL: u32 = 600;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsFieldType {
    A,
    AAAA,
    CAA,
    #[default]
    CNAME,
    DKIM,
    DMARC,
    DNAME,
    LOC,
    MX,
    NAPTR,
    NS,
    PTR,
    SPF,
    SRV,
    SSHFP,
    TLSA,
    TXT,
}

impl DnsFieldType {
    pub const ALL: [DnsFieldType; 17] = [
        DnsFieldType::A,
        DnsFieldType::AAAA,
        DnsFieldType::CAA,
        DnsFieldType::CNAME,
        DnsFieldType::DKIM,
        DnsFieldType::DMARC,
        DnsFieldType::DNAME,
        DnsFieldType::LOC,
        DnsFieldType::MX,
        DnsFieldType::NAPTR,
        DnsFieldType::NS,
        DnsFieldType::PTR,
        DnsFieldType::SPF,
        DnsFieldType::SRV,
        DnsFieldType::SSHFP,
        DnsFieldType::TLSA,
        DnsFieldType::TXT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DnsFieldType::A => "A",
            DnsFieldType::AAAA => "AAAA",
            DnsFieldType::CAA => "CAA",
            DnsFieldType::CNAME => "CNAME",
            DnsFieldType::DKIM => "DKIM",
            DnsFieldType::DMARC => "DMARC",
            DnsFieldType::DNAME => "DNAME",
            DnsFieldType::LOC => "LOC",
            DnsFieldType::MX => "MX",
            DnsFieldType::NAPTR => "NAPTR",
            DnsFieldType::NS => "NS",
            DnsFieldType::PTR => "PTR",
            DnsFieldType::SPF => "SPF",
            DnsFieldType::SRV => "SRV",
            DnsFieldType::SSHFP => "SSHFP",
            DnsFieldType::TLSA => "TLSA",
            DnsFieldType::TXT => "TXT",
        }
    }
}

impl fmt::Display for DnsFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown DNS record type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for DnsFieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DnsFieldType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// A record as the zone API reports it. Attributes the API leaves out stay
/// out when the record is serialized again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub id: u64,
    pub field_type: DnsFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_type() {
        assert_eq!("CNAME".parse::<DnsFieldType>(), Ok(DnsFieldType::CNAME));
        assert_eq!("aaaa".parse::<DnsFieldType>(), Ok(DnsFieldType::AAAA));
        assert_eq!(" txt ".parse::<DnsFieldType>(), Ok(DnsFieldType::TXT));
        assert!("CNAM".parse::<DnsFieldType>().is_err());
        assert!("".parse::<DnsFieldType>().is_err());
    }

    #[test]
    fn test_default_field_type_is_cname() {
        assert_eq!(DnsFieldType::default(), DnsFieldType::CNAME);
        assert_eq!(DnsFieldType::default().to_string(), "CNAME");
    }

    #[test]
    fn test_record_from_api_json() {
        let record: DnsRecord = serde_json::from_value(json!({
            "id": 5115496087u64,
            "fieldType": "CNAME",
            "subDomain": "www",
            "target": "foo.baz.",
            "ttl": 600,
            "zone": "foo.bar"
        }))
        .unwrap();
        assert_eq!(record.id, 5115496087);
        assert_eq!(record.field_type, DnsFieldType::CNAME);
        assert_eq!(record.sub_domain.as_deref(), Some("www"));
        assert_eq!(record.ttl, Some(600));
        assert_eq!(record.zone.as_deref(), Some("foo.bar"));
    }

    #[test]
    fn test_record_keeps_absent_fields_absent() {
        let raw = json!({
            "id": 42,
            "fieldType": "A",
            "subDomain": null,
            "target": "1.2.3.4"
        });
        let record: DnsRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.sub_domain, None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({ "id": 42, "fieldType": "A", "target": "1.2.3.4" })
        );
    }
}
