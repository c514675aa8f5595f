use serde::{Deserialize, Serialize};

use crate::dns::DnsFieldType;

/// Body of both the create and the update call.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest<'a> {
    pub field_type: DnsFieldType,
    pub sub_domain: &'a str,
    pub target: &'a str,
    pub ttl: u32,
}

#[derive(Deserialize, Debug)]
pub struct OvhErrorBody {
    #[serde(default)]
    pub class: Option<String>,
    pub message: String,
}
