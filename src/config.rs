use thiserror::Error;

use crate::dns::record::UnknownFieldType;
use crate::dns::{DEFAULT_TTL, DnsFieldType};
use crate::host::ActionHost;
use crate::providers::ovh::OvhConfig;

pub const APPLICATION_KEY: &str = "application-key";
pub const APPLICATION_SECRET: &str = "application-secret";
pub const CONSUMER_KEY: &str = "consumer-key";
pub const ENDPOINT: &str = "endpoint";
pub const ZONE: &str = "zone";
pub const SUBDOMAIN: &str = "subdomain";
pub const PRESENT: &str = "present";
pub const TARGET: &str = "target";
pub const TTL: &str = "ttl";
pub const TYPE: &str = "type";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Input required and not supplied: {0}")]
    Missing(&'static str),

    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {0}. \
         Supported boolean values: true | True | TRUE | false | False | FALSE"
    )]
    InvalidBoolean(&'static str),

    #[error("Invalid ttl input {0:?}: expected a number of seconds")]
    InvalidTtl(String),

    #[error("Invalid type input: {0}")]
    InvalidFieldType(#[from] UnknownFieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredState {
    Present {
        target: String,
        field_type: DnsFieldType,
        ttl: u32,
    },
    Absent,
}

/// Everything the run needs, validated before any client exists.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub ovh: OvhConfig,
    pub sub_domain: String,
    pub desired: DesiredState,
}

fn required(host: &impl ActionHost, name: &'static str) -> Result<String, ConfigError> {
    let value = host.get_input(name);
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value)
}

fn required_secret(host: &impl ActionHost, name: &'static str) -> Result<String, ConfigError> {
    let value = required(host, name)?;
    host.set_secret(&value);
    Ok(value)
}

fn optional(host: &impl ActionHost, name: &str) -> Option<String> {
    Some(host.get_input(name)).filter(|v| !v.is_empty())
}

impl ActionConfig {
    pub fn from_host(host: &impl ActionHost) -> Result<Self, ConfigError> {
        let application_key = required_secret(host, APPLICATION_KEY)?;
        let application_secret = required_secret(host, APPLICATION_SECRET)?;
        let consumer_key = required_secret(host, CONSUMER_KEY)?;
        let endpoint = optional(host, ENDPOINT);

        let zone = required(host, ZONE)?;
        let sub_domain = required(host, SUBDOMAIN)?;

        let desired = if host.get_boolean_input(PRESENT)? {
            let target = required(host, TARGET)?;
            let ttl = match optional(host, TTL) {
                Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::InvalidTtl(raw))?,
                None => DEFAULT_TTL,
            };
            let field_type = match optional(host, TYPE) {
                Some(raw) => raw.parse::<DnsFieldType>()?,
                None => DnsFieldType::default(),
            };
            DesiredState::Present {
                target,
                field_type,
                ttl,
            }
        } else {
            DesiredState::Absent
        };

        Ok(ActionConfig {
            ovh: OvhConfig {
                application_key,
                application_secret,
                consumer_key,
                zone,
                endpoint,
            },
            sub_domain,
            desired,
        })
    }
}
