use tracing::{error, info};

use crate::config::{ActionConfig, DesiredState};
use crate::dns::{DNSProvider, DnsFieldType};
use crate::error::Error;
use crate::host::ActionHost;
use crate::providers::ovh::OvhConfig;

pub const RECORD_OUTPUT: &str = "record";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Succeeded,
    Failed,
}

/// Runs the tool once. Any error ends the run: it is reported through the
/// host and nothing is retried.
pub async fn run<H, P, F>(host: &H, connect: F) -> RunState
where
    H: ActionHost,
    P: DNSProvider,
    F: FnOnce(OvhConfig) -> Result<P, Error>,
{
    match dispatch(host, connect).await {
        Ok(()) => RunState::Succeeded,
        Err(e) => {
            error!("{e}");
            host.set_failed(&e.to_string());
            RunState::Failed
        }
    }
}

async fn dispatch<H, P, F>(host: &H, connect: F) -> Result<(), Error>
where
    H: ActionHost,
    P: DNSProvider,
    F: FnOnce(OvhConfig) -> Result<P, Error>,
{
    let config = ActionConfig::from_host(host)?;
    let provider = connect(config.ovh)?;
    let sub_domain = config.sub_domain.as_str();

    match config.desired {
        DesiredState::Present {
            target,
            field_type,
            ttl,
        } => {
            info!(
                "Pointing {field_type} record {sub_domain} in {} at {target}",
                provider.zone()
            );
            let record = provider
                .upsert_record(sub_domain, &target, field_type, ttl)
                .await?;
            host.set_output(RECORD_OUTPUT, &serde_json::to_string(&record)?)?;
        }
        DesiredState::Absent => {
            let field_type = DnsFieldType::default();
            info!(
                "Removing {field_type} record {sub_domain} from {}",
                provider.zone()
            );
            provider.delete_record(sub_domain, field_type).await?;
        }
    }
    Ok(())
}
