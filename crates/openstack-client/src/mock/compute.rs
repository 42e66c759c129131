//! Compute operations for MockOpenStackClient

use super::MockOpenStackClient;
use crate::error::OpenStackError;
use crate::models::*;

pub async fn get_instance_addresses(client: &MockOpenStackClient, instance_id: &str) -> Result<InstanceAddresses, OpenStackError> {
    client.record(format!("get_instance_addresses {}", instance_id));

    client
        .servers()
        .get(instance_id)
        .cloned()
        .map(InstanceAddresses::from)
        .ok_or_else(|| OpenStackError::NotFound(format!("Server {} not found", instance_id)))
}
