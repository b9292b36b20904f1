//! Cloud-config user data for provisioned hosts
//!
//! Provisioned images consume a cloud-config document from the host's
//! user-data secret. The document defines a cluster admin account and a
//! locked external account that receives the caller's SSH key.

use crate::utils::error::Result;
use serde::Serialize;

/// Login name offered to end users on provisioned hosts
pub const EXTERNAL_USER: &str = "prognose";

const ADMIN_USER: &str = "restart.admin";
const SUDO_ALL: &str = "ALL=(ALL) NOPASSWD:ALL";

#[derive(Debug, Serialize)]
struct CloudConfig {
    ssh_pwauth: bool,
    groups: Vec<&'static str>,
    users: Vec<CloudConfigUser>,
}

#[derive(Debug, Serialize)]
struct CloudConfigUser {
    name: &'static str,
    groups: &'static str,
    lock_passwd: bool,
    sudo: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssh_authorized_keys: Option<Vec<String>>,
}

/// Name of the user-data secret belonging to a host
pub fn secret_name(host_name: &str) -> String {
    format!("{}-userdata", host_name)
}

/// Render the cloud-config document with the given SSH key injected
/// into the external user
pub fn render_cloud_config(ssh_key: &str) -> Result<String> {
    let config = CloudConfig {
        ssh_pwauth: true,
        groups: vec!["admingroup", "cloud-users"],
        users: vec![
            CloudConfigUser {
                name: ADMIN_USER,
                groups: "admingroup",
                lock_passwd: true,
                sudo: SUDO_ALL,
                ssh_authorized_keys: None,
            },
            CloudConfigUser {
                name: EXTERNAL_USER,
                groups: "cloud-users",
                lock_passwd: true,
                sudo: SUDO_ALL,
                ssh_authorized_keys: Some(vec![ssh_key.to_string()]),
            },
        ],
    };

    Ok(format!("#cloud-config\n{}", serde_yaml::to_string(&config)?))
}
