//! Cluster coordinates of the bare-metal host custom resource

use super::env_or;
use serde::{Deserialize, Serialize};

/// Location of the BareMetalHost custom resource in the cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Namespace holding the host resources and their user-data secrets
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// API group of the host custom resource
    #[serde(default = "default_api_group")]
    pub api_group: String,
    /// API version of the host custom resource
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Kind of the host custom resource
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Plural resource name used in API paths
    #[serde(default = "default_plural")]
    pub plural: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            api_group: default_api_group(),
            api_version: default_api_version(),
            kind: default_kind(),
            plural: default_plural(),
        }
    }
}

impl ClusterConfig {
    /// Load cluster configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            namespace: env_or("K8S_NAMESPACE", &default_namespace()),
            api_group: env_or("BMH_API_GROUP", &default_api_group()),
            api_version: env_or("BMH_API_VERSION", &default_api_version()),
            kind: env_or("BMH_KIND", &default_kind()),
            plural: env_or("BMH_PLURAL", &default_plural()),
        }
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_api_group() -> String {
    "metal3.io".to_string()
}

fn default_api_version() -> String {
    "v1alpha1".to_string()
}

fn default_kind() -> String {
    "BareMetalHost".to_string()
}

fn default_plural() -> String {
    "baremetalhosts".to_string()
}
