//! Kubernetes-backed host lifecycle client
//!
//! Provisioning and deprovisioning are merge patches against the
//! BareMetalHost custom resource; the reconciliation that turns desired
//! state into a booted or wiped machine belongs to the cluster operator,
//! not to this service. API failures are logged and reported as
//! not-accepted rather than propagated.

use super::userdata;
use super::{HostLifecycle, ProvisionSpec};
use crate::config::ClusterConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use kube::Client;
use kube::api::{Api, ApiResource, DynamicObject, ObjectMeta, Patch, PatchParams, PostParams};
use kube::core::GroupVersionKind;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Host lifecycle client backed by the Kubernetes API
pub struct KubeHostClient {
    hosts: Api<DynamicObject>,
    secrets: Api<Secret>,
    cluster: ClusterConfig,
}

impl KubeHostClient {
    /// Create a client using the default cluster configuration
    /// (in-cluster service account or local kubeconfig)
    pub async fn new(cluster: ClusterConfig) -> Result<Self> {
        let client = Client::try_default().await?;
        info!("Connected to Kubernetes API server");
        Ok(Self::with_client(client, cluster))
    }

    /// Create a client from an existing kube client
    pub fn with_client(client: Client, cluster: ClusterConfig) -> Self {
        let gvk = GroupVersionKind::gvk(&cluster.api_group, &cluster.api_version, &cluster.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, &cluster.plural);
        let hosts = Api::namespaced_with(client.clone(), &cluster.namespace, &resource);
        let secrets = Api::namespaced(client, &cluster.namespace);

        Self {
            hosts,
            secrets,
            cluster,
        }
    }

    fn provision_patch(namespace: &str, name: &str, spec: &ProvisionSpec) -> serde_json::Value {
        json!({
            "spec": {
                "image": {
                    "url": spec.image,
                    "checksum": spec.checksum,
                    "checksumType": spec.checksum_algorithm,
                },
                "userData": {
                    "name": userdata::secret_name(name),
                    "namespace": namespace,
                },
            }
        })
    }

    fn deprovision_patch() -> serde_json::Value {
        // Explicit nulls remove the fields under merge-patch semantics
        json!({
            "spec": {
                "image": null,
                "userData": null,
            }
        })
    }

    /// Create or update the user-data secret for a host
    async fn ensure_userdata_secret(&self, host_name: &str, ssh_key: &str) -> Result<bool> {
        let secret_name = userdata::secret_name(host_name);
        let cloud_config = userdata::render_cloud_config(ssh_key)?;

        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(secret_name.clone()),
                namespace: Some(self.cluster.namespace.clone()),
                ..Default::default()
            },
            type_: Some("Opaque".to_string()),
            data: Some(BTreeMap::from([(
                "userData".to_string(),
                ByteString(cloud_config.into_bytes()),
            )])),
            ..Default::default()
        };

        match self.secrets.create(&PostParams::default(), &secret).await {
            Ok(_) => {
                info!(
                    "Created secret '{}' in namespace '{}'",
                    secret_name, self.cluster.namespace
                );
                Ok(true)
            }
            Err(kube::Error::Api(err)) if err.code == 409 => {
                match self
                    .secrets
                    .patch(&secret_name, &PatchParams::default(), &Patch::Merge(&secret))
                    .await
                {
                    Ok(_) => {
                        info!(
                            "Updated existing secret '{}' in namespace '{}'",
                            secret_name, self.cluster.namespace
                        );
                        Ok(true)
                    }
                    Err(e) => {
                        error!("Error updating secret '{}': {}", secret_name, e);
                        Ok(false)
                    }
                }
            }
            Err(e) => {
                error!("Error creating secret '{}': {}", secret_name, e);
                Ok(false)
            }
        }
    }

    /// Apply a merge patch to a host resource. `operation` is only used
    /// in log output.
    async fn apply_patch(&self, name: &str, patch: serde_json::Value, operation: &str) -> bool {
        info!(
            "Attempting to {} host '{}' in namespace '{}'",
            operation, name, self.cluster.namespace
        );

        match self
            .hosts
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
        {
            Ok(patched) => {
                debug!(
                    "Patch response for host '{}': resourceVersion {:?}",
                    name, patched.metadata.resource_version
                );
                info!("Successfully {}ed host '{}'", operation, name);
                true
            }
            Err(kube::Error::Api(err)) => {
                error!(
                    "Error {}ing host '{}': {} (status: {})",
                    operation, name, err.message, err.code
                );
                false
            }
            Err(e) => {
                error!("Unexpected error while {}ing host '{}': {}", operation, name, e);
                false
            }
        }
    }
}

#[async_trait]
impl HostLifecycle for KubeHostClient {
    async fn set_desired_state(&self, name: &str, spec: Option<ProvisionSpec>) -> Result<bool> {
        match spec {
            Some(spec) => {
                let timeout = spec.timeout;
                let provision = async {
                    if let Some(ssh_key) = &spec.ssh_public_key {
                        if !self.ensure_userdata_secret(name, ssh_key).await? {
                            error!(
                                "Failed to create userdata secret for host '{}'. Aborting provision.",
                                name
                            );
                            return Ok(false);
                        }
                    }

                    let patch = Self::provision_patch(&self.cluster.namespace, name, &spec);
                    Ok(self.apply_patch(name, patch, "provision").await)
                };

                match tokio::time::timeout(timeout, provision).await {
                    Ok(result) => result,
                    Err(_) => {
                        error!(
                            "Timed out after {:?} provisioning host '{}'",
                            timeout, name
                        );
                        Ok(false)
                    }
                }
            }
            None => Ok(self
                .apply_patch(name, Self::deprovision_patch(), "deprovision")
                .await),
        }
    }
}
