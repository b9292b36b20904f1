//! Host lifecycle seam
//!
//! The webhook core never reads a host's current state; every action is
//! a blind "set desired state" command issued through [`HostLifecycle`].
//! The concrete implementation talks to the cluster; tests inject fakes.

pub mod kube;
mod userdata;

pub use kube::KubeHostClient;

use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Desired provisioning state for a host.
///
/// Image, checksum and timeout come from deployment configuration; only
/// the SSH credential material is caller-supplied. A `None` spec in
/// [`HostLifecycle::set_desired_state`] means "tear down" and carries
/// none of these fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionSpec {
    /// URL of the boot image
    pub image: String,
    /// URL of the image checksum
    pub checksum: String,
    /// Checksum algorithm, e.g. "sha256"
    pub checksum_algorithm: String,
    /// SSH public key granted login on the provisioned host
    pub ssh_public_key: Option<String>,
    /// Upper bound on the mutation call
    pub timeout: Duration,
}

/// The resource lifecycle collaborator.
///
/// Returns whether the mutation was *accepted* — not whether hardware
/// boot completed. Post-acceptance monitoring is the collaborator's own
/// concern and outside this service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostLifecycle: Send + Sync {
    /// Set the desired state of the named host. `Some(spec)` provisions,
    /// `None` tears down.
    async fn set_desired_state(&self, name: &str, spec: Option<ProvisionSpec>) -> Result<bool>;
}
