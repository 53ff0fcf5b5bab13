// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission authority

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

/// Authorization state for camera or library access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationStatus {
    /// The user has not been asked yet
    #[default]
    NotDetermined,
    /// Access is blocked by policy and cannot be requested
    Restricted,
    /// The user refused access
    Denied,
    /// Access granted
    Authorized,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        *self == AuthorizationStatus::Authorized
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationStatus::NotDetermined => write!(f, "not determined"),
            AuthorizationStatus::Restricted => write!(f, "restricted"),
            AuthorizationStatus::Denied => write!(f, "denied"),
            AuthorizationStatus::Authorized => write!(f, "authorized"),
        }
    }
}

/// Permission authority service
pub trait PermissionAuthority: Send + Sync {
    /// Current camera authorization
    fn camera_status(&self) -> AuthorizationStatus;

    /// Ask for camera access. Returns whether access is granted afterwards.
    fn request_camera_access(&self) -> bool;
}

/// Permission authority driven by configuration.
///
/// Starts from a configured status. A request while the status is
/// undetermined resolves it to authorized or denied according to
/// `grant_on_request`; later requests just report the settled status.
pub struct ConfiguredPermissions {
    status: Mutex<AuthorizationStatus>,
    grant_on_request: bool,
}

impl ConfiguredPermissions {
    pub fn new(status: AuthorizationStatus, grant_on_request: bool) -> Self {
        Self {
            status: Mutex::new(status),
            grant_on_request,
        }
    }
}

impl PermissionAuthority for ConfiguredPermissions {
    fn camera_status(&self) -> AuthorizationStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn request_camera_access(&self) -> bool {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        if *status == AuthorizationStatus::NotDetermined {
            *status = if self.grant_on_request {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
            info!(status = %*status, "Camera access requested");
        }
        status.is_authorized()
    }
}
