//! Service center entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::deletion::DeletionState;
use crate::status::ServiceCenterStatus;
use crate::types::{EntityId, Timestamp};

/// A delivery site owning a set of projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub status: ServiceCenterStatus,
    /// Denormalized list of owned projects. The authoritative link is
    /// `Project::center_id`.
    #[serde(default)]
    pub projects: Vec<EntityId>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub deletion: DeletionState,
}

impl ServiceCenter {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            location: location.into(),
            contact_email: None,
            contact_phone: None,
            status: ServiceCenterStatus::default(),
            projects: Vec::new(),
            created_at: chrono::Utc::now(),
            deletion: DeletionState::Active,
        }
    }
}

/// DTO for creating a new service center.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceCenter {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Defaults to `Operational` if omitted.
    pub status: Option<ServiceCenterStatus>,
}

impl CreateServiceCenter {
    pub fn into_service_center(self) -> ServiceCenter {
        let mut center = ServiceCenter::new(self.name, self.location);
        center.contact_email = self.contact_email;
        center.contact_phone = self.contact_phone;
        center.status = self.status.unwrap_or_default();
        center
    }
}
