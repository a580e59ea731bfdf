use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::model::{Service, ServiceStatus};

fn check_name(name: &str) -> Result<(), ApiError> {
    if name.len() < 3 || name.len() > 100 {
        return Err(ApiError::Validation(
            "Name must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ApiError> {
    if description.len() > 500 {
        return Err(ApiError::Validation(
            "Description cannot exceed 500 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub config: Option<serde_json::Value>,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_name(&self.name)?;
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        if let Some(config) = &self.config {
            if !config.is_object() {
                return Err(ApiError::Validation("Config must be an object".into()));
            }
        }
        Ok(())
    }
}

/// Partial service update; only supplied fields are written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub config: Option<serde_json::Value>,
    pub status: Option<ServiceStatus>,
}

impl UpdateServiceRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.config.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("No fields to update".into()));
        }
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(description) = &self.description {
            check_description(description)?;
        }
        if let Some(config) = &self.config {
            if !config.is_object() {
                return Err(ApiError::Validation("Config must be an object".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub config: serde_json::Value,
    pub status: ServiceStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Service> for ServiceResponse {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id,
            owner_id: s.owner_id,
            name: s.name.clone(),
            description: s.description.clone(),
            category: s.category.clone(),
            tags: s.tags.clone(),
            config: s.config.clone(),
            status: s.status,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_length() {
        let req = CreateServiceRequest {
            name: "ab".into(),
            description: None,
            category: None,
            tags: vec![],
            config: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_long_description() {
        let req = CreateServiceRequest {
            name: "image-upscaler".into(),
            description: Some("x".repeat(501)),
            category: None,
            tags: vec![],
            config: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_rejects_empty_body() {
        assert!(UpdateServiceRequest::default().validate().is_err());
    }

    #[test]
    fn update_accepts_status_change() {
        let req = UpdateServiceRequest {
            status: Some(ServiceStatus::Active),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ServiceStatus::Suspended).unwrap();
        assert_eq!(json, r#""suspended""#);
    }
}
