use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::office;

pub use crate::blob::PhotoUpload;
pub use models::office::Model as Office;

use crate::errors::{FieldError, ServiceError};

pub const IS_ACTIVE_REQUIRED: &str = "IsActive must not be null";
pub const IS_ACTIVE_INVALID: &str = "Invalid IsActive value. It must be either true or false.";

/// Read projection of an office returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDto {
    pub office_id: Uuid,
    pub address: String,
    pub registry_phone_number: String,
    pub photo_id: Option<String>,
    pub is_active: bool,
}

impl From<&Office> for OfficeDto {
    fn from(o: &Office) -> Self {
        Self {
            office_id: o.id,
            address: o.address.clone(),
            registry_phone_number: o.registry_phone_number.clone(),
            photo_id: o.photo_id.clone(),
            is_active: o.is_active,
        }
    }
}

impl From<Office> for OfficeDto {
    fn from(o: Office) -> Self {
        Self {
            office_id: o.id,
            address: o.address,
            registry_phone_number: o.registry_phone_number,
            photo_id: o.photo_id,
            is_active: o.is_active,
        }
    }
}

/// Body of the picture endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureUrl {
    pub url: String,
}

/// Inbound create/update payload, as received from the transport.
#[derive(Debug, Default)]
pub struct OfficeRequest {
    pub address: String,
    pub registry_phone_number: String,
    pub is_active: Option<bool>,
    pub photo: Option<PhotoUpload>,
}

/// An [`OfficeRequest`] that passed every rule.
#[derive(Debug)]
pub struct ValidOffice {
    pub address: String,
    pub registry_phone_number: String,
    pub is_active: bool,
    pub photo: Option<PhotoUpload>,
}

impl OfficeRequest {
    pub fn new(address: impl Into<String>, registry_phone_number: impl Into<String>, is_active: Option<bool>) -> Self {
        Self { address: address.into(), registry_phone_number: registry_phone_number.into(), is_active, photo: None }
    }

    pub fn with_photo(mut self, photo: PhotoUpload) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Check every field rule and report all violations together.
    ///
    /// On failure the request, photo buffer included, is dropped here.
    pub fn validate(self) -> Result<ValidOffice, ServiceError> {
        let mut errors: Vec<FieldError> = Vec::new();
        errors.extend(office::address_violations(&self.address).into_iter().map(|m| FieldError::new("address", m)));
        errors.extend(
            office::phone_violations(&self.registry_phone_number)
                .into_iter()
                .map(|m| FieldError::new("registryPhoneNumber", m)),
        );
        if self.is_active.is_none() {
            errors.push(FieldError::new("isActive", IS_ACTIVE_REQUIRED));
        }
        match self.is_active {
            Some(is_active) if errors.is_empty() => Ok(ValidOffice {
                address: self.address,
                registry_phone_number: self.registry_phone_number,
                is_active,
                photo: self.photo,
            }),
            _ => Err(ServiceError::Validation(errors)),
        }
    }
}

impl ValidOffice {
    /// New entity with a server-assigned identifier and no photo yet.
    pub fn to_office(&self, id: Uuid) -> Office {
        Office {
            id,
            address: self.address.clone(),
            registry_phone_number: self.registry_phone_number.clone(),
            photo_id: None,
            is_active: self.is_active,
        }
    }

    /// Copy the mutable request fields onto a fetched entity.
    ///
    /// The identifier is never touched; the photo reference is owned by
    /// the blob step and is left as is.
    pub fn merge_into(&self, office: &mut Office) {
        office.address.clone_from(&self.address);
        office.registry_phone_number.clone_from(&self.registry_phone_number);
        office.is_active = self.is_active;
    }
}

/// Parse a transport-level active flag (`true`/`false`, any case).
pub fn parse_is_active(raw: &str) -> Result<bool, ServiceError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ServiceError::Validation(vec![FieldError::new("isActive", IS_ACTIVE_INVALID)])),
    }
}
