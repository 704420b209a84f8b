//! Persisted office record.
//!
//! The serde shape of [`Model`] is the document shape of the office
//! collection: `{_id, address, registryPhoneNumber, photoId, isActive}`.

use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

pub const ADDRESS_MAX_LEN: usize = 100;

pub const ADDRESS_REQUIRED: &str = "The Address is a required field";
pub const ADDRESS_TOO_LONG: &str = "The address cannot exceed 100 characters";
pub const ADDRESS_INVALID: &str =
    "Invalid address format. Alphanumeric characters, spaces, commas, hyphens, and periods are allowed.";
pub const PHONE_REQUIRED: &str = "Registry phone number is required";
pub const PHONE_INVALID: &str = "Invalid phone number format. follow this formats: \
    '+375 25-710-33-51', '+1 555-123-4567', '555-123-4567', '(555) 123-4567', '+44 20 1234 5678'";

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9'.\-\s,]+$").expect("address pattern compiles")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(\d{1,3}\s?)?(\(?\d{1,4}\)?[\s-]?)?(\d{1,4}[\s-]?)?(\d{1,4}[\s-]?)?(\d{1,9})$")
        .expect("phone pattern compiles")
});

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub address: String,
    pub registry_phone_number: String,
    pub photo_id: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Active model with every column marked for writing, used for both
/// insert and full replace.
pub fn to_active_model(m: Model) -> ActiveModel {
    ActiveModel {
        id: Set(m.id),
        address: Set(m.address),
        registry_phone_number: Set(m.registry_phone_number),
        photo_id: Set(m.photo_id),
        is_active: Set(m.is_active),
    }
}

/// Every address rule the value breaks, in rule order.
///
/// An empty address only reports that it is required.
pub fn address_violations(address: &str) -> Vec<&'static str> {
    if address.trim().is_empty() {
        return vec![ADDRESS_REQUIRED];
    }
    let mut out = Vec::new();
    if address.chars().count() > ADDRESS_MAX_LEN {
        out.push(ADDRESS_TOO_LONG);
    }
    if !ADDRESS_RE.is_match(address) {
        out.push(ADDRESS_INVALID);
    }
    out
}

/// Every phone rule the value breaks, in rule order.
pub fn phone_violations(phone: &str) -> Vec<&'static str> {
    if phone.trim().is_empty() {
        return vec![PHONE_REQUIRED];
    }
    if PHONE_RE.is_match(phone) {
        Vec::new()
    } else {
        vec![PHONE_INVALID]
    }
}

pub fn validate_address(address: &str) -> Result<(), errors::ModelError> {
    match address_violations(address).first() {
        Some(msg) => Err(errors::ModelError::Validation((*msg).into())),
        None => Ok(()),
    }
}

pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    match phone_violations(phone).first() {
        Some(msg) => Err(errors::ModelError::Validation((*msg).into())),
        None => Ok(()),
    }
}

/// Guard applied by stores before a document is written.
pub fn validate(model: &Model) -> Result<(), errors::ModelError> {
    validate_address(&model.address)?;
    validate_phone(&model.registry_phone_number)
}
