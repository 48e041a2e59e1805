//! Firm domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A prop-trading company accounts can belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub firm_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewFirm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub firm_type: String,
    pub logo: Option<String>,
}

impl NewFirm {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FirmUpdate {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub firm_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::utils::double_option"
    )]
    pub logo: Option<Option<String>>,
}

impl FirmUpdate {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    pub fn apply_to(self, firm: &mut Firm) {
        if let Some(name) = self.name {
            firm.name = name;
        }
        if let Some(firm_type) = self.firm_type {
            firm.firm_type = firm_type;
        }
        if let Some(logo) = self.logo {
            firm.logo = logo;
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Firm name cannot be empty".to_string(),
        )));
    }
    Ok(())
}
