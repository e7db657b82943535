//! Prospective buyer records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use bikeshop_core::{BuyerId, Email};

use super::record::Record;
use super::validation::{ValidationError, required};

/// Someone interested in buying a bike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buyer {
    pub id: BuyerId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub interested_bike: String,
    pub created_at: DateTime<Utc>,
}

/// Validated buyer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerDraft {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub interested_bike: String,
}

/// Buyer form body.
#[derive(Debug, Default, Deserialize)]
pub struct BuyerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, rename = "interestedBike")]
    pub interested_bike: String,
}

impl Record for Buyer {
    type Id = BuyerId;
    type Draft = BuyerDraft;
    type Form = BuyerForm;

    const SINGULAR: &'static str = "Buyer";
    const PLURAL: &'static str = "buyers";

    fn validate(form: BuyerForm) -> Result<BuyerDraft, ValidationError> {
        let name = required("name", &form.name, "Name is required")?;
        let email = required("email", &form.email, "Email is required")?;
        let email = Email::parse(&email)
            .map_err(|_| ValidationError::new("email", "Please enter a valid email address"))?;
        let phone = required("phone", &form.phone, "Phone is required")?;
        let interested_bike = required(
            "interestedBike",
            &form.interested_bike,
            "Interested bike is required",
        )?;

        Ok(BuyerDraft {
            name,
            email,
            phone,
            interested_bike,
        })
    }

    fn id(&self) -> BuyerId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: BuyerId, draft: BuyerDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            interested_bike: draft.interested_bike,
            created_at,
        }
    }

    fn apply(&mut self, draft: BuyerDraft, _now: DateTime<Utc>) {
        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.interested_bike = draft.interested_bike;
    }
}
