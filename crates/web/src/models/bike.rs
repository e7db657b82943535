//! Bike inventory records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use bikeshop_core::{BikeId, Price, PriceError};

use super::record::Record;
use super::validation::{ValidationError, required};

/// Minimum length of a bike's model name, in characters.
pub const MODEL_MIN_CHARS: usize = 2;

/// A bike in the shop's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bike {
    pub id: BikeId,
    pub model: String,
    pub brand: String,
    pub price: Price,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated bike fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeDraft {
    pub model: String,
    pub brand: String,
    pub price: Price,
    pub quantity: i32,
}

/// Bike form body. Missing fields deserialize as empty strings so that
/// validation, not the extractor, reports them.
#[derive(Debug, Default, Deserialize)]
pub struct BikeForm {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
}

fn parse_quantity(raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let quantity: i32 = raw
        .parse()
        .map_err(|_| ValidationError::new("quantity", "Quantity must be a whole number"))?;
    if quantity < 0 {
        return Err(ValidationError::new("quantity", "Quantity cannot be negative"));
    }
    Ok(quantity)
}

impl Record for Bike {
    type Id = BikeId;
    type Draft = BikeDraft;
    type Form = BikeForm;

    const SINGULAR: &'static str = "Bike";
    const PLURAL: &'static str = "bikes";

    fn validate(form: BikeForm) -> Result<BikeDraft, ValidationError> {
        let model = required("model", &form.model, "Model name is required")?;
        if model.chars().count() < MODEL_MIN_CHARS {
            return Err(ValidationError::new(
                "model",
                format!("Model name must be at least {MODEL_MIN_CHARS} characters"),
            ));
        }
        let brand = required("brand", &form.brand, "Brand name is required")?;
        let price = required("price", &form.price, "Price is required")?;
        let price = price.parse::<Price>().map_err(|e| match e {
            PriceError::Negative => ValidationError::new("price", "Price cannot be negative"),
            PriceError::NotANumber => ValidationError::new("price", "Price must be a number"),
        })?;
        let quantity = parse_quantity(&form.quantity)?;

        Ok(BikeDraft {
            model,
            brand,
            price,
            quantity,
        })
    }

    fn id(&self) -> BikeId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: BikeId, draft: BikeDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            model: draft.model,
            brand: draft.brand,
            price: draft.price,
            quantity: draft.quantity,
            created_at,
            updated_at: created_at,
        }
    }

    fn apply(&mut self, draft: BikeDraft, now: DateTime<Utc>) {
        self.model = draft.model;
        self.brand = draft.brand;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.updated_at = now;
    }
}
