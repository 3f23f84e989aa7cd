//! Subscription plans offered to users.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

const MAX_NAME_LEN: usize = 100;

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    Month,
    Year,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Month => "month",
            BillingInterval::Year => "year",
        }
    }

    /// Parses the stored form; unknown values are rejected.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "month" => Ok(BillingInterval::Month),
            "year" => Ok(BillingInterval::Year),
            other => Err(ValidationError::invalid_format(
                "interval",
                format!("unknown interval '{}'", other),
            )),
        }
    }
}

/// A persisted plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit.
    pub price_cents: i64,
    pub currency: String,
    pub interval: BillingInterval,
    pub stripe_price_id: Option<String>,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub interval: BillingInterval,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl PlanCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_price(self.price_cents)?;
        validate_currency(&self.currency)
    }
}

/// Partial plan update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub interval: Option<BillingInterval>,
    #[serde(default)]
    pub stripe_price_id: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl PlanUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price_cents {
            validate_price(price)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        Ok(())
    }

    /// Applies the present fields to `plan` and bumps `updated_at`.
    pub fn apply_to(&self, plan: &mut Plan) {
        if let Some(name) = &self.name {
            plan.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            plan.description = Some(description.clone());
        }
        if let Some(price) = self.price_cents {
            plan.price_cents = price;
        }
        if let Some(currency) = &self.currency {
            plan.currency = currency.to_lowercase();
        }
        if let Some(interval) = self.interval {
            plan.interval = interval;
        }
        if let Some(price_id) = &self.stripe_price_id {
            plan.stripe_price_id = Some(price_id.clone());
        }
        if let Some(features) = &self.features {
            plan.features = features.clone();
        }
        if let Some(is_active) = self.is_active {
            plan.is_active = is_active;
        }
        plan.updated_at = Timestamp::now();
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_active() -> bool {
    true
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::empty_field("name"));
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::out_of_range("name", 1, MAX_NAME_LEN as i64, len as i64));
    }
    Ok(())
}

fn validate_price(price_cents: i64) -> Result<(), ValidationError> {
    if price_cents < 0 {
        return Err(ValidationError::out_of_range("price_cents", 0, i64::MAX, price_cents));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format(
            "currency",
            "expected a three-letter ISO code",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> PlanCreate {
        PlanCreate {
            name: "Pro".to_string(),
            description: Some("Professional tier".to_string()),
            price_cents: 2999,
            currency: "usd".to_string(),
            interval: BillingInterval::Month,
            stripe_price_id: None,
            features: vec!["priority support".to_string()],
            is_active: true,
        }
    }

    #[test]
    fn valid_create_passes() {
        assert!(create().validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = PlanCreate {
            price_cents: -1,
            ..create()
        };
        assert!(matches!(input.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn blank_name_is_rejected() {
        let input = PlanCreate {
            name: "   ".to_string(),
            ..create()
        };
        assert!(matches!(input.validate(), Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn currency_must_be_iso_code() {
        let input = PlanCreate {
            currency: "dollars".to_string(),
            ..create()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_deserializes_with_defaults() {
        let input: PlanCreate =
            serde_json::from_str(r#"{"name": "Free", "price_cents": 0}"#).unwrap();
        assert_eq!(input.currency, "usd");
        assert_eq!(input.interval, BillingInterval::Month);
        assert!(input.is_active);
        assert!(input.features.is_empty());
    }

    #[test]
    fn interval_parses_stored_form() {
        assert_eq!(BillingInterval::parse("YEAR").unwrap(), BillingInterval::Year);
        assert!(BillingInterval::parse("weekly").is_err());
    }

    #[test]
    fn update_validates_present_fields_only() {
        assert!(PlanUpdate::default().validate().is_ok());
        let update = PlanUpdate {
            price_cents: Some(-5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
