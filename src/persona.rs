use crate::error::{CampaignError, Result};
use crate::schema::{Behavioral, CustomerRecord, Demographic, LifeStage, Persona, Psychographic};
use log::warn;
use serde_json::{Map, Value};

/// Tenure assumed when a loosely typed record omits `relationship_tenure`.
const DEFAULT_RELATIONSHIP_TENURE: i64 = 1;

/// Projects a loosely typed customer record (e.g. a row read back from an export)
/// into a persona, coercing each field. Any missing or mis-shaped field fails the
/// whole projection.
pub fn format_persona(record: &Value) -> Result<Persona> {
    let fields = record.as_object().ok_or_else(|| CampaignError::Formatting {
        field: "<record>".to_string(),
        reason: "must be a JSON object".to_string(),
        record: record.to_string(),
    })?;
    let coerce = Coercer { fields, record };

    let age = coerce.integer("age")?;
    let life_stage = LifeStage::from_age(age.clamp(0, u32::MAX as i64) as u32);

    let persona = Persona {
        demographic: Demographic {
            age,
            gender: coerce.text("gender")?,
            location: coerce.text("location")?,
            income: coerce.float("income")?,
            occupation: coerce.text("occupation")?,
            life_stage,
        },
        behavioral: Behavioral {
            transaction_frequency: coerce.integer("transaction_frequency")?,
            average_transaction: coerce.float("average_transaction")?,
            digital_engagement: coerce.text("digital_engagement")?,
            customer_segment: coerce.text("customer_segment")?,
            product_holdings: coerce.list("product_holdings")?.len(),
            relationship_tenure: match fields.get("relationship_tenure") {
                None => DEFAULT_RELATIONSHIP_TENURE,
                Some(_) => coerce.integer("relationship_tenure")?,
            },
        },
        psychographic: Psychographic {
            interests: coerce.list("primary_interests")?,
            preferred_channels: coerce.list("preferred_channels")?,
        },
    };

    Ok(persona)
}

impl Persona {
    pub fn from_customer(customer: &CustomerRecord) -> Result<Self> {
        format_persona(&serde_json::to_value(customer)?)
    }
}

struct Coercer<'a> {
    fields: &'a Map<String, Value>,
    record: &'a Value,
}

impl<'a> Coercer<'a> {
    fn fail(&self, field: &str, reason: impl Into<String>) -> CampaignError {
        let reason = reason.into();
        warn!("Persona formatting failed on '{}': {}", field, reason);
        CampaignError::Formatting {
            field: field.to_string(),
            reason,
            record: self.record.to_string(),
        }
    }

    fn get(&self, field: &str) -> Result<&'a Value> {
        self.fields
            .get(field)
            .ok_or_else(|| self.fail(field, "is missing"))
    }

    /// Integers, floats (truncated toward zero) and integer strings.
    fn integer(&self, field: &str) -> Result<i64> {
        match self.get(field)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(|| self.fail(field, format!("is not a valid integer: {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.fail(field, format!("cannot be parsed as an integer: '{}'", s))),
            other => Err(self.fail(field, format!("expected an integer, found {}", other))),
        }
    }

    fn float(&self, field: &str) -> Result<f64> {
        let value = match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            other => return Err(self.fail(field, format!("expected a number, found {}", other))),
        };
        value
            .filter(|f: &f64| f.is_finite())
            .ok_or_else(|| self.fail(field, "cannot be parsed as a finite number"))
    }

    /// Strings as-is; numbers and booleans are rendered as text.
    fn text(&self, field: &str) -> Result<String> {
        match self.get(field)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(self.fail(field, format!("expected text, found {}", other))),
        }
    }

    fn list(&self, field: &str) -> Result<Vec<String>> {
        let items = self
            .get(field)?
            .as_array()
            .ok_or_else(|| self.fail(field, "expected a list"))?;

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.fail(field, format!("contains a non-text entry: {}", other))),
            })
            .collect()
    }
}
