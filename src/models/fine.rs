//! Fine model with defensive amount parsing

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fine as returned by `/fines/`. `amount` arrives as a string or a number
/// depending on the backend serializer; either way it decodes to a
/// [`Decimal`], with zero substituted for anything unparseable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fine {
    #[serde(default)]
    pub id: i64,
    /// Weak reference to the fined user.
    #[serde(default)]
    pub user: Option<i64>,
    /// Weak reference to the borrow record this fine is tied to, if any.
    #[serde(default)]
    pub borrow_record: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub paid_date: Option<String>,
    /// Denormalized display name, present on some backend serializers.
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Coerce a JSON string or number into a [`Decimal`], treating parse
/// failure (and any other JSON type) as zero. Never errors.
pub fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n.to_string().parse().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

pub(crate) fn deserialize_optional_amount<'de, D>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_amount))
}
