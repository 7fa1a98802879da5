//! Cart data types and the validation/normalization rules applied to them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::format::parse_float_prefix;

/// Storage key holding the persisted cart.
pub const CART_KEY: &str = "cart";

/// One distinct product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Normalize one persisted entry. Entries without a usable name or price
    /// are dropped; a missing image falls back to `placeholder_image` and a
    /// missing or non-positive quantity becomes 1.
    pub(crate) fn from_stored(value: &Value, placeholder_image: &str) -> Option<Self> {
        let obj = value.as_object()?;

        let name = obj.get("name")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }

        let price = match obj.get("price")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => parse_float_prefix(s)?,
            _ => return None,
        };
        if !price.is_finite() || price < 0.0 {
            return None;
        }

        let quantity = match obj.get("quantity") {
            Some(Value::Number(n)) => n.as_f64().map(|q| q.trunc()),
            Some(Value::String(s)) => parse_float_prefix(s).map(|q| q.trunc()),
            _ => None,
        }
        .filter(|q| q.is_finite() && *q >= 1.0)
        .map(|q| q.min(f64::from(u32::MAX)) as u32)
        .unwrap_or(1);

        let image = obj
            .get("image")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(placeholder_image)
            .to_string();

        Some(Self {
            name: name.to_string(),
            price,
            image,
            quantity,
        })
    }
}

/// Raw "add to cart" input, as collected from a product card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCandidate {
    pub name: String,
    pub price: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    #[error("product name is required")]
    EmptyName,
    #[error("invalid product price: {0:?}")]
    InvalidPrice(String),
}

/// Check a candidate and return its trimmed name and parsed price.
pub(crate) fn validate_candidate(candidate: &ProductCandidate) -> Result<(String, f64), CartError> {
    let name = candidate.name.trim();
    if name.is_empty() {
        return Err(CartError::EmptyName);
    }

    let price = parse_float_prefix(&candidate.price)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| CartError::InvalidPrice(candidate.price.clone()))?;

    Ok((name.to_string(), price))
}

/// Parse a persisted cart document. Anything that is not a JSON array reads as
/// an empty cart; entries are normalized and duplicate names are merged.
pub(crate) fn parse_lines(raw: &str, placeholder_image: &str) -> Vec<CartLine> {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            tracing::warn!("persisted cart is not an array; treating as empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "persisted cart is not valid JSON; treating as empty");
            return Vec::new();
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let Some(line) = CartLine::from_stored(entry, placeholder_image) else {
            tracing::warn!(%entry, "dropping invalid cart entry");
            continue;
        };
        match lines.iter_mut().find(|l| l.name == line.name) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => lines.push(line),
        }
    }
    lines
}

/// Sum of quantities across all lines.
pub fn total_item_count(lines: &[CartLine]) -> u32 {
    lines
        .iter()
        .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
}

/// Sum of `price * quantity` across all lines.
pub fn subtotal(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::line_total).sum()
}
