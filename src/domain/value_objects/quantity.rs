use serde::{Deserialize, Deserializer, Serialize};

/// Number of units traded. Whole and non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, String> {
        if value >= 0 {
            Ok(Quantity(value as u64))
        } else {
            Err("Quantity must be non-negative".to_string())
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Ok(Quantity(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_new_valid() {
        let qty = Quantity::new(100);
        assert!(qty.is_ok());
        assert_eq!(qty.unwrap().value(), 100);
    }

    #[test]
    fn test_quantity_new_zero() {
        let qty = Quantity::new(0);
        assert!(qty.is_ok());
        assert_eq!(qty.unwrap().value(), 0);
    }

    #[test]
    fn test_quantity_new_negative() {
        let qty = Quantity::new(-5);
        assert!(qty.is_err());
        assert_eq!(qty.unwrap_err(), "Quantity must be non-negative");
    }

    #[test]
    fn test_quantity_deserialize_rejects_negative() {
        let result: Result<Quantity, _> = serde_json::from_str("-5");
        assert!(result.is_err());
    }

    #[test]
    fn test_quantity_serde_round_trip() {
        let qty = Quantity::new(5000).unwrap();
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "5000");
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, qty);
    }
}
