use serde::{Deserialize, Serialize};

/// Extra-luggage tier. The store keeps the historical integer encoding
/// (1 = standard, 2 = extra).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LuggageTier {
    Standard,
    Extra,
}

impl LuggageTier {
    pub fn as_i32(self) -> i32 {
        match self {
            LuggageTier::Standard => 1,
            LuggageTier::Extra => 2,
        }
    }

    pub fn from_i32(value: i32) -> Self {
        if value == 2 {
            LuggageTier::Extra
        } else {
            LuggageTier::Standard
        }
    }
}

impl Default for LuggageTier {
    fn default() -> Self {
        LuggageTier::Standard
    }
}

/// Ancillary services sold against a boarding record, one row per boarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub boarding_id: i64,
    pub extra_drink: bool,
    pub extra_meal: bool,
    pub suit_center: bool,
    pub extra_luggage: LuggageTier,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luggage_tier_encoding_round_trip() {
        assert_eq!(LuggageTier::Standard.as_i32(), 1);
        assert_eq!(LuggageTier::Extra.as_i32(), 2);
        assert_eq!(LuggageTier::from_i32(2), LuggageTier::Extra);
        // Unknown encodings fall back to the standard tier.
        assert_eq!(LuggageTier::from_i32(0), LuggageTier::Standard);
    }

    #[test]
    fn test_service_record_serialization() {
        let record = ServiceRecord {
            boarding_id: 7,
            extra_drink: true,
            extra_meal: false,
            suit_center: false,
            extra_luggage: LuggageTier::Extra,
            description: "window seat request".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["extra_luggage"], "EXTRA");
    }
}
