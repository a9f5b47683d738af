use aerodesk_shared::pii::Masked;
use serde::{Deserialize, Serialize};

/// A staff account. Authenticates the desk client; the password never appears
/// in logs (see `Masked`) and is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password: Masked<String>,
}

impl Employee {
    /// Constant-time credential comparison, independent of match position.
    pub fn password_matches(&self, candidate: &str) -> bool {
        let stored = self.password.expose().as_bytes();
        let candidate = candidate.as_bytes();
        if stored.len() != candidate.len() {
            return false;
        }
        stored
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Replacement values for profile editing. The employee id is immutable.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub password: Masked<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee() -> Employee {
        Employee {
            employee_id: 42,
            first_name: "Arda".to_string(),
            last_name: "Yilmaz".to_string(),
            email: "arda@aerodesk.example".to_string(),
            role: "AGENT".to_string(),
            password: Masked("hunter2".to_string()),
        }
    }

    #[test]
    fn test_password_match() {
        assert!(employee().password_matches("hunter2"));
        assert!(!employee().password_matches("hunter3"));
        assert!(!employee().password_matches("hunter22"));
    }

    #[test]
    fn test_password_not_serialized() {
        let json = serde_json::to_value(employee()).unwrap();
        assert!(json.get("password").is_none());
    }
}
