use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A technology as stored on the candidate profile. Both fields are optional
/// because older profiles were written without validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTechnology {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub proficiency: Option<String>,
}

#[cfg(test)]
impl RawTechnology {
    pub fn new(name: &str, proficiency: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            proficiency: Some(proficiency.to_string()),
        }
    }
}

/// One category of the candidate's declared stack, e.g. "Languages".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStackCategory {
    pub category: String,
    #[serde(default)]
    pub technologies: Vec<RawTechnology>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub years_experience: i32,
    pub desired_positions: Vec<String>,
    pub current_location: String,
    pub tech_stack: Vec<TechStackCategory>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tech_stack_tolerates_missing_fields() {
        let json = r#"[
            {"category": "Languages", "technologies": [
                {"name": "Python", "proficiency": "Advanced"},
                {"name": "Go"},
                {}
            ]},
            {"category": "Empty"}
        ]"#;
        let stack: Vec<TechStackCategory> = serde_json::from_str(json).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0].technologies.len(), 3);
        assert_eq!(stack[0].technologies[1].proficiency, None);
        assert!(stack[1].technologies.is_empty());
    }
}
