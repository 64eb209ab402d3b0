use serde::{Deserialize, Serialize};

/// Placeholder for a record sub-field the segmenter could not recover.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

impl Links {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linkedin.is_none() && self.github.is_none() && self.portfolio.is_none()
    }
}

/// Structured candidate profile recovered from one document's text.
///
/// A plain value: two parses of the same normalized text compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub links: Links,
}

impl ParsedEntity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no cascade produced anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.summary.is_none()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.languages.is_empty()
            && self.certifications.is_empty()
            && self.projects.is_empty()
            && self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entity() {
        let entity = ParsedEntity::new();
        assert!(entity.is_empty());

        let with_skill = ParsedEntity {
            skills: vec!["Rust".to_string()],
            ..ParsedEntity::default()
        };
        assert!(!with_skill.is_empty());
    }

    #[test]
    fn test_serialization_skips_missing_scalars() {
        let entity = ParsedEntity {
            name: Some("Jane Doe".to_string()),
            links: Links {
                github: Some("https://github.com/jdoe".to_string()),
                ..Links::default()
            },
            ..ParsedEntity::default()
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["name"], "Jane Doe");
        assert!(json.get("email").is_none());
        assert_eq!(json["skills"], serde_json::json!([]));
        assert_eq!(json["links"]["github"], "https://github.com/jdoe");
        assert!(json["links"].get("linkedin").is_none());

        let back: ParsedEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }
}
