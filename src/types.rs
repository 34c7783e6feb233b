//! Core data types for the essay coach
//!
//! Requests are built fresh for every call by the validator and never
//! outlive a single request/response cycle.

use serde::{Deserialize, Serialize};

/// Language the student is working in
///
/// Both the prompt and the expected feedback are produced in this language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    /// Wire code (`en` / `es`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Parse a wire code, case-sensitive
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AP essay formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EssayType {
    /// Short-answer question
    Saq,
    /// Long essay question
    Leq,
    /// Document-based question
    Dbq,
}

impl EssayType {
    pub const ALL: [EssayType; 3] = [EssayType::Saq, EssayType::Leq, EssayType::Dbq];

    pub fn as_str(&self) -> &'static str {
        match self {
            EssayType::Saq => "SAQ",
            EssayType::Leq => "LEQ",
            EssayType::Dbq => "DBQ",
        }
    }

    /// Parse the exact upper-case code; `leq` is not accepted
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SAQ" => Some(EssayType::Saq),
            "LEQ" => Some(EssayType::Leq),
            "DBQ" => Some(EssayType::Dbq),
            _ => None,
        }
    }
}

impl std::fmt::Display for EssayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curriculum unit number, always within [`UnitId::MIN`, `UnitId::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnitId(u8);

impl UnitId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    /// Returns `None` when `id` is outside the course's unit range
    pub fn new(id: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&id).then_some(Self(id))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Every unit in course order
    pub fn all() -> impl Iterator<Item = UnitId> {
        (Self::MIN..=Self::MAX).map(UnitId)
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated essay feedback request
///
/// Only the validator constructs these, so holding one means every field
/// rule already passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayFeedbackRequest {
    pub language: Language,
    pub unit_id: UnitId,
    pub essay_type: EssayType,
    /// Essay text with surrounding whitespace already stripped
    pub essay_text: String,
}

/// Feedback returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EssayFeedbackResult {
    /// Trimmed feedback text; may be empty
    pub output: String,
}

impl EssayFeedbackResult {
    pub fn new(output: impl AsRef<str>) -> Self {
        Self {
            output: output.as_ref().trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_range() {
        assert!(UnitId::new(0).is_none());
        assert_eq!(UnitId::new(1).map(|u| u.get()), Some(1));
        assert_eq!(UnitId::new(9).map(|u| u.get()), Some(9));
        assert!(UnitId::new(10).is_none());
        assert_eq!(UnitId::all().count(), 9);
    }

    #[test]
    fn test_codes() {
        assert_eq!(Language::from_code("es"), Some(Language::Es));
        assert_eq!(Language::from_code("EN"), None);
        assert_eq!(Language::default(), Language::En);
        assert_eq!(EssayType::from_code("DBQ"), Some(EssayType::Dbq));
        assert_eq!(EssayType::from_code("leq"), None);
        assert_eq!(EssayType::Saq.to_string(), "SAQ");
    }

    #[test]
    fn test_result_is_trimmed() {
        let result = EssayFeedbackResult::new("\n  Score: 4/6 \n");
        assert_eq!(result.output, "Score: 4/6");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"output": "Score: 4/6"})
        );
    }
}
