use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One localized title variant, e.g. {"lang": "en", "value": "Engineering"}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedTitle {
    pub lang: String,
    pub value: String,
}

/// Embedded subcategory. Not a separate table — categories are small and
/// always fetched whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub slug: String,
    pub titles: Vec<LocalizedTitle>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub titles: Json<Vec<LocalizedTitle>>,
    pub icon: Option<String>,
    pub subcategories: Json<Vec<Subcategory>>,
    pub created_at: DateTime<Utc>,
}

/// Picks the title for `lang`, falling back to the first entry.
/// Callers must guarantee `titles` is non-empty (enforced on create).
pub fn title_for_lang<'a>(titles: &'a [LocalizedTitle], lang: &str) -> Option<&'a str> {
    titles
        .iter()
        .find(|t| t.lang == lang)
        .or_else(|| titles.first())
        .map(|t| t.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<LocalizedTitle> {
        vec![
            LocalizedTitle {
                lang: "en".to_string(),
                value: "Engineering".to_string(),
            },
            LocalizedTitle {
                lang: "de".to_string(),
                value: "Technik".to_string(),
            },
        ]
    }

    #[test]
    fn test_title_for_lang_exact_match() {
        assert_eq!(title_for_lang(&titles(), "de"), Some("Technik"));
    }

    #[test]
    fn test_title_for_lang_falls_back_to_first() {
        assert_eq!(title_for_lang(&titles(), "fr"), Some("Engineering"));
    }

    #[test]
    fn test_title_for_lang_empty() {
        assert_eq!(title_for_lang(&[], "en"), None);
    }
}
