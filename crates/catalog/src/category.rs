use serde::{Deserialize, Serialize};

use krishna_core::{CategoryId, DomainError, DomainResult, Entity, ValueObject};

const MAX_NAME_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 50;

/// URL-safe unique category key (ASCII letters, digits, `-`, `_`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DomainError::validation("slug cannot be empty"));
        }
        if raw.len() > MAX_SLUG_LEN {
            return Err(DomainError::validation(format!(
                "slug must be at most {MAX_SLUG_LEN} characters"
            )));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(DomainError::validation(format!(
                "slug {raw:?} may only contain letters, numbers, underscores or hyphens"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Slug {}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Product category ("Rings", "Necklaces", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    slug: Slug,
}

impl Category {
    /// Plural label used by listings.
    pub const VERBOSE_NAME_PLURAL: &'static str = "Categories";

    pub fn new(id: CategoryId, name: impl Into<String>, slug: Slug) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "category name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self { id, name, slug })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_url_safe_text() {
        let slug = Slug::parse("gold-rings_22k").unwrap();
        assert_eq!(slug.as_str(), "gold-rings_22k");
    }

    #[test]
    fn slug_rejects_spaces_and_empty() {
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("gold rings").is_err());
        assert!(Slug::parse("a".repeat(51)).is_err());
    }

    #[test]
    fn category_displays_its_name() {
        let category = Category::new(CategoryId::new(1), "Rings", Slug::parse("rings").unwrap()).unwrap();
        assert_eq!(category.to_string(), "Rings");
        assert_eq!(category.id(), CategoryId::new(1));
    }

    #[test]
    fn category_rejects_blank_name() {
        let err = Category::new(CategoryId::new(1), "  ", Slug::parse("rings").unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn slug_deserialization_is_validated() {
        let bad: Result<Slug, _> = serde_json::from_str("\"no spaces\"");
        assert!(bad.is_err());
    }
}
