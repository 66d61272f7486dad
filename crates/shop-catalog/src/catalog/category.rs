//! Category records.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
///
/// Categories are a flat set with an optional parent reference; only one
/// level of parent lookup is ever performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    /// URL-friendly slug, unique per catalog.
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Parent category ID (None for top-level categories).
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<CategoryId>,
}

impl CategoryRecord {
    /// Create a new top-level category.
    pub fn new(
        id: impl Into<CategoryId>,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            description: None,
            image_url: None,
            parent_id: None,
        }
    }

    /// Set the parent category.
    pub fn with_parent(mut self, parent: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Check if this is a top-level category.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this category sits directly under `parent`.
    pub fn is_child_of(&self, parent: &CategoryId) -> bool {
        self.parent_id.as_ref() == Some(parent)
    }
}

/// Direct children of `parent` in a flat category list, one level only.
pub fn children_of<'a>(
    categories: &'a [CategoryRecord],
    parent: &CategoryId,
) -> Vec<&'a CategoryRecord> {
    categories
        .iter()
        .filter(|category| category.is_child_of(parent))
        .collect()
}

/// Categories without a parent.
pub fn top_level(categories: &[CategoryRecord]) -> Vec<&CategoryRecord> {
    categories
        .iter()
        .filter(|category| category.is_top_level())
        .collect()
}

/// Categories whose parent is missing from the list.
pub fn orphans(categories: &[CategoryRecord]) -> Vec<&CategoryRecord> {
    categories
        .iter()
        .filter(|category| {
            category
                .parent_id
                .as_ref()
                .is_some_and(|parent| !categories.iter().any(|c| c.id == *parent))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_category() {
        let cat = CategoryRecord::new("cat-smart-home", "smart-home", "Smart Home");
        assert!(cat.is_top_level());
        assert_eq!(cat.name, "Smart Home");
    }

    #[test]
    fn test_child_category() {
        let child = CategoryRecord::new("cat-robotics", "robotik", "Robotik")
            .with_parent("cat-ai-devices");
        assert!(!child.is_top_level());
        assert!(child.is_child_of(&CategoryId::new("cat-ai-devices")));
        assert!(!child.is_child_of(&CategoryId::new("cat-smart-home")));
    }

    #[test]
    fn test_list_helpers() {
        let categories = vec![
            CategoryRecord::new("cat-a", "a", "A"),
            CategoryRecord::new("cat-b", "b", "B").with_parent("cat-a"),
            CategoryRecord::new("cat-c", "c", "C").with_parent("cat-b"),
            CategoryRecord::new("cat-d", "d", "D").with_parent("cat-gone"),
        ];

        let children = children_of(&categories, &CategoryId::new("cat-a"));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].slug, "b");

        assert_eq!(top_level(&categories).len(), 1);
        let orphans = orphans(&categories);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].slug, "d");
    }

    #[test]
    fn test_accepts_snake_case_parent() {
        let json = r#"{"id":"cat-x","slug":"x","name":"X","parent_id":"cat-root"}"#;
        let cat: CategoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(cat.parent_id, Some(CategoryId::new("cat-root")));
    }
}
