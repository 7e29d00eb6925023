//! Search and category predicates over a material list.
//!
//! This is the pure half of the filter engine. The debounced half lives in
//! [`crate::view::MaterialListView`].

use crate::categories::DietCategory;
use crate::constants::ALL_CATEGORIES_LABEL;
use crate::material::Material;
use crate::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// The category selector: everything, or one diet category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(DietCategory),
}

impl CategoryFilter {
    /// Selector options in display order.
    pub const OPTIONS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(DietCategory::Diet),
        CategoryFilter::Only(DietCategory::Muscle),
        CategoryFilter::Only(DietCategory::Heart),
        CategoryFilter::Only(DietCategory::Diabetes),
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES_LABEL,
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// Whether any of `tags`, translated to its label, equals the selected label.
    ///
    /// Tags outside the vocabulary have no label and never match a concrete category.
    pub fn matches<S: AsRef<str>>(self, tags: &[S]) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => tags.iter().any(|tag| {
                DietCategory::from_tag(tag.as_ref())
                    .is_some_and(|c| c.label().eq_ignore_ascii_case(selected.label()))
            }),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = CoreError;

    /// Accepts a selector label (`Semua`, `Otot`, ...) or a raw tag (`muscle`), ignoring case.
    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_CATEGORIES_LABEL) || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Self::OPTIONS
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(s))
            .or_else(|| DietCategory::from_tag(s).map(CategoryFilter::Only))
            .ok_or_else(|| CoreError::UnknownCategoryFilter(s.to_string()))
    }
}

/// The user-controlled filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub search_term: String,
    pub category: CategoryFilter,
}

impl FilterQuery {
    pub fn new(search_term: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    /// Name contains the trimmed search term, ignoring case.
    pub fn matches_search(&self, material: &Material) -> bool {
        let needle = self.search_term.trim().to_lowercase();
        needle.is_empty() || material.name.to_lowercase().contains(&needle)
    }

    pub fn matches(&self, material: &Material) -> bool {
        self.matches_search(material) && self.category.matches(&material.categories)
    }
}

/// Keeps the materials matching `query`, in source order.
pub fn filter_materials(materials: &[Material], query: &FilterQuery) -> Vec<Material> {
    materials
        .iter()
        .filter(|m| query.matches(m))
        .cloned()
        .collect()
}
