//! Per-material card display values.

use crate::categories::{select_headline, translate_categories, Headline, UnknownTagOrder};
use crate::constants::PLACEHOLDER_IMAGE;
use crate::material::Material;
use std::fmt;

/// Everything a list view shows for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCard {
    pub id: String,
    pub name: String,
    pub categories: String,
    pub headline: Headline,
    pub image: String,
}

impl MaterialCard {
    pub fn new(material: &Material, unknown: UnknownTagOrder) -> Self {
        Self {
            id: material.id.clone(),
            name: material.name.clone(),
            categories: translate_categories(&material.categories),
            headline: select_headline(material, unknown),
            image: material
                .image_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

impl fmt::Display for MaterialCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.name, self.id)?;
        writeln!(f, "  {}", self.categories)?;
        write!(f, "  {}", self.headline)
    }
}
