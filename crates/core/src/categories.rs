//! Diet categories and the headline nutrients shown for them.
//!
//! A material carries free-form diet tags (`heart`, `muscle`, `diet`, `diabetes`). This module
//! translates those tags into display labels and picks the two nutrients that best represent
//! the material on a compact card.
//!
//! ## Priority
//!
//! When a material has several tags, the one ranked highest in
//! [`DietCategory::PRIORITY`] decides the headline nutrients. Tags outside the vocabulary have
//! no rank; where they sort is governed by [`UnknownTagOrder`]. The dashboard has always
//! ranked them *ahead* of every known tag (and then fallen back to the `diet` pair because the
//! winning tag has no table entry), so that is the default.

use crate::constants::UNCATEGORISED_LABEL;
use crate::material::{Material, Nutrient};
use std::fmt;

/// The fixed vocabulary of diet tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DietCategory {
    Heart,
    Muscle,
    Diet,
    Diabetes,
}

impl DietCategory {
    /// Highest priority first.
    pub const PRIORITY: [DietCategory; 4] = [
        DietCategory::Diabetes,
        DietCategory::Muscle,
        DietCategory::Diet,
        DietCategory::Heart,
    ];

    /// Looks a tag up case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "heart" => Some(DietCategory::Heart),
            "muscle" => Some(DietCategory::Muscle),
            "diet" => Some(DietCategory::Diet),
            "diabetes" => Some(DietCategory::Diabetes),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            DietCategory::Heart => "heart",
            DietCategory::Muscle => "muscle",
            DietCategory::Diet => "diet",
            DietCategory::Diabetes => "diabetes",
        }
    }

    /// Indonesian display label.
    pub fn label(self) -> &'static str {
        match self {
            DietCategory::Heart => "Jantung",
            DietCategory::Muscle => "Otot",
            DietCategory::Diet => "Diet",
            DietCategory::Diabetes => "Diabetes",
        }
    }

    /// The two nutrients shown on a card for this category.
    pub fn headline_nutrients(self) -> [Nutrient; 2] {
        match self {
            DietCategory::Heart => [Nutrient::Calories, Nutrient::Carbohydrates],
            DietCategory::Muscle => [Nutrient::Protein, Nutrient::Calories],
            DietCategory::Diet => [Nutrient::Calories, Nutrient::Sugar],
            DietCategory::Diabetes => [Nutrient::Sugar, Nutrient::Carbohydrates],
        }
    }

    fn rank(self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for DietCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where tags outside the vocabulary sort relative to known tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagOrder {
    /// Unknown tags outrank every known tag (dashboard behaviour).
    #[default]
    First,
    /// Unknown tags rank below every known tag.
    Last,
}

/// Translates and joins a material's tags, e.g. `["heart", "Vegan"]` → `"Jantung, Vegan"`.
///
/// Unknown tags are passed through verbatim. An empty result (no tags, or a single blank
/// tag) yields `"Diet"`.
pub fn translate_categories<S: AsRef<str>>(tags: &[S]) -> String {
    let joined = tags
        .iter()
        .map(|tag| {
            let tag = tag.as_ref();
            DietCategory::from_tag(tag).map_or(tag, |c| c.label())
        })
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        UNCATEGORISED_LABEL.to_string()
    } else {
        joined
    }
}

/// Lower-cases the tags and stable-sorts them by priority.
pub fn sort_by_priority<S: AsRef<str>>(tags: &[S], unknown: UnknownTagOrder) -> Vec<String> {
    let mut sorted: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
    sorted.sort_by_key(|tag| match DietCategory::from_tag(tag) {
        Some(category) => category.rank() + 1,
        None => match unknown {
            UnknownTagOrder::First => 0,
            UnknownTagOrder::Last => DietCategory::PRIORITY.len() + 1,
        },
    });
    sorted
}

/// The category whose nutrients headline the card.
///
/// Falls back to [`DietCategory::Diet`] when there are no tags or when the top-ranked tag is
/// outside the vocabulary.
pub fn primary_category<S: AsRef<str>>(tags: &[S], unknown: UnknownTagOrder) -> DietCategory {
    sort_by_priority(tags, unknown)
        .first()
        .and_then(|tag| DietCategory::from_tag(tag))
        .unwrap_or(DietCategory::Diet)
}

/// One headline value on a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlineStat {
    pub nutrient: Nutrient,
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for HeadlineStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.label, self.value, self.unit)
    }
}

/// The two headline values for a material plus the category that selected them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Headline {
    pub category: DietCategory,
    pub stats: [HeadlineStat; 2],
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.stats[0], self.stats[1])
    }
}

/// Picks the two headline nutrients for `material`.
pub fn select_headline(material: &Material, unknown: UnknownTagOrder) -> Headline {
    let category = primary_category(&material.categories, unknown);
    let stats = category.headline_nutrients().map(|nutrient| HeadlineStat {
        nutrient,
        label: nutrient.label(),
        value: material.nutrient(nutrient),
        unit: nutrient.unit(),
    });
    Headline { category, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_with(tags: &[&str]) -> Material {
        let mut m = Material::named("m", "Uji");
        m.categories = tags.iter().map(|t| t.to_string()).collect();
        m.calories = 120.0;
        m.protein = 11.0;
        m.carbohydrates = 9.5;
        m.sugar = 1.5;
        m
    }

    fn nutrients(headline: &Headline) -> [Nutrient; 2] {
        headline.stats.map(|s| s.nutrient)
    }

    #[test]
    fn empty_tags_translate_to_diet() {
        let none: [&str; 0] = [];
        assert_eq!(translate_categories(&none), "Diet");
    }

    #[test]
    fn blank_only_tag_translates_to_diet() {
        assert_eq!(translate_categories(&[""]), "Diet");
        assert_eq!(translate_categories(&["", ""]), ", ");
    }

    #[test]
    fn unknown_tags_keep_their_relative_order() {
        assert_eq!(
            sort_by_priority(&["keto", "vegan", "muscle"], UnknownTagOrder::First),
            vec!["keto", "vegan", "muscle"]
        );
        assert_eq!(
            sort_by_priority(&["keto", "muscle", "vegan"], UnknownTagOrder::Last),
            vec!["muscle", "keto", "vegan"]
        );
    }

    #[test]
    fn unknown_tags_pass_through_verbatim() {
        assert_eq!(
            translate_categories(&["HEART", "Vegan", "diabetes"]),
            "Jantung, Vegan, Diabetes"
        );
    }

    #[test]
    fn single_known_tags_select_their_table_pair() {
        let cases = [
            ("heart", [Nutrient::Calories, Nutrient::Carbohydrates]),
            ("muscle", [Nutrient::Protein, Nutrient::Calories]),
            ("diet", [Nutrient::Calories, Nutrient::Sugar]),
            ("diabetes", [Nutrient::Sugar, Nutrient::Carbohydrates]),
        ];
        for (tag, expected) in cases {
            let headline = select_headline(&material_with(&[tag]), UnknownTagOrder::First);
            assert_eq!(nutrients(&headline), expected, "tag {tag}");
        }
    }

    #[test]
    fn labels_follow_the_selected_pair() {
        let headline = select_headline(&material_with(&["muscle"]), UnknownTagOrder::First);
        assert_eq!(headline.stats[0].label, "Protein");
        assert_eq!(headline.stats[0].unit, "g");
        assert_eq!(headline.stats[1].label, "Kalori");
        assert_eq!(headline.stats[1].unit, "kcal");
        assert_eq!(headline.to_string(), "Protein: 11 g | Kalori: 120 kcal");
    }

    #[test]
    fn diabetes_outranks_heart() {
        let headline =
            select_headline(&material_with(&["heart", "diabetes"]), UnknownTagOrder::First);
        assert_eq!(headline.category, DietCategory::Diabetes);
        assert_eq!(nutrients(&headline), [Nutrient::Sugar, Nutrient::Carbohydrates]);
    }

    #[test]
    fn no_tags_use_the_diet_pair() {
        let headline = select_headline(&material_with(&[]), UnknownTagOrder::Last);
        assert_eq!(headline.category, DietCategory::Diet);
        assert_eq!(nutrients(&headline), [Nutrient::Calories, Nutrient::Sugar]);
    }

    #[test]
    fn unknown_tag_sorts_first_by_default_and_falls_back_to_diet() {
        let tags = ["muscle", "vegan"];
        assert_eq!(
            sort_by_priority(&tags, UnknownTagOrder::First),
            vec!["vegan", "muscle"]
        );
        assert_eq!(
            primary_category(&tags, UnknownTagOrder::First),
            DietCategory::Diet
        );
    }

    #[test]
    fn unknown_tag_can_be_ranked_last() {
        let tags = ["vegan", "heart", "muscle"];
        assert_eq!(
            sort_by_priority(&tags, UnknownTagOrder::Last),
            vec!["muscle", "heart", "vegan"]
        );
        assert_eq!(
            primary_category(&tags, UnknownTagOrder::Last),
            DietCategory::Muscle
        );
    }

    #[test]
    fn mixed_case_tags_are_ranked() {
        assert_eq!(
            primary_category(&["Heart", "MUSCLE"], UnknownTagOrder::First),
            DietCategory::Muscle
        );
    }
}
