//! Nutrient breakdown data for the detail view's pie chart and legend.

use crate::material::{Material, Nutrient};

/// Nutrients in chart order.
pub const CHART_NUTRIENTS: [Nutrient; 14] = [
    Nutrient::Calories,
    Nutrient::Carbohydrates,
    Nutrient::Magnesium,
    Nutrient::Protein,
    Nutrient::Sugar,
    Nutrient::Iron,
    Nutrient::TotalFat,
    Nutrient::SaturatedFat,
    Nutrient::TransFat,
    Nutrient::Fiber,
    Nutrient::Cholesterol,
    Nutrient::AminoAcid,
    Nutrient::Natrium,
    Nutrient::VitaminD,
];

/// Slice colours, assigned by position.
pub const PALETTE: [&str; 14] = [
    "#88CCEE", "#44AA99", "#117733", "#999933", "#DDCC77", "#CC6677", "#882255", "#AA4499",
    "#332288", "#661100", "#6699CC", "#888888", "#E69F00", "#56B4E9",
];

/// Colour for the slice at `index`, wrapping around the palette.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    slices: Vec<ChartSlice>,
}

impl ChartData {
    pub fn from_material(material: &Material) -> Self {
        Self::from_pairs(
            CHART_NUTRIENTS
                .iter()
                .map(|n| (n.label().to_string(), material.nutrient(*n))),
        )
    }

    /// Colours arbitrary (label, value) pairs in order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let slices = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (label, value))| ChartSlice {
                label,
                value,
                color: color_for(index),
            })
            .collect();
        Self { slices }
    }

    pub fn slices(&self) -> &[ChartSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Percentage share of each slice; all zero when the total is zero.
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total > 0.0 { s.value / total * 100.0 } else { 0.0 })
            .collect()
    }
}
