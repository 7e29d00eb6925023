//! Material records as delivered by the backend.
//!
//! The backend is loose about types: numbers sometimes arrive as strings, absent nutrients
//! may be missing or `null`, ids may be numeric. Deserialisation normalises all of that so
//! the rest of the core can treat a [`Material`] as a plain, fully-populated value.

use crate::{CoreError, CoreResult};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fourteen nutrient amounts recorded per material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nutrient {
    Calories,
    Protein,
    TotalFat,
    SaturatedFat,
    TransFat,
    Carbohydrates,
    Sugar,
    Fiber,
    AminoAcid,
    VitaminD,
    Magnesium,
    Iron,
    Cholesterol,
    Natrium,
}

impl Nutrient {
    /// All nutrients in form order.
    pub const ALL: [Nutrient; 14] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::TotalFat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::Carbohydrates,
        Nutrient::Sugar,
        Nutrient::Fiber,
        Nutrient::AminoAcid,
        Nutrient::VitaminD,
        Nutrient::Magnesium,
        Nutrient::Iron,
        Nutrient::Cholesterol,
        Nutrient::Natrium,
    ];

    /// Key used in the backend's JSON and multipart payloads.
    pub fn json_key(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::TotalFat => "totalFat",
            Nutrient::SaturatedFat => "saturatedFat",
            Nutrient::TransFat => "transFat",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Sugar => "sugar",
            Nutrient::Fiber => "fiber",
            Nutrient::AminoAcid => "aminoAcid",
            Nutrient::VitaminD => "vitaminD",
            Nutrient::Magnesium => "magnesium",
            Nutrient::Iron => "iron",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::Natrium => "natrium",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Calories => "Kalori",
            Nutrient::Protein => "Protein",
            Nutrient::TotalFat => "Lemak Total",
            Nutrient::SaturatedFat => "Lemak Jenuh",
            Nutrient::TransFat => "Lemak Trans",
            Nutrient::Carbohydrates => "Karbohidrat",
            Nutrient::Sugar => "Gula",
            Nutrient::Fiber => "Serat",
            Nutrient::AminoAcid => "Asam Amino",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Iron => "Zat Besi",
            Nutrient::Cholesterol => "Kolesterol",
            Nutrient::Natrium => "Natrium",
        }
    }

    /// `kcal` for calories, grams for everything else.
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

impl FromStr for Nutrient {
    type Err = CoreError;

    /// Accepts the JSON key (`totalFat`, `total_fat`, `total-fat`) or the display label
    /// (`Lemak Total`), ignoring case.
    fn from_str(s: &str) -> CoreResult<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Nutrient::ALL
            .into_iter()
            .find(|n| {
                n.json_key().eq_ignore_ascii_case(&wanted)
                    || n.label().replace(' ', "").eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| CoreError::UnknownNutrient(s.to_string()))
    }
}

/// A food-material nutrition record.
///
/// Nutrient amounts are per fixed reference serving and are `0.0` when the backend omitted
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub material_category: String,
    #[serde(default, deserialize_with = "text")]
    pub source: String,
    #[serde(default, deserialize_with = "text")]
    pub notes: String,
    #[serde(default)]
    pub test_date: Option<String>,

    #[serde(default, deserialize_with = "amount")]
    pub calories: f64,
    #[serde(default, deserialize_with = "amount")]
    pub protein: f64,
    #[serde(default, deserialize_with = "amount")]
    pub carbohydrates: f64,
    #[serde(default, deserialize_with = "amount")]
    pub sugar: f64,
    #[serde(default, deserialize_with = "amount")]
    pub total_fat: f64,
    #[serde(default, deserialize_with = "amount")]
    pub saturated_fat: f64,
    #[serde(default, deserialize_with = "amount")]
    pub trans_fat: f64,
    #[serde(default, deserialize_with = "amount")]
    pub fiber: f64,
    #[serde(default, deserialize_with = "amount")]
    pub amino_acid: f64,
    #[serde(default, deserialize_with = "amount")]
    pub vitamin_d: f64,
    #[serde(default, deserialize_with = "amount")]
    pub magnesium: f64,
    #[serde(default, deserialize_with = "amount")]
    pub iron: f64,
    #[serde(default, deserialize_with = "amount")]
    pub cholesterol: f64,
    #[serde(default, deserialize_with = "amount")]
    pub natrium: f64,

    #[serde(default, deserialize_with = "tags")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Material {
    /// A material with the given id and name and every other field empty or zero.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            material_category: String::new(),
            source: String::new(),
            notes: String::new(),
            test_date: None,
            calories: 0.0,
            protein: 0.0,
            carbohydrates: 0.0,
            sugar: 0.0,
            total_fat: 0.0,
            saturated_fat: 0.0,
            trans_fat: 0.0,
            fiber: 0.0,
            amino_acid: 0.0,
            vitamin_d: 0.0,
            magnesium: 0.0,
            iron: 0.0,
            cholesterol: 0.0,
            natrium: 0.0,
            categories: Vec::new(),
            image_url: None,
        }
    }

    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::TotalFat => self.total_fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::TransFat => self.trans_fat,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::Sugar => self.sugar,
            Nutrient::Fiber => self.fiber,
            Nutrient::AminoAcid => self.amino_acid,
            Nutrient::VitaminD => self.vitamin_d,
            Nutrient::Magnesium => self.magnesium,
            Nutrient::Iron => self.iron,
            Nutrient::Cholesterol => self.cholesterol,
            Nutrient::Natrium => self.natrium,
        }
    }

    /// The date part (`YYYY-MM-DD`) of the test date, dropping any time component.
    pub fn test_day(&self) -> Option<&str> {
        self.test_date
            .as_deref()
            .map(|d| d.split('T').next().unwrap_or(d))
            .filter(|d| !d.is_empty())
    }
}

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialStats {
    pub total_materials: u64,
    pub my_materials: u64,
    pub new_materials: u64,
    pub total_material_category: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
}

fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Loose::Number(n)) => Ok(n),
        Some(Loose::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Loose::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid nutrient amount: {s}"))),
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Ok(s),
        Loose::Number(n) if n.fract() == 0.0 => Ok(format!("{}", n as i64)),
        Loose::Number(n) => Ok(n.to_string()),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
