//! Add/edit form model and its ad hoc validation.
//!
//! A [`MaterialForm`] holds raw user input. [`MaterialForm::validate`] performs every check
//! that can fail before a request is sent and produces a [`ValidatedForm`] whose
//! [`ValidatedForm::fields`] are the multipart text parts the backend expects.

use crate::constants::MAX_IMAGE_BYTES;
use crate::material::{Material, Nutrient};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use labora_types::NonEmptyText;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialForm {
    pub name: String,
    pub test_date: String,
    pub material_category: String,
    pub source: String,
    pub notes: String,
    amounts: BTreeMap<Nutrient, f64>,
}

impl MaterialForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fills the form from an existing material (edit flow).
    pub fn from_material(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            test_date: material.test_day().unwrap_or_default().to_string(),
            material_category: material.material_category.clone(),
            source: material.source.clone(),
            notes: material.notes.clone(),
            amounts: Nutrient::ALL
                .into_iter()
                .map(|n| (n, material.nutrient(n)))
                .collect(),
        }
    }

    pub fn set_amount(&mut self, nutrient: Nutrient, value: f64) {
        self.amounts.insert(nutrient, value);
    }

    pub fn clear_amount(&mut self, nutrient: Nutrient) {
        self.amounts.remove(&nutrient);
    }

    pub fn amount(&self, nutrient: Nutrient) -> Option<f64> {
        self.amounts.get(&nutrient).copied()
    }

    /// Parses a raw `key=value` assignment such as `iron=2.5` or `Zat Besi=2.5`.
    pub fn apply_assignment(&mut self, assignment: &str) -> CoreResult<Nutrient> {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            CoreError::InvalidInput(format!("expected nutrient=value, got {assignment}"))
        })?;
        let nutrient: Nutrient = key.parse()?;
        match parse_amount(nutrient, raw)? {
            Some(value) => self.set_amount(nutrient, value),
            None => self.clear_amount(nutrient),
        }
        Ok(nutrient)
    }

    /// Runs the pre-submit checks.
    ///
    /// # Errors
    ///
    /// - `MissingField("name")` when the name is blank
    /// - `InvalidTestDate` when a test date is present but not `YYYY-MM-DD`
    /// - `InvalidAmount` when an amount is negative or not finite
    pub fn validate(&self) -> CoreResult<ValidatedForm> {
        let name = NonEmptyText::new(&self.name).map_err(|_| CoreError::MissingField("name"))?;

        let test_date = match self.test_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| CoreError::InvalidTestDate(raw.to_string()))?,
            ),
        };

        let mut amounts = Vec::with_capacity(Nutrient::ALL.len());
        for nutrient in Nutrient::ALL {
            let value = self.amount(nutrient).unwrap_or(0.0);
            check_amount(nutrient, value)?;
            amounts.push((nutrient, value));
        }

        Ok(ValidatedForm {
            name,
            test_date,
            material_category: self.material_category.trim().to_string(),
            source: self.source.trim().to_string(),
            notes: self.notes.trim().to_string(),
            amounts,
        })
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub name: NonEmptyText,
    pub test_date: Option<NaiveDate>,
    pub material_category: String,
    pub source: String,
    pub notes: String,
    pub amounts: Vec<(Nutrient, f64)>,
}

impl ValidatedForm {
    /// Text parts keyed by the material JSON keys. Unset amounts are sent as `0`.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.to_string()),
            ("materialCategory", self.material_category.clone()),
            ("source", self.source.clone()),
            ("notes", self.notes.clone()),
        ];
        if let Some(date) = self.test_date {
            fields.push(("testDate", date.format("%Y-%m-%d").to_string()));
        }
        fields.extend(
            self.amounts
                .iter()
                .map(|(nutrient, value)| (nutrient.json_key(), value.to_string())),
        );
        fields
    }
}

/// Parses one amount; blank input means "not set".
pub fn parse_amount(nutrient: Nutrient, raw: &str) -> CoreResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidAmount {
            field: nutrient.json_key(),
            value: raw.to_string(),
        })?;
    check_amount(nutrient, value)?;
    Ok(Some(value))
}

fn check_amount(nutrient: Nutrient, value: f64) -> CoreResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::InvalidAmount {
            field: nutrient.json_key(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Rejects images over [`MAX_IMAGE_BYTES`].
pub fn check_image_size(size: u64) -> CoreResult<()> {
    if size > MAX_IMAGE_BYTES {
        return Err(CoreError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(fields: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn blank_name_fails_before_anything_else() {
        let mut form = MaterialForm::new();
        form.name = "   ".into();
        form.set_amount(Nutrient::Iron, -1.0);
        assert!(matches!(form.validate(), Err(CoreError::MissingField("name"))));
    }

    #[test]
    fn unset_amounts_are_sent_as_zero() {
        let mut form = MaterialForm::new();
        form.name = "Tempe".into();
        form.set_amount(Nutrient::Calories, 193.0);

        let fields = form.validate().unwrap().fields();
        assert_eq!(field(&fields, "calories"), Some("193"));
        assert_eq!(field(&fields, "iron"), Some("0"));
        assert_eq!(field(&fields, "vitaminD"), Some("0"));
        assert_eq!(field(&fields, "testDate"), None);
        assert_eq!(fields.len(), 4 + 14);
    }

    #[test]
    fn negative_or_non_finite_amounts_are_rejected() {
        let mut form = MaterialForm::new();
        form.name = "Tempe".into();
        form.set_amount(Nutrient::Sugar, f64::NAN);
        assert!(matches!(
            form.validate(),
            Err(CoreError::InvalidAmount { field: "sugar", .. })
        ));

        form.set_amount(Nutrient::Sugar, -0.5);
        assert!(matches!(
            form.validate(),
            Err(CoreError::InvalidAmount { field: "sugar", .. })
        ));
    }

    #[test]
    fn test_date_must_be_iso() {
        let mut form = MaterialForm::new();
        form.name = "Tempe".into();
        form.test_date = "01/05/2024".into();
        assert!(matches!(form.validate(), Err(CoreError::InvalidTestDate(_))));

        form.test_date = "2024-05-01".into();
        let fields = form.validate().unwrap().fields();
        assert_eq!(field(&fields, "testDate"), Some("2024-05-01"));
    }

    #[test]
    fn edit_form_is_prefilled_from_material() {
        let mut material = Material::named("9", "Kacang Hijau");
        material.test_date = Some("2023-11-20T08:00:00Z".into());
        material.protein = 23.9;
        material.source = "Bogor".into();

        let form = MaterialForm::from_material(&material);
        assert_eq!(form.test_date, "2023-11-20");
        assert_eq!(form.amount(Nutrient::Protein), Some(23.9));
        assert_eq!(form.amount(Nutrient::Iron), Some(0.0));
        assert_eq!(form.source, "Bogor");
    }

    #[test]
    fn assignments_parse_keys_labels_and_decimal_commas() {
        let mut form = MaterialForm::new();
        assert_eq!(form.apply_assignment("iron=2,5").unwrap(), Nutrient::Iron);
        assert_eq!(form.amount(Nutrient::Iron), Some(2.5));

        form.apply_assignment("Lemak Total=4").unwrap();
        assert_eq!(form.amount(Nutrient::TotalFat), Some(4.0));

        form.apply_assignment("iron=").unwrap();
        assert_eq!(form.amount(Nutrient::Iron), None);

        assert!(matches!(
            form.apply_assignment("iron"),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            form.apply_assignment("iron=banyak"),
            Err(CoreError::InvalidAmount { field: "iron", .. })
        ));
    }

    #[test]
    fn image_limit_is_five_mebibytes() {
        assert!(check_image_size(5 * 1024 * 1024).is_ok());
        assert!(matches!(
            check_image_size(5 * 1024 * 1024 + 1),
            Err(CoreError::ImageTooLarge { .. })
        ));
    }
}
