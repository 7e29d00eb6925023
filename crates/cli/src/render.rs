//! Plain-text rendering for terminal output.

use labora_core::chart::CHART_NUTRIENTS;
use labora_core::{ChartData, Material, MaterialCard, MaterialStats, Nutrient, UnknownTagOrder};

pub fn card_list(materials: &[Material]) -> String {
    if materials.is_empty() {
        return "Tidak ada material yang cocok.".to_string();
    }
    materials
        .iter()
        .map(|m| MaterialCard::new(m, UnknownTagOrder::default()).to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn stats(stats: &MaterialStats) -> String {
    format!(
        "Total material: {}\nMaterial saya: {}\nMaterial baru: {}\nKategori material: {}",
        stats.total_materials,
        stats.my_materials,
        stats.new_materials,
        stats.total_material_category
    )
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Card, descriptive fields and the chart legend for one material.
pub fn detail(material: &Material) -> String {
    let card = MaterialCard::new(material, UnknownTagOrder::default());
    let mut lines = vec![
        card.to_string(),
        String::new(),
        format!("  Tanggal uji : {}", material.test_day().unwrap_or("-")),
        format!("  Kelompok    : {}", or_dash(&material.material_category)),
        format!("  Sumber      : {}", or_dash(&material.source)),
        format!("  Catatan     : {}", or_dash(&material.notes)),
        format!("  Gambar      : {}", card.image),
        String::new(),
        "  Komposisi gizi:".to_string(),
    ];
    lines.extend(chart_legend(material));
    lines.join("\n")
}

/// One legend row per chart slice: colour, label, amount with unit, share.
pub fn chart_legend(material: &Material) -> Vec<String> {
    let chart = ChartData::from_material(material);
    let shares = chart.shares();
    chart
        .slices()
        .iter()
        .zip(CHART_NUTRIENTS.iter())
        .zip(shares)
        .map(|((slice, nutrient), share)| {
            format!(
                "  {} {:<14} {:>8} {:<4} {:>5.1}%",
                slice.color,
                slice.label,
                slice.value,
                nutrient.unit(),
                share
            )
        })
        .collect()
}

pub fn nutrient_keys() -> String {
    Nutrient::ALL
        .iter()
        .map(|n| format!("{} ({})", n.json_key(), n.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_a_message() {
        assert_eq!(card_list(&[]), "Tidak ada material yang cocok.");
    }

    #[test]
    fn legend_has_one_row_per_nutrient() {
        let mut material = Material::named("1", "Tempe");
        material.calories = 100.0;
        let legend = chart_legend(&material);
        assert_eq!(legend.len(), 14);
        assert!(legend[0].contains("#88CCEE"));
        assert!(legend[0].contains("100.0%"));
        assert!(legend[1].contains("0.0%"));
    }

    #[test]
    fn detail_shows_dashes_for_blank_fields() {
        let material = Material::named("1", "Tempe");
        let text = detail(&material);
        assert!(text.contains("Tanggal uji : -"));
        assert!(text.contains("Sumber      : -"));
        assert!(text.contains("/placeholder.png"));
    }
}
