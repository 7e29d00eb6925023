//! Answers to "are you sure?" prompts before irreversible actions.

/// Whether `answer` confirms the action: `y`, `ya` or `yes`, ignoring case and surrounding
/// whitespace. Anything else, a blank line included, declines.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "ya" | "yes"
    )
}

/// The question shown before deleting a material.
pub fn delete_prompt(id: &str, name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hapus material \"{name}\" [{id}]? Tindakan ini tidak dapat dibatalkan. [y/N] "),
        None => format!("Hapus material {id}? Tindakan ini tidak dapat dibatalkan. [y/N] "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers_confirm() {
        for answer in ["y", "Y", " ya ", "YES\n"] {
            assert!(is_confirmation(answer), "{answer:?} should confirm");
        }
    }

    #[test]
    fn everything_else_declines() {
        for answer in ["", "\n", "n", "tidak", "yess", "y es"] {
            assert!(!is_confirmation(answer), "{answer:?} should decline");
        }
    }

    #[test]
    fn prompt_names_the_material_when_known() {
        assert!(delete_prompt("7", Some("Tempe")).starts_with("Hapus material \"Tempe\" [7]?"));
        assert!(delete_prompt("7", Some("  ")).starts_with("Hapus material 7?"));
        assert!(delete_prompt("7", None).ends_with("[y/N] "));
    }
}
