//! Vectorizable text composition.
//!
//! Pure function from a card plus its enrichment text to the single
//! normalized string the vector store embeds. Fixed precedence: type line,
//! enrichment, rules text, produced mana, keywords.

use crate::card::RawCard;

/// Compose the canonical vectorizable text for a card.
///
/// Always starts from the type line, so the result is never empty even
/// when every richer field is absent. Embedded newlines become spaces and
/// the result carries no leading or trailing whitespace.
pub fn compose_vector_text(card: &RawCard, enrichment: &str) -> String {
    let mut text = format!("{}.", card.type_line);

    if !enrichment.trim().is_empty() {
        text.push_str(": ");
        text.push_str(enrichment);
    }
    if let Some(oracle) = card.oracle_text.as_deref() {
        if !oracle.trim().is_empty() {
            text.push(' ');
            text.push_str(oracle);
        }
    }
    if let Some(mana) = card.produced_mana.as_deref() {
        if !mana.is_empty() {
            text.push_str(" Produces ");
            text.push_str(&mana.join(","));
            text.push_str("mana.");
        }
    }
    if let Some(keywords) = card.keywords.as_deref() {
        if !keywords.is_empty() {
            text.push(' ');
            text.push_str(&keywords.join(","));
        }
    }

    text.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_precedence() {
        let card = RawCard {
            type_line: "Creature — Elf Druid".into(),
            oracle_text: Some("{T}: Add {G}.".into()),
            produced_mana: Some(vec!["G".into()]),
            keywords: Some(vec!["Mana dork".into()]),
            ..Default::default()
        };
        assert_eq!(
            compose_vector_text(&card, "taps for green mana"),
            "Creature — Elf Druid.: taps for green mana {T}: Add {G}. Produces Gmana. Mana dork"
        );
    }

    #[test]
    fn falls_back_to_type_line_alone() {
        let card = RawCard {
            type_line: "Basic Land — Forest".into(),
            ..Default::default()
        };
        assert_eq!(compose_vector_text(&card, ""), "Basic Land — Forest.");
    }

    #[test]
    fn empty_enrichment_skips_separator() {
        let card = RawCard {
            type_line: "Instant".into(),
            oracle_text: Some("Draw a card.".into()),
            ..Default::default()
        };
        assert_eq!(compose_vector_text(&card, ""), "Instant. Draw a card.");
    }

    #[test]
    fn newlines_collapse_to_spaces() {
        let card = RawCard {
            type_line: "Sorcery".into(),
            oracle_text: Some("Choose one —\n• Destroy target artifact.\n• Draw a card.".into()),
            ..Default::default()
        };
        let text = compose_vector_text(&card, "modal removal\nor draw");
        assert!(!text.contains('\n'));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn output_is_never_empty_and_trimmed() {
        let card = RawCard {
            type_line: "Enchantment".into(),
            oracle_text: Some("Text with trailing newline.\n".into()),
            ..Default::default()
        };
        let text = compose_vector_text(&card, "  ");
        assert!(!text.is_empty());
        assert_eq!(text, text.trim());
        assert!(!text.contains('\n'));
    }

    #[test]
    fn produced_mana_joined_with_commas() {
        let card = RawCard {
            type_line: "Land".into(),
            oracle_text: Some("{T}: Add {W} or {U}.".into()),
            produced_mana: Some(vec!["W".into(), "U".into()]),
            ..Default::default()
        };
        let text = compose_vector_text(&card, "");
        assert!(text.contains("Produces W,Umana."));
    }

    #[test]
    fn present_but_empty_lists_are_skipped() {
        let card = RawCard {
            type_line: "Instant".into(),
            oracle_text: Some("Counter target spell.".into()),
            produced_mana: Some(vec![]),
            keywords: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            compose_vector_text(&card, ""),
            "Instant. Counter target spell."
        );
    }
}
