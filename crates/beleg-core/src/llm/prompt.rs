//! Instruction text sent to the vision model.
//!
//! The keys named here are the ones the response parser reads; keep both in sync.

/// Keys of the JSON object the model is asked to return.
pub const PROMPT_KEYS: &[&str] = &[
    "lieferant",
    "datum",
    "rechnungsnummer",
    "gesamtbetrag",
    "positionen",
    "beschreibung",
    "menge",
    "einzelpreis",
    "gesamtpreis",
    "rohtext",
];

/// Prompt asking for the invoice as a single JSON object.
pub const EXTRACTION_PROMPT: &str = r#"Lies die Rechnung im angehängten Bild und gib ihre Daten als JSON zurück.

Gesucht sind:
- Lieferant bzw. Absender (Name, optional Anschrift)
- Rechnungsdatum
- Rechnungsnummer
- Gesamtbetrag inklusive MwSt.
- alle Rechnungspositionen mit Beschreibung, Menge, Einzelpreis und Gesamtpreis
- der vollständige erkannte Text

Antworte ausschließlich mit einem JSON-Objekt in genau dieser Form:

{
  "lieferant": "Name des Lieferanten",
  "datum": "TT.MM.JJJJ",
  "rechnungsnummer": "Nummer",
  "gesamtbetrag": "0,00",
  "positionen": [
    {
      "beschreibung": "Artikel oder Leistung",
      "menge": "1",
      "einzelpreis": "0,00",
      "gesamtpreis": "0,00"
    }
  ],
  "rohtext": "Erkannter Text der Rechnung"
}

Fehlende Angaben bleiben ein leerer String bzw. ein leeres Array. Keine Erklärungen, kein Markdown, nur gültiges JSON."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_key() {
        for key in PROMPT_KEYS {
            assert!(
                EXTRACTION_PROMPT.contains(&format!("\"{}\"", key)),
                "prompt does not mention {}",
                key
            );
        }
    }

    #[test]
    fn test_prompt_example_is_valid_json() {
        let start = EXTRACTION_PROMPT.find('{').unwrap();
        let end = EXTRACTION_PROMPT.rfind('}').unwrap();
        let example: serde_json::Value =
            serde_json::from_str(&EXTRACTION_PROMPT[start..=end]).unwrap();

        for key in ["lieferant", "datum", "gesamtbetrag", "positionen"] {
            assert!(example.get(key).is_some(), "missing {}", key);
        }
    }
}
