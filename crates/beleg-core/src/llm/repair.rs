//! Locating and repairing the JSON object inside an LLM response.

use regex::Captures;
use tracing::debug;

use crate::invoice::rules::patterns::{
    CODE_FENCE, JSON_CANDIDATE, JSON_GERMAN_DECIMAL, JSON_GERMAN_THOUSANDS, JSON_US_THOUSANDS,
};

/// Remove markdown code fence markers.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// The first substring that looks like the requested invoice object.
pub fn locate_candidate(text: &str) -> Option<&str> {
    JSON_CANDIDATE.find(text).map(|m| m.as_str())
}

/// Apply every repair pass to a candidate, in order.
pub fn repair_candidate(candidate: &str) -> String {
    let repaired = repair_locale_numbers(candidate);
    let repaired = repair_truncation(&repaired);
    let repaired = clean_control_characters(&repaired);
    let repaired = remove_trailing_commas(&repaired);

    if repaired != candidate {
        debug!(
            "Repaired JSON candidate ({} -> {} bytes)",
            candidate.len(),
            repaired.len()
        );
    }

    repaired
}

/// Rewrite locale-formatted numbers in the values of numeric keys.
///
/// `"1.234,56"` and `"1,234.56"` become `"1234.56"`, `"56,50"` becomes
/// `"56.50"`. Only `gesamtbetrag`, `einzelpreis`, `gesamtpreis` and `menge`
/// are touched.
pub fn repair_locale_numbers(json: &str) -> String {
    let json = JSON_GERMAN_THOUSANDS
        .replace_all(json, |caps: &Captures| {
            format!(
                "\"{}\": \"{}.{}{}\"",
                &caps[1],
                caps[2].replace('.', ""),
                &caps[3],
                &caps[4]
            )
        })
        .into_owned();

    let json = JSON_GERMAN_DECIMAL
        .replace_all(&json, "\"${1}\": \"${2}.${3}${4}\"")
        .into_owned();

    JSON_US_THOUSANDS
        .replace_all(&json, |caps: &Captures| {
            format!(
                "\"{}\": \"{}.{}{}\"",
                &caps[1],
                caps[2].replace(',', ""),
                &caps[3],
                &caps[4]
            )
        })
        .into_owned()
}

/// Repair a response that was cut off.
///
/// With an ellipsis marker outside string literals the text is cut after
/// the last `}` before it. Brackets left open are then closed, and a final
/// `}` is guaranteed.
pub fn repair_truncation(json: &str) -> String {
    let mut repaired = json.trim_end().to_string();

    if let Some(pos) = find_ellipsis_marker(&repaired) {
        if let Some(brace) = repaired[..pos].rfind('}') {
            repaired.truncate(brace + 1);
        }
    }

    let mut repaired = close_open_brackets(&repaired);
    if !repaired.ends_with('}') {
        repaired.push('}');
    }
    repaired
}

/// Byte offset of the first `...` or `…` that is not part of a string value.
fn find_ellipsis_marker(json: &str) -> Option<usize> {
    let mut state = StringState::default();

    for (i, c) in json.char_indices() {
        if state.advance(c) || state.in_string {
            continue;
        }
        if c == '…' || json[i..].starts_with("...") {
            return Some(i);
        }
    }
    None
}

/// Close string literals, objects and arrays left open at the end of the text.
pub fn close_open_brackets(json: &str) -> String {
    let mut state = StringState::default();
    let mut open = Vec::new();

    for c in json.chars() {
        if state.advance(c) {
            continue;
        }
        match c {
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' if open.last() == Some(&c) => {
                open.pop();
            }
            _ => {}
        }
    }

    let mut out = json.to_string();
    if state.in_string {
        if state.escaped {
            out.pop();
        }
        out.push('"');
    }
    if open.is_empty() {
        return out;
    }

    out.truncate(out.trim_end().len());
    if out.ends_with(',') {
        out.pop();
    }
    if out.ends_with(':') {
        out.push_str("null");
    }
    while let Some(closer) = open.pop() {
        out.push(closer);
    }
    out
}

/// Drop carriage returns, turn tabs into spaces and escape raw newlines in strings.
pub fn clean_control_characters(json: &str) -> String {
    let mut state = StringState::default();
    let mut out = String::with_capacity(json.len());

    for c in json.chars() {
        let in_string = state.advance(c);
        match c {
            '\r' => {}
            '\t' => out.push(' '),
            '\n' if in_string => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove commas directly before a closing `}` or `]`.
pub fn remove_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut state = StringState::default();
    let mut out = String::with_capacity(json.len());

    for (i, &c) in chars.iter().enumerate() {
        let in_string = state.advance(c);
        if !in_string && c == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Tracks whether a character stream is inside a JSON string literal.
#[derive(Debug, Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Advance over `c`. Returns true when `c` is string content (quotes excluded).
    fn advance(&mut self, c: char) -> bool {
        if !self.in_string {
            if c == '"' {
                self.in_string = true;
            }
            return false;
        }

        if self.escaped {
            self.escaped = false;
            return true;
        }
        match c {
            '\\' => {
                self.escaped = true;
                true
            }
            '"' => {
                self.in_string = false;
                false
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_code_fences() {
        let text = "Hier ist das Ergebnis:\n```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "Hier ist das Ergebnis:\n\n{\"a\": 1}\n");
    }

    #[test]
    fn test_locate_candidate_in_prose() {
        let text = r#"Gerne! {"lieferant": "Foo", "datum": "01.02.2024", "positionen": []} Viel Erfolg."#;
        assert_eq!(
            locate_candidate(text),
            Some(r#"{"lieferant": "Foo", "datum": "01.02.2024", "positionen": []}"#)
        );
    }

    #[test]
    fn test_locate_candidate_requires_anchor_order() {
        assert_eq!(locate_candidate(r#"{"datum": "x", "lieferant": "y", "positionen": []}"#), None);
        assert_eq!(locate_candidate(r#"{"lieferant": "y"}"#), None);
    }

    #[test]
    fn test_repair_locale_numbers() {
        let json = r#"{"gesamtbetrag": "1.056,50", "einzelpreis":"56,50", "gesamtpreis": "1,400.50", "menge": "1.234.567,89 €"}"#;
        assert_eq!(
            repair_locale_numbers(json),
            r#"{"gesamtbetrag": "1056.50", "einzelpreis": "56.50", "gesamtpreis": "1400.50", "menge": "1234567.89 €"}"#
        );
    }

    #[test]
    fn test_repair_locale_numbers_leaves_other_keys() {
        let json = r#"{"lieferant": "12,50 Bau GmbH", "rohtext": "Summe 1.056,50"}"#;
        assert_eq!(repair_locale_numbers(json), json);
    }

    #[test]
    fn test_truncation_with_ellipsis() {
        let json = r#"{"a": {"b": 1}, "positionen": [{"c": 2}, ...]"#;
        assert_eq!(repair_truncation(json), r#"{"a": {"b": 1}, "positionen": [{"c": 2}]}"#);

        let json = r#"{"a": {"b": 1}, "c": 3 …"#;
        assert_eq!(repair_truncation(json), r#"{"a": {"b": 1}}"#);
    }

    #[test]
    fn test_ellipsis_inside_string_is_kept() {
        let json = r#"{"positionen": [{"beschreibung": "Teil"}, {"beschreibung": "Schrauben..."}]}"#;
        assert_eq!(repair_truncation(json), json);

        let json = r#"{"a": {"b": 1}, "c": "Text … abgeschnitten"#;
        assert_eq!(repair_truncation(json), r#"{"a": {"b": 1}, "c": "Text … abgeschnitten"}"#);
    }

    #[test]
    fn test_truncation_closes_open_brackets() {
        let json = r#"{"positionen": [{"beschreibung": "Teil"}, {"beschreibung": "Zw"#;
        assert_eq!(
            repair_truncation(json),
            r#"{"positionen": [{"beschreibung": "Teil"}, {"beschreibung": "Zw"}]}"#
        );
    }

    #[test]
    fn test_truncation_after_colon() {
        assert_eq!(repair_truncation(r#"{"datum": "#), r#"{"datum":null}"#);
    }

    #[test]
    fn test_truncation_appends_brace() {
        assert_eq!(repair_truncation(r#"{"a": 1} x"#), r#"{"a": 1} x}"#);
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let json = r#"{"beschreibung": "Set {3 Teile} [neu]"}"#;
        assert_eq!(close_open_brackets(json), json);
    }

    #[test]
    fn test_clean_control_characters() {
        let json = "{\r\n\t\"rohtext\": \"Zeile 1\nZeile 2\"\r\n}";
        assert_eq!(
            clean_control_characters(json),
            "{\n \"rohtext\": \"Zeile 1\\nZeile 2\"\n}"
        );
    }

    #[test]
    fn test_remove_trailing_commas() {
        let json = r#"{"a": [1, 2,], "b": "x, ]",}"#;
        assert_eq!(remove_trailing_commas(json), r#"{"a": [1, 2], "b": "x, ]"}"#);
    }

    #[test]
    fn test_repair_candidate_produces_valid_json() {
        let candidate = "{\"lieferant\": \"Foo\",\r\n\"datum\": \"01.02.2024\",\n\"gesamtbetrag\": \"1.056,50\",\n\"positionen\": [{\"beschreibung\": \"Teil\", \"menge\": \"2\",},]}";
        let repaired = repair_candidate(candidate);

        let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["gesamtbetrag"], "1056.50");
        assert_eq!(value["positionen"][0]["menge"], "2");
    }
}
