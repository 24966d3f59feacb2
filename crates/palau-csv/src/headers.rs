/*!
# Header Normalization

Makes a raw header row safe to use as record keys:

- an empty header, or an engine placeholder such as `field3`, becomes `blank_<i>`
- a header that appears more than once becomes `duplicate_<i>_<header>`
- everything else is kept as is

`<i>` is always the zero-based column position, and every decision is made
against the raw row, never against names rewritten earlier in the pass.
[`clean_header_title`] reverses the convention.
*/

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

static PLACEHOLDER_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^field[0-9]+$").expect("placeholder pattern is valid"));

static BLANK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^blank_[0-9]+$").expect("blank pattern is valid"));

static DUPLICATE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^duplicate_[0-9]+_(.*)$").expect("duplicate pattern is valid"));

/// Whether a raw header counts as "no name given"
pub fn is_blank_header(header: &str) -> bool {
    header.is_empty() || PLACEHOLDER_HEADER.is_match(header)
}

fn blank_name(index: usize) -> String {
    format!("blank_{}", index)
}

fn duplicate_name(index: usize, header: &str) -> String {
    format!("duplicate_{}_{}", index, header)
}

/// Normalize a raw header row into unique, non-empty record keys
///
/// The output is positionally aligned with `raw` and has the same length.
/// A raw header that happens to spell a name synthesized for another column
/// (e.g. a literal `blank_1` next to an empty second column) is renamed with
/// the duplicate rule so the result stays unique and reversible.
pub fn normalize_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for header in raw {
        *occurrences.entry(header.as_ref()).or_default() += 1;
    }

    let mut renamed = vec![false; raw.len()];
    let mut headers: Vec<String> = raw
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let header = header.as_ref();
            if is_blank_header(header) {
                renamed[i] = true;
                blank_name(i)
            } else if occurrences[header] > 1 {
                renamed[i] = true;
                duplicate_name(i, header)
            } else {
                header.to_string()
            }
        })
        .collect();

    // Synthesized names embed a unique index, so only untouched headers can clash with them.
    loop {
        let taken: HashSet<String> = headers
            .iter()
            .zip(&renamed)
            .filter(|(_, renamed)| **renamed)
            .map(|(name, _)| name.clone())
            .collect();

        let mut changed = false;
        for (i, header) in raw.iter().enumerate() {
            if !renamed[i] && taken.contains(&headers[i]) {
                debug!(column = i, header = header.as_ref(), "header collides with a synthesized name");
                headers[i] = duplicate_name(i, header.as_ref());
                renamed[i] = true;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    headers
}

/// Strip the normalization convention from a header
///
/// `blank_<n>` maps to the empty string, `duplicate_<n>_<rest>` maps to
/// `<rest>`, anything else is returned unchanged.
pub fn clean_header_title(header: &str) -> String {
    if BLANK_HEADER.is_match(header) {
        return String::new();
    }
    match DUPLICATE_HEADER.captures(header) {
        Some(captures) => captures
            .get(1)
            .map(|rest| rest.as_str().to_string())
            .unwrap_or_default(),
        None => header.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Vec<&'static str>> {
        vec![
            vec![],
            vec!["name", "age", "city"],
            vec!["", "", "name", "", "age", ""],
            vec!["name", "age", "name", "city"],
            vec!["field1", "field2", "name", "field3"],
            vec!["field1", "", "age", "name", "field2"],
            vec!["name", "name", "name"],
            vec!["", "", "name", "", "age", "age"],
            vec!["blank_1", ""],
            vec!["", "blank_0", "duplicate_1_blank_0"],
            vec!["duplicate_1_a", "a", "a"],
            vec!["a_1", "a", "a", "1"],
            vec!["Field1", "field", "field1x", "NAME", "name"],
        ]
    }

    #[test]
    fn test_plain_headers_are_untouched() {
        assert_eq!(
            normalize_headers(&["name", "age", "city"]),
            vec!["name", "age", "city"]
        );
    }

    #[test]
    fn test_blank_headers() {
        assert_eq!(
            normalize_headers(&["", "", "name", "", "age", ""]),
            vec!["blank_0", "blank_1", "name", "blank_3", "age", "blank_5"]
        );
    }

    #[test]
    fn test_placeholder_headers_count_as_blank() {
        assert_eq!(
            normalize_headers(&["field1", "field2", "name", "field3"]),
            vec!["blank_0", "blank_1", "name", "blank_3"]
        );
    }

    #[test]
    fn test_placeholder_pattern_is_anchored_and_case_sensitive() {
        assert!(is_blank_header(""));
        assert!(is_blank_header("field0"));
        assert!(is_blank_header("field123"));
        assert!(!is_blank_header("field"));
        assert!(!is_blank_header("Field1"));
        assert!(!is_blank_header("field1x"));
        assert!(!is_blank_header("myfield1"));
        assert!(!is_blank_header(" "));
    }

    #[test]
    fn test_duplicate_headers() {
        assert_eq!(
            normalize_headers(&["name", "age", "name", "city"]),
            vec!["duplicate_0_name", "age", "duplicate_2_name", "city"]
        );
        assert_eq!(
            normalize_headers(&["name", "name", "name"]),
            vec!["duplicate_0_name", "duplicate_1_name", "duplicate_2_name"]
        );
    }

    #[test]
    fn test_duplicate_comparison_is_exact() {
        assert_eq!(
            normalize_headers(&["name", "Name", " name"]),
            vec!["name", "Name", " name"]
        );
    }

    #[test]
    fn test_blank_rule_wins_over_duplicate_rule() {
        assert_eq!(
            normalize_headers(&["field1", "", "age", "name", "field1", ""]),
            vec!["blank_0", "blank_1", "age", "name", "blank_4", "blank_5"]
        );
    }

    #[test]
    fn test_literal_header_clashing_with_synthesized_name() {
        assert_eq!(
            normalize_headers(&["blank_1", ""]),
            vec!["duplicate_0_blank_1", "blank_1"]
        );
        assert_eq!(
            normalize_headers(&["", "blank_0", "duplicate_1_blank_0"]),
            vec!["blank_0", "duplicate_1_blank_0", "duplicate_2_duplicate_1_blank_0"]
        );
    }

    #[test]
    fn test_length_is_preserved() {
        for raw in samples() {
            assert_eq!(normalize_headers(&raw).len(), raw.len(), "{:?}", raw);
        }
    }

    #[test]
    fn test_headers_are_unique_and_non_empty() {
        for raw in samples() {
            let normalized = normalize_headers(&raw);
            let unique: HashSet<&String> = normalized.iter().collect();
            assert_eq!(unique.len(), normalized.len(), "{:?} -> {:?}", raw, normalized);
            assert!(normalized.iter().all(|h| !h.is_empty()));
        }
    }

    #[test]
    fn test_clean_recovers_renamed_headers() {
        for raw in samples() {
            let normalized = normalize_headers(&raw);
            for (i, (name, original)) in normalized.iter().zip(&raw).enumerate() {
                if is_blank_header(original) {
                    assert_eq!(clean_header_title(name), "", "column {} of {:?}", i, raw);
                } else if name != original {
                    assert_eq!(&clean_header_title(name), original, "column {} of {:?}", i, raw);
                }
            }
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in samples() {
            let once = normalize_headers(&raw);
            assert_eq!(normalize_headers(&once), once, "{:?}", raw);
        }
    }

    #[test]
    fn test_clean_header_title() {
        assert_eq!(clean_header_title("blank_0"), "");
        assert_eq!(clean_header_title("blank_12"), "");
        assert_eq!(clean_header_title("duplicate_2_name"), "name");
        assert_eq!(clean_header_title("duplicate_0_email"), "email");
        assert_eq!(clean_header_title("duplicate_15_city"), "city");
        assert_eq!(clean_header_title("duplicate_3_4_5_x"), "4_5_x");
        assert_eq!(clean_header_title("duplicate_7_"), "");
        assert_eq!(clean_header_title("duplicate_1_multi\nline"), "multi\nline");
        assert_eq!(clean_header_title("name"), "name");
        assert_eq!(clean_header_title("blank_"), "blank_");
        assert_eq!(clean_header_title("blank_1x"), "blank_1x");
        assert_eq!(clean_header_title("duplicate_x_name"), "duplicate_x_name");
        assert_eq!(clean_header_title(""), "");
    }
}
