//! Token engine: `{token}` extraction and rendering.
//!
//! A token is a curly-brace-delimited identifier made of ASCII letters,
//! digits, and underscores (`{guest}`, `{pay_to}`, `{item2}`). Anything else
//! inside braces is plain text.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("Invalid regex"));

/// How unfilled tokens are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Trimmed value, or a visible `[token]` marker when blank or missing
    #[default]
    Preview,
    /// Trimmed value, or nothing when blank or missing
    Final,
    /// Exact value with no trimming; missing tokens keep their `{token}` text
    Verbatim,
}

impl RenderMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Final => "final",
            Self::Verbatim => "verbatim",
        }
    }
}

/// Extract the distinct token names used in `content`.
///
/// Names are case-sensitive and returned in locale order: `_` before digits
/// before letters, letters compared case-insensitively with lowercase first
/// on a tie.
///
/// # Examples
///
/// ```
/// use aetherkit_core::extract_tokens;
///
/// let tokens = extract_tokens("Thanks {guest}! Total {total}, {guest}");
/// assert_eq!(tokens, vec!["guest", "total"]);
/// ```
#[must_use]
pub fn extract_tokens(content: &str) -> Vec<String> {
    let mut tokens = TOKEN_RE
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    tokens.sort_by(|a, b| collate(a, b));
    tokens
}

/// Substitute every token occurrence in `content` according to `mode`.
#[must_use]
pub fn render_template(content: &str, values: &HashMap<String, String>, mode: RenderMode) -> String {
    TOKEN_RE
        .replace_all(content, |cap: &Captures<'_>| {
            let name = &cap[1];
            match mode {
                RenderMode::Verbatim => values
                    .get(name)
                    .map_or_else(|| cap[0].to_string(), Clone::clone),
                RenderMode::Preview | RenderMode::Final => {
                    let value = values.get(name).map_or("", |value| value.trim());
                    if !value.is_empty() {
                        value.to_string()
                    } else if mode == RenderMode::Preview {
                        format!("[{name}]")
                    } else {
                        String::new()
                    }
                }
            }
        })
        .into_owned()
}

/// Token names still unfilled (missing or blank after trimming)
#[must_use]
pub fn missing_tokens(content: &str, values: &HashMap<String, String>) -> Vec<String> {
    extract_tokens(content)
        .into_iter()
        .filter(|name| values.get(name).is_none_or(|value| value.trim().is_empty()))
        .collect()
}

fn collate(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| s.chars().map(primary_weight).collect::<Vec<_>>();
    let tertiary = |s: &str| {
        s.chars()
            .map(|c| u8::from(c.is_ascii_uppercase()))
            .collect::<Vec<_>>()
    };

    primary(a)
        .cmp(&primary(b))
        .then_with(|| tertiary(a).cmp(&tertiary(b)))
        .then_with(|| a.cmp(b))
}

fn primary_weight(c: char) -> u32 {
    match c {
        '_' => 0,
        '0'..='9' => 1 + u32::from(c) - u32::from('0'),
        c if c.is_ascii_alphabetic() => 11 + u32::from(c.to_ascii_lowercase()) - u32::from('a'),
        other => 100 + u32::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_extract_tokens_dedup_and_sort() {
        let tokens = extract_tokens("{venue} | {time} | {world} {venue}");
        assert_eq!(tokens, vec!["time", "venue", "world"]);
    }

    #[test]
    fn test_extract_tokens_none() {
        assert!(extract_tokens("no placeholders here").is_empty());
        assert!(extract_tokens("").is_empty());
    }

    #[test]
    fn test_extract_tokens_case_sensitive() {
        let tokens = extract_tokens("{Guest} {guest} {GUEST}");
        assert_eq!(tokens, vec!["guest", "Guest", "GUEST"]);
    }

    #[test]
    fn test_extract_tokens_locale_order() {
        let tokens = extract_tokens("{b} {A} {a} {_x} {1} {10} {2}");
        assert_eq!(tokens, vec!["_x", "1", "10", "2", "a", "A", "b"]);
    }

    #[test]
    fn test_extract_tokens_ignores_invalid_shapes() {
        let tokens = extract_tokens("{} {with space} {dash-name} {{double}} {ok_1}");
        assert_eq!(tokens, vec!["double", "ok_1"]);
    }

    #[test]
    fn test_extract_tokens_round_trips_own_output() {
        let tokens = extract_tokens("Hi {guest}, {items} for {total} to {pay_to} at {Venue}");
        let rebuilt = tokens
            .iter()
            .map(|name| format!("{{{name}}}"))
            .collect::<String>();
        assert_eq!(extract_tokens(&rebuilt), tokens);
    }

    #[test]
    fn test_extract_tokens_sorted_without_duplicates() {
        let samples = [
            "{z}{y}{x}{z}",
            "{B}{b}{a}{A}{_}{9}",
            "Order: {items}\nTotal: {total} gil\nPay to: {pay_to}",
        ];
        for sample in samples {
            let tokens = extract_tokens(sample);
            for pair in tokens.windows(2) {
                assert_eq!(collate(&pair[0], &pair[1]), Ordering::Less, "{sample}");
            }
        }
    }

    #[test]
    fn test_render_preview_marks_missing() {
        let rendered = render_template(
            "Thanks {guest}, total {total}",
            &values(&[("guest", "  Aria ")]),
            RenderMode::Preview,
        );
        assert_eq!(rendered, "Thanks Aria, total [total]");
    }

    #[test]
    fn test_render_preview_marks_blank() {
        let rendered = render_template("Hi {guest}", &values(&[("guest", "   ")]), RenderMode::Preview);
        assert_eq!(rendered, "Hi [guest]");
    }

    #[test]
    fn test_render_final_drops_missing() {
        let rendered = render_template(
            "Thanks {guest}, total {total}",
            &values(&[("total", "500")]),
            RenderMode::Final,
        );
        assert_eq!(rendered, "Thanks , total 500");
    }

    #[test]
    fn test_render_final_never_leaves_filled_placeholders() {
        let content = "{a} {b} {a} {c_1}";
        let filled = values(&[("a", "x"), ("b", " y "), ("c_1", "z")]);
        let rendered = render_template(content, &filled, RenderMode::Final);
        assert_eq!(rendered, "x y x z");
        assert!(extract_tokens(&rendered).is_empty());
    }

    #[test]
    fn test_render_verbatim_passes_through_missing() {
        let rendered = render_template(
            "Hi {guest} at {venue}",
            &values(&[("guest", "  Aria  ")]),
            RenderMode::Verbatim,
        );
        assert_eq!(rendered, "Hi   Aria   at {venue}");
    }

    #[test]
    fn test_render_verbatim_empty_entry_renders_empty() {
        let rendered = render_template("[{guest}]", &values(&[("guest", "")]), RenderMode::Verbatim);
        assert_eq!(rendered, "[]");
    }

    #[test]
    fn test_render_leaves_non_token_braces() {
        let rendered = render_template("{not a token} {x}", &values(&[("x", "1")]), RenderMode::Final);
        assert_eq!(rendered, "{not a token} 1");
    }

    #[test]
    fn test_missing_tokens() {
        let missing = missing_tokens("{guest} {total} {items}", &values(&[("guest", "A"), ("total", " ")]));
        assert_eq!(missing, vec!["items", "total"]);
    }
}
