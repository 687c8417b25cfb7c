//! BCP 47 language tag helpers.
//!
//! Getty data carries tags such as `nl`, `zh-latn-pinyin` or `en-US`, and
//! occasionally none at all. Tags are validated with `oxilangtag`; anything
//! that does not parse becomes the undetermined tag [`UNDETERMINED`].

use oxilangtag::LanguageTag;
use tracing::warn;

/// The "undetermined" language tag.
pub const UNDETERMINED: &str = "und";

/// Returns true if `tag` is a well-formed BCP 47 language tag.
#[must_use]
pub fn is_valid(tag: &str) -> bool {
    LanguageTag::parse(tag).is_ok()
}

/// Returns a usable language tag, coercing missing or malformed tags to `und`.
///
/// Malformed tags are logged at WARN level.
#[must_use]
pub fn normalize(tag: Option<&str>) -> String {
    match tag {
        None | Some("") => UNDETERMINED.to_string(),
        Some(t) if is_valid(t) => t.to_string(),
        Some(t) => {
            warn!(language = t, "invalid language tag, using 'und'");
            UNDETERMINED.to_string()
        },
    }
}

/// Returns the primary language subtag of `tag`, lower-cased.
///
/// Region, script and variant subtags are dropped: `nl-BE` becomes `nl`.
#[must_use]
pub fn base(tag: &str) -> String {
    match LanguageTag::parse(tag) {
        Ok(parsed) => parsed.primary_language().to_ascii_lowercase(),
        Err(_) => tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
    }
}

/// Case-insensitive comparison of two complete tags.
#[must_use]
pub fn same_tag(a: &str, b: &str) -> bool {
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

/// Returns true if both tags share the same primary language.
#[must_use]
pub fn same_base(a: &str, b: &str) -> bool {
    let base_a = base(a);
    !base_a.is_empty() && base_a == base(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some("nl")), "nl");
        assert_eq!(normalize(Some("zh-latn-pinyin")), "zh-latn-pinyin");
        assert_eq!(normalize(None), "und");
        assert_eq!(normalize(Some("")), "und");
        assert_eq!(normalize(Some("not a tag!")), "und");
    }

    #[test]
    fn test_base() {
        assert_eq!(base("nl-BE"), "nl");
        assert_eq!(base("EN"), "en");
        assert_eq!(base("zh-Hant-TW"), "zh");
    }

    #[test]
    fn test_comparisons() {
        assert!(same_tag("en-GB", "en-gb"));
        assert!(!same_tag("", ""));
        assert!(same_base("nl-BE", "nl"));
        assert!(!same_base("de", "nl"));
    }
}
