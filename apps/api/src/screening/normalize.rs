use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+").unwrap());
static RT_CC: Lazy<Regex> = Lazy::new(|| Regex::new(r"RT|cc").unwrap());
static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\S+").unwrap());
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\S+").unwrap());
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[[:punct:]]").unwrap());
static NON_ASCII: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]").unwrap());
// Information separators (U+001C..U+001F) count as whitespace too.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x1C-\x1F]+").unwrap());

/// Cleans raw resume text into a single line of ASCII words.
///
/// Each pass replaces its matches with a space, in this order:
/// URLs, the `RT`/`cc` tokens, hashtags, mentions, ASCII punctuation,
/// non-ASCII characters. Whitespace runs are then collapsed and the result trimmed.
///
/// `RT` and `cc` match anywhere, including inside words ("Accounting" → "A ounting").
pub fn clean_resume_text(input: impl AsRef<str>) -> String {
    let text = input.as_ref();
    let text = URL.replace_all(text, " ");
    let text = RT_CC.replace_all(&text, " ");
    let text = HASHTAG.replace_all(&text, " ");
    let text = MENTION.replace_all(&text, " ");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = NON_ASCII.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim_matches(is_space).to_string()
}

/// True when `text` holds nothing but whitespace or information separators.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_space)
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn assert_clean_invariants(out: &str) {
        // `http` survives only when nothing follows it, as in "see http".
        let url_left = out
            .match_indices("http")
            .any(|(i, _)| !matches!(out.as_bytes().get(i + 4), None | Some(b' ')));
        assert!(!url_left, "URL left in {out:?}");
        assert!(!out.contains('#') && !out.contains('@'), "marker left in {out:?}");
        assert!(out.is_ascii(), "non-ASCII left in {out:?}");
        assert!(!out.contains("  "), "double space in {out:?}");
        assert_eq!(out, out.trim());
    }

    #[test]
    fn test_reference_example() {
        assert_eq!(
            clean_resume_text("Check http://x.com #ai @bob RT now!!"),
            "Check now"
        );
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            clean_resume_text("Portfolio: https://github.com/someone/repo done"),
            "Portfolio done"
        );
    }

    #[test]
    fn test_strips_email_fragment() {
        assert_eq!(clean_resume_text("Email jane@example.com today"), "Email jane today");
    }

    #[test]
    fn test_strips_rt_and_cc_inside_words() {
        assert_eq!(clean_resume_text("Accounting RTOS"), "A ounting OS");
    }

    #[test]
    fn test_strips_punctuation_and_non_ascii() {
        assert_eq!(
            clean_resume_text("Skills: C++, Node.js — façade (déjà vu)"),
            "Skills C Node js fa ade d j vu"
        );
    }

    #[test]
    fn test_bare_http_word_is_kept() {
        assert_eq!(clean_resume_text("see http"), "see http");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            clean_resume_text("  Senior\t\tEngineer\n\n  Python  "),
            "Senior Engineer Python"
        );
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        for s in ["Data Science Python SQL", "Java Developer 5 years", "abc 123 XYZ"] {
            let once = clean_resume_text(s);
            assert_eq!(clean_resume_text(&once), once);
        }
    }

    #[test]
    fn test_information_separators_are_whitespace() {
        assert_eq!(clean_resume_text("a\u{1c}\u{1c}b\u{1f}"), "a b");
        assert!(is_blank("\u{1c}\u{1f} \n\u{1d}"));
        assert!(is_blank(""));
        assert!(!is_blank("\u{1e}x"));
    }

    proptest! {
        #[test]
        fn prop_cleaned_text_invariants(input in any::<String>()) {
            assert_clean_invariants(&clean_resume_text(&input));
        }

        #[test]
        fn prop_url_like_text_invariants(
            input in r"(http|#|@|RT|cc|[a-z]|[ .:/\t\x1C]|é){0,40}"
        ) {
            assert_clean_invariants(&clean_resume_text(&input));
        }

        #[test]
        fn prop_cleaning_is_idempotent(input in "[a-zA-Z0-9 ]{0,64}") {
            let once = clean_resume_text(&input);
            prop_assert_eq!(clean_resume_text(&once), once);
        }
    }

    #[test]
    fn test_accepts_owned_strings() {
        let owned = String::from("Python, SQL!");
        assert_eq!(clean_resume_text(owned), "Python SQL");
        assert_eq!(clean_resume_text(42.to_string()), "42");
    }
}
