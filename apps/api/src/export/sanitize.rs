//! Text sanitizer for the PDF writer.
//!
//! Only printable ASCII is guaranteed renderable by the built-in Helvetica
//! faces. Everything else is transliterated to its nearest ASCII
//! equivalent or dropped. Lossy by design — sanitizing never fails.

/// Sanitizes a string to the guaranteed-renderable repertoire.
///
/// Printable ASCII passes through verbatim, whitespace controls collapse to
/// a space, and everything else goes through `transliterate`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' => out.push(' '),
            _ => {
                if let Some(replacement) = transliterate(c) {
                    out.push_str(replacement);
                }
            }
        }
    }
    out
}

/// ASCII replacement for a character outside the repertoire, or `None` to
/// drop it. Deterministic: the same character always maps the same way.
fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        // Bullets and list markers
        '\u{2022}' | '\u{00B7}' | '\u{2023}' | '\u{25CF}' | '\u{25AA}' | '\u{25E6}' => "-",
        // Hyphen/dash family (hyphen, non-breaking hyphen, figure dash,
        // en dash, em dash, horizontal bar, minus sign)
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        // Quotes and apostrophes
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{00B4}' | '\u{02BC}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => "\"",
        // Ellipsis
        '\u{2026}' => "...",
        // Space family (NBSP, en/em/thin/hair spaces, narrow NBSP)
        '\u{00A0}' | '\u{2002}'..='\u{200A}' | '\u{202F}' => " ",
        // Arrows (common in tech resumes)
        '\u{2192}' => "->",
        '\u{2190}' => "<-",
        // Latin letters with diacritics
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'ç' => "c",
        'Ç' => "C",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ñ' => "n",
        'Ñ' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        // No reasonable equivalent (emoji, CJK, ...): drop.
        _ => return None,
    };
    Some(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_ascii_is_lossless() {
        let all_ascii: String = (0x20u8..=0x7E).map(|b| b as char).collect();
        assert_eq!(sanitize(&all_ascii), all_ascii);
    }

    #[test]
    fn test_typographic_punctuation_is_transliterated() {
        assert_eq!(sanitize("\u{2022} shipped \u{2013} fast"), "- shipped - fast");
        assert_eq!(sanitize("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(sanitize("it\u{2019}s"), "it's");
        assert_eq!(sanitize("etc\u{2026}"), "etc...");
    }

    #[test]
    fn test_accented_letters_lose_diacritics() {
        assert_eq!(sanitize("Zoë Müller, résumé"), "Zoe Muller, resume");
        assert_eq!(sanitize("São Paulo"), "Sao Paulo");
    }

    #[test]
    fn test_unmappable_characters_are_dropped() {
        assert_eq!(sanitize("Rust \u{1F980} dev"), "Rust  dev");
        assert_eq!(sanitize("日本語"), "");
    }

    #[test]
    fn test_whitespace_controls_become_spaces() {
        assert_eq!(sanitize("a\tb\nc"), "a b c");
        assert_eq!(sanitize("non\u{00A0}breaking"), "non breaking");
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let input = "café \u{2014} 100% \u{2192} done \u{1F389}";
        assert_eq!(sanitize(input), sanitize(input));
        assert_eq!(sanitize(input), "cafe - 100% -> done ");
    }
}
