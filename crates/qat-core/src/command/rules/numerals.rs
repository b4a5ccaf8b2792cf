//! Digit normalization and letter folding for Arabic command text.

/// Replace Arabic-Indic (٠-٩) and Persian/Urdu (۰-۹) digits with ASCII digits.
///
/// Every other character passes through unchanged.
pub fn normalize_digits(text: &str) -> String {
    text.chars().map(ascii_digit).collect()
}

fn ascii_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

/// Fold text into the form used for keyword and table lookups.
///
/// Digits are normalized, Latin letters lowercased, hamza-carrying alefs
/// become a bare alef, ta marbuta becomes ha, alef maqsura becomes ya, and
/// tatweel plus diacritics are dropped.
pub fn fold_arabic(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => folded.push('\u{0627}'),
            '\u{0629}' => folded.push('\u{0647}'),
            '\u{0649}' => folded.push('\u{064A}'),
            '\u{0640}' => {}
            c if is_diacritic(c) => {}
            c => {
                let c = ascii_digit(c);
                if c.is_ascii_uppercase() {
                    folded.push(c.to_ascii_lowercase());
                } else {
                    folded.push(c);
                }
            }
        }
    }

    folded
}

/// Tashkeel marks (U+064B..U+065F) and the superscript alef.
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_arabic_indic_digits() {
        assert_eq!(normalize_digits("٠١٢٣٤٥٦٧٨٩"), "0123456789");
        assert_eq!(normalize_digits("بسعر ١٥٠٠٠"), "بسعر 15000");
    }

    #[test]
    fn test_normalize_persian_digits() {
        assert_eq!(normalize_digits("۰۱۲۳۴۵۶۷۸۹"), "0123456789");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_digits(""), "");
        assert_eq!(normalize_digits("0123456789"), "0123456789");
        assert_eq!(normalize_digits("طوفان 🌿 abc"), "طوفان 🌿 abc");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = ["", "١٢ حبة", "۵ کیلو", "mixed ٣ and 4", "!!!", "🍃٤٢"];
        for s in samples {
            let once = normalize_digits(s);
            assert_eq!(normalize_digits(&once), once, "input {:?}", s);
        }
    }

    #[test]
    fn test_fold_letters() {
        assert_eq!(fold_arabic("أحمد"), "احمد");
        assert_eq!(fold_arabic("آلاف"), "الاف");
        assert_eq!(fold_arabic("خمسة"), "خمسه");
        assert_eq!(fold_arabic("إحدى"), "احدي");
        assert_eq!(fold_arabic("بـ عشرة"), "ب عشره");
        assert_eq!(fold_arabic("مُعَلَّق"), "معلق");
        assert_eq!(fold_arabic("رقم ١ ABC"), "رقم 1 abc");
    }
}
