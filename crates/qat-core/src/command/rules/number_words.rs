//! Conversion of spelled-out Arabic cardinals into integers.
//!
//! Tables hold folded spellings only, so "أربعة", "اربعة" and "أربعه" all
//! hit the single entry `اربعه`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

use super::numerals::fold_arabic;
use super::patterns::DIGIT_RUN;

/// Meaning of a single number word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberWord {
    /// Units, teens, tens and hundreds: added into the running value.
    Value(u64),
    /// Thousand and million words: scale the running value.
    Multiplier(u64),
}

const UNITS: &[(&str, u64)] = &[
    ("صفر", 0),
    ("واحد", 1),
    ("واحده", 1),
    ("احد", 1),
    ("احدي", 1),
    ("اثنين", 2),
    ("اثنان", 2),
    ("اثنتين", 2),
    ("اثنتان", 2),
    ("اثنا", 2),
    ("اثني", 2),
    ("ثنتين", 2),
    ("ثلاث", 3),
    ("ثلاثه", 3),
    ("تلات", 3),
    ("تلاته", 3),
    ("اربع", 4),
    ("اربعه", 4),
    ("خمس", 5),
    ("خمسه", 5),
    ("ست", 6),
    ("سته", 6),
    ("سبع", 7),
    ("سبعه", 7),
    ("ثمان", 8),
    ("ثماني", 8),
    ("ثمانيه", 8),
    ("تسع", 9),
    ("تسعه", 9),
    ("عشر", 10),
    ("عشره", 10),
];

const TENS: &[(&str, u64)] = &[
    ("عشرين", 20),
    ("عشرون", 20),
    ("ثلاثين", 30),
    ("ثلاثون", 30),
    ("تلاتين", 30),
    ("اربعين", 40),
    ("اربعون", 40),
    ("خمسين", 50),
    ("خمسون", 50),
    ("ستين", 60),
    ("ستون", 60),
    ("سبعين", 70),
    ("سبعون", 70),
    ("ثمانين", 80),
    ("ثمانون", 80),
    ("تسعين", 90),
    ("تسعون", 90),
];

const HUNDREDS: &[(&str, u64)] = &[
    ("مئه", 100),
    ("مائه", 100),
    ("ميه", 100),
    ("مايه", 100),
    ("مئتين", 200),
    ("مئتان", 200),
    ("مائتين", 200),
    ("مائتان", 200),
    ("ميتين", 200),
];

/// Leading digits of the compound hundreds ("ثلاثمائه", "خمسميه", ...).
const HUNDRED_PREFIXES: &[(&str, u64)] = &[
    ("ثلاث", 3),
    ("تلات", 3),
    ("اربع", 4),
    ("خمس", 5),
    ("ست", 6),
    ("سبع", 7),
    ("ثمان", 8),
    ("ثماني", 8),
    ("تسع", 9),
];

const HUNDRED_STEMS: &[&str] = &["مئه", "مائه", "ميه"];

const MULTIPLIERS: &[(&str, u64)] = &[
    ("الف", 1_000),
    ("الاف", 1_000),
    ("الفين", 2_000),
    ("الفان", 2_000),
    ("مليون", 1_000_000),
    ("ملايين", 1_000_000),
    ("مليونين", 2_000_000),
    ("مليونان", 2_000_000),
];

lazy_static! {
    static ref NUMBER_WORDS: HashMap<String, NumberWord> = {
        let mut words = HashMap::new();

        for (word, value) in UNITS.iter().chain(TENS).chain(HUNDREDS) {
            words.insert((*word).to_string(), NumberWord::Value(*value));
        }

        for (prefix, digit) in HUNDRED_PREFIXES {
            for stem in HUNDRED_STEMS {
                words.insert(format!("{}{}", prefix, stem), NumberWord::Value(digit * 100));
            }
        }

        for (word, value) in MULTIPLIERS {
            words.insert((*word).to_string(), NumberWord::Multiplier(*value));
        }

        words
    };
}

/// Look up a folded token, accepting a leading "و" conjunction ("وعشرين").
pub fn lookup_number_word(token: &str) -> Option<NumberWord> {
    if let Some(word) = NUMBER_WORDS.get(token) {
        return Some(*word);
    }

    token
        .strip_prefix('و')
        .filter(|rest| !rest.is_empty())
        .and_then(|rest| NUMBER_WORDS.get(rest).copied())
}

/// Running state of the additive number model.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Accumulator {
    total: u64,
    current: u64,
}

impl Accumulator {
    pub(crate) fn push(&mut self, word: NumberWord) {
        match word {
            NumberWord::Value(value) => {
                self.current = self.current.saturating_add(value);
            }
            NumberWord::Multiplier(scale) => {
                let base = if self.current == 0 { 1 } else { self.current };
                self.total = self.total.saturating_add(base.saturating_mul(scale));
                self.current = 0;
            }
        }
    }

    pub(crate) fn value(&self) -> u64 {
        self.total.saturating_add(self.current)
    }
}

/// Split folded text into candidate number tokens, dropping punctuation.
pub(crate) fn tokens(folded: &str) -> impl Iterator<Item = &str> {
    folded
        .split(|c: char| {
            c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '،' | '؛' | '؟')
        })
        .filter(|t| !t.is_empty())
}

/// Parse an ASCII digit run, saturating on overflow.
pub(crate) fn parse_digit_run(run: &str) -> u64 {
    run.parse().unwrap_or(u64::MAX)
}

/// Value of the number words at the start of `folded`, stopping at the first
/// word that is not part of a number. `None` when no number word leads.
pub(crate) fn leading_number_words(folded: &str) -> Option<u64> {
    let mut acc = Accumulator::default();
    let mut consumed = false;

    for token in tokens(folded) {
        if token == "و" {
            continue;
        }
        match lookup_number_word(token) {
            Some(word) => {
                acc.push(word);
                consumed = true;
            }
            None => break,
        }
    }

    consumed.then(|| acc.value())
}

/// Converted number together with the tokens that were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberWords {
    /// Converted value.
    pub value: u64,
    /// Folded tokens that matched no table and were ignored.
    pub residual: Vec<String>,
}

/// Convert an Arabic number (digits or words) to an integer.
///
/// A digit run anywhere in the text wins over words. Words are summed
/// additively, multipliers scale what precedes them ("ألف" alone is 1000),
/// and unknown tokens are skipped.
///
/// ```
/// use qat_core::words_to_number;
///
/// assert_eq!(words_to_number("خمسة وعشرين ألف"), 25_000);
/// assert_eq!(words_to_number("١٠"), 10);
/// ```
pub fn words_to_number(text: &str) -> u64 {
    words_to_number_detailed(text).value
}

/// Same as [`words_to_number`], also reporting the skipped tokens.
pub fn words_to_number_detailed(text: &str) -> NumberWords {
    let folded = fold_arabic(text);
    let folded = folded.trim();

    if let Some(run) = DIGIT_RUN.find(folded) {
        return NumberWords {
            value: parse_digit_run(run.as_str()),
            residual: Vec::new(),
        };
    }

    let mut acc = Accumulator::default();
    let mut residual = Vec::new();

    for token in tokens(folded) {
        if token == "و" {
            continue;
        }
        match lookup_number_word(token) {
            Some(word) => acc.push(word),
            None => residual.push(token.to_string()),
        }
    }

    NumberWords {
        value: acc.value(),
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_words() {
        assert_eq!(words_to_number("عشرة"), 10);
        assert_eq!(words_to_number("الف"), 1000);
        assert_eq!(words_to_number("ألف"), 1000);
        assert_eq!(words_to_number("صفر"), 0);
        assert_eq!(words_to_number("ثمانون"), 80);
        assert_eq!(words_to_number("واحد"), 1);
    }

    #[test]
    fn test_digits_take_priority() {
        assert_eq!(words_to_number("١٠"), 10);
        assert_eq!(words_to_number("۱۵"), 15);
        assert_eq!(words_to_number("خمسة 20"), 20);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(words_to_number("خمسة الاف"), 5000);
        assert_eq!(words_to_number("عشرة آلاف"), 10_000);
        assert_eq!(words_to_number("ألفين"), 2000);
        assert_eq!(words_to_number("مليون"), 1_000_000);
        assert_eq!(words_to_number("ثلاثة ملايين"), 3_000_000);
    }

    #[test]
    fn test_composition() {
        assert_eq!(words_to_number("خمسة وعشرين ألف"), 25_000);
        assert_eq!(words_to_number("خمسة عشر"), 15);
        assert_eq!(words_to_number("ثلاثة آلاف وخمسمائة"), 3500);
        assert_eq!(words_to_number("مئة وخمسة"), 105);
        assert_eq!(words_to_number("مئتين و خمسين"), 250);
        assert_eq!(words_to_number("ثلاثمائة-عشرين"), 320);
    }

    #[test]
    fn test_trailing_punctuation_is_not_residual() {
        let detailed = words_to_number_detailed("عشرة آلاف؟");
        assert_eq!(detailed.value, 10_000);
        assert!(detailed.residual.is_empty());
        assert_eq!(words_to_number("خمسة عشر."), 15);
    }

    #[test]
    fn test_hundred_spellings() {
        for word in ["مئة", "مائة", "مية", "ميه"] {
            assert_eq!(words_to_number(word), 100, "word {}", word);
        }
        assert_eq!(words_to_number("خمسمية"), 500);
        assert_eq!(words_to_number("تسعمائة"), 900);
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        let detailed = words_to_number_detailed("تقريبا خمسة آلاف ريال");
        assert_eq!(detailed.value, 5000);
        assert_eq!(detailed.residual, vec!["تقريبا".to_string(), "ريال".to_string()]);

        assert_eq!(words_to_number("مرحبا"), 0);
        assert_eq!(words_to_number(""), 0);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        assert_eq!(words_to_number("99999999999999999999999999"), u64::MAX);
        let huge = "مليون ".repeat(8) + "مليون مليون";
        let _ = words_to_number(&huge);
        assert_eq!(words_to_number("ألف مليون"), 1_001_000);
    }

    #[test]
    fn test_deterministic() {
        let inputs = ["خمسة وعشرين ألف", "١٢٣", "كلام فقط", "🌿"];
        for input in inputs {
            assert_eq!(words_to_number(input), words_to_number(input));
        }
    }

    #[test]
    fn test_leading_number_words() {
        assert_eq!(leading_number_words("عشره الاف للزبون"), Some(10_000));
        assert_eq!(leading_number_words("و خمسه"), Some(5));
        assert_eq!(leading_number_words("عشره الاف."), Some(10_000));
        assert_eq!(leading_number_words("خمسه وعشرين الف، للزبون"), Some(25_000));
        assert_eq!(leading_number_words("يع طوفان"), None);
        assert_eq!(leading_number_words(""), None);
    }
}
