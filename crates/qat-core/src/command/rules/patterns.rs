//! Common regex patterns for Arabic sale and debt commands.
//!
//! Patterns over the folded form (see [`fold_arabic`](super::numerals::fold_arabic))
//! spell every word once: `ه` for ta marbuta, bare `ا` for hamza alefs.
//! Name patterns run over digit-normalized text so captures keep the
//! user's spelling.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Digit runs (ASCII only, input is digit-normalized first)
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();

    pub static ref DECIMAL_RUN: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap();

    pub static ref LEADING_AMOUNT: Regex = Regex::new(r"^[0-9][0-9,]*(?:\.[0-9]+)?").unwrap();

    // Quantity (folded): "3 حبات", "نص حبه", "ثلاث وحدات"
    pub static ref QUANTITY_COUNTED: Regex = Regex::new(
        r"([0-9]+(?:\.[0-9]+)?|[^\s0-9]+)\s*(?:حبتين|حبات|حبه|وحدات|وحده)"
    ).unwrap();

    pub static ref QUANTITY_DUAL: Regex = Regex::new(r"(?:^|\s)حبتين(?:\s|$)").unwrap();

    pub static ref QUANTITY_KEYWORD: Regex = Regex::new(r"(?:^|\s)(?:ال)?كميه[\s:]*(\S+)").unwrap();

    // Price (folded): "بسعر 15000", "بالسعر 50", "ب عشره الاف", "بمبلغ 50000"
    pub static ref PRICE_MARKER: Regex = Regex::new(
        r"(?:^|\s)(?:(?:بال|ال|ب)?(?:سعر|ثمن|مبلغ)|ب)[\s:]*"
    ).unwrap();

    pub static ref PRICE_CURRENCY: Regex = Regex::new(
        r"([0-9][0-9,]*(?:\.[0-9]+)?)\s*(?:ريال|ر\.ي|ر ي)"
    ).unwrap();

    pub static ref PRICE_SUFFIXED: Regex = Regex::new(r"سعر(?:ها|ه)[\s:]*").unwrap();

    // Bounded by non-letters only, so "15الف" and "الاف." count but "الفاتوره" does not
    pub static ref THOUSAND_WORD: Regex = Regex::new(r"(?:^|\P{L})و?(?:الف|الاف)(?:\P{L}|$)").unwrap();

    // Product fallbacks (digit-normalized)
    pub static ref PRODUCT_LABELLED: Regex = Regex::new(
        r"(?:^|\s)(?:منتج|نوع|صنف)[\s:]*([^\s0-9:]+)"
    ).unwrap();

    pub static ref PRODUCT_BEFORE_UNIT: Regex = Regex::new(
        r"([^\s0-9]+)\s+(?:[0-9]+(?:\.[0-9]+)?\s*)?(?:حبتين|حبات|حبة|حبه|وحدات|وحدة|وحده)"
    ).unwrap();

    // Customer (digit-normalized); the capture is a single run of Arabic letters
    pub static ref CUSTOMER_NOUN: Regex = Regex::new(
        r"(?:^|\s)(?:لل|ل|ال)?(?:زبون|عميل|شخص)[\s:]+([\x{0621}-\x{063A}\x{0641}-\x{064A}]+)"
    ).unwrap();

    pub static ref CUSTOMER_NAMED: Regex = Regex::new(
        r"(?:^|\s)(?:باسم|[اإ]سمه|[اإ]سم)[\s:]+([\x{0621}-\x{063A}\x{0641}-\x{064A}]+)"
    ).unwrap();

    pub static ref CUSTOMER_DEBTOR: Regex = Regex::new(
        r"(?:^|\s)على[\s:]+([\x{0621}-\x{063A}\x{0641}-\x{064A}]+)"
    ).unwrap();

    pub static ref CUSTOMER_DATIVE: Regex = Regex::new(
        r"(?:^|\s)لـ?\s*([\x{0621}-\x{063A}\x{0641}-\x{064A}]+)"
    ).unwrap();
}
