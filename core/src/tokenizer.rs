use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
}

/// Tokenize text into lowercase terms using NFKC normalization.
///
/// Terms are maximal alphanumeric runs; everything else is a boundary.
/// Duplicates and input order are preserved so callers can count frequencies.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    TOKEN
        .find_iter(&normalized)
        .map(|mat| mat.as_str().to_string())
        .collect()
}
