// Tue Jan 13 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;

/// Minimum number of bits needed to represent `value`; zero takes none.
pub fn count_bits_taken(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()) as usize
}

pub fn hex_word(word: u32) -> String {
    format!("0x{:08X}", word)
}

pub fn hex_words(words: &[u32]) -> String {
    words.iter().map(|w| hex_word(*w)).collect::<Vec<_>>().join(" ")
}

/// Parses `0x`-prefixed hex or plain decimal into a 32-bit value.
pub fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => s.replace('_', "").parse().ok(),
    }
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
