//! Emoji removal
//!
//! The PDF builtin fonts have no glyphs for pictographs, so they are removed
//! before any markup is produced.

/// Inclusive code point ranges removed by [`strip_emoji`].
pub const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map symbols
    (0x1F700, 0x1F77F), // alchemical symbols
    (0x1F780, 0x1F7FF), // geometric shapes extended
    (0x1F800, 0x1F8FF), // supplemental arrows-c
    (0x1F900, 0x1F9FF), // supplemental symbols & pictographs
    (0x1FA00, 0x1FA6F), // chess symbols
    (0x1FA70, 0x1FAFF), // symbols & pictographs extended-a
    (0x1F170, 0x1F251), // enclosed alphanumeric / ideographic supplement
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2702, 0x27B0),   // dingbats
    (0x2B00, 0x2BFF),   // miscellaneous symbols and arrows
    (0x3030, 0x3030),   // wavy dash
    (0x303D, 0x303D),   // part alternation mark
    (0x3297, 0x3297),   // circled ideograph congratulation
    (0x3299, 0x3299),   // circled ideograph secret
    (0x24C2, 0x24C2),   // circled M
    (0x200D, 0x200D),   // zero width joiner
    (0x20E3, 0x20E3),   // combining enclosing keycap
    (0xFE0E, 0xFE0F),   // variation selectors
];

/// Whether `c` falls inside one of [`EMOJI_RANGES`].
pub fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Removes emoji code points and trims the result.
pub fn strip_emoji(text: &str) -> String {
    let stripped: String = text.chars().filter(|&c| !is_emoji(c)).collect();
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_report_emoji() {
        assert_eq!(strip_emoji("🚩 Red Flags"), "Red Flags");
        assert_eq!(strip_emoji("📊 Company Overview"), "Company Overview");
        assert_eq!(strip_emoji("✅ Green Lights"), "Green Lights");
        assert_eq!(strip_emoji("⚠️ Careful"), "Careful");
        assert_eq!(strip_emoji("🇺🇸 US listed"), "US listed");
    }

    #[test]
    fn test_keeps_text_and_punctuation() {
        let text = "Revenue grew 12% (YoY) – café • naïve";
        assert_eq!(strip_emoji(text), text);
    }

    #[test]
    fn test_every_range_boundary_is_stripped() {
        for &(start, end) in EMOJI_RANGES {
            for cp in [start, end] {
                let c = char::from_u32(cp).unwrap();
                assert!(is_emoji(c), "U+{:X} not stripped", cp);
                assert_eq!(strip_emoji(&format!(" {} ", c)), "");
            }
        }

        for cp in [0x2B00, 0x2B50, 0x2BFF, 0x3030, 0x303D, 0x3297, 0x3299] {
            let c = char::from_u32(cp).unwrap();
            assert!(is_emoji(c), "U+{:X} not stripped", cp);
        }
    }

    #[test]
    fn test_symbols_and_arrows_stripped() {
        assert_eq!(strip_emoji("⭐ Rating"), "Rating");
        assert_eq!(strip_emoji("⬆️ up ⬛ ⭕"), "up");
        assert_eq!(strip_emoji("〰〽㊗㊙"), "");
    }

    #[test]
    fn test_cjk_text_survives() {
        let text = "特斯拉 財務 〜 テスラ";
        assert_eq!(strip_emoji(text), text);
    }

    #[test]
    fn test_zwj_sequences_vanish_entirely() {
        // Family emoji joined with ZWJ
        assert_eq!(strip_emoji("👨‍👩‍👧 family office"), "family office");
    }
}
