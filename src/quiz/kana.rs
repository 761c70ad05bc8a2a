/// Offset between a katakana code point and its hiragana counterpart
const KATAKANA_OFFSET: u32 = 0x60;
/// Offset between full-width ASCII (U+FF01..U+FF5E) and ASCII
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

/// Fold an answer into a canonical form for comparison
///
/// Whitespace (including the ideographic space) is removed, katakana becomes
/// hiragana, full-width ASCII becomes ASCII and everything is lowercased, so
/// `"ネコ"`, `" ねこ "` and `"ね こ"` all compare equal.
pub fn normalize_kana(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_char)
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_char(c: char) -> char {
    let code = c as u32;
    let folded = match code {
        0x30A1..=0x30F6 => code - KATAKANA_OFFSET,
        0xFF01..=0xFF5E => code - FULLWIDTH_OFFSET,
        _ => code,
    };
    char::from_u32(folded).unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_katakana_folds_to_hiragana() {
        assert_eq!(normalize_kana("ネコ"), "ねこ");
        assert_eq!(normalize_kana("コンピューター"), "こんぴゅーたー");
        assert_eq!(normalize_kana("ヴ"), "ゔ");
    }

    #[test]
    fn test_whitespace_removed() {
        assert_eq!(normalize_kana("  ね こ\u{3000}"), "ねこ");
    }

    #[test]
    fn test_fullwidth_ascii() {
        assert_eq!(normalize_kana("ＡＢＣ１２３"), "abc123");
    }

    #[test]
    fn test_other_text_untouched() {
        assert_eq!(normalize_kana("猫"), "猫");
        assert_eq!(normalize_kana("ー"), "ー");
    }
}
