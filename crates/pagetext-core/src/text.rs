/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("\u{FB01}nal \u{FB02}ow"), "final flow");
        assert_eq!(expand_ligatures("e\u{FB00}ort o\u{FB03}ce"), "effort office");
        assert_eq!(expand_ligatures("ba\u{FB04}e"), "baffle");
        assert_eq!(expand_ligatures("\u{FB05}op \u{FB06}ar"), "stop star");
    }

    #[test]
    fn test_expand_ligatures_plain_text_unchanged() {
        assert_eq!(expand_ligatures("--- PAGE 1 ---"), "--- PAGE 1 ---");
    }
}
