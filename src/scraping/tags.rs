/// Normalize a comma-separated tag list: trim every segment and drop empty ones.
///
/// `"a, b ,, c"` becomes `"a,b,c"`. Normalizing an already-normalized list
/// returns it unchanged.
pub fn normalize_tag_list(tags: &str) -> String {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Optional form of [`normalize_tag_list`]; absent stays absent.
pub fn normalize_tags(tags: Option<&str>) -> Option<String> {
    tags.map(normalize_tag_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_segments_and_drops_empty_ones() {
        assert_eq!(normalize_tag_list("a, b ,, c"), "a,b,c");
        assert_eq!(normalize_tag_list("  p  "), "p");
        assert_eq!(normalize_tag_list(" , ,"), "");
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(normalize_tags(None), None);
        assert_eq!(normalize_tags(Some("div ,span")), Some("div,span".to_string()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "a, b ,, c",
            "",
            ",,,",
            "section.main , article",
            "\tp,\n li ,h1",
            "div",
        ];
        for input in inputs {
            let once = normalize_tag_list(input);
            assert_eq!(normalize_tag_list(&once), once, "input: {input:?}");
        }
    }
}
