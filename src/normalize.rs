/// Canonical form of a concept or relation label.
///
/// Lower-cases the label, trims surrounding white space and removes
/// trailing underscores, which mark disambiguated duplicate concept names.
/// Labels are only ever compared in this form.
pub fn normalize(label: &str) -> String {
    label
        .trim_start()
        .trim_end_matches(|c: char| c == '_' || c.is_whitespace())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Dog"), "dog");
        assert_eq!(normalize("  ARG0 "), "arg0");
        assert_eq!(normalize("dog__"), "dog");
        assert_eq!(normalize("_dog"), "_dog");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("___"), "");
    }

    #[test]
    fn test_disambiguation_marker() {
        assert_eq!(normalize("Dog_"), normalize("dog"));
    }

    #[test]
    fn test_idempotence() {
        for label in &["Dog_", " bark-01 ", "a _", "_", "MiXeD_ _", "\"John\"", "x\t_"] {
            let once = normalize(label);
            assert_eq!(normalize(&once), once, "label {:?}", label);
        }
    }
}
