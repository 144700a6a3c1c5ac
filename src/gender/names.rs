use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing crypt group marker: "(G1)", "(g4)"
static GROUP_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([Gg]\d+\)\s*$").expect("Failed to compile group suffix regex"));

/// Trailing advanced marker: "(ADV)", "(G3 ADV)"
static ADVANCED_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(.*[Aa][Dd][Vv].*\)\s*$").expect("Failed to compile advanced suffix regex")
});

const TITLE_PREFIXES: [&str; 8] = [
    "The ", "Dr. ", "Lord ", "Lady ", "Prince ", "Baron ", "Don ", "Doña ",
];

/// Remove group and advanced markers from a crypt card name
pub fn strip_group_notation(name: &str) -> String {
    let name = GROUP_SUFFIX.replace(name, "");
    let name = ADVANCED_SUFFIX.replace(&name, "");
    name.trim().to_string()
}

/// Part of a name before the first comma: "Enkidu, The Noah" -> "Enkidu"
pub fn short_name(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

/// Name reduced to what a given-name lookup can use:
/// group markers, epithets after a comma and one leading title are removed.
pub fn clean_name(full_name: &str) -> String {
    let base = strip_group_notation(full_name);
    let name = short_name(&base);

    for prefix in TITLE_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
            break;
        }
    }
    name.to_string()
}

pub fn first_word(name: &str) -> Option<&str> {
    name.split_whitespace().next()
}
