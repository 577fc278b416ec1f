//! Project name normalisation.

/// Convert a string to kebab-case.
///
/// | Input | Output |
/// |-------|--------|
/// | "My App" | "my-app" |
/// | "myApp" | "my-app" |
/// | "my_app" | "my-app" |
/// | "HTTPServer" | "http-server" |
/// | "app2go" | "app-2-go" |
///
/// Used for the manifest `name` and the docs config.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Split a string into lowercase words.
///
/// ## Word Boundary Detection
///
/// 1. **Separators:** anything that is not alphanumeric ends a word
/// 2. **Case transition (camelCase):** `aB` splits between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` splits between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
/// 4. **Digits:** a run of digits is its own word, so `v2` is `v` and `2`
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let digit_edge = (c.is_alphabetic() && next.is_numeric())
                || (c.is_numeric() && next.is_alphabetic());
            if digit_edge || (c.is_lowercase() && next.is_uppercase()) {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
