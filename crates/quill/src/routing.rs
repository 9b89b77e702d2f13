use std::path::Path;

/// A `[name]` placeholder inside a route pattern.
#[derive(Debug, PartialEq, Clone)]
pub struct ParameterDef {
    pub(crate) key: String,
    pub(crate) index: usize,
    pub(crate) length: usize,
}

pub fn extract_params_from_pattern(pattern: &str) -> Vec<ParameterDef> {
    let mut params = Vec::new();
    let mut start = 0;

    while let Some(bracket_pos) = pattern[start..].find('[') {
        let abs_pos = start + bracket_pos;

        // An odd number of backslashes before the bracket escapes it
        let backslash_count = pattern[..abs_pos]
            .chars()
            .rev()
            .take_while(|&c| c == '\\')
            .count();

        if backslash_count % 2 == 1 {
            start = abs_pos + 1;
            continue;
        }

        let Some(end_bracket) = pattern[abs_pos + 1..].find(']') else {
            break;
        };

        let end_pos = abs_pos + 1 + end_bracket;
        params.push(ParameterDef {
            key: pattern[abs_pos + 1..end_pos].to_string(),
            index: abs_pos,
            length: end_pos - abs_pos + 1,
        });

        start = end_pos + 1;
    }

    params
}

/// Patterns whose last segment has an extension (`/feed.xml`) are served as-is instead of as a directory index.
pub fn guess_if_pattern_is_endpoint(pattern: &str) -> bool {
    Path::new(pattern).extension().is_some()
}
