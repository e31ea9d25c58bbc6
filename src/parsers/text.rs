/// Joins text nodes into a single line of text
///
/// This function normalizes node text by:
/// - Trimming whitespace from each node
/// - Dropping nodes that are empty after trimming
/// - Joining the remaining nodes with single spaces
/// - Collapsing any internal runs of whitespace
pub fn join_nodes<'a, I>(nodes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let parts = nodes
        .into_iter()
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .collect::<Vec<_>>();

    normalize_whitespace(&parts.join(" "))
}

/// Collapses all whitespace runs (including newlines) into single spaces and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the normalized text, or `None` if nothing but whitespace remains
pub fn non_empty(text: &str) -> Option<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
