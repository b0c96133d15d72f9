use crate::MatchGroup;

/// Render match groups as the plain-text context block sent to the model.
///
/// Each group becomes a `[Company]:` header followed by one bullet per
/// question; groups are separated by a blank line.
pub fn format_context(groups: &[MatchGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            let mut block = format!("[{}]:", group.company);
            for entry in &group.matches {
                block.push_str(&format!("\n• {} (tags: {})", entry.text, entry.tags.join(", ")));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
