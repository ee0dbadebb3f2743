//! Identity normalization: free-text names and affiliations to comparable keys.

/// Lower-case, collapse whitespace runs to one space, trim, and drop every
/// character outside `[a-z0-9 ]`.
///
/// No locale awareness: accented letters and punctuation are removed outright,
/// so "O'Neil" and "ONeil" share a key.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

/// `"<norm(name)> (<norm(affiliation)>)"`, always with the parenthesised part,
/// so a key with an empty affiliation ends in `" ()"`.
pub fn identity_key(name: &str, affiliation: &str) -> String {
    format!("{} ({})", normalize(name), normalize(affiliation))
}

/// Human-facing label: `"Name (Affiliation)"`, or just the name when the
/// affiliation is blank.
pub fn display_name(name: &str, affiliation: &str) -> String {
    let name = name.trim();
    let affiliation = affiliation.trim();
    if affiliation.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({affiliation})")
    }
}
