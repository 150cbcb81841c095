//! Reference classification.

/// The shape of an image reference, inferred from its content.
///
/// Variants are listed in the order they are checked. The order matters:
/// `data:image/png;base64,iVBOR…` contains no `/` at the front and would
/// otherwise be taken for a bare relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind<'a> {
    /// Absent, empty, or only whitespace.
    Missing,

    /// A `data:` URI. Renderable as is.
    InlineData(&'a str),

    /// `http://` or `https://`. Renderable as is.
    Absolute(&'a str),

    /// Starts with `/`: relative to the server origin.
    RootRelative(&'a str),

    /// Anything else: a bare path relative to the server origin.
    Relative(&'a str),
}

/// Classifies a reference. Surrounding whitespace is ignored and scheme
/// markers are matched case-insensitively.
pub fn classify(reference: Option<&str>) -> ReferenceKind<'_> {
    let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty())
    else {
        return ReferenceKind::Missing;
    };

    if has_prefix(reference, "data:") {
        ReferenceKind::InlineData(reference)
    } else if has_prefix(reference, "http://") || has_prefix(reference, "https://") {
        ReferenceKind::Absolute(reference)
    } else if reference.starts_with('/') {
        ReferenceKind::RootRelative(reference)
    } else {
        ReferenceKind::Relative(reference)
    }
}

fn has_prefix(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
