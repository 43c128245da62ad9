#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitText<'a> {
    pub leading: &'a str,
    pub middle: &'a str,
    pub trailing: &'a str,
}

/// Splits a text run around its non-whitespace core. Returns `None` when the
/// value holds nothing but whitespace.
pub fn split_text(text: &str) -> Option<SplitText<'_>> {
    let (start, end) = split_text_bounds(text)?;
    Some(SplitText {
        leading: &text[..start],
        middle: &text[start..end],
        trailing: &text[end..],
    })
}

pub(crate) fn split_text_bounds(text: &str) -> Option<(usize, usize)> {
    let mut start = None;
    let mut end = None;
    for (idx, ch) in text.char_indices() {
        if !ch.is_whitespace() {
            start = Some(idx);
            break;
        }
    }
    for (idx, ch) in text.char_indices().rev() {
        if !ch.is_whitespace() {
            end = Some(idx + ch.len_utf8());
            break;
        }
    }
    match (start, end) {
        (Some(s), Some(e)) if s < e => Some((s, e)),
        _ => None,
    }
}

pub(crate) fn has_content(text: &str) -> bool {
    text.chars().any(|ch| !ch.is_whitespace())
}
