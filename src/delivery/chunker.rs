//! Splits long text into pieces that fit a single attachment body.
//!
//! Break points are chosen in order of preference: the last newline inside
//! the window (unless it sits in the first half), then the last plain space,
//! then a hard cut at the limit. Lengths are measured in characters.

/// Slack renders at most this many characters in one attachment body before
/// collapsing it behind "Show more".
pub const DESCRIPTION_LIMIT: usize = 4000;

/// Lazily split `text` into chunks of at most `limit` characters.
///
/// Text that already fits is yielded unchanged as a single chunk, including
/// the empty string.
///
/// # Examples
///
/// ```
/// use recap::delivery::chunker::chunk_text;
///
/// let chunks: Vec<&str> = chunk_text("Line 1\nLine 2\nLine 3 is very long...", 20).collect();
/// assert_eq!(chunks, vec!["Line 1\nLine 2", "Line 3 is very", "long..."]);
/// ```
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> TextChunks<'_> {
    TextChunks {
        remaining: Some(text),
        limit: limit.max(1),
    }
}

/// Iterator returned by [`chunk_text`].
#[derive(Debug, Clone)]
pub struct TextChunks<'a> {
    remaining: Option<&'a str>,
    limit: usize,
}

impl<'a> Iterator for TextChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let remaining = self.remaining.take()?;

        if remaining.chars().count() <= self.limit {
            return Some(remaining);
        }

        let cut = find_break(remaining, self.limit);
        let rest = remaining[cut..].trim();
        if !rest.is_empty() {
            self.remaining = Some(rest);
        }

        Some(&remaining[..cut])
    }
}

impl std::iter::FusedIterator for TextChunks<'_> {}

/// Byte offset of the `n`th character, or the string length when `s` is shorter.
#[must_use]
fn byte_offset_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}

/// Pick the byte offset to cut at. `text` must be longer than `limit` characters.
fn find_break(text: &str, limit: usize) -> usize {
    let hard_cut = byte_offset_of_char(text, limit);
    // Offsets up to and including `limit` are candidates.
    let window = &text[..byte_offset_of_char(text, limit + 1)];

    let newline = window
        .rfind('\n')
        .filter(|&idx| idx > 0 && window[..idx].chars().count() * 2 >= limit);
    if let Some(idx) = newline {
        return idx;
    }

    window
        .rfind(' ')
        .filter(|&idx| idx > 0)
        .unwrap_or(hard_cut)
}
