//! Fixed-size character chunking with overlap.

/// A slice of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position in the document's chunk sequence.
    pub index: usize,
    /// Byte offset of the chunk in the normalized text.
    pub offset: usize,
    pub content: String,
}

/// Collapse runs of whitespace (PDF extraction leaves plenty) into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into chunks of at most `max_chars` bytes, each starting
/// `overlap` bytes before the end of the previous one.
///
/// Boundaries are moved back onto char boundaries and, when one is close,
/// onto the last space so words are not cut in half. Blank input yields no
/// chunks.
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Vec<TextChunk> {
    let text = normalize_whitespace(text);
    let len = text.len();
    if len == 0 || max_chars == 0 {
        return Vec::new();
    }
    if len <= max_chars {
        return vec![TextChunk {
            index: 0,
            offset: 0,
            content: text,
        }];
    }

    let overlap = overlap.min(max_chars.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < len {
        let mut end = (start + max_chars).min(len);
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // Window narrower than one character: take the whole character.
            end = next_char_boundary(&text, start);
        }
        if end < len {
            // Prefer a word boundary in the back half of the window.
            let window = &text[start..end];
            if let Some(space) = window.rfind(' ') {
                if space > window.len() / 2 {
                    end = start + space;
                }
            }
        }

        let content = text[start..end].trim().to_string();
        if !content.is_empty() {
            chunks.push(TextChunk {
                index: chunks.len(),
                offset: start,
                content,
            });
        }
        if end == len {
            break;
        }

        let mut next_start = end.saturating_sub(overlap);
        while next_start > 0 && !text.is_char_boundary(next_start) {
            next_start -= 1;
        }
        if next_start <= start {
            next_start = end;
        }
        start = next_start;
    }

    chunks
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    let mut idx = from + 1;
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(text.len())
}
