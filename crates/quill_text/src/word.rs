//! Word boundaries for cursor movement and double-click selection
//!
//! A word is a run of letters and digits. Positions are byte offsets on
//! character boundaries.

fn is_word(c: char) -> bool {
    c.is_alphanumeric()
}

fn is_punctuation(c: char) -> bool {
    !is_word(c) && !c.is_whitespace()
}

fn skip_forward(text: &str, mut pos: usize, pred: impl Fn(char) -> bool) -> usize {
    for c in text[pos..].chars() {
        if !pred(c) {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

fn skip_back(text: &str, mut pos: usize, pred: impl Fn(char) -> bool) -> usize {
    for c in text[..pos].chars().rev() {
        if !pred(c) {
            break;
        }
        pos -= c.len_utf8();
    }
    pos
}

/// Range of the word around `pos`
///
/// Outside a word the range covers the single character at `pos`.
pub fn find_word(text: &str, pos: usize) -> (usize, usize) {
    let mut end = skip_forward(text, pos, is_word);
    let start = skip_back(text, pos, is_word);
    if start == end {
        if let Some(c) = text[end..].chars().next() {
            end += c.len_utf8();
        }
    }
    (start, end)
}

/// Position after the next word or run of punctuation
pub fn next_word(text: &str, pos: usize) -> usize {
    let pos = skip_forward(text, pos, char::is_whitespace);
    match text[pos..].chars().next() {
        None => pos,
        Some(c) if is_word(c) => skip_forward(text, pos, is_word),
        Some(_) => skip_forward(text, pos, is_punctuation),
    }
}

/// Position before the previous word or run of punctuation
pub fn previous_word(text: &str, pos: usize) -> usize {
    let pos = skip_back(text, pos, char::is_whitespace);
    match text[..pos].chars().next_back() {
        None => pos,
        Some(c) if is_word(c) => skip_back(text, pos, is_word),
        Some(_) => skip_back(text, pos, is_punctuation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_word() {
        assert_eq!(find_word("hello world", 2), (0, 5));
        assert_eq!(find_word("hello world", 5), (0, 5));
        assert_eq!(find_word("hello world", 6), (6, 11));
        assert_eq!(find_word("a  b", 2), (2, 3));
        assert_eq!(find_word("", 0), (0, 0));
        assert_eq!(find_word("x, €", 3), (3, 6));
    }

    #[test]
    fn test_next_word() {
        let t = "hello world";
        assert_eq!(next_word(t, 0), 5);
        assert_eq!(next_word(t, 5), 11);
        assert_eq!(next_word(t, 11), 11);
        assert_eq!(next_word("foo.bar", 3), 4);
        assert_eq!(next_word("foo...bar", 3), 6);
    }

    #[test]
    fn test_previous_word() {
        let t = "hello world";
        assert_eq!(previous_word(t, 11), 6);
        assert_eq!(previous_word(t, 6), 0);
        assert_eq!(previous_word(t, 0), 0);
        assert_eq!(previous_word("foo.bar", 4), 3);
        assert_eq!(previous_word("grüße dich", 6), 0);
    }
}
