//! Source text with line/column mapping for diagnostics

/// Owned source text plus the byte offset of every line start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based index of the line containing `offset`
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// 1-based (line, column); the column counts characters, not bytes
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self.line_index(offset);
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - start);
        (line + 1, column + 1)
    }

    /// Text of a 0-based line without its terminator
    pub fn line_text(&self, index: usize) -> &str {
        let Some(&start) = self.line_starts.get(index) else {
            return "";
        };
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }
}

impl std::fmt::Display for SourceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let source = SourceText::new("var x = 1");
        assert_eq!(source.line_count(), 1);
        assert_eq!(source.line_col(4), (1, 5));
    }

    #[test]
    fn test_line_index_at_boundaries() {
        let source = SourceText::new("a\nbc\n\nd");
        assert_eq!(source.line_count(), 4);
        assert_eq!(source.line_index(0), 0);
        assert_eq!(source.line_index(1), 0); // the newline itself
        assert_eq!(source.line_index(2), 1);
        assert_eq!(source.line_index(5), 2);
        assert_eq!(source.line_index(6), 3);
    }

    #[test]
    fn test_line_col_multiline() {
        let source = SourceText::new("var x = 1\nx = 2");
        assert_eq!(source.line_col(10), (2, 1));
        assert_eq!(source.line_col(14), (2, 5));
    }

    #[test]
    fn test_line_col_counts_chars() {
        let source = SourceText::new("\"é\" + y");
        // the closing quote is byte 3 but only the third character
        assert_eq!(source.line_col(3), (1, 3));
    }

    #[test]
    fn test_line_col_past_end_clamps() {
        let source = SourceText::new("ab");
        assert_eq!(source.line_col(100), (1, 3));
    }

    #[test]
    fn test_line_text_strips_terminators() {
        let source = SourceText::new("first\r\nsecond\n");
        assert_eq!(source.line_text(0), "first");
        assert_eq!(source.line_text(1), "second");
        assert_eq!(source.line_text(2), "");
        assert_eq!(source.line_text(9), "");
    }
}
