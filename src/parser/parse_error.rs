use std::fmt::Display;

/// A parse failure with the offending fragment and its location.
///
/// `start` and `end` are character offsets into the statement text; `line`
/// and `column` are 1-based and point at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: &str, start: usize, end: usize, source: &[char]) -> Self {
        let end = end.min(source.len()).max(start.min(source.len()));
        let start = start.min(end);
        let (line, column) = Self::line_and_column(source, start);

        Self {
            message: message.to_string(),
            text: source[start..end].iter().collect(),
            start,
            end,
            line,
            column,
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }

    fn line_and_column(source: &[char], offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for ch in source.iter().take(offset) {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ParseError: {}\n  at line {}, column {} [{}:{}] -> '{}'",
            self.message,
            self.line,
            self.column,
            self.start,
            self.end,
            self.text
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    pub fn test_position_on_second_line() {
        let source: Vec<char> = "SELECT a\nFROM t !".chars().collect();

        let err = ParseError::new("Unexpected character", 16, 17, &source);

        assert_eq!(err.text, "!");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 8);
    }

    #[test]
    pub fn test_range_is_clamped_to_source() {
        let source: Vec<char> = "abc".chars().collect();

        let err = ParseError::new("Unexpected end of input", 3, 10, &source);

        assert_eq!(err.text, "");
        assert_eq!(err.start, 3);
        assert_eq!(err.end, 3);
    }
}
