//! Line splitting
//!
//! Raw input is split on a delimiter into logical lines, and each line on
//! whitespace into words.

/// Default logical line delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// One logical line: the non-empty words of a delimiter-separated segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub words: Vec<&'a str>,
}

impl LogicalLine<'_> {
    /// The line re-joined with single spaces
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Splits text into logical lines and words
#[derive(Debug, Clone, Copy)]
pub struct LineSplitter {
    delimiter: char,
}

impl LineSplitter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Split text into logical lines, dropping segments that are empty after trimming
    pub fn split<'a>(&self, text: &'a str) -> Vec<LogicalLine<'a>> {
        text.split(self.delimiter)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| LogicalLine {
                words: segment.split_whitespace().collect(),
            })
            .collect()
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        LineSplitter::default()
            .split(text)
            .iter()
            .map(LogicalLine::text)
            .collect()
    }

    #[test]
    fn test_split_trims_segments() {
        assert_eq!(texts("A, B ,C"), ["A", "B", "C"]);
    }

    #[test]
    fn test_delimiter_only_is_empty() {
        assert!(texts(",").is_empty());
        assert!(texts(" , ,, ").is_empty());
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_words_split_on_whitespace_runs() {
        let lines = LineSplitter::default().split("hello \t  big\nworld");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words, ["hello", "big", "world"]);
    }

    #[test]
    fn test_order_preserved() {
        assert_eq!(texts("one,two words,three"), ["one", "two words", "three"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let lines = LineSplitter::new('|').split("a,b|c");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words, ["a,b"]);
    }
}
