use crate::parser::tokens::Token;

/// Matches a keyword, or a run of keywords such as `GROUP BY`, against the
/// token stream without regard to case.
#[derive(Debug, Default, Clone)]
pub struct WordComparer {
    pub length: usize,
    pub words: Vec<String>,
}

impl WordComparer {
    pub fn new(phrase: &str) -> Self {
        let words: Vec<String> = phrase.split_whitespace().map(|w| w.to_uppercase()).collect();
        Self {
            length: words.len(),
            words,
        }
    }

    pub fn compare(&self, tokens: &[Token]) -> bool {
        if tokens.len() < self.length {
            return false;
        }

        self.words
            .iter()
            .zip(tokens.iter())
            .all(|(word, token)| token.is_word(word))
    }

    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}
