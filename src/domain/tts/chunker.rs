use super::error::SynthesisError;
use regex::Regex;

/// Per-request text limit of the synthesis backends
pub const DEFAULT_CHUNK_MAX_LEN: usize = 500;

const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "approx.", "inc.", "ltd.",
];

/// One backend request worth of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

/// Rule deciding where one sentence ends and the next begins.
///
/// Returned segments must be contiguous slices of `text` that cover it
/// completely, in order.
pub trait SentenceBoundary: Send + Sync {
    fn segments<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Splits after `.`, `?` or `!` followed by whitespace, keeping the whitespace
/// with the preceding sentence. A lone `.` closing an abbreviation, an initial
/// or a dotted acronym (`Dr.`, `J.`, `e.g.`) is not a boundary.
pub struct PunctuationBoundary {
    pattern: Regex,
    abbreviations: Vec<String>,
}

impl PunctuationBoundary {
    pub fn new() -> Self {
        Self::with_abbreviations(ABBREVIATIONS.iter().map(|a| a.to_string()))
    }

    pub fn with_abbreviations(abbreviations: impl IntoIterator<Item = String>) -> Self {
        Self {
            pattern: Regex::new(r"[.?!]+\s+").expect("static sentence pattern"),
            abbreviations: abbreviations.into_iter().map(|a| a.to_lowercase()).collect(),
        }
    }

    fn is_abbreviation(&self, token: &str) -> bool {
        let token = token.trim_start_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            return false;
        }
        if self.abbreviations.iter().any(|a| a == &token.to_lowercase()) {
            return true;
        }
        // initials and dotted acronyms
        token
            .split_terminator('.')
            .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
    }
}

impl Default for PunctuationBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceBoundary for PunctuationBoundary {
    fn segments<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for mat in self.pattern.find_iter(text) {
            let punctuation = mat.as_str().trim_end();
            let punctuation_end = mat.start() + punctuation.len();

            if punctuation == "." {
                let token_start = text[..mat.start()]
                    .rfind(char::is_whitespace)
                    .map(|i| i + text[i..].chars().next().map_or(1, char::len_utf8))
                    .unwrap_or(0);
                if self.is_abbreviation(&text[token_start..punctuation_end]) {
                    continue;
                }
            }

            segments.push(&text[last_end..mat.end()]);
            last_end = mat.end();
        }

        if last_end < text.len() {
            segments.push(&text[last_end..]);
        }

        segments
    }
}

/// Greedy sentence packer for backends with a bounded request size
pub struct TextChunker {
    max_len: usize,
    boundary: Box<dyn SentenceBoundary>,
}

impl TextChunker {
    pub fn new(max_len: usize) -> Self {
        Self::with_boundary(max_len, Box::new(PunctuationBoundary::new()))
    }

    pub fn with_boundary(max_len: usize, boundary: Box<dyn SentenceBoundary>) -> Self {
        Self { max_len, boundary }
    }

    /// Split text into chunks strictly shorter than `max_len` characters.
    ///
    /// Sentences are never cut: a sentence that cannot fit on its own fails
    /// the whole call with `ChunkTooLong`.
    pub fn chunk(&self, text: &str) -> Result<Vec<TextChunk>, SynthesisError> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for segment in self.boundary.segments(text) {
            let length = segment.trim().chars().count();
            if length >= self.max_len {
                return Err(SynthesisError::ChunkTooLong {
                    length,
                    limit: self.max_len,
                });
            }

            let combined = format!("{}{}", buffer, segment);
            if combined.trim().chars().count() >= self.max_len {
                self.flush(&mut chunks, &buffer);
                buffer = segment.to_string();
            } else {
                buffer = combined;
            }
        }
        self.flush(&mut chunks, &buffer);

        tracing::debug!(
            text_length = text.chars().count(),
            chunk_count = chunks.len(),
            max_len = self.max_len,
            "Text split into chunks"
        );

        Ok(chunks)
    }

    fn flush(&self, chunks: &mut Vec<TextChunk>, buffer: &str) {
        let text = buffer.trim();
        if !text.is_empty() {
            chunks.push(TextChunk {
                index: chunks.len(),
                text: text.to_string(),
            });
        }
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_MAX_LEN)
    }
}
