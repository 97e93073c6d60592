use crate::error::IngestError;
use crate::models::{Chunk, QaOptions};

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl ChunkingConfig {
    /// Invariant: `0 <= overlap < max` and `max > 0`.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_chars == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "max_chars must be greater than zero".to_string(),
            ));
        }
        if self.overlap_chars >= self.max_chars {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than max {}",
                self.overlap_chars, self.max_chars
            )));
        }
        Ok(())
    }

    fn stride(&self) -> usize {
        self.max_chars - self.overlap_chars
    }
}

impl From<&QaOptions> for ChunkingConfig {
    fn from(value: &QaOptions) -> Self {
        Self {
            max_chars: value.chunk_max_chars,
            overlap_chars: value.chunk_overlap_chars,
        }
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Splits `text` into overlapping chunks: chunk `i` starts at character
/// `i * (max - overlap)` and spans `max` characters, except the final chunk
/// which may be shorter. Hard character cuts keep the splitter total and
/// lossless: concatenating the chunks with each chunk's leading `overlap`
/// characters dropped reconstructs the input exactly.
pub fn split_overlapping(text: &str, config: ChunkingConfig) -> Result<Vec<Chunk>, IngestError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(Vec::new());
    }

    let stride = config.stride();
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + config.max_chars).min(chars.len());
        chunks.push(Chunk {
            index: chunks.len(),
            text: chars[start..end].iter().collect(),
        });

        if end == chars.len() {
            break;
        }
        start += stride;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::{normalize_whitespace, split_overlapping, Chunk, ChunkingConfig};

    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut rebuilt = String::new();
        for (position, chunk) in chunks.iter().enumerate() {
            if position == 0 {
                rebuilt.push_str(&chunk.text);
            } else {
                rebuilt.extend(chunk.text.chars().skip(overlap));
            }
        }
        rebuilt
    }

    #[test]
    fn whitespace_is_normalized() {
        let input = "A  \t  lot\nof   spacing";
        assert_eq!(normalize_whitespace(input), "A lot of spacing");
    }

    #[test]
    fn chunking_is_lossless_for_valid_configs() {
        let text = "The quick brown fox jumps over the lazy dog, again and again.";
        for (max, overlap) in [(10, 0), (10, 3), (7, 6), (500, 50), (1, 0)] {
            let config = ChunkingConfig {
                max_chars: max,
                overlap_chars: overlap,
            };
            let chunks = split_overlapping(text, config).unwrap();
            assert_eq!(reconstruct(&chunks, overlap), text, "max={max} overlap={overlap}");
        }
    }

    #[test]
    fn chunking_is_lossless_for_multibyte_text() {
        let text = "árvíztűrő tükörfúrógép — útmutató és példák, hosszabb szöveggel";
        let config = ChunkingConfig {
            max_chars: 8,
            overlap_chars: 2,
        };
        let chunks = split_overlapping(text, config).unwrap();
        assert_eq!(reconstruct(&chunks, 2), text);
    }

    #[test]
    fn chunk_starts_follow_the_stride() {
        let text = "abcdefghijklmnop";
        let config = ChunkingConfig {
            max_chars: 6,
            overlap_chars: 2,
        };
        let chunks = split_overlapping(text, config).unwrap();
        assert_eq!(chunks[0].text, "abcdef");
        assert_eq!(chunks[1].text, "efghij");
        assert_eq!(chunks[2].text, "ijklmn");
        assert_eq!(chunks[3].text, "mnop");
        assert_eq!(chunks[3].index, 3);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let config = ChunkingConfig {
            max_chars: 10,
            overlap_chars: 2,
        };
        assert!(split_overlapping("", config).unwrap().is_empty());
    }

    #[test]
    fn overlap_must_be_smaller_than_max() {
        let config = ChunkingConfig {
            max_chars: 10,
            overlap_chars: 10,
        };
        assert!(split_overlapping("text", config).is_err());

        let config = ChunkingConfig {
            max_chars: 0,
            overlap_chars: 0,
        };
        assert!(split_overlapping("text", config).is_err());
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Determinism matters for reproducible indexes.";
        let config = ChunkingConfig {
            max_chars: 12,
            overlap_chars: 4,
        };
        let first = split_overlapping(text, config).unwrap();
        let second = split_overlapping(text, config).unwrap();
        assert_eq!(first, second);
    }
}
