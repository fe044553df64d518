//! Sentence chunker.
//!
//! Splits raw text into overlapping windows of sentences. Sentence boundary
//! detection is delegated to UAX #29 segmentation, which copes reasonably
//! with abbreviations and numbered clauses in legal prose.

use unicode_segmentation::UnicodeSegmentation;

use lexdoc_core::error::{LexdocError, Result};
use lexdoc_core::types::Chunk;

/// Sliding-window chunker over sentence boundaries.
///
/// A window of `max_sentences` sentences advances by
/// `max_sentences - overlap` each step, so consecutive chunks share
/// `overlap` sentences. Output is deterministic: identical input and
/// settings always yield byte-identical chunks.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    max_sentences: usize,
    overlap: usize,
}

impl SentenceChunker {
    /// Create a chunker.
    ///
    /// `overlap >= max_sentences` would make the window stop advancing and
    /// is rejected outright, as is a zero-width window.
    pub fn new(max_sentences: usize, overlap: usize) -> Result<Self> {
        if max_sentences == 0 {
            return Err(LexdocError::InvalidArgument(
                "max_sentences_per_chunk must be at least 1".into(),
            ));
        }
        if overlap >= max_sentences {
            return Err(LexdocError::InvalidArgument(format!(
                "overlap ({overlap}) must be smaller than max_sentences_per_chunk ({max_sentences})"
            )));
        }
        Ok(Self {
            max_sentences,
            overlap,
        })
    }

    /// Split `text` into overlapping sentence chunks.
    ///
    /// Empty input (or input with no sentences) yields an empty vec, not an
    /// error. Whitespace-only windows are dropped.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let sentences: Vec<&str> = text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            return Vec::new();
        }

        // Validated in `new`: step is always >= 1, so this terminates.
        let step = self.max_sentences - self.overlap;
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < sentences.len() {
            let end = (i + self.max_sentences).min(sentences.len());
            let chunk_text = sentences[i..end].join(" ");
            if !chunk_text.trim().is_empty() {
                chunks.push(Chunk::new(chunk_text, chunks.len()));
            }
            i += step;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIX_SENTENCES: &str = "Alpha one. Bravo two. Charlie three. \
                                 Delta four. Echo five. Foxtrot six.";

    #[test]
    fn six_sentences_window_three_overlap_one() {
        let chunker = SentenceChunker::new(3, 1).unwrap();
        let chunks = chunker.chunk(SIX_SENTENCES);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "Alpha one. Bravo two. Charlie three.");
        assert_eq!(chunks[1].text, "Charlie three. Delta four. Echo five.");
        assert_eq!(chunks[2].text, "Echo five. Foxtrot six.");
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn empty_text_returns_empty() {
        let chunker = SentenceChunker::new(5, 1).unwrap();
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn whitespace_only_returns_empty() {
        let chunker = SentenceChunker::new(5, 1).unwrap();
        assert!(chunker.chunk("   \n\t  ").is_empty());
    }

    #[test]
    fn single_sentence_single_chunk() {
        let chunker = SentenceChunker::new(5, 1).unwrap();
        let chunks = chunker.chunk("The agreement terminates on notice.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "The agreement terminates on notice.");
    }

    #[test]
    fn overlap_equal_to_window_is_rejected() {
        assert!(matches!(
            SentenceChunker::new(3, 3),
            Err(LexdocError::InvalidArgument(_))
        ));
    }

    #[test]
    fn overlap_above_window_is_rejected() {
        assert!(matches!(
            SentenceChunker::new(3, 7),
            Err(LexdocError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            SentenceChunker::new(0, 0),
            Err(LexdocError::InvalidArgument(_))
        ));
    }

    #[test]
    fn deterministic_output() {
        let chunker = SentenceChunker::new(3, 1).unwrap();
        let a = chunker.chunk(SIX_SENTENCES);
        let b = chunker.chunk(SIX_SENTENCES);
        assert_eq!(a, b);
    }

    #[test]
    fn every_sentence_is_covered() {
        let chunker = SentenceChunker::new(3, 1).unwrap();
        let chunks = chunker.chunk(SIX_SENTENCES);

        for sentence in [
            "Alpha one.",
            "Bravo two.",
            "Charlie three.",
            "Delta four.",
            "Echo five.",
            "Foxtrot six.",
        ] {
            assert!(
                chunks.iter().any(|c| c.text.contains(sentence)),
                "sentence {sentence:?} missing from every chunk"
            );
        }
    }

    #[test]
    fn no_overlap_partitions_sentences() {
        let chunker = SentenceChunker::new(2, 0).unwrap();
        let chunks = chunker.chunk(SIX_SENTENCES);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "Alpha one. Bravo two.");
        assert_eq!(chunks[1].text, "Charlie three. Delta four.");
        assert_eq!(chunks[2].text, "Echo five. Foxtrot six.");
    }

    #[test]
    fn trailing_window_may_be_fully_overlapped() {
        // Five sentences, window 3, overlap 1: the scan keeps emitting while
        // a window start remains, so the tail sentence appears alone.
        let text = "Alpha one. Bravo two. Charlie three. Delta four. Echo five.";
        let chunker = SentenceChunker::new(3, 1).unwrap();
        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].text, "Echo five.");
    }

    #[test]
    fn indexes_are_sequential() {
        let chunker = SentenceChunker::new(2, 1).unwrap();
        let chunks = chunker.chunk(SIX_SENTENCES);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }
}
