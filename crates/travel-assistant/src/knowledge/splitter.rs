//! Character Text Splitter
//!
//! Splits text on a separator and greedily merges the pieces back into
//! chunks of bounded length. Lengths are counted in characters.

use std::collections::VecDeque;

/// Separator-based splitter with optional overlap between chunks
#[derive(Clone, Debug)]
pub struct TextSplitter {
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            separator: "\n\n".into(),
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size),
        }
    }

    /// Split text into chunks of at most `chunk_size` characters. A single
    /// piece longer than the limit is kept whole as its own chunk.
    pub fn split(&self, text: &str) -> Vec<String> {
        let pieces = text
            .split(self.separator.as_str())
            .filter(|p| !p.trim().is_empty());

        self.merge(pieces)
    }

    /// Split each page on its own, so no chunk spans a page boundary.
    pub fn split_pages(&self, pages: &[String]) -> Vec<String> {
        pages.iter().flat_map(|page| self.split(page)).collect()
    }

    fn merge<'a>(&self, pieces: impl Iterator<Item = &'a str>) -> Vec<String> {
        let sep_len = self.separator.chars().count();
        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();
            let joiner = if current.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size && !current.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(size = total, limit = self.chunk_size, "Chunk exceeds configured size");
                }
                self.flush(&current, &mut chunks);

                // Drop leading pieces until what remains fits as overlap
                while let Some(&(_, first_len)) = current.front() {
                    let too_long = total > self.chunk_overlap
                        || (total + len + sep_len > self.chunk_size && total > 0);
                    if !too_long {
                        break;
                    }
                    total -= first_len + if current.len() > 1 { sep_len } else { 0 };
                    current.pop_front();
                }
            }

            total += len + if current.is_empty() { 0 } else { sep_len };
            current.push_back((piece, len));
        }

        self.flush(&current, &mut chunks);
        chunks
    }

    fn flush(&self, current: &VecDeque<(&str, usize)>, chunks: &mut Vec<String>) {
        let joined = current
            .iter()
            .map(|(piece, _)| *piece)
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(1000, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_paragraphs_up_to_limit() {
        let splitter = TextSplitter::new(12, 0);
        let chunks = splitter.split("aaaa\n\nbbbb\n\ncccc\n\ndddd");
        // "aaaa\n\nbbbb" is 10 chars; adding another paragraph would be 16
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc\n\ndddd"]);
    }

    #[test]
    fn test_oversized_piece_stays_whole() {
        let splitter = TextSplitter::new(5, 0);
        let chunks = splitter.split("tiny\n\nthis paragraph is long\n\nend");
        assert_eq!(chunks, vec!["tiny", "this paragraph is long", "end"]);
    }

    #[test]
    fn test_drops_blank_pieces_and_trims() {
        let splitter = TextSplitter::new(100, 0);
        let chunks = splitter.split("\n\n  first  \n\n\n\n \n\nsecond\n\n");
        assert_eq!(chunks, vec!["first  \n\nsecond"]);
    }

    #[test]
    fn test_no_overlap_means_disjoint_chunks() {
        let text = (0..20).map(|i| format!("para{i:02}")).collect::<Vec<_>>().join("\n\n");
        let chunks = TextSplitter::new(20, 0).split(&text);

        let rejoined = chunks.join("\n\n");
        assert_eq!(rejoined, text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn test_overlap_repeats_trailing_piece() {
        let splitter = TextSplitter::new(10, 4);
        let chunks = splitter.split("aaaa\n\nbbbb\n\ncccc");
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "bbbb\n\ncccc"]);
    }

    #[test]
    fn test_pages_are_split_separately() {
        let splitter = TextSplitter::new(100, 0);
        let pages = vec!["visa rules".to_string(), String::new(), "train times\n\nfares".to_string()];

        // Everything would fit in one chunk, but pages never merge
        assert_eq!(
            splitter.split_pages(&pages),
            vec!["visa rules", "train times\n\nfares"]
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let splitter = TextSplitter::new(4, 0);
        let chunks = splitter.split("旅游\n\n天气");
        assert_eq!(chunks, vec!["旅游", "天气"]);
    }
}
