//! Flat Vector Index
//!
//! Exact nearest-neighbour search over embedded chunks by squared
//! Euclidean distance.

/// A retrievable slice of the source document
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Position of the chunk in the source document
    pub ordinal: usize,

    pub text: String,
}

/// In-memory index of chunk embeddings
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<(Vec<f32>, Chunk)>,
}

impl VectorIndex {
    /// Build an index from chunk texts and their embeddings, paired in order
    pub fn build(chunks: Vec<String>, embeddings: Vec<Vec<f32>>) -> Self {
        let entries = embeddings
            .into_iter()
            .zip(chunks)
            .enumerate()
            .map(|(ordinal, (vector, text))| (vector, Chunk { ordinal, text }))
            .collect();

        Self { entries }
    }

    /// The `k` chunks nearest to `query`, nearest first. Ties keep document
    /// order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&Chunk> {
        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .map(|(vector, chunk)| (squared_distance(vector, query), chunk))
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().take(k).map(|(_, chunk)| chunk).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
