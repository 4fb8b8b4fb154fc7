use crate::types::{Chunk, Document};

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Separators in priority order, coarsest first.
    pub separators: Vec<String>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            separators: vec!["\n\n".into(), "\n".into(), " ".into()],
        }
    }
}

/// Splits a document into overlapping chunks.
///
/// Pieces are cut on the earliest separator that keeps them under
/// `chunk_size`, falling back to finer separators only for oversized pieces.
/// A piece with no separator left is emitted as-is even when oversized.
pub struct RecursiveSplitter {
    config: SplitterConfig,
}

impl RecursiveSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        if document.content.is_empty() {
            return Vec::new();
        }

        let pieces = split_pieces(
            &document.content,
            &self.config.separators,
            self.config.chunk_size,
        );
        let merged = merge_pieces(&pieces, self.config.chunk_size, self.config.chunk_overlap);

        merged
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk {
                content,
                metadata: document.metadata.clone(),
                chunk_index: i,
            })
            .collect()
    }
}

/// Cut `text` into pieces no larger than `chunk_size` where possible.
///
/// Separators stay attached to the preceding piece, so concatenating the
/// pieces reproduces the input exactly.
fn split_pieces(text: &str, separators: &[String], chunk_size: usize) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_owned()];
    }
    let Some((sep, rest)) = separators.split_first() else {
        // Atomic unit larger than the bound.
        return vec![text.to_owned()];
    };
    if !text.contains(sep.as_str()) {
        return split_pieces(text, rest, chunk_size);
    }

    let mut pieces = Vec::new();
    for part in text.split_inclusive(sep.as_str()) {
        if part.len() <= chunk_size {
            pieces.push(part.to_owned());
        } else {
            pieces.extend(split_pieces(part, rest, chunk_size));
        }
    }
    pieces
}

/// Merge pieces into chunks, respecting size and overlap.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Sliding window over the piece indices contributing to the current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        if !current.is_empty() && current.len() + piece.len() > chunk_size {
            chunks.push(current.clone());

            // Build overlap from trailing pieces of the finished chunk.
            current.clear();
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + pieces[i].len() > chunk_overlap {
                    break;
                }
                overlap_len += pieces[i].len();
                overlap_start = i;
            }
            // Overlap must not push the next chunk past the bound on its own.
            if overlap_len + piece.len() > chunk_size {
                overlap_start = idx;
            }
            for p in &pieces[overlap_start..idx] {
                current.push_str(p);
            }
            window_start = overlap_start;
        }

        current.push_str(piece);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
