use std::collections::HashMap;

/// Sparse TF-IDF vector, sorted by term id, unit length (or empty)
type SparseVector = Vec<(u32, f32)>;

/// Bag-of-words similarity over a fixed set of documents
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vectors: Vec<SparseVector>,
}

/// Lowercased alphanumeric runs
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

impl SimilarityIndex {
    pub fn build<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut document_frequency: Vec<u32> = Vec::new();

        let term_counts: Vec<HashMap<u32, u32>> = documents
            .iter()
            .map(|doc| {
                let mut counts: HashMap<u32, u32> = HashMap::new();
                for token in tokenize(doc.as_ref()) {
                    let next_id = vocabulary.len() as u32;
                    let id = *vocabulary.entry(token).or_insert(next_id);
                    if id as usize == document_frequency.len() {
                        document_frequency.push(0);
                    }
                    let count = counts.entry(id).or_insert(0);
                    if *count == 0 {
                        document_frequency[id as usize] += 1;
                    }
                    *count += 1;
                }
                counts
            })
            .collect();

        let n = documents.len() as f32;
        let vectors = term_counts
            .into_iter()
            .map(|counts| {
                let mut vector: SparseVector = counts
                    .into_iter()
                    .map(|(term, tf)| {
                        let df = document_frequency[term as usize] as f32;
                        let idf = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
                        (term, tf as f32 * idf)
                    })
                    .collect();
                vector.sort_by_key(|&(term, _)| term);

                let norm = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for (_, w) in vector.iter_mut() {
                        *w /= norm;
                    }
                }
                vector
            })
            .collect();

        SimilarityIndex { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Cosine similarity between two indexed documents
    pub fn similarity(&self, a: usize, b: usize) -> f32 {
        let (va, vb) = (&self.vectors[a], &self.vectors[b]);
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < va.len() && j < vb.len() {
            match va[i].0.cmp(&vb[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += va[i].1 * vb[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }

    /// Documents ordered by similarity to `target`, most similar first.
    /// Equal scores keep index order.
    pub fn ranked(&self, target: usize) -> Vec<(usize, f32)> {
        let mut scores: Vec<(usize, f32)> = (0..self.vectors.len())
            .map(|other| (other, self.similarity(target, other)))
            .collect();
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens: Vec<_> = tokenize("+1 stealth action.\nEnter combat!").collect();
        assert_eq!(tokens, vec!["1", "stealth", "action", "enter", "combat"]);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let index = SimilarityIndex::build(&["bleed action stealth", "combat strike damage"]);
        assert!((index.similarity(0, 0) - 1.0).abs() < 1e-5);
        assert!((index.similarity(1, 1) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let index = SimilarityIndex::build(&["bleed action stealth", "combat strike damage"]);
        assert_eq!(index.similarity(0, 1), 0.0);
    }

    #[test]
    fn test_shared_terms_rank_higher() {
        let index = SimilarityIndex::build(&[
            "strike combat damage maneuver",
            "strike combat damage press",
            "bleed action stealth",
            "strike hand damage",
        ]);
        let ranked: Vec<usize> = index.ranked(0).into_iter().map(|(i, _)| i).collect();
        assert_eq!(ranked[0], 0);
        assert_eq!(ranked[1], 1);
        assert_eq!(ranked[2], 3);
        assert_eq!(ranked[3], 2);
    }

    #[test]
    fn test_empty_document() {
        let index = SimilarityIndex::build(&["", "combat"]);
        assert_eq!(index.similarity(0, 0), 0.0);
        assert_eq!(index.similarity(0, 1), 0.0);
    }
}
