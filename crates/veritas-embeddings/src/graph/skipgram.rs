//! Skip-gram with negative sampling over walk corpora.
//!
//! Follows the classic word2vec recipe: reduced random windows, a unigram^0.75
//! noise distribution, frequent-token downsampling, and a learning rate decayed
//! linearly over all epochs. Node vectors are the input-side weights.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use veritas_core::errors::EmbeddingError;

const MAX_EXP: f32 = 6.0;
const NOISE_POWER: f64 = 0.75;

/// Training hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct SkipGramParams {
    pub dimensions: usize,
    pub window: usize,
    pub epochs: usize,
    pub min_count: usize,
    pub negative_samples: usize,
    pub learning_rate: f32,
    pub min_learning_rate: f32,
    pub subsample: f64,
}

/// Trained vectors keyed by token.
#[derive(Debug, Clone)]
pub struct NodeVectors {
    rows: HashMap<usize, usize>,
    vectors: Vec<f32>,
    dimensions: usize,
}

impl NodeVectors {
    pub fn get(&self, token: usize) -> Option<&[f32]> {
        let row = *self.rows.get(&token)?;
        Some(&self.vectors[row * self.dimensions..(row + 1) * self.dimensions])
    }

    pub fn contains(&self, token: usize) -> bool {
        self.rows.contains_key(&token)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cumulative unigram^0.75 distribution over vocabulary rows.
struct NoiseDistribution {
    cumulative: Vec<f64>,
}

impl NoiseDistribution {
    fn new(counts: &[u64]) -> Self {
        let mut running = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                running += (c as f64).powf(NOISE_POWER);
                running
            })
            .collect();
        Self { cumulative }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }
}

/// Train on `corpus`, returning a vector for every token seen at least
/// `min_count` times.
pub fn train<R: Rng>(
    corpus: &[Vec<usize>],
    params: &SkipGramParams,
    rng: &mut R,
) -> Result<NodeVectors, EmbeddingError> {
    let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
    for sentence in corpus {
        for &token in sentence {
            *counts.entry(token).or_default() += 1;
        }
    }
    let vocab: Vec<(usize, u64)> = counts
        .into_iter()
        .filter(|&(_, c)| c >= params.min_count as u64)
        .collect();
    if vocab.is_empty() || params.dimensions == 0 {
        return Err(EmbeddingError::EmptyCorpus);
    }

    let dim = params.dimensions;
    let rows: HashMap<usize, usize> = vocab
        .iter()
        .enumerate()
        .map(|(row, &(token, _))| (token, row))
        .collect();
    let row_counts: Vec<u64> = vocab.iter().map(|&(_, c)| c).collect();
    let retained: u64 = row_counts.iter().sum();
    let keep = keep_probabilities(&row_counts, retained, params.subsample);
    let noise = NoiseDistribution::new(&row_counts);

    let mut input: Vec<f32> = (0..vocab.len() * dim)
        .map(|_| (rng.random::<f32>() - 0.5) / dim as f32)
        .collect();
    let mut output = vec![0.0f32; vocab.len() * dim];
    let mut error = vec![0.0f32; dim];

    let window = params.window.max(1);
    let total_work = (retained as f64 * params.epochs as f64).max(1.0);
    let mut processed = 0u64;

    for _ in 0..params.epochs {
        for sentence in corpus {
            let progress = processed as f64 / total_work;
            let alpha = (params.learning_rate
                - (params.learning_rate - params.min_learning_rate) * progress as f32)
                .max(params.min_learning_rate);

            let in_vocab: Vec<usize> = sentence
                .iter()
                .filter_map(|t| rows.get(t).copied())
                .collect();
            processed += in_vocab.len() as u64;
            let words: Vec<usize> = in_vocab
                .into_iter()
                .filter(|&row| keep[row] >= 1.0 || rng.random::<f64>() < keep[row])
                .collect();

            for (i, &center) in words.iter().enumerate() {
                let span = window - rng.random_range(0..window);
                let lo = i.saturating_sub(span);
                let hi = (i + span + 1).min(words.len());
                for (j, &context) in words.iter().enumerate().take(hi).skip(lo) {
                    if j == i {
                        continue;
                    }
                    train_pair(
                        &mut input,
                        &mut output,
                        &mut error,
                        context,
                        center,
                        alpha,
                        params.negative_samples,
                        &noise,
                        rng,
                    );
                }
            }
        }
    }

    if input.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingError::NonFinite);
    }

    Ok(NodeVectors {
        rows,
        vectors: input,
        dimensions: dim,
    })
}

/// Probability of keeping each occurrence of a row's token.
fn keep_probabilities(counts: &[u64], retained: u64, subsample: f64) -> Vec<f64> {
    if subsample <= 0.0 {
        return vec![1.0; counts.len()];
    }
    let threshold = subsample * retained as f64;
    counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            (((c / threshold).sqrt() + 1.0) * threshold / c).min(1.0)
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn train_pair<R: Rng>(
    input: &mut [f32],
    output: &mut [f32],
    error: &mut [f32],
    context: usize,
    center: usize,
    alpha: f32,
    negative_samples: usize,
    noise: &NoiseDistribution,
    rng: &mut R,
) {
    let dim = error.len();
    let l1_range = context * dim..(context + 1) * dim;
    error.fill(0.0);

    for d in 0..=negative_samples {
        let (target, label) = if d == 0 {
            (center, 1.0)
        } else {
            let sampled = noise.sample(rng);
            if sampled == center {
                continue;
            }
            (sampled, 0.0)
        };

        let l1 = &input[l1_range.clone()];
        let l2 = &mut output[target * dim..(target + 1) * dim];
        let f: f32 = l1.iter().zip(l2.iter()).map(|(a, b)| a * b).sum();
        let g = (label - sigmoid(f)) * alpha;
        for k in 0..dim {
            error[k] += g * l2[k];
            l2[k] += g * l1[k];
        }
    }

    for (w, e) in input[l1_range].iter_mut().zip(error.iter()) {
        *w += e;
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-MAX_EXP, MAX_EXP)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(dimensions: usize) -> SkipGramParams {
        SkipGramParams {
            dimensions,
            window: 3,
            epochs: 3,
            min_count: 1,
            negative_samples: 3,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            subsample: 0.0,
        }
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            train(&[], &params(8), &mut rng),
            Err(EmbeddingError::EmptyCorpus)
        ));
    }

    #[test]
    fn min_count_prunes_rare_tokens() {
        let corpus = vec![vec![0, 1, 0, 1, 0], vec![1, 0, 2]];
        let mut p = params(8);
        p.min_count = 2;
        let mut rng = StdRng::seed_from_u64(1);
        let vectors = train(&corpus, &p, &mut rng).unwrap();
        assert!(vectors.contains(0));
        assert!(vectors.contains(1));
        assert!(!vectors.contains(2));
        assert_eq!(vectors.get(0).unwrap().len(), 8);
    }

    #[test]
    fn trained_vectors_are_finite_and_seeded() {
        let corpus: Vec<Vec<usize>> = (0..50).map(|i| vec![i % 3, (i + 1) % 3, i % 3]).collect();
        let a = train(&corpus, &params(16), &mut StdRng::seed_from_u64(9)).unwrap();
        let b = train(&corpus, &params(16), &mut StdRng::seed_from_u64(9)).unwrap();
        for token in 0..3 {
            let va = a.get(token).unwrap();
            assert!(va.iter().all(|v| v.is_finite()));
            assert_eq!(va, b.get(token).unwrap());
        }
    }

    #[test]
    fn keep_probability_is_one_without_subsampling() {
        assert_eq!(keep_probabilities(&[10, 1000], 1010, 0.0), vec![1.0, 1.0]);
        let keep = keep_probabilities(&[5, 5000], 5005, 1e-3);
        assert_eq!(keep[0], 1.0);
        assert!(keep[1] < 0.2);
    }

    #[test]
    fn noise_sampling_stays_in_range() {
        let noise = NoiseDistribution::new(&[1, 10, 100]);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1000 {
            assert!(noise.sample(&mut rng) < 3);
        }
    }
}
