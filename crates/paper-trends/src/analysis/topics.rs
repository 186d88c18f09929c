//! Latent Dirichlet Allocation topic model fitted with collapsed Gibbs sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::models::{Paper, Topic};
use crate::text::{FrequencyBounds, Tokenizer, Vocabulary};

/// Topic model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicParams {
    /// Number of topics (K).
    pub num_topics: usize,

    /// Terms reported per topic.
    pub terms_per_topic: usize,

    /// Gibbs sweeps.
    pub iterations: usize,

    /// Sampler seed.
    pub seed: u64,
}

impl Default for TopicParams {
    fn default() -> Self {
        use crate::config::defaults;
        Self {
            num_topics: defaults::NUM_TOPICS,
            terms_per_topic: defaults::TERMS_PER_TOPIC,
            iterations: defaults::TOPIC_ITERATIONS,
            seed: defaults::TOPIC_SEED,
        }
    }
}

/// Fits a K-topic model over a bounded bag-of-words vocabulary.
#[derive(Debug, Clone)]
pub struct TopicModeler {
    tokenizer: Tokenizer,
    bounds: FrequencyBounds,
    params: TopicParams,
}

impl TopicModeler {
    /// Create a modeler.
    #[must_use]
    pub fn new(tokenizer: Tokenizer, bounds: FrequencyBounds, params: TopicParams) -> Self {
        Self { tokenizer, bounds, params }
    }

    /// Exactly `num_topics` topics with up to `terms_per_topic` terms each.
    ///
    /// Priors are symmetric `1 / K`. Topic-term weights are the topic's word
    /// assignment counts plus the prior. A vocabulary emptied by the bounds
    /// gives topics with no terms.
    #[must_use]
    pub fn fit(&self, papers: &[Paper]) -> Vec<Topic> {
        let k = self.params.num_topics;
        let documents: Vec<Vec<String>> =
            papers.iter().map(|p| self.tokenizer.tokenize(&p.text())).collect();
        let vocab = Vocabulary::build(&documents, self.bounds);

        // Token streams restricted to the vocabulary.
        let docs: Vec<Vec<usize>> = documents
            .iter()
            .map(|d| {
                vocab
                    .counts(d)
                    .into_iter()
                    .flat_map(|(id, count)| std::iter::repeat_n(id, count))
                    .collect()
            })
            .collect();

        let topic_word = if vocab.is_empty() || k == 0 {
            debug!(papers = papers.len(), "Empty vocabulary, emitting empty topics");
            vec![Vec::new(); k]
        } else {
            GibbsSampler::new(k, vocab.len(), self.params.seed).run(&docs, self.params.iterations)
        };

        let topics: Vec<Topic> = topic_word
            .iter()
            .enumerate()
            .map(|(idx, weights)| {
                let mut ranked: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                ranked.truncate(self.params.terms_per_topic);
                Topic {
                    topic_id: idx + 1,
                    keywords: ranked.iter().map(|&(id, _)| vocab.term(id).to_string()).collect(),
                    weights: ranked.iter().map(|&(_, w)| w).collect(),
                }
            })
            .collect();

        info!(count = topics.len(), vocabulary = vocab.len(), "Extracted topics");
        for topic in &topics {
            debug!(
                topic = topic.topic_id,
                terms = %topic.keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", "),
                "Topic"
            );
        }
        topics
    }
}

impl Default for TopicModeler {
    fn default() -> Self {
        use crate::config::defaults;
        Self::new(
            Tokenizer::default(),
            FrequencyBounds {
                min_documents: defaults::MIN_DOCUMENT_FREQUENCY,
                max_ratio: defaults::MAX_DOCUMENT_RATIO,
                max_terms: Some(defaults::MAX_VOCABULARY),
            },
            TopicParams::default(),
        )
    }
}

/// Collapsed Gibbs sampler state.
struct GibbsSampler {
    k: usize,
    v: usize,
    alpha: f64,
    beta: f64,
    rng: StdRng,
    doc_topic: Vec<Vec<usize>>,
    topic_word: Vec<Vec<usize>>,
    topic_total: Vec<usize>,
}

impl GibbsSampler {
    fn new(k: usize, v: usize, seed: u64) -> Self {
        let prior = 1.0 / k as f64;
        Self {
            k,
            v,
            alpha: prior,
            beta: prior,
            rng: StdRng::seed_from_u64(seed),
            doc_topic: Vec::new(),
            topic_word: vec![vec![0; v]; k],
            topic_total: vec![0; k],
        }
    }

    /// Run the sampler and return topic-word weights (counts plus prior).
    fn run(mut self, docs: &[Vec<usize>], iterations: usize) -> Vec<Vec<f64>> {
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        self.doc_topic = vec![vec![0; self.k]; docs.len()];

        for (d, doc) in docs.iter().enumerate() {
            let mut z = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = self.rng.gen_range(0..self.k);
                self.assign(d, w, t);
                z.push(t);
            }
            assignments.push(z);
        }

        let mut probs = vec![0.0f64; self.k];
        for _ in 0..iterations {
            for (d, doc) in docs.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    self.unassign(d, w, old);

                    let v_beta = self.v as f64 * self.beta;
                    let mut total = 0.0;
                    for (t, p) in probs.iter_mut().enumerate() {
                        *p = (self.doc_topic[d][t] as f64 + self.alpha)
                            * (self.topic_word[t][w] as f64 + self.beta)
                            / (self.topic_total[t] as f64 + v_beta);
                        total += *p;
                    }

                    let new = self.draw(&probs, total);
                    self.assign(d, w, new);
                    assignments[d][i] = new;
                }
            }
        }

        self.topic_word
            .iter()
            .map(|row| row.iter().map(|&c| c as f64 + self.beta).collect())
            .collect()
    }

    fn assign(&mut self, d: usize, w: usize, t: usize) {
        self.doc_topic[d][t] += 1;
        self.topic_word[t][w] += 1;
        self.topic_total[t] += 1;
    }

    fn unassign(&mut self, d: usize, w: usize, t: usize) {
        self.doc_topic[d][t] -= 1;
        self.topic_word[t][w] -= 1;
        self.topic_total[t] -= 1;
    }

    fn draw(&mut self, probs: &[f64], total: f64) -> usize {
        let mut target = self.rng.r#gen::<f64>() * total;
        for (t, &p) in probs.iter().enumerate() {
            if target < p {
                return t;
            }
            target -= p;
        }
        probs.len() - 1
    }
}
