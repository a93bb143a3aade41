//! # Recommendation Engine
//!
//! Read-only queries over a [`Catalog`]: pairwise similarity, "similar items"
//! lists and auto-play lists.
//!
//! ## Similarity
//!
//! ```text
//! reach(u -> v)      = (weight(u -> v) / hops(u -> v)) * rank(u) / 2   if hops > 0
//!                    = 0                                                otherwise
//! similarity(u, v)   = reach(u -> v) + reach(v -> u)
//! ```
//!
//! where `(hops, weight)` is the catalog distance along the lightest path.
//!
//! ## Auto-play
//!
//! 1. Seed with the top `min(length, 25)` items by rank.
//! 2. Pool the seeds with up to `length / 2` similar items of each seed.
//! 3. Score every pooled item by its summed similarity to the rest of the pool.
//! 4. Keep the best `length`, padding with `None` when the pool runs short.
//!
//! Every ordering breaks ties by ascending key.

use crate::catalog::Catalog;
use crate::item::ItemKey;
use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Upper bound on the length of any similar-items list and on the number of
/// auto-play seeds.
pub const MAX_RECOMMENDATIONS: usize = 25;

/// Stateless query layer over a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    catalog: &'a Catalog,
}

impl<'a> Recommender<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Combined similarity of `a` and `b` in both directions. Unknown or
    /// unconnected items score 0.
    #[must_use]
    pub fn similarity(&self, a: &ItemKey, b: &ItemKey) -> f64 {
        self.reach(a, b) + self.reach(b, a)
    }

    /// One direction of [`Recommender::similarity`], weighted by the rank of
    /// the item doing the reaching.
    #[allow(clippy::cast_precision_loss)]
    fn reach(&self, from: &ItemKey, to: &ItemKey) -> f64 {
        match self.catalog.distance(from, to) {
            (0, _) => 0.0,
            (hops, weight) => {
                (weight as f64 / hops as f64) * (self.catalog.rank(from) as f64 / 2.0)
            }
        }
    }

    /// Up to `min(max_count, 25)` other items, most similar first.
    #[must_use]
    pub fn similar_items(&self, key: &ItemKey, max_count: usize) -> Vec<ItemKey> {
        let limit = max_count.min(MAX_RECOMMENDATIONS);
        if limit == 0 {
            return Vec::new();
        }

        let others: Vec<&ItemKey> = self.catalog.keys().filter(|other| *other != key).collect();
        let mut scored: Vec<(f64, &ItemKey)> = others
            .into_par_iter()
            .map(|other| (self.similarity(key, other), other))
            .collect();
        sort_by_score(&mut scored);

        scored
            .into_iter()
            .take(limit)
            .map(|(_, other)| other.clone())
            .collect()
    }

    /// Auto-play list of exactly `length` entries; `None` marks a slot with
    /// no recommendation.
    #[must_use]
    pub fn auto_play(&self, length: usize) -> Vec<Option<ItemKey>> {
        if length == 0 {
            return Vec::new();
        }

        let seeds = self.top_ranked(length.min(MAX_RECOMMENDATIONS));

        let per_seed = length / 2;
        let mut pool: BTreeSet<ItemKey> = seeds.iter().cloned().collect();
        for seed in &seeds {
            pool.extend(self.similar_items(seed, per_seed));
        }
        debug!(
            "Auto-play: {} seeds, pool of {} candidates",
            seeds.len(),
            pool.len()
        );

        let candidates: Vec<&ItemKey> = pool.iter().collect();
        let mut scored: Vec<(f64, &ItemKey)> = candidates
            .par_iter()
            .map(|&candidate| {
                let total = candidates
                    .iter()
                    .filter(|&&other| other != candidate)
                    .map(|&other| self.similarity(candidate, other))
                    .sum::<f64>();
                (total, candidate)
            })
            .collect();
        sort_by_score(&mut scored);

        let mut list: Vec<Option<ItemKey>> = scored
            .into_iter()
            .take(length)
            .map(|(_, key)| Some(key.clone()))
            .collect();
        list.resize(length, None);
        list
    }

    /// The `count` highest-ranked items, ties by ascending key.
    fn top_ranked(&self, count: usize) -> Vec<ItemKey> {
        let mut ranked: Vec<(u64, &ItemKey)> = self
            .catalog
            .keys()
            .map(|key| (self.catalog.rank(key), key))
            .collect();
        ranked.sort_by(|(rank_a, key_a), (rank_b, key_b)| {
            rank_b.cmp(rank_a).then_with(|| key_a.cmp(key_b))
        });

        ranked
            .into_iter()
            .take(count)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

/// Descending score, ascending key.
fn sort_by_score(scored: &mut [(f64, &ItemKey)]) {
    scored.sort_by(|(score_a, key_a), (score_b, key_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| key_a.cmp(key_b))
    });
}
