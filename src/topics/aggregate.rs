//! Grouping items by shared term and ranking the resulting topics.

use super::terms::TermExtractor;
use crate::models::{Item, Topic};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Clusters items by term and ranks the clusters.
///
/// Ranking is by mention count, then by the score of each topic's best
/// article. Remaining ties keep first-seen order, so the same input always
/// yields the same output.
#[derive(Debug, Clone)]
pub struct TopicAggregator {
    extractor: TermExtractor,
    min_mentions: usize,
    max_top_articles: usize,
}

impl Default for TopicAggregator {
    fn default() -> Self {
        Self::new(TermExtractor::default())
    }
}

impl TopicAggregator {
    pub fn new(extractor: TermExtractor) -> Self {
        Self {
            extractor,
            min_mentions: 3,
            max_top_articles: 5,
        }
    }

    pub fn with_min_mentions(mut self, n: usize) -> Self {
        self.min_mentions = n;
        self
    }

    pub fn with_max_top_articles(mut self, n: usize) -> Self {
        self.max_top_articles = n;
        self
    }

    /// Derive at most `top_n` ranked topics from `items`.
    #[instrument(level = "debug", skip_all, fields(items = items.len(), top_n = top_n))]
    pub fn derive_topics(&self, items: &[Item], top_n: usize) -> Vec<Topic> {
        if top_n == 0 {
            return Vec::new();
        }

        // Term order is first-seen order; it is the final tie-break.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<&Item>)> = Vec::new();

        for item in items {
            for term in self.extractor.extract(&item.title).into_iter().unique() {
                match index.get(&term) {
                    Some(&slot) => groups[slot].1.push(item),
                    None => {
                        index.insert(term.clone(), groups.len());
                        groups.push((term, vec![item]));
                    }
                }
            }
        }
        let term_count = groups.len();

        let mut topics: Vec<Topic> = groups
            .into_iter()
            .filter(|(_, members)| members.len() >= self.min_mentions)
            .map(|(term, mut members)| {
                let mention_count = members.len();
                members.sort_by(|a, b| by_score_desc(a.score, b.score));
                Topic {
                    topic: term,
                    mention_count,
                    top_articles: members
                        .into_iter()
                        .take(self.max_top_articles)
                        .map(Item::summary)
                        .collect(),
                }
            })
            .collect();

        topics.sort_by(|a, b| {
            b.mention_count
                .cmp(&a.mention_count)
                .then_with(|| by_score_desc(a.peak_score(), b.peak_score()))
        });
        topics.truncate(top_n);

        debug!(terms = term_count, topics = topics.len(), "Derived topics");
        topics
    }
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
