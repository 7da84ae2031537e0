//! Transaction classifier
//!
//! Maps a free-text description (plus amount) to a spending category:
//!
//! 1. Keyword pass: confidence is the share of a category's keywords found in
//!    the description. Highest wins; ties keep the earlier category.
//! 2. History pass (only when the keyword confidence is weak): look for past
//!    transactions with a similar description or a similar amount and take the
//!    most common category among them.
//! 3. Default category with a fixed low confidence when nothing matched.
//!
//! Both the insight engine and the chat router use this one classifier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CategoryKeywords, ClassifierConfig, EngineConfig};
use crate::models::{Snapshot, Transaction};

/// Category used when the snapshot has no categories to fall back on
pub const OTHER_CATEGORY: &str = "Other";

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Keyword,
    History,
    Default,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::History => "history",
            Self::Default => "default",
        }
    }
}

/// Result of classifying a description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    /// 0-1
    pub confidence: f64,
    pub source: ClassificationSource,
}

/// Keyword + history classifier
#[derive(Debug, Clone)]
pub struct TransactionClassifier {
    keywords: Vec<CategoryKeywords>,
    config: ClassifierConfig,
    default_category: Option<String>,
    income_category: String,
}

impl Default for TransactionClassifier {
    fn default() -> Self {
        Self::from_config(&EngineConfig::builtin())
    }
}

impl TransactionClassifier {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            keywords: config.categories.clone(),
            config: config.classifier.clone(),
            default_category: config.default_category.clone(),
            income_category: config.income_category.clone(),
        }
    }

    /// Classify a description against the keyword table and the snapshot history
    pub fn classify(&self, description: &str, amount: f64, snapshot: &Snapshot) -> Classification {
        let mut best = self.lexical_match(description);

        if best
            .as_ref()
            .map_or(true, |b| b.confidence < self.config.lexical_min_confidence)
        {
            if let Some(historical) =
                self.historical_match(description, amount, &snapshot.transactions)
            {
                let better = best
                    .as_ref()
                    .map_or(true, |b| historical.confidence > b.confidence);
                if better {
                    best = Some(historical);
                }
            }
        }

        match best {
            Some(c) if c.confidence > 0.0 => {
                debug!(
                    category = %c.category,
                    confidence = c.confidence,
                    source = ?c.source,
                    "Classified description"
                );
                c
            }
            _ => Classification {
                category: self.default_category(snapshot),
                confidence: self.config.fallback_confidence,
                source: ClassificationSource::Default,
            },
        }
    }

    /// Keyword pass only. Returns `None` when no keyword of any category matched.
    pub fn lexical_match(&self, description: &str) -> Option<Classification> {
        let text = description.to_lowercase();
        let mut best: Option<Classification> = None;

        for entry in &self.keywords {
            if entry.keywords.is_empty() {
                continue;
            }

            let matched = entry
                .keywords
                .iter()
                .filter(|k| text.contains(k.as_str()))
                .count();
            if matched == 0 {
                continue;
            }

            let confidence = matched as f64 / entry.keywords.len() as f64;
            if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                best = Some(Classification {
                    category: entry.name.clone(),
                    confidence,
                    source: ClassificationSource::Keyword,
                });
            }
        }

        best
    }

    /// History pass. Returns `None` when no past transaction is similar enough.
    pub fn historical_match(
        &self,
        description: &str,
        amount: f64,
        history: &[Transaction],
    ) -> Option<Classification> {
        let query = description.trim().to_lowercase();

        let similar: Vec<&Transaction> = history
            .iter()
            .filter(|t| {
                let by_description = !query.is_empty()
                    && string_similarity(&t.description.to_lowercase(), &query)
                        > self.config.description_similarity;
                by_description || amount_similarity(t.amount, amount) > self.config.amount_similarity
            })
            .collect();

        if similar.is_empty() {
            return None;
        }

        // Count per category, remembering first-seen order for ties
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for t in &similar {
            match counts.iter_mut().find(|(c, _)| *c == t.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((t.category.as_str(), 1)),
            }
        }

        let (category, count) = counts
            .iter()
            .fold(None::<(&str, usize)>, |acc, &(c, n)| match acc {
                Some((_, best)) if best >= n => acc,
                _ => Some((c, n)),
            })?;

        Some(Classification {
            category: category.to_string(),
            confidence: count as f64 / similar.len() as f64,
            source: ClassificationSource::History,
        })
    }

    fn default_category(&self, snapshot: &Snapshot) -> String {
        if let Some(ref name) = self.default_category {
            return name.clone();
        }
        snapshot
            .spending_categories(&self.income_category)
            .next()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, 1.0 for two empty strings
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// `1 - |a - b| / max(a, b)`; 0 when both amounts are non-positive
pub fn amount_similarity(a: f64, b: f64) -> f64 {
    let larger = a.max(b);
    if larger <= 0.0 {
        return 0.0;
    }
    1.0 - (a - b).abs() / larger
}

fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut costs: Vec<usize> = (0..=right.len()).collect();

    for (i, left_char) in left.iter().enumerate() {
        let mut last_cost = i;
        costs[0] = i + 1;
        for (j, right_char) in right.iter().enumerate() {
            let next_cost = costs[j + 1];
            let mut cost = if left_char == right_char {
                last_cost
            } else {
                last_cost + 1
            };
            cost = cost.min(costs[j] + 1).min(next_cost + 1);
            costs[j + 1] = cost;
            last_cost = next_cost;
        }
    }

    costs[right.len()]
}
