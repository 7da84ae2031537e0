//! Intent router: utterance -> intent -> response

use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::classify::TransactionClassifier;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::insights::AnalysisContext;
use crate::models::Snapshot;

use super::handlers::{self, UNKNOWN_SUGGESTIONS};
use super::rules::RuleTable;
use super::types::{ChatResponse, Intent};

const LEADING_WORDS: [&str; 5] = ["the ", "my ", "our ", "a ", "an "];

/// Stateless single-turn router
///
/// Holds only the compiled rule table and the classifier; every call reads
/// the snapshot it is handed.
pub struct IntentRouter {
    rules: RuleTable,
    classifier: TransactionClassifier,
}

impl IntentRouter {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            rules: RuleTable::builtin()?,
            classifier: TransactionClassifier::from_config(config),
        })
    }

    pub fn parse(&self, utterance: &str) -> Intent {
        self.rules.parse(utterance)
    }

    pub fn respond(&self, ctx: &AnalysisContext<'_>, utterance: &str) -> ChatResponse {
        let intent = self.parse(utterance);
        debug!(intent = %intent.kind(), "Routed utterance");
        self.dispatch(ctx, intent)
    }

    pub fn dispatch(&self, ctx: &AnalysisContext<'_>, intent: Intent) -> ChatResponse {
        match intent {
            Intent::AddTransaction {
                amount,
                description,
                kind,
            } => handlers::add_transaction(ctx, &self.classifier, amount, &description, kind),
            Intent::QueryBalance => handlers::balance(ctx),
            Intent::QueryBudget => handlers::budget(ctx),
            Intent::QueryCategory { category } => {
                let name = normalize_category(&category, &ctx.config.synonyms, ctx.snapshot);
                handlers::category(ctx, &name)
            }
            Intent::QueryGoals => handlers::goals(ctx),
            Intent::UpdateBudget { category, amount } => {
                let name = normalize_category(&category, &ctx.config.synonyms, ctx.snapshot);
                handlers::update_budget(ctx, &name, amount)
            }
            Intent::FinancialAdvice => handlers::advice(ctx),
            Intent::Greeting => handlers::greeting(ctx),
            Intent::Help => handlers::help(),
            Intent::Unknown => {
                let suggestion = UNKNOWN_SUGGESTIONS
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(UNKNOWN_SUGGESTIONS[0]);
                handlers::unknown(suggestion)
            }
        }
    }

    /// Canned follow-ups triggered by action id; unknown ids get help
    pub fn quick_action(&self, ctx: &AnalysisContext<'_>, id: &str) -> ChatResponse {
        debug!(id, "Quick action");
        match id {
            "quick-balance" => handlers::balance(ctx),
            "budget-status" => handlers::budget(ctx),
            "daily-summary" => handlers::daily_summary(ctx),
            "budget-tips" => handlers::budget_tips(ctx),
            "goal-tips" => handlers::goal_tips(ctx),
            _ => handlers::help(),
        }
    }
}

/// Map user wording onto a snapshot category name
///
/// Lowercases, trims trailing punctuation and leading articles or
/// possessives, applies the synonym table, then matches snapshot categories
/// case-insensitively. Anything unresolved comes back cleaned but otherwise
/// as typed.
pub fn normalize_category(
    input: &str,
    synonyms: &HashMap<String, String>,
    snapshot: &Snapshot,
) -> String {
    let mut text = input
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_lowercase();

    while let Some(rest) = LEADING_WORDS.iter().find_map(|w| text.strip_prefix(*w)) {
        text = rest.trim_start().to_string();
    }

    let resolved = synonyms.get(&text).cloned().unwrap_or(text);

    snapshot
        .categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(&resolved))
        .map(|c| c.name.clone())
        .unwrap_or(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::{IntentKind, ResponseData, StateMutation};
    use crate::test_utils::{at, date, expense, snapshot_with};

    fn router() -> (IntentRouter, EngineConfig) {
        let config = EngineConfig::builtin();
        (IntentRouter::new(&config).unwrap(), config)
    }

    #[test]
    fn test_normalize_category() {
        let config = EngineConfig::builtin();
        let snapshot = snapshot_with(vec![]);
        let n = |s: &str| normalize_category(s, &config.synonyms, &snapshot);

        assert_eq!(n("fuel"), "Transport");
        assert_eq!(n("  My Groceries?"), "Food");
        assert_eq!(n("the food"), "Food");
        assert_eq!(n("HEALTH"), "Health");
        assert_eq!(n("Pets!"), "pets");
    }

    #[test]
    fn test_spent_on_fuel_goes_to_transport() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = router.respond(&ctx, "I spent 200 on fuel");
        assert_eq!(resp.intent, IntentKind::AddTransaction);
        match resp.data {
            Some(ResponseData::TransactionAdded { ref transaction }) => {
                assert_eq!(transaction.category, "Transport");
                assert_eq!(transaction.amount, 200.0);
                assert_eq!(transaction.description, "fuel");
            }
            ref other => panic!("unexpected {:?}", other),
        }
        let adds = resp
            .mutations()
            .filter(|m| matches!(m, StateMutation::AddTransaction(_)))
            .count();
        assert_eq!(adds, 1);
    }

    #[test]
    fn test_only_add_transaction_auto_applies() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![expense("1", 100.0, "Food", date(2024, 6, 1))]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        for utterance in [
            "what's my balance",
            "how is my budget",
            "how much did I spend on groceries?",
            "set the food budget to 900",
            "show my goals",
            "any advice?",
            "hello",
            "help",
            "purple elephants",
        ] {
            let resp = router.respond(&ctx, utterance);
            assert!(resp.auto_actions.is_empty(), "{}", utterance);
        }
    }

    #[test]
    fn test_query_category_uses_synonyms() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![expense("1", 100.0, "Food", date(2024, 6, 1))]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = router.respond(&ctx, "how much did I spend on groceries?");
        assert_eq!(resp.intent, IntentKind::QueryCategory);
        assert!(resp.message.starts_with("Food: $100.00"));
    }

    #[test]
    fn test_update_budget_unknown_category() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = router.respond(&ctx, "set the pets budget to 50");
        assert_eq!(resp.intent, IntentKind::UpdateBudget);
        assert!(resp.message.contains("\"pets\""));
        assert!(resp.mutations().next().is_none());
    }

    #[test]
    fn test_unknown_picks_a_suggestion() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = router.respond(&ctx, "purple elephants");
        assert_eq!(resp.intent, IntentKind::Unknown);
        assert!(UNKNOWN_SUGGESTIONS.iter().any(|s| resp.message.contains(s)));
        assert_eq!(resp.actions[0].id, "show-help");
    }

    #[test]
    fn test_quick_actions() {
        let (router, config) = router();
        let snapshot = snapshot_with(vec![expense("1", 12.0, "Food", date(2024, 6, 15))]);
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let daily = router.quick_action(&ctx, "daily-summary");
        assert!(daily.message.starts_with("Today: $0.00 in, $12.00 out across 1 transactions"));
        assert_eq!(router.quick_action(&ctx, "budget-status").intent, IntentKind::QueryBudget);
        assert_eq!(router.quick_action(&ctx, "nope").intent, IntentKind::Help);
    }
}
