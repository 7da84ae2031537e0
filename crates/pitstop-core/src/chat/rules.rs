//! Ordered intent pattern table
//!
//! Each rule pairs a case-insensitive regex with a builder that turns the
//! captures into an [`Intent`]. Rules are tried in order and the first rule
//! whose regex matches decides: if its builder rejects the captures (a zero
//! amount, say) the result is `Unknown`, later rules are not consulted.
//! Trigger words are matched on word boundaries so "hi" does not fire inside
//! "this".

use regex::{Captures, Regex};

use crate::error::Result;
use crate::models::TransactionKind;

use super::types::{Intent, IntentKind};

type Builder = fn(&Captures<'_>) -> Option<Intent>;

/// Plain or comma-grouped ("1,200.50") amount
const AMOUNT: &str = r"\$?(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*(?:dollars|usd|bucks)?";
const TERMINAL: &str = r"[\s.!?]*$";
const PERIOD: &str = r"(?:\s+(?:this|last)\s+(?:month|week)|\s+so\s+far|\s+today)?";
const BUDGET_VERBS: &str = r"(?:set|change|update|raise|increase|lower|reduce|decrease)";

pub struct IntentRule {
    pub kind: IntentKind,
    pattern: Regex,
    build: Builder,
}

impl IntentRule {
    fn new(kind: IntentKind, pattern: &str, build: Builder) -> Result<Self> {
        Ok(Self {
            kind,
            pattern: Regex::new(&format!("(?i){}", pattern))?,
            build,
        })
    }

    /// A rule firing on any of `words` as whole words
    fn triggers(kind: IntentKind, words: &[&str], build: Builder) -> Result<Self> {
        let alternatives: Vec<String> = words
            .iter()
            .map(|w| regex::escape(w).replace(' ', r"\s+"))
            .collect();
        Self::new(kind, &format!(r"\b(?:{})\b", alternatives.join("|")), build)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// The full ordered rule list
pub struct RuleTable {
    rules: Vec<IntentRule>,
}

impl RuleTable {
    pub fn builtin() -> Result<Self> {
        use IntentKind as K;

        let rules = vec![
            // Expenses
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\b(?:i\s+)?spent\s+{AMOUNT}\s+(?:(?:on|for|at)\s+)?(.+?){TERMINAL}"),
                expense_amount_first,
            )?,
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\b(?:i\s+)?paid\s+{AMOUNT}\s+(?:(?:for|on|to)\s+)?(.+?){TERMINAL}"),
                expense_amount_first,
            )?,
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\b(?:i\s+)?bought\s+(.+?)\s+for\s+{AMOUNT}{TERMINAL}"),
                expense_description_first,
            )?,
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\badd(?:ed)?\s+(?:an?\s+)?(?:expense\s+(?:of\s+)?)?{AMOUNT}\s+(?:(?:for|on|to)\s+)?(.+?){TERMINAL}"),
                expense_amount_first,
            )?,
            // Income
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\b(?:i\s+)?(?:received|earned|got\s+paid|got)\s+{AMOUNT}(?:\s+(?:from|for|as)\s+(.+?))?{TERMINAL}"),
                income,
            )?,
            IntentRule::new(
                K::AddTransaction,
                &format!(r"\bincome\s+of\s+{AMOUNT}(?:\s+(?:from|for)\s+(.+?))?{TERMINAL}"),
                income,
            )?,
            // Budget changes must come before budget queries
            IntentRule::new(
                K::UpdateBudget,
                &format!(r"\b{BUDGET_VERBS}\s+(?:the\s+|my\s+)?budget\s+(?:for|of)\s+(.+?)\s+to\s+{AMOUNT}"),
                update_budget,
            )?,
            IntentRule::new(
                K::UpdateBudget,
                &format!(r"\b{BUDGET_VERBS}\s+(?:the\s+|my\s+)?(.+?)\s+budget\s+to\s+{AMOUNT}"),
                update_budget,
            )?,
            IntentRule::new(
                K::QueryCategory,
                &format!(r"\bhow\s+much\s+(?:did\s+i|have\s+i|do\s+i)\s+(?:spend|spent)\s+on\s+(.+?){PERIOD}{TERMINAL}"),
                query_category,
            )?,
            IntentRule::new(
                K::QueryCategory,
                &format!(r"\bwhat\s+(?:did\s+i|have\s+i)\s+(?:spend|spent)\s+on\s+(.+?){PERIOD}{TERMINAL}"),
                query_category,
            )?,
            IntentRule::new(
                K::QueryCategory,
                &format!(r"\b(?:show|list)\s+(?:me\s+)?(?:my\s+)?(.+?)\s+(?:spending|expenses){PERIOD}{TERMINAL}"),
                query_category,
            )?,
            IntentRule::triggers(
                K::QueryBalance,
                &[
                    "balance",
                    "financial status",
                    "how much money",
                    "how am i doing",
                    "what's my status",
                    "where do i stand",
                ],
                |_| Some(Intent::QueryBalance),
            )?,
            IntentRule::triggers(
                K::QueryBudget,
                &["budget", "budgets", "how much is left", "remaining"],
                |_| Some(Intent::QueryBudget),
            )?,
            IntentRule::triggers(
                K::QueryGoals,
                &["goal", "goals", "target", "targets", "savings", "saved", "achieved"],
                |_| Some(Intent::QueryGoals),
            )?,
            IntentRule::triggers(
                K::FinancialAdvice,
                &[
                    "advice",
                    "tip",
                    "tips",
                    "recommend",
                    "recommendation",
                    "what should i do",
                    "how to save",
                    "how can i save",
                ],
                |_| Some(Intent::FinancialAdvice),
            )?,
            IntentRule::triggers(
                K::Greeting,
                &["hello", "hi", "hey", "good morning", "good afternoon", "good evening"],
                |_| Some(Intent::Greeting),
            )?,
            IntentRule::triggers(
                K::Help,
                &["help", "how", "what can you do", "commands"],
                |_| Some(Intent::Help),
            )?,
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// The first rule whose regex matches decides; nothing matching, or a
    /// rejected match, is `Intent::Unknown`
    pub fn parse(&self, utterance: &str) -> Intent {
        let text = utterance.trim();
        if text.is_empty() {
            return Intent::Unknown;
        }

        let decided = self
            .rules
            .iter()
            .find_map(|rule| rule.pattern.captures(text).map(|caps| (rule.build)(&caps)));
        match decided {
            Some(Some(intent)) => intent,
            _ => Intent::Unknown,
        }
    }
}

fn parse_number(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().replace(',', "").parse().ok()
}

fn parse_amount(caps: &Captures<'_>, group: usize) -> Option<f64> {
    let amount = parse_number(caps, group)?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn capture_text(caps: &Captures<'_>, group: usize) -> Option<String> {
    caps.get(group)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn expense(amount: f64, description: String) -> Intent {
    Intent::AddTransaction {
        amount,
        description,
        kind: TransactionKind::Expense,
    }
}

fn expense_amount_first(caps: &Captures<'_>) -> Option<Intent> {
    Some(expense(parse_amount(caps, 1)?, capture_text(caps, 2)?))
}

fn expense_description_first(caps: &Captures<'_>) -> Option<Intent> {
    Some(expense(parse_amount(caps, 2)?, capture_text(caps, 1)?))
}

fn income(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::AddTransaction {
        amount: parse_amount(caps, 1)?,
        description: capture_text(caps, 2).unwrap_or_else(|| "Income".to_string()),
        kind: TransactionKind::Income,
    })
}

fn update_budget(caps: &Captures<'_>) -> Option<Intent> {
    let amount = parse_number(caps, 2)?;
    Some(Intent::UpdateBudget {
        category: capture_text(caps, 1)?,
        amount,
    })
}

fn query_category(caps: &Captures<'_>) -> Option<Intent> {
    Some(Intent::QueryCategory {
        category: capture_text(caps, 1)?,
    })
}
