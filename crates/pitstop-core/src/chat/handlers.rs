//! Per-intent response builders
//!
//! Every handler reads the snapshot through the analysis context and returns
//! a finished [`ChatResponse`]. Only `add_transaction` emits an auto-applied
//! mutation; `update_budget` suggests one without applying it.

use chrono::Timelike;
use tracing::debug;
use uuid::Uuid;

use crate::advice::{category_advice, GENERAL_TIPS};
use crate::classify::TransactionClassifier;
use crate::insights::AnalysisContext;
use crate::insights::goal_progress::monthly_required;
use crate::models::{Transaction, TransactionKind};
use crate::stats::percentage;
use crate::summary::{
    category_usage, day_totals, day_transactions, money, month_totals, top_spending_category,
};

use super::types::{ChatAction, ChatResponse, IntentKind, ResponseData, StateMutation};

const MAX_RECATEGORIZE: usize = 3;
const RECENT_SHOWN: usize = 3;
const GOOD_SHOWN: usize = 3;
const DAILY_SHOWN: usize = 5;
const TIPS_THRESHOLD: f64 = 80.0;

/// Clarifying suggestions for input nothing matched
pub const UNKNOWN_SUGGESTIONS: [&str; 4] = [
    "Try something like \"I spent 50 on groceries\"",
    "You can ask \"what's my balance?\"",
    "Ask \"how is my budget?\" to see where you stand",
    "Say \"help\" to see everything I can do",
];

pub fn add_transaction(
    ctx: &AnalysisContext<'_>,
    classifier: &TransactionClassifier,
    amount: f64,
    description: &str,
    kind: TransactionKind,
) -> ChatResponse {
    let (category, confidence) = match kind {
        TransactionKind::Expense => {
            let c = classifier.classify(description, amount, ctx.snapshot);
            (c.category, c.confidence)
        }
        TransactionKind::Income => (ctx.config.income_category.clone(), 1.0),
    };

    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        amount,
        description: description.to_string(),
        category,
        date: ctx.today(),
        kind,
    };

    let alternatives: Vec<ChatAction> = if confidence < ctx.config.classifier.recategorize_below {
        ctx.snapshot
            .spending_categories(&ctx.config.income_category)
            .filter(|c| c.name != transaction.category)
            .take(MAX_RECATEGORIZE)
            .map(|c| {
                ChatAction::update(
                    format!("change-category:{}", c.name),
                    format!("Move to {}", c.name),
                    Some(StateMutation::UpdateTransaction(Transaction {
                        category: c.name.clone(),
                        ..transaction.clone()
                    })),
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        id = %transaction.id,
        category = %transaction.category,
        confidence,
        "Parsed new transaction"
    );

    let mut message = format!(
        "Added {}: {} - {} in {}",
        kind,
        transaction.description,
        money(amount),
        transaction.category
    );
    if !alternatives.is_empty() {
        message.push_str("\n\nNot the right category? Pick another one below.");
    }

    let add = ChatAction::update(
        "add-transaction",
        "Add transaction",
        Some(StateMutation::AddTransaction(transaction.clone())),
    );

    ChatResponse::new(IntentKind::AddTransaction, message)
        .with_auto_actions(vec![add])
        .with_actions(alternatives)
        .with_data(ResponseData::TransactionAdded { transaction })
}

pub fn balance(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let totals = month_totals(ctx.snapshot, ctx.today());
    let usage = percentage(totals.expenses, ctx.snapshot.monthly_budget);

    let status = if usage > 90.0 {
        "Critical: almost all of this month's budget is gone"
    } else if usage > 75.0 {
        "Caution: most of this month's budget is used"
    } else {
        "Good: spending is within budget"
    };

    let message = format!(
        "This month so far:\n\
         - Income: {}\n\
         - Expenses: {}\n\
         - Balance: {}\n\
         - Budget used: {:.1}%\n\n{}",
        money(totals.income),
        money(totals.expenses),
        money(totals.balance()),
        usage,
        status
    );

    ChatResponse::new(IntentKind::QueryBalance, message).with_actions(vec![
        ChatAction::navigate("view-transactions", "View transactions", "/transactions"),
        ChatAction::navigate("view-analysis", "View analysis", "/analysis"),
    ])
}

pub fn budget(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let usage = category_usage(ctx.snapshot, &ctx.config.income_category);

    let line = |u: &&crate::summary::CategoryUsage| {
        format!("- {}: {} of {} ({:.1}%)", u.name, money(u.used), money(u.budget), u.percentage)
    };
    let critical: Vec<String> = usage.iter().filter(|u| u.percentage > 90.0).map(|u| line(&u)).collect();
    let watch: Vec<String> = usage
        .iter()
        .filter(|u| u.percentage > 75.0 && u.percentage <= 90.0)
        .map(|u| line(&u))
        .collect();
    let good: Vec<String> = usage
        .iter()
        .filter(|u| u.percentage <= 75.0)
        .take(GOOD_SHOWN)
        .map(|u| line(&u))
        .collect();

    let mut sections = vec!["Budget status by category:".to_string()];
    for (title, lines) in [("Over or near the limit", critical), ("Worth watching", watch), ("On track", good)] {
        if !lines.is_empty() {
            sections.push(format!("{}:\n{}", title, lines.join("\n")));
        }
    }
    if usage.is_empty() {
        sections.push("No spending categories are set up yet.".to_string());
    }

    ChatResponse::new(IntentKind::QueryBudget, sections.join("\n\n"))
        .with_actions(vec![
            ChatAction::query("budget-tips", "Budget tips"),
            ChatAction::navigate("adjust-budget", "Adjust budgets", "/profile"),
        ])
        .with_data(ResponseData::BudgetSummary { categories: usage })
}

fn category_not_found(intent: IntentKind, name: &str) -> ChatResponse {
    ChatResponse::new(
        intent,
        format!("I couldn't find anything for \"{}\". Check the category name.", name),
    )
    .with_actions(vec![ChatAction::query("show-categories", "Show categories")])
}

pub fn category(ctx: &AnalysisContext<'_>, name: &str) -> ChatResponse {
    let mut expenses = ctx.snapshot.category_expenses(name);
    if expenses.is_empty() {
        return category_not_found(IntentKind::QueryCategory, name);
    }

    let total: f64 = expenses.iter().map(|t| t.amount).sum();
    let mut message = format!(
        "{}: {} across {} transactions",
        name,
        money(total),
        expenses.len()
    );

    let budget = ctx.snapshot.category_budget(name);
    if budget > 0.0 {
        message.push_str(&format!(
            "\nBudget: {} ({:.1}% used, {} remaining)",
            money(budget),
            percentage(total, budget),
            money(budget - total)
        ));
    }

    expenses.sort_by(|a, b| b.date.cmp(&a.date));
    message.push_str("\n\nRecent:");
    for t in expenses.iter().take(RECENT_SHOWN) {
        message.push_str(&format!("\n- {} {} ({})", t.date, t.description, money(t.amount)));
    }

    ChatResponse::new(IntentKind::QueryCategory, message).with_actions(vec![
        ChatAction::update(format!("add-{}", name), format!("Add {} expense", name), None),
        ChatAction::navigate("category-analysis", "Category analysis", "/analysis"),
    ])
}

pub fn goals(ctx: &AnalysisContext<'_>) -> ChatResponse {
    if ctx.snapshot.goals.is_empty() {
        return ChatResponse::new(
            IntentKind::QueryGoals,
            "You don't have any savings goals yet. Setting one is a great way to stay motivated.",
        )
        .with_actions(vec![ChatAction::navigate("create-goal", "Create a goal", "/profile")]);
    }

    let today = ctx.today();
    let lines: Vec<String> = ctx
        .snapshot
        .goals
        .iter()
        .map(|g| {
            format!(
                "- {}: {:.1}% done, {} to go, {} days left",
                g.title,
                g.progress_percent(),
                money(g.remaining()),
                g.days_left(today)
            )
        })
        .collect();

    ChatResponse::new(
        IntentKind::QueryGoals,
        format!("Your goals:\n{}", lines.join("\n")),
    )
    .with_actions(vec![
        ChatAction::navigate("update-goals", "Update goals", "/profile"),
        ChatAction::query("goal-tips", "Goal tips"),
    ])
}

pub fn update_budget(ctx: &AnalysisContext<'_>, name: &str, amount: f64) -> ChatResponse {
    let Some(category) = ctx.snapshot.category(name) else {
        return category_not_found(IntentKind::UpdateBudget, name);
    };

    let mutation = StateMutation::UpdateCategoryBudget {
        category: category.name.clone(),
        budget: amount,
    };

    ChatResponse::new(
        IntentKind::UpdateBudget,
        format!(
            "Change the {} budget from {} to {}?",
            category.name,
            money(category.budget),
            money(amount)
        ),
    )
    .with_actions(vec![ChatAction::update(
        format!("update-budget:{}", category.name),
        format!("Set {} budget to {}", category.name, money(amount)),
        Some(mutation),
    )])
}

pub fn advice(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let income = ctx.snapshot.total_income();
    let rate = percentage(income - ctx.snapshot.total_expenses(), income);

    let mut message = if rate < 10.0 {
        format!(
            "Your savings rate is {:.1}%. Aim for at least 10-20% by trimming non-essential spending.",
            rate
        )
    } else if rate < 20.0 {
        format!(
            "Your savings rate is {:.1}%. A solid start; pushing past 20% builds a real cushion.",
            rate
        )
    } else {
        format!(
            "Your savings rate is {:.1}%. Excellent; consider putting the surplus to work.",
            rate
        )
    };

    if let Some(top) = top_spending_category(ctx.snapshot, &ctx.config.income_category) {
        message.push_str(&format!(
            "\n\nYour biggest expense is {} ({}). Ideas:",
            top.name,
            money(top.amount)
        ));
        for step in category_advice(&top.name) {
            message.push_str(&format!("\n- {}", step));
        }
    }

    ChatResponse::new(IntentKind::FinancialAdvice, message).with_actions(vec![
        ChatAction::navigate("detailed-analysis", "Detailed analysis", "/analysis"),
        ChatAction::navigate("set-savings-goal", "Set a savings goal", "/profile"),
    ])
}

pub fn greeting(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let greeting = match ctx.now.hour() {
        h if h < 12 => "Good morning",
        h if h < 18 => "Good afternoon",
        _ => "Good evening",
    };

    ChatResponse::new(
        IntentKind::Greeting,
        format!("{}! How can I help with your finances today?", greeting),
    )
    .with_actions(vec![
        ChatAction::query("daily-summary", "Today's summary"),
        ChatAction::update("quick-add", "Quick add", None),
        ChatAction::query("view-goals", "View goals"),
    ])
}

pub fn help() -> ChatResponse {
    let message = "Here's what I can do:\n\
                   - Log spending: \"I spent 50 on groceries\"\n\
                   - Log income: \"I received 3000 from salary\"\n\
                   - Balance: \"what's my balance?\"\n\
                   - Budgets: \"how is my budget?\"\n\
                   - Categories: \"how much did I spend on food?\"\n\
                   - Change a budget: \"set the food budget to 900\"\n\
                   - Goals: \"show my goals\"\n\
                   - Advice: \"any tips?\"";

    ChatResponse::new(IntentKind::Help, message).with_actions(vec![
        ChatAction::query("try-balance", "Check balance"),
        ChatAction::update("try-add", "Add a transaction", None),
    ])
}

pub fn unknown(suggestion: &str) -> ChatResponse {
    ChatResponse::new(
        IntentKind::Unknown,
        format!("I didn't quite get that. {}.", suggestion),
    )
    .with_actions(vec![
        ChatAction::query("show-help", "Show help"),
        ChatAction::query("try-examples", "Show examples"),
    ])
}

pub fn daily_summary(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let today = ctx.today();
    let totals = day_totals(ctx.snapshot, today);

    let mut message = if totals.transactions == 0 {
        "Nothing logged today yet.".to_string()
    } else {
        format!(
            "Today: {} in, {} out across {} transactions",
            money(totals.income),
            money(totals.expenses),
            totals.transactions
        )
    };
    for t in day_transactions(ctx.snapshot, today).iter().take(DAILY_SHOWN) {
        let sign = if t.is_income() { "+" } else { "-" };
        message.push_str(&format!("\n{} {} {} ({})", sign, money(t.amount), t.description, t.category));
    }

    ChatResponse::new(IntentKind::QueryBalance, message).with_actions(vec![
        ChatAction::update("add-expense", "Add expense", None),
        ChatAction::query("view-week", "This week"),
    ])
}

pub fn budget_tips(ctx: &AnalysisContext<'_>) -> ChatResponse {
    let stretched: Vec<_> = category_usage(ctx.snapshot, &ctx.config.income_category)
        .into_iter()
        .filter(|u| u.percentage > TIPS_THRESHOLD)
        .take(2)
        .collect();

    let message = if stretched.is_empty() {
        format!(
            "Every category is under control. A general tip: {}",
            GENERAL_TIPS[0]
        )
    } else {
        stretched
            .iter()
            .map(|u| {
                let steps: Vec<String> = category_advice(&u.name)
                    .iter()
                    .map(|s| format!("- {}", s))
                    .collect();
                format!("{} is at {:.1}% of budget:\n{}", u.name, u.percentage, steps.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    ChatResponse::new(IntentKind::FinancialAdvice, message)
}

pub fn goal_tips(ctx: &AnalysisContext<'_>) -> ChatResponse {
    if ctx.snapshot.goals.is_empty() {
        return goals(ctx);
    }

    let today = ctx.today();
    let lines: Vec<String> = ctx
        .snapshot
        .goals
        .iter()
        .map(|g| {
            let progress = g.progress_percent();
            if progress < 25.0 {
                format!(
                    "- {}: needs a push; save about {} a month to make the deadline",
                    g.title,
                    money(monthly_required(g.remaining(), g.days_left(today)))
                )
            } else if progress < 75.0 {
                format!("- {}: on track, keep the pace", g.title)
            } else {
                format!("- {}: almost there!", g.title)
            }
        })
        .collect();

    ChatResponse::new(IntentKind::QueryGoals, format!("Goal tips:\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::test_utils::{at, date, expense, goal, income, snapshot_with};

    #[test]
    fn test_money() {
        assert_eq!(money(12.5), "$12.50");
        assert_eq!(money(-3.0), "-$3.00");
    }

    #[test]
    fn test_add_transaction_low_confidence_offers_alternatives() {
        let snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        let classifier = TransactionClassifier::from_config(&config);

        let resp = add_transaction(&ctx, &classifier, 200.0, "fuel", TransactionKind::Expense);
        assert_eq!(resp.intent, IntentKind::AddTransaction);
        assert_eq!(resp.auto_actions.len(), 1);
        assert_eq!(resp.auto_actions[0].id, "add-transaction");

        let Some(StateMutation::AddTransaction(tx)) = resp.auto_actions[0].mutation() else {
            panic!("expected an add mutation");
        };
        assert_eq!(tx.category, "Transport");
        assert_eq!(tx.date, date(2024, 6, 15));
        assert_eq!(tx.amount, 200.0);
        assert!(Uuid::parse_str(&tx.id).is_ok());

        let ids: Vec<&str> = resp.actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["change-category:Housing", "change-category:Food", "change-category:Entertainment"]
        );
        match resp.actions[0].mutation() {
            Some(StateMutation::UpdateTransaction(t)) => {
                assert_eq!(t.id, tx.id);
                assert_eq!(t.category, "Housing");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            resp.data,
            Some(ResponseData::TransactionAdded { transaction: tx.clone() })
        );
    }

    #[test]
    fn test_add_income_is_confident() {
        let snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        let classifier = TransactionClassifier::from_config(&config);

        let resp = add_transaction(&ctx, &classifier, 5000.0, "salary", TransactionKind::Income);
        assert!(resp.actions.is_empty());
        match resp.auto_actions[0].mutation() {
            Some(StateMutation::AddTransaction(t)) => {
                assert_eq!(t.category, "Income");
                assert_eq!(t.kind, TransactionKind::Income);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_balance_status_bands() {
        let mut snapshot = snapshot_with(vec![
            income("1", 5000.0, date(2024, 6, 1)),
            expense("2", 3800.0, "Housing", date(2024, 6, 2)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        let resp = balance(&ctx);
        assert!(resp.message.contains("Budget used: 95.0%"));
        assert!(resp.message.contains("Critical"));
        assert!(resp.mutations().next().is_none());

        snapshot.monthly_budget = 0.0;
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        let resp = balance(&ctx);
        assert!(resp.message.contains("Budget used: 0.0%"));
        assert!(resp.message.contains("Good"));
    }

    #[test]
    fn test_budget_summary_data() {
        let snapshot = snapshot_with(vec![
            expense("1", 850.0, "Food", date(2024, 6, 1)),
            expense("2", 480.0, "Transport", date(2024, 6, 1)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = budget(&ctx);
        assert!(resp.message.contains("Over or near the limit:\n- Food"));
        assert!(resp.message.contains("Worth watching:\n- Transport"));
        match resp.data {
            Some(ResponseData::BudgetSummary { ref categories }) => {
                assert_eq!(categories[0].name, "Food");
                assert_eq!(categories.len(), 6);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_category_found_and_not_found() {
        let snapshot = snapshot_with(vec![
            expense("1", 100.0, "Food", date(2024, 6, 1)),
            expense("2", 50.0, "Food", date(2024, 6, 3)),
            expense("3", 20.0, "Food", date(2024, 6, 2)),
            expense("4", 10.0, "Food", date(2024, 5, 2)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = category(&ctx, "Food");
        assert!(resp.message.starts_with("Food: $180.00 across 4 transactions"));
        assert!(resp.message.contains("22.5% used, $620.00 remaining"));
        assert!(resp.message.contains("- 2024-06-03 food ($50.00)\n- 2024-06-02"));
        assert!(!resp.message.contains("2024-05-02"));
        assert_eq!(resp.actions[0].id, "add-Food");

        let missing = category(&ctx, "Pets");
        assert!(missing.message.contains("couldn't find"));
        assert_eq!(missing.actions[0].id, "show-categories");
    }

    #[test]
    fn test_goals_empty_and_listed() {
        let mut snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        assert_eq!(goals(&ctx).actions[0].id, "create-goal");

        snapshot.goals = vec![goal("Trip", 1000.0, 250.0, date(2024, 7, 15))];
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);
        let resp = goals(&ctx);
        assert!(resp.message.contains("- Trip: 25.0% done, $750.00 to go, 30 days left"));
    }

    #[test]
    fn test_update_budget_is_suggested_not_applied() {
        let snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = update_budget(&ctx, "Food", 900.0);
        assert!(resp.auto_actions.is_empty());
        assert_eq!(resp.message, "Change the Food budget from $800.00 to $900.00?");
        assert_eq!(
            resp.actions[0].mutation(),
            Some(&StateMutation::UpdateCategoryBudget {
                category: "Food".into(),
                budget: 900.0,
            })
        );

        let missing = update_budget(&ctx, "pets", 10.0);
        assert!(missing.mutations().next().is_none());
    }

    #[test]
    fn test_advice_bands_and_top_category() {
        let snapshot = snapshot_with(vec![
            income("1", 1000.0, date(2024, 6, 1)),
            expense("2", 850.0, "Food", date(2024, 6, 2)),
        ]);
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = advice(&ctx);
        assert!(resp.message.starts_with("Your savings rate is 15.0%. A solid start"));
        assert!(resp.message.contains("biggest expense is Food ($850.00)"));
        assert!(resp.message.contains("- Plan a weekly menu"));
    }

    #[test]
    fn test_greeting_by_hour() {
        let snapshot = snapshot_with(vec![]);
        let config = EngineConfig::builtin();
        let morning = date(2024, 6, 15).and_hms_opt(8, 0, 0).unwrap();
        let evening = date(2024, 6, 15).and_hms_opt(18, 0, 0).unwrap();

        let resp = greeting(&AnalysisContext::new(&snapshot, morning, &config));
        assert!(resp.message.starts_with("Good morning"));
        let resp = greeting(&AnalysisContext::new(&snapshot, at(2024, 6, 15), &config));
        assert!(resp.message.starts_with("Good afternoon"));
        let resp = greeting(&AnalysisContext::new(&snapshot, evening, &config));
        assert!(resp.message.starts_with("Good evening"));
    }

    #[test]
    fn test_budget_tips() {
        let config = EngineConfig::builtin();
        let calm = snapshot_with(vec![]);
        let resp = budget_tips(&AnalysisContext::new(&calm, at(2024, 6, 15), &config));
        assert!(resp.message.starts_with("Every category is under control"));

        let stretched = snapshot_with(vec![expense("1", 700.0, "Food", date(2024, 6, 1))]);
        let resp = budget_tips(&AnalysisContext::new(&stretched, at(2024, 6, 15), &config));
        assert!(resp.message.starts_with("Food is at 87.5% of budget"));
    }

    #[test]
    fn test_goal_tips_bands() {
        let mut snapshot = snapshot_with(vec![]);
        snapshot.goals = vec![
            goal("Car", 1000.0, 100.0, date(2024, 7, 15)),
            goal("Trip", 1000.0, 500.0, date(2024, 7, 15)),
            goal("Laptop", 1000.0, 900.0, date(2024, 7, 15)),
        ];
        let config = EngineConfig::builtin();
        let ctx = AnalysisContext::new(&snapshot, at(2024, 6, 15), &config);

        let resp = goal_tips(&ctx);
        assert!(resp.message.contains("- Car: needs a push"));
        assert!(resp.message.contains("- Trip: on track"));
        assert!(resp.message.contains("- Laptop: almost there!"));
    }
}
