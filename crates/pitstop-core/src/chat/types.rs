//! Chat intents, responses and the actions they carry

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Transaction, TransactionKind};
use crate::summary::CategoryUsage;

/// Intent type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    AddTransaction,
    QueryBalance,
    QueryBudget,
    QueryCategory,
    QueryGoals,
    UpdateBudget,
    FinancialAdvice,
    Greeting,
    Help,
    Unknown,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::AddTransaction => "add_transaction",
            IntentKind::QueryBalance => "query_balance",
            IntentKind::QueryBudget => "query_budget",
            IntentKind::QueryCategory => "query_category",
            IntentKind::QueryGoals => "query_goals",
            IntentKind::UpdateBudget => "update_budget",
            IntentKind::FinancialAdvice => "financial_advice",
            IntentKind::Greeting => "greeting",
            IntentKind::Help => "help",
            IntentKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed utterance with whatever data it carried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    AddTransaction {
        amount: f64,
        description: String,
        kind: TransactionKind,
    },
    QueryBalance,
    QueryBudget,
    QueryCategory {
        category: String,
    },
    QueryGoals,
    UpdateBudget {
        category: String,
        amount: f64,
    },
    FinancialAdvice,
    Greeting,
    Help,
    Unknown,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::AddTransaction { .. } => IntentKind::AddTransaction,
            Intent::QueryBalance => IntentKind::QueryBalance,
            Intent::QueryBudget => IntentKind::QueryBudget,
            Intent::QueryCategory { .. } => IntentKind::QueryCategory,
            Intent::QueryGoals => IntentKind::QueryGoals,
            Intent::UpdateBudget { .. } => IntentKind::UpdateBudget,
            Intent::FinancialAdvice => IntentKind::FinancialAdvice,
            Intent::Greeting => IntentKind::Greeting,
            Intent::Help => IntentKind::Help,
            Intent::Unknown => IntentKind::Unknown,
        }
    }
}

/// A change the external state store is asked to apply atomically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StateMutation {
    AddTransaction(Transaction),
    /// Replace the transaction with the same id
    UpdateTransaction(Transaction),
    DeleteTransaction { id: String },
    UpdateCategoryBudget { category: String, budget: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Update,
    Query,
    Navigate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPayload {
    Mutation(StateMutation),
    Route(String),
}

/// A follow-up the user can trigger (or that is applied automatically)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAction {
    pub id: String,
    pub label: String,
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ActionPayload>,
}

impl ChatAction {
    pub fn query(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ActionKind::Query,
            payload: None,
        }
    }

    pub fn navigate(
        id: impl Into<String>,
        label: impl Into<String>,
        route: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ActionKind::Navigate,
            payload: Some(ActionPayload::Route(route.into())),
        }
    }

    /// An update action; `None` leaves it to the UI (e.g. open a form)
    pub fn update(
        id: impl Into<String>,
        label: impl Into<String>,
        mutation: Option<StateMutation>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ActionKind::Update,
            payload: mutation.map(ActionPayload::Mutation),
        }
    }

    pub fn mutation(&self) -> Option<&StateMutation> {
        match self.payload {
            Some(ActionPayload::Mutation(ref m)) => Some(m),
            _ => None,
        }
    }
}

/// Structured data for rich rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseData {
    TransactionAdded { transaction: Transaction },
    BudgetSummary { categories: Vec<CategoryUsage> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub intent: IntentKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ChatAction>,
    /// Actions to apply immediately, without asking
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auto_actions: Vec<ChatAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl ChatResponse {
    pub fn new(intent: IntentKind, message: impl Into<String>) -> Self {
        Self {
            intent,
            message: message.into(),
            actions: Vec::new(),
            auto_actions: Vec::new(),
            data: None,
        }
    }

    pub fn with_actions(mut self, actions: Vec<ChatAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_auto_actions(mut self, actions: Vec<ChatAction>) -> Self {
        self.auto_actions = actions;
        self
    }

    pub fn with_data(mut self, data: ResponseData) -> Self {
        self.data = Some(data);
        self
    }

    /// Every mutation carried by the response, auto-applied ones first
    pub fn mutations(&self) -> impl Iterator<Item = &StateMutation> {
        self.auto_actions
            .iter()
            .chain(self.actions.iter())
            .filter_map(ChatAction::mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_kind_tags() {
        let intent = Intent::UpdateBudget {
            category: "Food".into(),
            amount: 900.0,
        };
        assert_eq!(intent.kind(), IntentKind::UpdateBudget);
        assert_eq!(intent.kind().as_str(), "update_budget");

        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["type"], "update_budget");
        assert_eq!(json["amount"], 900.0);
    }

    #[test]
    fn test_action_serialization() {
        let action = ChatAction::update(
            "update-budget:Food",
            "Set Food budget to $900",
            Some(StateMutation::UpdateCategoryBudget {
                category: "Food".into(),
                budget: 900.0,
            }),
        );
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["kind"], "update");
        assert_eq!(json["payload"]["mutation"]["type"], "update_category_budget");
        assert_eq!(json["payload"]["mutation"]["payload"]["budget"], 900.0);

        let nav = serde_json::to_value(ChatAction::navigate("a", "b", "/analysis")).unwrap();
        assert_eq!(nav["payload"]["route"], "/analysis");
        assert!(serde_json::to_value(ChatAction::query("q", "Q")).unwrap()["payload"].is_null());
    }
}
