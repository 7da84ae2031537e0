//! Core types for the insight engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of message an insight carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Something is going wrong
    Warning,
    /// Money could be saved or redirected
    Opportunity,
    /// A milestone is (nearly) reached
    Achievement,
    Prediction,
    Recommendation,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Opportunity => "opportunity",
            InsightKind::Achievement => "achievement",
            InsightKind::Prediction => "prediction",
            InsightKind::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(InsightKind::Warning),
            "opportunity" => Ok(InsightKind::Opportunity),
            "achievement" => Ok(InsightKind::Achievement),
            "prediction" => Ok(InsightKind::Prediction),
            "recommendation" => Ok(InsightKind::Recommendation),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// How urgent an insight is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Ranking weight (higher = more urgent)
    pub fn weight(&self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A generated, ranked piece of advice. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable key for de-duplication (e.g., "budget-breach:Food")
    pub id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    /// Suggested next steps, most important first
    pub actions: Vec<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1-10
    pub impact: u8,
    /// 0-1
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Insight {
    pub fn new(
        id: impl Into<String>,
        kind: InsightKind,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            actions: Vec::new(),
            priority,
            category: None,
            impact: 1,
            confidence: 0.0,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Impact is clamped into 1-10
    pub fn with_impact(mut self, impact: u8) -> Self {
        self.impact = impact.clamp(1, 10);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// `priority weight * impact`, the ranking key
    pub fn score(&self) -> u32 {
        self.priority.weight() * u32::from(self.impact)
    }
}
