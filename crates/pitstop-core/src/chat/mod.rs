//! Intent Router - free-text utterances to structured intents and actions
//!
//! An ordered [`RuleTable`] turns an utterance into an [`Intent`]; the
//! [`IntentRouter`] dispatches it to a handler that builds the response.
//! Mutations are advisory: the caller's state store decides whether to
//! apply them.
//!
//! ```rust,ignore
//! let router = IntentRouter::new(&config)?;
//! let ctx = AnalysisContext::new(&snapshot, now, &config);
//! let response = router.respond(&ctx, "I spent 200 on fuel");
//! for mutation in response.mutations() {
//!     store.apply(mutation)?;
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod rules;
pub mod types;

pub use router::{normalize_category, IntentRouter};
pub use rules::{IntentRule, RuleTable};
pub use types::{
    ActionKind, ActionPayload, ChatAction, ChatResponse, Intent, IntentKind, ResponseData,
    StateMutation,
};
