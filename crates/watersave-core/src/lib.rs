//! WaterSave Core Library
//!
//! Shared functionality for the WaterSave water usage tracker:
//! - Date-keyed usage and behavior ledgers (in memory, per session)
//! - Savings goal suggestion and bill estimation
//! - Usage statistics and windowed summaries for prompts
//! - Prompt library with user overrides
//! - Pluggable advice backends (Anthropic Messages API, mock)
//! - Action dispatch for the interactive dashboard

pub mod actions;
pub mod advice;
pub mod ai;
pub mod billing;
pub mod config;
pub mod error;
pub mod goal;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod session;

/// Test utilities including a mock Messages API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use actions::{dispatch, Action, AdviceKind, Outcome};
pub use advice::Advisor;
pub use ai::{AdviceBackend, AdviceClient, AnthropicBackend, CompletionRequest, MockBackend};
pub use config::{BackendKind, Config};
pub use error::{Error, Result};
pub use goal::GoalTracker;
pub use insights::UsageStats;
pub use ledger::{BehaviorLedger, Ledger, UsageLedger};
pub use models::{Behavior, BehaviorRecord, BillEstimate, ChartPoint, Goal, UsageRecord};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use session::Session;
