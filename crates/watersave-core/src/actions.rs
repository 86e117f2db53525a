//! Dashboard actions and their dispatch
//!
//! Every menu entry maps to one `Action` variant. `dispatch` runs it against
//! the session and returns an `Outcome` for the presentation layer. It never
//! returns an error: bad input, missing data and advice service faults all
//! come back as outcomes, and a failed advice request leaves the session
//! untouched.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::advice::Advisor;
use crate::ai::CompletionRequest;
use crate::billing;
use crate::error::Error;
use crate::models::{Behavior, BillEstimate, ChartPoint, Goal};
use crate::session::{validate_volume, Session};

/// A logical dashboard action
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RecordUsage {
        date: NaiveDate,
        liters: f64,
    },
    VisualizeUsage,
    RecordBehavior {
        date: NaiveDate,
        behavior: Behavior,
    },
    /// Show the suggestion when `liters` is `None`, otherwise confirm it
    SetGoal {
        liters: Option<f64>,
    },
    /// Estimate from an explicit monthly volume, or project one from the
    /// recorded average when `None`
    EstimateBill {
        monthly_liters: Option<f64>,
    },
    AskAssistant {
        question: String,
    },
    AnalyzePattern,
    GenerateChallenge,
}

impl Action {
    /// Short human-readable name, used in logs and menus
    pub fn label(&self) -> &'static str {
        match self {
            Action::RecordUsage { .. } => "record usage",
            Action::VisualizeUsage => "visualize usage",
            Action::RecordBehavior { .. } => "record behavior",
            Action::SetGoal { .. } => "set goal",
            Action::EstimateBill { .. } => "estimate bill",
            Action::AskAssistant { .. } => "ask assistant",
            Action::AnalyzePattern => "analyze pattern",
            Action::GenerateChallenge => "generate challenge",
        }
    }

    /// Whether this action may contact the advice service
    pub fn uses_advice(&self) -> bool {
        matches!(
            self,
            Action::AskAssistant { .. } | Action::AnalyzePattern | Action::GenerateChallenge
        )
    }
}

/// Kind of advice returned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Answer,
    PatternAnalysis,
    Challenge,
}

/// Display-ready result of an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    UsageRecorded {
        date: NaiveDate,
        liters: f64,
        replaced: Option<f64>,
    },
    BehaviorRecorded {
        date: NaiveDate,
        behavior: Behavior,
        replaced: bool,
    },
    Chart {
        points: Vec<ChartPoint>,
    },
    GoalSuggested {
        suggested: f64,
        current: Option<Goal>,
    },
    GoalSet {
        goal: Goal,
    },
    Bill {
        estimate: BillEstimate,
        /// Days the volume was projected over, when derived from the average
        projected_days: Option<u32>,
    },
    Advice {
        kind: AdviceKind,
        text: String,
    },
    /// Informational: the ledger the action needs is empty
    InsufficientData {
        message: String,
    },
    /// The input was rejected before anything changed
    Invalid {
        message: String,
    },
    /// The advice request failed; session state is unchanged
    Failed {
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            Outcome::InsufficientData { .. } | Outcome::Invalid { .. } | Outcome::Failed { .. }
        )
    }

    fn insufficient(message: &str) -> Self {
        Outcome::InsufficientData {
            message: message.to_string(),
        }
    }

    fn invalid(err: Error) -> Self {
        Outcome::Invalid {
            message: err.to_string(),
        }
    }
}

const NO_USAGE: &str = "No water usage recorded yet. Record some usage first.";

/// Run one action against the session
pub async fn dispatch(session: &mut Session, advisor: &mut Advisor, action: Action) -> Outcome {
    match action {
        Action::RecordUsage { date, liters } => match session.record_usage(date, liters) {
            Ok(replaced) => Outcome::UsageRecorded {
                date,
                liters,
                replaced,
            },
            Err(e) => Outcome::invalid(e),
        },

        Action::VisualizeUsage => {
            if session.usage().is_empty() {
                return Outcome::insufficient(NO_USAGE);
            }
            Outcome::Chart {
                points: session.usage().chart_points(),
            }
        }

        Action::RecordBehavior { date, behavior } => {
            let replaced = session.record_behavior(date, behavior).is_some();
            Outcome::BehaviorRecorded {
                date,
                behavior,
                replaced,
            }
        }

        Action::SetGoal { liters: None } => Outcome::GoalSuggested {
            suggested: session.suggested_goal(),
            current: session.goal(),
        },

        Action::SetGoal {
            liters: Some(liters),
        } => match session.confirm_goal(liters) {
            Ok(goal) => Outcome::GoalSet { goal },
            Err(e) => Outcome::invalid(e),
        },

        Action::EstimateBill {
            monthly_liters: Some(liters),
        } => match validate_volume("monthly liters", liters) {
            Ok(()) => Outcome::Bill {
                estimate: billing::estimate_bill(liters),
                projected_days: None,
            },
            Err(e) => Outcome::invalid(e),
        },

        Action::EstimateBill {
            monthly_liters: None,
        } => match session.usage().average() {
            Some(average) => {
                let days = billing::days_in_month(Local::now().date_naive());
                Outcome::Bill {
                    estimate: billing::estimate_bill(billing::projected_monthly_liters(
                        average, days,
                    )),
                    projected_days: Some(days),
                }
            }
            None => Outcome::insufficient(NO_USAGE),
        },

        Action::AskAssistant { question } => {
            if question.trim().is_empty() {
                return Outcome::Invalid {
                    message: "Question must not be empty".to_string(),
                };
            }
            let request = advisor.ask_request(&question, session);
            request_advice(advisor, request.map(Some), AdviceKind::Answer).await
        }

        Action::AnalyzePattern => {
            let request = advisor.pattern_request(session);
            request_advice(advisor, request, AdviceKind::PatternAnalysis).await
        }

        Action::GenerateChallenge => {
            let request = advisor.challenge_request(session);
            request_advice(advisor, request, AdviceKind::Challenge).await
        }
    }
}

/// Send a built request, turning every failure into an outcome
async fn request_advice(
    advisor: &Advisor,
    request: crate::error::Result<Option<CompletionRequest>>,
    kind: AdviceKind,
) -> Outcome {
    let request = match request {
        Ok(Some(request)) => request,
        Ok(None) => return Outcome::insufficient(NO_USAGE),
        Err(e) => {
            warn!(error = %e, ?kind, "Failed to build advice prompt");
            return Outcome::Failed {
                message: format!("Could not prepare the request: {}", e),
            };
        }
    };

    match advisor.send(&request).await {
        Ok(text) => Outcome::Advice { kind, text },
        Err(e) => {
            warn!(error = %e, ?kind, advice_fault = e.is_advice_fault(), "Advice request failed");
            Outcome::Failed {
                message: format!("The advice service is unavailable: {}", e),
            }
        }
    }
}
