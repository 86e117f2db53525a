//! Advice requests built from session data
//!
//! Turns a question or the current ledgers into a rendered prompt with the
//! right token budget, then hands it to the configured backend. Pattern
//! analysis and challenges need at least one usage record; their builders
//! return `None` otherwise so the caller never contacts the service.

use std::collections::HashMap;

use tracing::debug;

use crate::ai::{AdviceBackend, AdviceClient, CompletionRequest};
use crate::error::Result;
use crate::insights::{self, DEFAULT_SUMMARY_WINDOW};
use crate::prompts::{PromptId, PromptLibrary};
use crate::session::Session;

/// Builds prompts and sends them to the advice backend
pub struct Advisor {
    client: AdviceClient,
    prompts: PromptLibrary,
    summary_window: usize,
}

impl Advisor {
    pub fn new(client: AdviceClient, prompts: PromptLibrary) -> Self {
        Self {
            client,
            prompts,
            summary_window: DEFAULT_SUMMARY_WINDOW,
        }
    }

    /// Limit how many recent records go into a prompt
    pub fn with_summary_window(mut self, window: usize) -> Self {
        self.summary_window = window.max(1);
        self
    }

    pub fn client(&self) -> &AdviceClient {
        &self.client
    }

    pub fn summary_window(&self) -> usize {
        self.summary_window
    }

    /// Request for a free-form question
    pub fn ask_request(&mut self, question: &str, session: &Session) -> Result<CompletionRequest> {
        let mut vars = HashMap::new();
        vars.insert("question", question.trim().to_string());
        if let Some(goal) = session.goal() {
            vars.insert("goal", format!("{:.1}", goal.liters_per_day));
        }
        if let Some(mean) = session.usage().average() {
            vars.insert("mean", format!("{:.1}", mean));
        }
        self.render(PromptId::AskAssistant, &vars)
    }

    /// Request for a pattern analysis, or `None` with no usage recorded
    pub fn pattern_request(&mut self, session: &Session) -> Result<Option<CompletionRequest>> {
        let Some(stats) = insights::usage_stats(session.usage()) else {
            return Ok(None);
        };
        let usage = insights::usage_summary(session.usage(), self.summary_window)
            .unwrap_or_default();
        let behavior = insights::behavior_summary(session.behavior(), self.summary_window)
            .unwrap_or_default();

        let mut vars = HashMap::new();
        vars.insert("days", stats.count.to_string());
        vars.insert("mean", format!("{:.1}", stats.mean));
        vars.insert("max", format!("{:.1}", stats.max));
        vars.insert("min", format!("{:.1}", stats.min));
        vars.insert("usage", usage);
        vars.insert("behavior", behavior);
        self.render(PromptId::AnalyzePattern, &vars).map(Some)
    }

    /// Request for a personalized challenge, or `None` with no usage recorded
    pub fn challenge_request(&mut self, session: &Session) -> Result<Option<CompletionRequest>> {
        let Some(stats) = insights::usage_stats(session.usage()) else {
            return Ok(None);
        };
        let behavior = insights::behavior_summary(session.behavior(), self.summary_window)
            .unwrap_or_default();

        let mut vars = HashMap::new();
        vars.insert("mean", format!("{:.1}", stats.mean));
        vars.insert("behavior", behavior);
        self.render(PromptId::GenerateChallenge, &vars).map(Some)
    }

    /// Send a request; the reply is returned verbatim
    pub async fn send(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            model = %self.client.model(),
            max_tokens = request.max_tokens,
            prompt_chars = request.prompt.len(),
            "Requesting advice"
        );
        self.client.complete(request).await
    }

    fn render(&mut self, id: PromptId, vars: &HashMap<&str, String>) -> Result<CompletionRequest> {
        let prompt = self.prompts.get(id)?;
        Ok(CompletionRequest {
            system: prompt.system_section().map(str::to_string),
            prompt: prompt.render_user(vars),
            max_tokens: id.max_tokens(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::models::Behavior;
    use chrono::NaiveDate;

    fn advisor() -> Advisor {
        Advisor::new(AdviceClient::mock(), PromptLibrary::embedded_only())
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    fn session_with_usage() -> Session {
        let mut session = Session::new();
        session.record_usage(d(1), 10.0).unwrap();
        session.record_usage(d(2), 20.0).unwrap();
        session.record_usage(d(3), 30.0).unwrap();
        session
    }

    #[test]
    fn test_ask_request_embeds_question() {
        let mut advisor = advisor();
        let request = advisor
            .ask_request("  Do dishwashers save water? ", &Session::new())
            .unwrap();

        assert_eq!(request.max_tokens, 500);
        assert!(request.prompt.contains("Question: Do dishwashers save water?"));
        assert!(!request.prompt.contains("average daily usage"));
        assert!(request.system.is_some());
    }

    #[test]
    fn test_ask_request_includes_goal_and_mean() {
        let mut advisor = advisor();
        let mut session = session_with_usage();
        session.confirm_goal(18.0).unwrap();

        let request = advisor.ask_request("Tips?", &session).unwrap();
        assert!(request.prompt.contains("daily goal is 18.0 liters"));
        assert!(request.prompt.contains("average daily usage so far is 20.0 liters"));
    }

    #[test]
    fn test_pattern_request_requires_usage() {
        let mut advisor = advisor();
        assert!(advisor.pattern_request(&Session::new()).unwrap().is_none());
        assert!(advisor.challenge_request(&Session::new()).unwrap().is_none());
    }

    #[test]
    fn test_pattern_request_contents() {
        let mut advisor = advisor();
        let mut session = session_with_usage();
        session.record_behavior(
            d(2),
            Behavior {
                shower_minutes: 15,
                laundry_loads: 2,
            },
        );

        let request = advisor.pattern_request(&session).unwrap().unwrap();
        assert_eq!(request.max_tokens, 500);
        assert!(request.prompt.contains("average: 20.0 liters/day"));
        assert!(request.prompt.contains("highest: 30.0 liters"));
        assert!(request.prompt.contains("lowest: 10.0 liters"));
        assert!(request.prompt.contains("2024-08-01: 10.0 L"));
        assert!(request
            .prompt
            .contains("2024-08-02: {shower_minutes: 15, laundry_loads: 2}"));
    }

    #[test]
    fn test_pattern_request_without_behavior_drops_section() {
        let mut advisor = advisor();
        let request = advisor
            .pattern_request(&session_with_usage())
            .unwrap()
            .unwrap();
        assert!(!request.prompt.contains("Household behaviors"));
        assert!(!request.prompt.contains("{{"));
    }

    #[test]
    fn test_challenge_request_budget() {
        let mut advisor = advisor();
        let request = advisor
            .challenge_request(&session_with_usage())
            .unwrap()
            .unwrap();
        assert_eq!(request.max_tokens, 300);
        assert!(request.prompt.contains("20.0 liters of water per day"));
    }

    #[test]
    fn test_summary_window_applied() {
        let mut advisor = advisor().with_summary_window(2);
        let mut session = Session::new();
        for day in 1..=6 {
            session.record_usage(d(day), f64::from(day)).unwrap();
        }

        let request = advisor.pattern_request(&session).unwrap().unwrap();
        assert!(!request.prompt.contains("2024-08-04: "));
        assert!(request.prompt.contains("2024-08-05: 5.0 L"));
        assert!(request.prompt.contains("(4 earlier days omitted)"));
        // Statistics still cover every recorded day
        assert!(request.prompt.contains("over 6 days"));
    }

    #[tokio::test]
    async fn test_send_returns_reply_verbatim() {
        let mock = MockBackend::with_reply("  Fix leaks first.\n");
        let advisor = Advisor::new(AdviceClient::Mock(mock.clone()), PromptLibrary::embedded_only());
        let request = CompletionRequest {
            system: None,
            prompt: "hi".into(),
            max_tokens: 500,
        };

        assert_eq!(advisor.send(&request).await.unwrap(), "  Fix leaks first.\n");
        assert_eq!(mock.call_count(), 1);
    }
}
