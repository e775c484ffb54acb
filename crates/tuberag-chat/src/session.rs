//! The session loop state machine.
//!
//! ```text
//! Idle -> AwaitingPrompt -> Dispatching -> Recording -> AwaitingPrompt ...
//!                       \-> Terminated (quit word or end of input)
//! ```
//!
//! Control words short-circuit in AwaitingPrompt: `cost` and `history`
//! print a local summary and self-loop without dispatching; `quit`,
//! `exit` and `q` terminate. Everything else is dispatched to the query
//! backend, and the outcome (response or error) is recorded as a
//! [`ChatTurn`] plus a query [`CostEvent`] before the loop returns to
//! AwaitingPrompt. No per-prompt failure is fatal to the session.

use std::io::Write;

use chrono::{Local, Utc};
use tracing::{info, warn};

use tuberag_cost::{render_summary, CostEvent, CostLedger, Pricing};

use crate::backend::QueryBackend;
use crate::error::Result;
use crate::history::{preview, ChatHistory, ChatTurn, TokenCounts};

/// Session loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet prompted (entered once after optional ingestion)
    Idle,
    /// Waiting for the next prompt
    AwaitingPrompt,
    /// A prompt is in flight to the backend
    Dispatching,
    /// Persisting the turn and its cost event
    Recording,
    /// Session over; no further I/O
    Terminated,
}

/// Reserved interactive inputs that trigger a local action instead of a
/// remote query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlWord {
    Quit,
    Cost,
    History,
}

impl ControlWord {
    /// Parse a trimmed input line; case-insensitive exact match.
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Some(ControlWord::Quit),
            "cost" => Some(ControlWord::Cost),
            "history" => Some(ControlWord::History),
            _ => None,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Model used for remote query dispatch
    pub model: String,

    /// Channel the session was opened against, stamped into turns
    pub channel: Option<String>,

    /// How many turns the `history` control word shows
    pub history_preview: usize,
}

impl SessionConfig {
    /// Config for a model, no channel.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            channel: None,
            history_preview: 5,
        }
    }

    /// Attach the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

/// The session loop: owns the state, borrows the stores.
pub struct SessionLoop<'a, B: QueryBackend> {
    backend: &'a B,
    history: &'a mut ChatHistory,
    ledger: &'a mut CostLedger,
    pricing: Pricing,
    config: SessionConfig,
    state: SessionState,
}

impl<'a, B: QueryBackend> SessionLoop<'a, B> {
    /// Create a session in the Idle state.
    pub fn new(
        backend: &'a B,
        history: &'a mut ChatHistory,
        ledger: &'a mut CostLedger,
        config: SessionConfig,
    ) -> Self {
        Self {
            backend,
            history,
            ledger,
            pricing: Pricing::default(),
            config,
            state: SessionState::Idle,
        }
    }

    /// Override the pricing table.
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// End of input: AwaitingPrompt (or Idle) becomes Terminated.
    pub fn finish(&mut self) {
        if self.state != SessionState::Terminated {
            info!(backend = self.backend.name(), "session terminated");
            self.state = SessionState::Terminated;
        }
    }

    /// Feed one input line through the state machine.
    ///
    /// Returns the state after the transition. Remote failures are
    /// recorded, not propagated; only local persistence errors surface.
    pub async fn handle_input<W: Write>(&mut self, input: &str, out: &mut W) -> Result<SessionState> {
        if self.state == SessionState::Terminated {
            return Ok(self.state);
        }

        // Idle -> AwaitingPrompt happens unconditionally on first input.
        self.state = SessionState::AwaitingPrompt;

        let prompt = input.trim();
        if prompt.is_empty() {
            return Ok(self.state);
        }

        match ControlWord::parse(prompt) {
            Some(ControlWord::Quit) => {
                writeln!(out, "Goodbye!")?;
                self.state = SessionState::Terminated;
                return Ok(self.state);
            }
            Some(ControlWord::Cost) => {
                write!(out, "{}", render_summary(self.ledger.events(), Local::now()))?;
                return Ok(self.state);
            }
            Some(ControlWord::History) => {
                write!(out, "{}", self.history.render_recent(self.config.history_preview))?;
                return Ok(self.state);
            }
            None => {}
        }

        self.state = SessionState::Dispatching;
        let outcome = self.backend.query(prompt, &self.config.model).await;

        self.state = SessionState::Recording;
        match outcome {
            Ok(reply) => {
                let cost = self
                    .pricing
                    .query_cost(reply.input_tokens, reply.output_tokens);
                let tokens = TokenCounts::new(reply.input_tokens, reply.output_tokens);

                writeln!(out, "\nAssistant: {}\n", reply.text)?;
                writeln!(
                    out,
                    "[Tokens - Input: {}, Output: {}]",
                    reply.input_tokens, reply.output_tokens
                )?;

                let mut turn =
                    ChatTurn::new(prompt, reply.text, cost, &self.config.model, tokens.clone());
                if let Some(channel) = &self.config.channel {
                    turn = turn.with_channel(channel.clone());
                }
                self.history.record(turn)?;

                self.ledger.record(
                    CostEvent::query(Utc::now(), tokens.total, cost)
                        .with_meta("input_tokens", reply.input_tokens.to_string())
                        .with_meta("output_tokens", reply.output_tokens.to_string())
                        .with_meta("prompt_preview", preview(prompt, 100)),
                )?;
            }
            Err(e) => {
                warn!(error = %e, "query failed, recording error turn");
                writeln!(out, "\nError: {e}")?;

                let mut turn = ChatTurn::error(prompt, e.to_string(), &self.config.model);
                if let Some(channel) = &self.config.channel {
                    turn = turn.with_channel(channel.clone());
                }
                self.history.record(turn)?;

                self.ledger.record(
                    CostEvent::query(Utc::now(), 0, 0.0)
                        .with_meta("error", e.to_string())
                        .with_meta("prompt_preview", preview(prompt, 100)),
                )?;
            }
        }

        self.state = SessionState::AwaitingPrompt;
        Ok(self.state)
    }

    /// Drive the loop over a queued prompt list (non-interactive mode).
    ///
    /// Exhausting the list is end-of-input: the session terminates.
    pub async fn run_batch<W: Write>(
        &mut self,
        prompts: impl IntoIterator<Item = String>,
        out: &mut W,
    ) -> Result<()> {
        for prompt in prompts {
            if self.state == SessionState::Terminated {
                break;
            }
            writeln!(out, "\nYou: {prompt}")?;
            self.handle_input(&prompt, out).await?;
        }
        self.finish();
        Ok(())
    }
}
