//! Command dispatch.

use pagepilot_protocols::{ActionRecord, HistoryEvent};
use tracing::{debug, info};

use crate::actions::{self, ActionContext, ActionOutcome};
use crate::command::{ActionKind, Command};
use crate::history::ActionHistory;

/// Routes commands to their handlers and records each one in the history.
///
/// Every dispatched command is logged as an `action` history entry before
/// its handler runs, whatever the handler's outcome turns out to be.
pub struct Dispatcher<'a> {
    ctx: ActionContext<'a>,
    history: &'a mut ActionHistory,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ctx: ActionContext<'a>, history: &'a mut ActionHistory) -> Self {
        Self { ctx, history }
    }

    /// Run one command.
    pub async fn dispatch(&mut self, command: &Command) -> ActionOutcome {
        info!(action = %command.action, target = %command.target, "Dispatching action");
        self.history
            .record(HistoryEvent::Action {
                action: command.action.to_string(),
                target: command.target.clone(),
            })
            .await;

        let ctx = &mut self.ctx;
        let target = command.target.as_str();
        let outcome = match command.action {
            ActionKind::Translate => actions::translate(ctx, target).await,
            ActionKind::Highlight => actions::highlight(ctx, target).await,
            ActionKind::Click => actions::click(ctx, target).await,
            ActionKind::Summarize => actions::summarize(ctx).await,
            ActionKind::Extract => actions::extract(ctx, target).await,
        };
        debug!(action = %command.action, ?outcome, "Action finished");
        outcome
    }

    /// Run the commands of one model reply in order, then record them as a
    /// single `ai_actions` entry. Nothing is recorded for an empty list.
    pub async fn run(&mut self, commands: &[Command]) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(commands.len());
        for command in commands {
            if self.ctx.cancel.is_cancelled() {
                debug!(action = %command.action, "Session closed, skipping action");
                outcomes.push(ActionOutcome::Cancelled);
                continue;
            }
            outcomes.push(self.dispatch(command).await);
        }

        if !commands.is_empty() {
            let actions = commands
                .iter()
                .map(|c| ActionRecord {
                    action: c.action.to_string(),
                    target: c.target.clone(),
                })
                .collect();
            self.history
                .record(HistoryEvent::AiActions { actions })
                .await;
        }
        outcomes
    }
}
