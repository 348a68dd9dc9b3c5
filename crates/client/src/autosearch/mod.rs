//! Event-driven auto-search.
//!
//! Triggers arrive on one channel and are consumed by a single dispatcher
//! loop. Every trigger is handled in its own task, so a slow search never
//! delays the gating of the next one. Runs are never cancelled; each one
//! writes its own badge and the last write wins.
//!
//! Per trigger:
//!
//! 1. load one policy snapshot
//! 2. check the trigger kind is enabled (a location change also clears the badge)
//! 3. resolve the URL, gate it, drop repeats within the throttle window
//! 4. run the aggregator and reduce the result to a badge

pub mod badge;
pub mod gate;
pub mod host;
pub mod throttle;

pub use badge::{BadgeColor, RunOutcome, format_count, summarize};
pub use host::{BadgeBoard, BadgeState, SurfaceRegistry};
pub use throttle::Throttle;

use std::sync::Arc;

use async_trait::async_trait;
use tabthreads_core::{AutoSearchConfig, PolicyStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::aggregate::{Aggregate, Aggregator};

/// An event that may start a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    LocationChanged { surface: String, url: String },
    BecameActive { surface: String },
}

impl Trigger {
    pub fn surface(&self) -> &str {
        match self {
            Trigger::LocationChanged { surface, .. } | Trigger::BecameActive { surface } => surface,
        }
    }
}

/// Runs one automatic search.
#[async_trait]
pub trait SearchRunner: Send + Sync {
    async fn run(&self, url: &str, policy: &AutoSearchConfig) -> Aggregate;
}

#[async_trait]
impl SearchRunner for Aggregator {
    async fn run(&self, url: &str, policy: &AutoSearchConfig) -> Aggregate {
        Aggregator::run(self, url, policy).await
    }
}

/// Receives badge writes.
#[async_trait]
pub trait BadgeSink: Send + Sync {
    async fn set_text(&self, surface: &str, text: &str);
    async fn set_color(&self, surface: &str, color: BadgeColor);
}

/// Resolves a surface to the URL it currently shows.
#[async_trait]
pub trait SurfaceResolver: Send + Sync {
    async fn current_url(&self, surface: &str) -> Option<String>;
}

/// Handles triggers end to end.
pub struct Controller {
    runner: Arc<dyn SearchRunner>,
    badges: Arc<dyn BadgeSink>,
    surfaces: Arc<dyn SurfaceResolver>,
    policies: PolicyStore,
    throttle: Throttle,
}

impl Controller {
    pub fn new(
        runner: Arc<dyn SearchRunner>, badges: Arc<dyn BadgeSink>, surfaces: Arc<dyn SurfaceResolver>,
        policies: PolicyStore,
    ) -> Self {
        Self { runner, badges, surfaces, policies, throttle: Throttle::default() }
    }

    /// Handle one trigger to its terminal state.
    pub async fn handle(&self, trigger: Trigger) -> RunOutcome {
        let policy = match self.policies.load().await {
            Ok(policy) => policy,
            Err(e) => {
                tracing::warn!(error = %e, "policy load failed, using defaults");
                AutoSearchConfig::default()
            }
        };

        let navigated = matches!(trigger, Trigger::LocationChanged { .. });
        let (surface, url) = match trigger {
            Trigger::LocationChanged { surface, url } => {
                if !policy.autorun.on_location_change {
                    return RunOutcome::Skipped;
                }
                (surface, url)
            }
            Trigger::BecameActive { surface } => {
                if !policy.autorun.on_activate {
                    return RunOutcome::Skipped;
                }
                let Some(url) = self.surfaces.current_url(&surface).await else {
                    tracing::debug!(surface = %surface, "no known URL for surface");
                    return RunOutcome::Skipped;
                };
                (surface, url)
            }
        };

        if !gate::allows(&url, &policy.filterlist) {
            tracing::debug!(surface = %surface, url = %url, "gated out");
            return RunOutcome::Skipped;
        }

        if !self.throttle.admit(&url).await {
            tracing::debug!(surface = %surface, url = %url, "repeat trigger dropped");
            return RunOutcome::Skipped;
        }

        if navigated {
            self.badges.set_text(&surface, "").await;
        }

        let aggregate = self.runner.run(&url, &policy).await;
        let outcome = summarize(&aggregate, policy.autorun.badge_content);

        if let Some((text, color)) = outcome.badge() {
            self.badges.set_text(&surface, text).await;
            self.badges.set_color(&surface, color).await;
        }

        tracing::info!(
            surface = %surface,
            url = %url,
            outcome = ?outcome,
            merged = aggregate.submissions.len(),
            partial_failure = aggregate.partial_failure(),
            "auto-search completed"
        );

        outcome
    }
}

/// Consume `triggers` until every sender is dropped, handling each trigger
/// in its own task.
pub fn spawn_dispatcher(controller: Arc<Controller>, mut triggers: mpsc::Receiver<Trigger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(trigger) = triggers.recv().await {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.handle(trigger).await;
            });
        }
        tracing::debug!("trigger channel closed, dispatcher stopped");
    })
}
