//! Where injected alerts come from.
//!
//! An [`AlertSource`] is polled once per injector tick and answers with zero
//! or more drafts. Sources never touch the store; the applier does.

use std::collections::VecDeque;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sr_core::types::AlertCategory;
use sr_gateway::GatewayError;
use sr_risk::RiskError;

/// An alert waiting to be added to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub category: AlertCategory,
    pub message: String,
    pub location: String,
}

impl AlertDraft {
    pub fn new(category: AlertCategory, message: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            location: location.into(),
        }
    }
}

/// A poll that produced nothing usable. The injector logs it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// Producer of alert drafts, polled on a timer.
#[async_trait]
pub trait AlertSource: Send {
    /// Name for logging.
    fn name(&self) -> &str;

    async fn poll(&mut self) -> Result<Vec<AlertDraft>, SourceError>;
}

/// Synthetic traffic: with probability `probability` per poll, one alert of a
/// uniformly random category at a fixed location.
#[derive(Debug)]
pub struct RandomAlertSource<R = StdRng> {
    rng: R,
    probability: f64,
    location: String,
}

impl RandomAlertSource<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy(probability: f64, location: impl Into<String>) -> Self {
        Self::new(StdRng::from_entropy(), probability, location)
    }
}

impl<R: Rng + Send> RandomAlertSource<R> {
    /// `probability` is clamped to `[0, 1]`.
    pub fn new(rng: R, probability: f64, location: impl Into<String>) -> Self {
        Self {
            rng,
            probability: probability.clamp(0.0, 1.0),
            location: location.into(),
        }
    }

    /// One draw; `None` most of the time.
    pub fn draw(&mut self) -> Option<AlertDraft> {
        if self.rng.gen::<f64>() >= self.probability {
            return None;
        }
        let category = AlertCategory::ALL[self.rng.gen_range(0..AlertCategory::ALL.len())];
        Some(AlertDraft::new(
            category,
            format!("New {category} alert detected"),
            self.location.clone(),
        ))
    }
}

#[async_trait]
impl<R: Rng + Send> AlertSource for RandomAlertSource<R> {
    fn name(&self) -> &str {
        "random"
    }

    async fn poll(&mut self) -> Result<Vec<AlertDraft>, SourceError> {
        Ok(self.draw().into_iter().collect())
    }
}

/// Replays a fixed sequence of poll results, then yields nothing.
#[derive(Debug, Default)]
pub struct ScriptedAlertSource {
    script: VecDeque<Vec<AlertDraft>>,
}

impl ScriptedAlertSource {
    pub fn new(script: impl IntoIterator<Item = Vec<AlertDraft>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl AlertSource for ScriptedAlertSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn poll(&mut self) -> Result<Vec<AlertDraft>, SourceError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}
