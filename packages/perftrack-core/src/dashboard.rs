//! Evaluation passes and the state handed to a renderer.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::evaluator::evaluate;
use crate::provider::PriceProvider;
use crate::ranking::rank;
use crate::types::RankedRow;

/// What a renderer should show.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// No pass has run yet
    #[default]
    NeverEvaluated,
    /// A pass ran and produced no rows
    NoData {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// A pass ran and produced ranked rows
    Ready { rows: Vec<RankedRow> },
}

impl DisplayState {
    pub fn rows(&self) -> &[RankedRow] {
        match self {
            DisplayState::Ready { rows } => rows.as_slice(),
            _ => &[],
        }
    }
}

/// Run one evaluation pass: batched fetch, evaluate, rank.
///
/// A provider failure yields `NoData` carrying the error message; it is
/// never propagated.
pub fn run_pass(config: &Config, provider: &dyn PriceProvider, as_of_year: i32) -> DisplayState {
    let tickers = config.tickers();

    let histories = match provider.fetch_history(&tickers, config.lookback()) {
        Ok(histories) => histories,
        Err(e) => {
            tracing::error!(provider = provider.name(), error = %e, "price fetch failed");
            return DisplayState::NoData {
                reason: Some(e.to_string()),
            };
        }
    };

    let records = evaluate(&config.instruments, &histories, as_of_year, &config.windows);
    tracing::info!(
        provider = provider.name(),
        requested = tickers.len(),
        evaluated = records.len(),
        "evaluation pass complete"
    );

    if records.is_empty() {
        return DisplayState::NoData { reason: None };
    }

    DisplayState::Ready {
        rows: rank(records, config.sort_key, &config.currency_symbol),
    }
}

/// Caller-owned holder for the roster and the latest display state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: Config,
    state: DisplayState,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: DisplayState::NeverEvaluated,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration; the current state is kept until the next refresh.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Run a new pass and replace the current state with its result.
    pub fn refresh(&mut self, provider: &dyn PriceProvider, as_of_year: i32) -> &DisplayState {
        self.state = run_pass(&self.config, provider, as_of_year);
        &self.state
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn rows(&self) -> &[RankedRow] {
        self.state.rows()
    }

    pub fn is_evaluated(&self) -> bool {
        !matches!(self.state, DisplayState::NeverEvaluated)
    }
}
