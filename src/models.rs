use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{BoardError, BoardResult};

/// Body returned by the `latest/{base}` endpoint. Only `rates` is required.
#[derive(Serialize, Deserialize, Debug)]
pub struct RatesResponse {
    pub base: Option<String>,
    pub date: Option<String>,
    pub rates: HashMap<String, f64>,
}

/// Immutable set of rates, `1 base = rate target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatesSnapshot {
    pub base: String,
    pub date: Option<String>,
    pub rates: HashMap<String, f64>,
}

impl RatesSnapshot {
    /// Builds a snapshot from a decoded response, rejecting non-positive or
    /// non-finite rates.
    pub fn from_response(requested_base: &str, response: RatesResponse) -> BoardResult<Self> {
        if let Some((code, rate)) = response
            .rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
        {
            return Err(BoardError::Payload(format!(
                "rate for {} is not positive: {}",
                code, rate
            )));
        }

        Ok(Self {
            base: response.base.unwrap_or_else(|| requested_base.to_string()),
            date: response.date,
            rates: response.rates,
        })
    }

    pub fn rate(&self, code: &str) -> BoardResult<f64> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| BoardError::MissingRate(code.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub snapshot: Arc<RatesSnapshot>,
    pub timestamp: SystemTime,
}

/// A tracked currency and the name it is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCurrency {
    pub code: &'static str,
    pub name: &'static str,
}

/// Currencies shown on the board, in display order.
pub const DEFAULT_TARGETS: [TargetCurrency; 4] = [
    TargetCurrency { code: "USD", name: "美元" },
    TargetCurrency { code: "EUR", name: "欧元" },
    TargetCurrency { code: "GBP", name: "英镑" },
    TargetCurrency { code: "AUD", name: "澳元" },
];

/// One line of the conversion table.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub label: String,
    pub inverse_rate: f64,
    pub converted: String,
}
