// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History store health probe.

use parley_core::{HealthReport, HealthStatus};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::HistoryClient;
use crate::endpoints;
use crate::transport::Request;

impl HistoryClient {
    /// Probes `/history/ensure` and classifies the answer with [`classify`].
    ///
    /// A request that gets no response at all reports the store as not
    /// working and unavailable.
    pub async fn probe(&self) -> HealthReport {
        let response = match self
            .transport
            .send(Request::get(endpoints::HISTORY_ENSURE), None)
            .await
        {
            Ok(response) => response,
            Err(failure) => {
                warn!(error = %failure, "health probe failed");
                return HealthReport {
                    available: false,
                    status: HealthStatus::NotWorking,
                };
            }
        };

        let status = response.status().as_u16();
        let payload = match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body).ok(),
            Err(e) => {
                warn!(status, error = %e, "health probe body unreadable");
                None
            }
        };

        let report = classify(status, payload.as_ref());
        debug!(status, available = report.available, health = %report.status, "health probed");
        report
    }
}

/// Classifies a probe response.
///
/// A truthy `message` wins over the status code; otherwise a 500 means the
/// store is configured but failing and anything else means it is not
/// configured. `available` depends only on the status being 2xx.
pub fn classify(status: u16, payload: Option<&Value>) -> HealthReport {
    let has_message = payload
        .and_then(|p| p.get("message"))
        .is_some_and(is_truthy);

    let health = if has_message {
        HealthStatus::Working
    } else if status == 500 {
        HealthStatus::NotWorking
    } else {
        HealthStatus::NotConfigured
    };

    HealthReport {
        available: (200..300).contains(&status),
        status: health,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
