//! Dashboard reporting over the inbound event log

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use serde::Serialize;

use crate::error::AppResult;
use crate::store::RecordStore;

/// How far back the inbound trend looks.
const TREND_MONTHS: u32 = 6;

/// Inbound total for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyInboundTotal {
    pub month: String,
    pub total_in: i64,
}

/// Reporting service over the row-store boundary
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<dyn RecordStore>,
}

impl ReportingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Per-month inbound totals for the last six months, oldest first.
    /// Aggregates the append-only event log; reconciliation state is not
    /// consulted.
    pub async fn inbound_trend(&self) -> AppResult<Vec<MonthlyInboundTotal>> {
        let today = Utc::now().date_naive();
        let since = today
            .checked_sub_months(Months::new(TREND_MONTHS))
            .unwrap_or(NaiveDate::MIN);

        let events = self.store.list_inbound_events_since(since).await?;

        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for event in &events {
            let month = event.date.format("%Y-%m").to_string();
            *totals.entry(month).or_insert(0) += i64::from(event.quantity);
        }

        Ok(totals
            .into_iter()
            .map(|(month, total_in)| MonthlyInboundTotal { month, total_in })
            .collect())
    }
}
