//! Monthly stock reconciliation
//!
//! Merges a cumulative [`OrderRecord`] with an optional [`MonthlyOverride`]
//! into one display-ready [`ViewRow`]. Every override field falls back
//! independently; a partial override is legal and shadows only the fields it
//! carries.

use std::collections::HashMap;

use crate::models::{MonthlyOverride, OrderRecord, ViewRow};

/// Merge one cumulative record with its (optional) monthly override.
///
/// Pure and idempotent: identical inputs yield identical output, including
/// the shortage string.
pub fn reconcile(order: &OrderRecord, monthly: Option<&MonthlyOverride>) -> ViewRow {
    let in_qty = monthly.and_then(|m| m.in_qty).unwrap_or(order.in_qty_total);
    let out_qty = monthly
        .and_then(|m| m.out_qty)
        .unwrap_or(order.out_qty_total);
    let order_qty = monthly
        .and_then(|m| m.order_qty)
        .unwrap_or(order.order_qty_total);
    let stock_qty = monthly
        .and_then(|m| m.stock_qty)
        .unwrap_or(order.in_qty_total - order.out_qty_total);

    ViewRow {
        id: order.id,
        company: order.company.clone(),
        model: order.model.clone(),
        part_number: order.part_number.clone(),
        part_name: order.part_name.clone(),
        in_qty,
        stock_qty,
        shortage: format_shortage(order_qty - in_qty + out_qty),
        order_qty,
        out_qty,
        note: order.note.clone(),
    }
}

/// Format the raw shortage figure with the display sign convention:
/// positive raw shortage means under-received (`-N`), negative means
/// over-received (`+N`).
pub fn format_shortage(raw: i32) -> String {
    if raw < 0 {
        format!("+{}", raw.abs())
    } else if raw > 0 {
        format!("-{raw}")
    } else {
        "0".to_string()
    }
}

/// Reconcile a full month: joins one month's overrides to the order records
/// by `order_id` and merges each pair.
pub fn reconcile_month(orders: &[OrderRecord], overrides: &[MonthlyOverride]) -> Vec<ViewRow> {
    let by_order: HashMap<i64, &MonthlyOverride> =
        overrides.iter().map(|m| (m.order_id, m)).collect();

    orders
        .iter()
        .map(|order| reconcile(order, by_order.get(&order.id).copied()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn order(in_total: i32, out_total: i32, order_total: i32) -> OrderRecord {
        let now = Utc::now();
        OrderRecord {
            id: 1,
            company: "Myungjin".to_string(),
            model: "9BUB".to_string(),
            part_number: "GA29120A".to_string(),
            part_name: "SIDE WINDOW DEF LH".to_string(),
            in_qty_total: in_total,
            out_qty_total: out_total,
            order_qty_total: order_total,
            note: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn no_override_falls_back_to_cumulative() {
        let row = reconcile(&order(120, 30, 100), None);
        assert_eq!(row.in_qty, 120);
        assert_eq!(row.out_qty, 30);
        assert_eq!(row.order_qty, 100);
        assert_eq!(row.stock_qty, 90);
    }

    #[test]
    fn partial_override_only_shadows_present_fields() {
        let monthly = MonthlyOverride {
            order_qty: Some(200),
            ..MonthlyOverride::empty("2025-08", 1)
        };
        let row = reconcile(&order(120, 30, 100), Some(&monthly));
        assert_eq!(row.order_qty, 200);
        // Everything else still comes from the cumulative record.
        assert_eq!(row.in_qty, 120);
        assert_eq!(row.out_qty, 30);
        assert_eq!(row.stock_qty, 90);
    }

    #[test]
    fn full_override_wins_everywhere() {
        let monthly = MonthlyOverride {
            in_qty: Some(10),
            out_qty: Some(4),
            stock_qty: Some(6),
            order_qty: Some(12),
            ..MonthlyOverride::empty("2025-08", 1)
        };
        let row = reconcile(&order(120, 30, 100), Some(&monthly));
        assert_eq!(row.in_qty, 10);
        assert_eq!(row.out_qty, 4);
        assert_eq!(row.stock_qty, 6);
        assert_eq!(row.order_qty, 12);
    }

    #[test]
    fn shortage_sign_convention() {
        assert_eq!(reconcile(&order(100, 0, 100), None).shortage, "0");
        assert_eq!(reconcile(&order(80, 0, 100), None).shortage, "-20");
        assert_eq!(reconcile(&order(120, 0, 100), None).shortage, "+20");
    }

    #[test]
    fn reconcile_is_idempotent() {
        let o = order(55, 12, 70);
        let monthly = MonthlyOverride {
            in_qty: Some(40),
            ..MonthlyOverride::empty("2025-08", 1)
        };
        let first = reconcile(&o, Some(&monthly));
        let second = reconcile(&o, Some(&monthly));
        assert_eq!(first, second);
    }

    #[test]
    fn month_join_matches_overrides_by_order_id() {
        let mut a = order(10, 0, 10);
        a.id = 1;
        let mut b = order(20, 0, 20);
        b.id = 2;
        let overrides = vec![MonthlyOverride {
            stock_qty: Some(99),
            ..MonthlyOverride::empty("2025-08", 2)
        }];

        let rows = reconcile_month(&[a, b], &overrides);
        assert_eq!(rows[0].stock_qty, 10);
        assert_eq!(rows[1].stock_qty, 99);
    }

    proptest! {
        /// Shortage string always carries the inverse sign of the raw figure.
        #[test]
        fn prop_shortage_sign(raw in -10_000i32..10_000) {
            let s = format_shortage(raw);
            if raw > 0 {
                prop_assert!(s.starts_with('-'));
            } else if raw < 0 {
                prop_assert!(s.starts_with('+'));
            } else {
                prop_assert_eq!(s, "0");
            }
        }

        /// Shortage of zero happens exactly when order = inbound - outbound.
        #[test]
        fn prop_shortage_zero_iff_exact(
            order_qty in 0i32..5_000,
            in_qty in 0i32..5_000,
            out_qty in 0i32..5_000,
        ) {
            let raw = order_qty - in_qty + out_qty;
            prop_assert_eq!(format_shortage(raw) == "0", raw == 0);
        }

        /// Without an override, stock is always the cumulative difference.
        #[test]
        fn prop_fallback_stock(in_total in 0i32..10_000, out_total in 0i32..10_000) {
            let row = reconcile(&order(in_total, out_total, 0), None);
            prop_assert_eq!(row.stock_qty, in_total - out_total);
        }
    }
}
