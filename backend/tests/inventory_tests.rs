//! Service-level tests for inbound registration and cell edits, driven
//! through the in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;

use parts_inventory_backend::services::inventory::{
    EditOrderRequest, InventoryService, RegisterInboundInput,
};
use parts_inventory_backend::store::{MemoryStore, RecordStore};
use shared::{current_month, CellField};

fn setup() -> (InventoryService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = InventoryService::new(store.clone());
    (service, store)
}

fn inbound_input(
    company: &str,
    part_number: &str,
    in_qty: i32,
    order_qty: i32,
) -> RegisterInboundInput {
    RegisterInboundInput {
        company: company.to_string(),
        model: "M-100".to_string(),
        part_number: part_number.to_string(),
        part_name: "Bracket".to_string(),
        date: Some(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()),
        in_qty,
        order_qty,
        note: String::new(),
    }
}

#[tokio::test]
async fn register_inbound_creates_order_and_month_row() {
    let (service, store) = setup();

    let row = service
        .register_inbound(inbound_input("Acme", "PN-001", 50, 80))
        .await
        .unwrap();

    assert_eq!(row.in_qty, 50);
    assert_eq!(row.stock_qty, 50);
    assert_eq!(row.order_qty, 80);
    // order=80, in=50, out=0 -> shortage 30 displayed with a plus sign
    assert_eq!(row.shortage, "+30");

    let order = store
        .find_order("Acme", "M-100", "PN-001")
        .await
        .unwrap()
        .expect("order created");
    let monthly = store
        .find_monthly_override(&current_month(), order.id)
        .await
        .unwrap()
        .expect("month row created");
    assert_eq!(monthly.in_qty, Some(50));
    assert_eq!(monthly.out_qty, Some(0));
    assert_eq!(monthly.stock_qty, Some(50));
}

#[tokio::test]
async fn register_inbound_reuses_existing_natural_key() {
    let (service, store) = setup();

    service
        .register_inbound(inbound_input("Acme", "PN-001", 10, 20))
        .await
        .unwrap();
    service
        .register_inbound(inbound_input("Acme", "PN-001", 40, 60))
        .await
        .unwrap();

    let orders = store.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1, "same key must not duplicate the order");

    // Last registration wins the month row.
    let monthly = store
        .find_monthly_override(&current_month(), orders[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(monthly.in_qty, Some(40));
    assert_eq!(monthly.order_qty, Some(60));
}

#[tokio::test]
async fn register_inbound_preserves_prior_outbound() {
    let (service, _store) = setup();

    let first = service
        .register_inbound(inbound_input("Acme", "PN-001", 10, 0))
        .await
        .unwrap();

    // Record outbound against the month before the next receipt arrives.
    service
        .edit_order(
            first.id,
            EditOrderRequest {
                in_qty: 10,
                stock_qty: 3,
                order_qty: 0,
                out_qty: 7,
                note: String::new(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap();

    let row = service
        .register_inbound(inbound_input("Acme", "PN-001", 30, 0))
        .await
        .unwrap();
    assert_eq!(row.out_qty, 7);
    assert_eq!(row.stock_qty, 23);
}

#[tokio::test]
async fn register_inbound_fails_when_override_upsert_fails() {
    let (service, store) = setup();

    store.fail_next("upsert_monthly_override").unwrap();
    let err = service
        .register_inbound(inbound_input("Acme", "PN-001", 25, 0))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        parts_inventory_backend::error::AppError::Store(_)
    ));

    // The month row never landed, and the failure was not reported as success.
    let order = store
        .find_order("Acme", "M-100", "PN-001")
        .await
        .unwrap()
        .unwrap();
    assert!(store
        .find_monthly_override(&current_month(), order.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn register_inbound_rejects_blank_required_fields() {
    let (service, store) = setup();

    let mut input = inbound_input("Acme", "PN-001", 5, 5);
    input.part_number = "   ".to_string();

    let err = service.register_inbound(input).await.unwrap_err();
    assert!(matches!(
        err,
        parts_inventory_backend::error::AppError::Validation { .. }
    ));
    assert!(store.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn register_inbound_appends_dated_event() {
    let (service, store) = setup();

    service
        .register_inbound(inbound_input("Acme", "PN-001", 25, 0))
        .await
        .unwrap();

    let events = store
        .list_inbound_events_since(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].quantity, 25);
    assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
}

#[tokio::test]
async fn edit_cell_relative_delta_on_inbound_shifts_stock() {
    let (service, _store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    let row = service
        .edit_cell(created.id, CellField::InQty, "+5", "kim")
        .await
        .unwrap();
    assert_eq!(row.in_qty, 25);
    assert_eq!(row.stock_qty, 25, "stock follows the inbound delta");

    let row = service
        .edit_cell(created.id, CellField::InQty, "-10", "kim")
        .await
        .unwrap();
    assert_eq!(row.in_qty, 15);
    assert_eq!(row.stock_qty, 15);
}

#[tokio::test]
async fn edit_cell_absolute_value_replaces() {
    let (service, _store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    let row = service
        .edit_cell(created.id, CellField::OrderQty, "90", "kim")
        .await
        .unwrap();
    assert_eq!(row.order_qty, 90);
    // Shortage re-derives from the edited values: 90 - 20 + 0.
    assert_eq!(row.shortage, "+70");
}

#[tokio::test]
async fn edit_cell_stock_edit_leaves_inbound_alone() {
    let (service, _store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 0))
        .await
        .unwrap();

    let row = service
        .edit_cell(created.id, CellField::StockQty, "3", "kim")
        .await
        .unwrap();
    assert_eq!(row.stock_qty, 3);
    assert_eq!(row.in_qty, 20);
}

#[tokio::test]
async fn edit_cell_unparseable_input_means_zero() {
    let (service, _store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 0))
        .await
        .unwrap();

    let row = service
        .edit_cell(created.id, CellField::OrderQty, "abc", "kim")
        .await
        .unwrap();
    assert_eq!(row.order_qty, 0);

    // "+abc" is a zero delta, so nothing moves.
    let row = service
        .edit_cell(created.id, CellField::InQty, "+abc", "kim")
        .await
        .unwrap();
    assert_eq!(row.in_qty, 20);
    assert_eq!(row.stock_qty, 20);
}

#[tokio::test]
async fn edit_cell_appends_audit_only_on_change() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    service
        .edit_cell(created.id, CellField::OrderQty, "90", "kim")
        .await
        .unwrap();
    // Same value again: no new audit entry.
    service
        .edit_cell(created.id, CellField::OrderQty, "90", "kim")
        .await
        .unwrap();

    let entries = store.list_audit_entries(Some(created.id)).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor_name, "kim");
    assert_eq!(entries[0].changes.len(), 1);
    assert_eq!(entries[0].changes[0].field, "order_qty");
    assert_eq!(entries[0].changes[0].old_value, serde_json::json!(50));
    assert_eq!(entries[0].changes[0].new_value, serde_json::json!(90));
}

#[tokio::test]
async fn edit_order_replaces_both_layers() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    let row = service
        .edit_order(
            created.id,
            EditOrderRequest {
                in_qty: 25,
                stock_qty: 18,
                order_qty: 60,
                out_qty: 7,
                note: "recount".to_string(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(row.in_qty, 25);
    assert_eq!(row.stock_qty, 18);
    assert_eq!(row.order_qty, 60);
    assert_eq!(row.out_qty, 7);
    assert_eq!(row.note, "recount");

    // The cumulative record took the new totals and note.
    let order = store.get_order(created.id).await.unwrap().unwrap();
    assert_eq!(order.in_qty_total, 25);
    assert_eq!(order.out_qty_total, 7);
    assert_eq!(order.order_qty_total, 60);
    assert_eq!(order.note, "recount");

    // The month row carries all four quantities.
    let monthly = store
        .find_monthly_override(&current_month(), created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(monthly.in_qty, Some(25));
    assert_eq!(monthly.out_qty, Some(7));
    assert_eq!(monthly.stock_qty, Some(18));
    assert_eq!(monthly.order_qty, Some(60));
}

#[tokio::test]
async fn edit_order_appends_one_multi_field_audit_entry() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    service
        .edit_order(
            created.id,
            EditOrderRequest {
                in_qty: 25,
                stock_qty: 18,
                order_qty: 50,
                out_qty: 7,
                note: "recount".to_string(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap();

    // One entry for the whole submission, one change per differing field
    // (order_qty stayed at 50 and the note started blank).
    let entries = store.list_audit_entries(Some(created.id)).await.unwrap();
    assert_eq!(entries.len(), 1);
    let fields: Vec<&str> = entries[0].changes.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, vec!["in_qty", "stock_qty", "out_qty", "note"]);
    assert_eq!(entries[0].changes[3].old_value, serde_json::json!(""));
    assert_eq!(entries[0].changes[3].new_value, serde_json::json!("recount"));
}

#[tokio::test]
async fn edit_order_unchanged_submission_writes_no_audit() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();

    service
        .edit_order(
            created.id,
            EditOrderRequest {
                in_qty: 20,
                stock_qty: 20,
                order_qty: 50,
                out_qty: 0,
                note: String::new(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(store
        .list_audit_entries(Some(created.id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn cumulative_totals_feed_reconciliation_fallback() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 20, 50))
        .await
        .unwrap();
    service
        .edit_order(
            created.id,
            EditOrderRequest {
                in_qty: 25,
                stock_qty: 18,
                order_qty: 60,
                out_qty: 7,
                note: String::new(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap();

    // With no override for the month, the view falls back to the totals.
    store
        .delete_monthly_overrides(&current_month(), Some(created.id))
        .await
        .unwrap();
    let rows = service.month_view(&current_month()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].in_qty, 25);
    assert_eq!(rows[0].out_qty, 7);
    assert_eq!(rows[0].stock_qty, 18);
    assert_eq!(rows[0].order_qty, 60);
}

#[tokio::test]
async fn edit_order_unknown_order_is_not_found() {
    let (service, _store) = setup();

    let err = service
        .edit_order(
            999,
            EditOrderRequest {
                in_qty: 1,
                stock_qty: 1,
                order_qty: 1,
                out_qty: 0,
                note: String::new(),
                actor_name: "kim".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        parts_inventory_backend::error::AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn edit_cell_unknown_order_is_not_found() {
    let (service, _store) = setup();

    let err = service
        .edit_cell(999, CellField::InQty, "5", "kim")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        parts_inventory_backend::error::AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn month_view_rejects_malformed_month() {
    let (service, _store) = setup();

    assert!(service.month_view("2026-3").await.is_err());
    assert!(service.month_view("garbage").await.is_err());
    assert!(service.month_view("2026-03").await.is_ok());
}

#[tokio::test]
async fn months_falls_back_to_current_month() {
    let (service, _store) = setup();

    let months = service.months().await.unwrap();
    assert_eq!(months, vec![current_month()]);

    service
        .register_inbound(inbound_input("Acme", "PN-001", 1, 0))
        .await
        .unwrap();
    let months = service.months().await.unwrap();
    assert_eq!(months, vec![current_month()]);
}

#[tokio::test]
async fn export_csv_contains_header_and_rows() {
    let (service, _store) = setup();

    service
        .register_inbound(inbound_input("Acme", "PN-001", 50, 80))
        .await
        .unwrap();

    let csv = service.export_csv(&current_month()).await.unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "company,model,part_number,part_name,in_qty,stock_qty,shortage,order_qty,out_qty,note"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("Acme,M-100,PN-001,Bracket,50,50,+30,80,0"));
}

#[tokio::test]
async fn delete_order_removes_only_the_order() {
    let (service, store) = setup();

    let created = service
        .register_inbound(inbound_input("Acme", "PN-001", 10, 0))
        .await
        .unwrap();

    service.delete_order(created.id).await.unwrap();
    assert!(store.get_order(created.id).await.unwrap().is_none());
    // The month row is deliberately left behind.
    assert!(store
        .find_monthly_override(&current_month(), created.id)
        .await
        .unwrap()
        .is_some());
}
