use std::sync::Arc;

use shared::models::StationCreate;
use shared::{
    ActorContext, BranchKitchenConfig, OrderType, SourceOrder, SourceOrderLine, SourceOrderStatus,
    StaffRole,
};

use super::*;
use crate::branch::StaticBranchDirectory;
use crate::notify::MemoryTransport;
use crate::stations::StationRegistry;
use crate::utils::utc_date_string;

struct Fixture {
    manager: KitchenManager,
    storage: KitchenStorage,
    transport: Arc<MemoryTransport>,
    branches: Arc<StaticBranchDirectory>,
    registry: StationRegistry,
    roster: StaffRoster,
}

fn setup() -> Fixture {
    let storage = KitchenStorage::open_in_memory().unwrap();
    let transport = Arc::new(MemoryTransport::new());
    let branches = Arc::new(StaticBranchDirectory::new());
    branches.set(BranchKitchenConfig::enabled(1));

    let relay = NotificationRelay::new(storage.clone(), transport.clone());
    let roster = StaffRoster::new(storage.clone());
    let assignment = AssignmentEngine::new(storage.clone(), roster.clone());
    let analytics = AnalyticsAggregator::new(storage.clone(), branches.clone(), relay.clone());
    let manager = KitchenManager::new(
        storage.clone(),
        branches.clone(),
        relay,
        assignment,
        roster.clone(),
        analytics,
    );

    Fixture {
        manager,
        storage: storage.clone(),
        transport,
        branches,
        registry: StationRegistry::new(storage),
        roster,
    }
}

fn ctx() -> ActorContext {
    ActorContext::new(1, Some(10), StaffRole::Kitchen)
}

fn source_line(id: &str, name: &str, category: Option<&str>) -> SourceOrderLine {
    SourceOrderLine {
        id: id.to_string(),
        name: name.to_string(),
        category: category.map(String::from),
        quantity: 1,
        note: None,
    }
}

fn source_order(id: &str, lines: Vec<SourceOrderLine>) -> SourceOrder {
    SourceOrder {
        id: id.to_string(),
        branch_id: 1,
        order_type: OrderType::Takeaway,
        created_at: crate::utils::now_millis(),
        lines,
    }
}

fn station(fixture: &Fixture, name: &str) -> u64 {
    fixture
        .registry
        .create(
            1,
            StationCreate {
                name: name.into(),
                description: None,
            },
        )
        .unwrap()
        .id
}

#[test]
fn test_disabled_branch_is_a_silent_no_op() {
    let fixture = setup();
    fixture.branches.set_enabled(1, false);

    let created = fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Steak", None)]))
        .unwrap();
    assert!(created.is_none());
    assert!(fixture.storage.get_order("ord-1").unwrap().is_none());
}

#[test]
fn test_order_created_mirrors_lines_with_station_affinity() {
    let fixture = setup();
    let grill = station(&fixture, "Grill");
    let dessert = station(&fixture, "Dessert Corner");

    let order = source_order(
        "ord-1",
        vec![
            source_line("l1", "Ribeye", Some("Grill")),
            source_line("l2", "Tiramisu", Some("Dessert")),
        ],
    );
    let record = fixture.manager.on_order_created(&order).unwrap().unwrap();

    assert_eq!(record.status, PrepStatus::Pending);
    assert_eq!(record.priority, 5);
    assert_eq!(record.lines.len(), 2);
    assert_eq!(record.lines[0].station_id, Some(grill));
    assert_eq!(record.lines[1].station_id, Some(dessert));
    assert!(record.estimated_completion_at.is_some());

    // Mirroring the same order twice is a no-op
    let again = fixture.manager.on_order_created(&order).unwrap().unwrap();
    assert_eq!(again.id, record.id);
}

#[test]
fn test_creation_auto_assigns_available_staff() {
    let fixture = setup();
    let grill = station(&fixture, "Grill");
    fixture.roster.register(10, Some(grill)).unwrap();

    let record = fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![source_line("l1", "Ribeye", Some("Grill"))],
        ))
        .unwrap()
        .unwrap();

    assert_eq!(record.lines[0].status, PrepStatus::Preparing);
    assert_eq!(record.lines[0].prepared_by, Some(10));
    assert!(!fixture.roster.list_for_station(grill).unwrap()[0].is_available);
}

#[test]
fn test_start_requires_pending() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();

    let order = fixture.manager.start(&ctx(), "ord-1").unwrap();
    assert_eq!(order.status, PrepStatus::Preparing);
    assert!(order.started_at.is_some());
    assert!(order.lines[0].started_at.is_some());

    assert!(matches!(
        fixture.manager.start(&ctx(), "ord-1"),
        Err(KitchenError::InvalidTransition(_))
    ));
}

#[test]
fn test_start_on_ready_order_is_rejected() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();
    fixture.manager.start(&ctx(), "ord-1").unwrap();

    let order = fixture.manager.get("ord-1").unwrap();
    fixture
        .manager
        .start_line(&ctx(), "ord-1", order.lines[0].id)
        .unwrap();
    let order = fixture
        .manager
        .complete_line(&ctx(), "ord-1", order.lines[0].id)
        .unwrap();
    assert_eq!(order.status, PrepStatus::Ready);

    assert!(matches!(
        fixture.manager.start(&ctx(), "ord-1"),
        Err(KitchenError::InvalidTransition(_))
    ));
}

#[test]
fn test_complete_line_promotes_to_ready_not_completed() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![
                source_line("l1", "Ribeye", None),
                source_line("l2", "Fries", None),
            ],
        ))
        .unwrap();
    fixture.manager.start(&ctx(), "ord-1").unwrap();
    let lines: Vec<u64> = fixture
        .manager
        .get("ord-1")
        .unwrap()
        .lines
        .iter()
        .map(|l| l.id)
        .collect();

    for &line_id in &lines {
        fixture.manager.start_line(&ctx(), "ord-1", line_id).unwrap();
    }
    let order = fixture.manager.complete_line(&ctx(), "ord-1", lines[0]).unwrap();
    assert_eq!(order.status, PrepStatus::Preparing);

    let order = fixture.manager.complete_line(&ctx(), "ord-1", lines[1]).unwrap();
    assert_eq!(order.status, PrepStatus::Ready);

    // Ready still needs the explicit complete call
    let order = fixture.manager.complete(&ctx(), "ord-1").unwrap();
    assert_eq!(order.status, PrepStatus::Completed);
}

#[test]
fn test_complete_line_promotes_pending_order_with_auto_assigned_lines() {
    let fixture = setup();
    let grill = station(&fixture, "Grill");
    fixture.roster.register(10, Some(grill)).unwrap();

    // Auto-assignment starts the line while the order itself stays pending
    let record = fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![source_line("l1", "Ribeye", Some("Grill"))],
        ))
        .unwrap()
        .unwrap();
    assert_eq!(record.status, PrepStatus::Pending);
    assert_eq!(record.lines[0].status, PrepStatus::Preparing);

    let order = fixture
        .manager
        .complete_line(&ctx(), "ord-1", record.lines[0].id)
        .unwrap();
    assert_eq!(order.status, PrepStatus::Ready);

    let order = fixture.manager.complete(&ctx(), "ord-1").unwrap();
    assert_eq!(order.status, PrepStatus::Completed);
}

#[test]
fn test_complete_sets_duration_once_and_updates_analytics() {
    let fixture = setup();
    let grill = station(&fixture, "Grill");
    fixture.roster.register(10, Some(grill)).unwrap();
    fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![source_line("l1", "Ribeye", Some("Grill"))],
        ))
        .unwrap();

    fixture.manager.start(&ctx(), "ord-1").unwrap();
    let order = fixture.manager.complete(&ctx(), "ord-1").unwrap();

    assert_eq!(order.status, PrepStatus::Completed);
    assert!(order.completed_at.is_some());
    assert!(order.preparation_duration_ms.is_some());
    assert!(order.lines.iter().all(|l| l.status == PrepStatus::Completed));

    // Staff bound to the order is released
    let staff = fixture.roster.list_for_station(grill).unwrap();
    assert!(staff[0].is_available);
    assert!(staff[0].current_order_id.is_none());

    // One completed line with a station lands in the daily row
    let date = utc_date_string(order.completed_at.unwrap());
    let row = fixture.storage.get_analytics(grill, &date).unwrap().unwrap();
    assert_eq!(row.total_orders, 1);
}

#[test]
fn test_cancel_after_completed_is_rejected() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();
    fixture.manager.start(&ctx(), "ord-1").unwrap();
    fixture.manager.complete(&ctx(), "ord-1").unwrap();

    assert!(matches!(
        fixture.manager.cancel(&ctx(), "ord-1"),
        Err(KitchenError::InvalidTransition(_))
    ));
}

#[test]
fn test_complete_requires_preparing_or_ready() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();

    assert!(matches!(
        fixture.manager.complete(&ctx(), "ord-1"),
        Err(KitchenError::InvalidTransition(_))
    ));
}

#[test]
fn test_start_line_without_station_is_rejected() {
    let fixture = setup();
    // No stations exist, so the line stays unassigned
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();
    let line_id = fixture.manager.get("ord-1").unwrap().lines[0].id;

    assert!(matches!(
        fixture.manager.start_line(&ctx(), "ord-1", line_id),
        Err(KitchenError::NoStationAssigned(_))
    ));
}

#[test]
fn test_start_line_records_preparer() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![source_line("l1", "Ribeye", Some("Grill"))],
        ))
        .unwrap();
    let line_id = fixture.manager.get("ord-1").unwrap().lines[0].id;

    let order = fixture.manager.start_line(&ctx(), "ord-1", line_id).unwrap();
    assert_eq!(order.lines[0].status, PrepStatus::Preparing);
    assert_eq!(order.lines[0].prepared_by, Some(10));
}

#[test]
fn test_status_mirror_applies_legal_and_ignores_illegal() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();

    fixture
        .manager
        .on_order_status_changed("ord-1", SourceOrderStatus::Preparing)
        .unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().status, PrepStatus::Preparing);

    fixture
        .manager
        .on_order_status_changed("ord-1", SourceOrderStatus::Completed)
        .unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().status, PrepStatus::Completed);

    // Cancelling a completed mirror is ignored, not an error
    fixture
        .manager
        .on_order_status_changed("ord-1", SourceOrderStatus::Cancelled)
        .unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().status, PrepStatus::Completed);

    // Unknown orders are ignored too
    fixture
        .manager
        .on_order_status_changed("ghost", SourceOrderStatus::Completed)
        .unwrap();
}

#[test]
fn test_status_mirror_allows_completed_from_pending() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();

    fixture
        .manager
        .on_order_status_changed("ord-1", SourceOrderStatus::Completed)
        .unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().status, PrepStatus::Completed);
}

#[test]
fn test_line_created_appends_to_existing_order() {
    let fixture = setup();
    let dessert = station(&fixture, "Dessert");
    let order = source_order("ord-1", vec![source_line("l1", "Ribeye", None)]);
    fixture.manager.on_order_created(&order).unwrap();

    fixture
        .manager
        .on_order_line_created(&order, &source_line("l2", "Tiramisu", Some("Dessert")))
        .unwrap();

    let record = fixture.manager.get("ord-1").unwrap();
    assert_eq!(record.lines.len(), 2);
    assert_eq!(record.lines[1].station_id, Some(dessert));

    // Replayed events do not duplicate lines
    fixture
        .manager
        .on_order_line_created(&order, &source_line("l2", "Tiramisu", Some("Dessert")))
        .unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().lines.len(), 2);
}

#[test]
fn test_deleting_last_line_deletes_order() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![
                source_line("l1", "Ribeye", None),
                source_line("l2", "Fries", None),
            ],
        ))
        .unwrap();

    fixture.manager.on_order_line_deleted("ord-1", "l1").unwrap();
    assert_eq!(fixture.manager.get("ord-1").unwrap().lines.len(), 1);

    fixture.manager.on_order_line_deleted("ord-1", "l2").unwrap();
    assert!(fixture.storage.get_order("ord-1").unwrap().is_none());
}

#[test]
fn test_order_deleted_removes_mirror_and_releases_staff() {
    let fixture = setup();
    let grill = station(&fixture, "Grill");
    fixture.roster.register(10, Some(grill)).unwrap();
    fixture
        .manager
        .on_order_created(&source_order(
            "ord-1",
            vec![source_line("l1", "Ribeye", Some("Grill"))],
        ))
        .unwrap();

    fixture.manager.on_order_deleted("ord-1").unwrap();
    assert!(fixture.storage.get_order("ord-1").unwrap().is_none());
    assert!(fixture.roster.list_for_station(grill).unwrap()[0].is_available);
}

#[test]
fn test_transitions_emit_events() {
    let fixture = setup();
    station(&fixture, "Grill");
    let mut events = fixture.manager.subscribe();

    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();
    fixture.manager.start(&ctx(), "ord-1").unwrap();

    assert_eq!(events.try_recv().unwrap().status, "PENDING");
    assert_eq!(events.try_recv().unwrap().status, "PREPARING");
    // The live channel saw the same transitions
    assert_eq!(fixture.transport.published_count(), 2);
}

#[test]
fn test_cross_branch_actor_cannot_touch_order() {
    let fixture = setup();
    station(&fixture, "Grill");
    fixture
        .manager
        .on_order_created(&source_order("ord-1", vec![source_line("l1", "Ribeye", None)]))
        .unwrap();

    let foreign = ActorContext::new(2, Some(10), StaffRole::Kitchen);
    assert!(matches!(
        fixture.manager.start(&foreign, "ord-1"),
        Err(KitchenError::OrderNotFound(_))
    ));
}
