//! Kitchen order state machine
//!
//! Mirrors the lifecycle of customer orders into kitchen order aggregates
//! and exposes the explicit order/line transitions. The order source calls
//! the `on_*` methods; kitchen displays call `start`, `complete`, `cancel`
//! and the line-level transitions.
//!
//! Order states: `PENDING -> PREPARING -> { READY -> COMPLETED | COMPLETED }`,
//! plus `{ PENDING, PREPARING } -> CANCELLED`. `COMPLETED` and `CANCELLED`
//! are terminal. `READY` is only reached when every line completes; the
//! order still needs an explicit `complete` call after that.
//!
//! Each transition runs in one write transaction over the aggregate and
//! any touched staff/analytics rows. Events go out after the commit.

use std::sync::Arc;

use tokio::sync::broadcast;

use shared::models::{KitchenLineRecord, KitchenOrderRecord};
use shared::{
    ActorContext, KitchenEvent, PrepStatus, SourceOrder, SourceOrderLine, SourceOrderStatus,
};

use crate::analytics::AnalyticsAggregator;
use crate::assignment::AssignmentEngine;
use crate::branch::BranchConfigSource;
use crate::core::{KitchenError, KitchenResult};
use crate::notify::NotificationRelay;
use crate::priority::calculate_order_priority;
use crate::staff::StaffRoster;
use crate::storage::{KitchenStorage, LINE_SEQ, StorageError};
use crate::utils::now_millis;

#[cfg(test)]
mod tests;

const EVENT_CHANNEL_CAPACITY: usize = 256;
const MINUTE_MS: i64 = 60_000;

#[derive(Clone)]
pub struct KitchenManager {
    storage: KitchenStorage,
    branches: Arc<dyn BranchConfigSource>,
    relay: NotificationRelay,
    assignment: AssignmentEngine,
    roster: StaffRoster,
    analytics: AnalyticsAggregator,
    events: broadcast::Sender<KitchenEvent>,
}

impl KitchenManager {
    pub fn new(
        storage: KitchenStorage,
        branches: Arc<dyn BranchConfigSource>,
        relay: NotificationRelay,
        assignment: AssignmentEngine,
        roster: StaffRoster,
        analytics: AnalyticsAggregator,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            branches,
            relay,
            assignment,
            roster,
            analytics,
            events,
        }
    }

    /// Subscribe to kitchen events (all branches)
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.events.subscribe()
    }

    /// Broadcast in-process and push to the live channel, post-commit
    fn emit(&self, branch_id: i64, order_id: &str, status: &str) {
        let event = KitchenEvent::order_update(branch_id, order_id, status);
        let _ = self.events.send(event);
        self.relay.notify(branch_id, order_id, status);
    }

    // ========== Order source hooks ==========

    /// Mirror a newly created source order into a kitchen order
    ///
    /// No-op when the branch has the kitchen feature disabled, or when the
    /// order was already mirrored. Each line gets a station from the
    /// assignment engine; staff auto-assignment runs afterwards when the
    /// branch enables it.
    pub fn on_order_created(&self, order: &SourceOrder) -> KitchenResult<Option<KitchenOrderRecord>> {
        if !self.branches.kitchen_enabled(order.branch_id) {
            tracing::debug!(
                order_id = %order.id,
                branch_id = order.branch_id,
                "Kitchen disabled, source order ignored"
            );
            return Ok(None);
        }
        let settings = self.branches.settings(order.branch_id);
        let now = now_millis();

        let record = {
            let txn = self.storage.begin_write()?;
            if let Some(existing) = self.storage.get_order_txn(&txn, &order.id)? {
                return Ok(Some(existing));
            }

            let mut lines = Vec::with_capacity(order.lines.len());
            for source_line in &order.lines {
                let station_id = self.assignment.select_station_txn(
                    &txn,
                    order.branch_id,
                    source_line.category.as_deref(),
                )?;
                lines.push(KitchenLineRecord {
                    id: self.storage.next_id(&txn, LINE_SEQ)?,
                    source_line_id: source_line.id.clone(),
                    name: source_line.name.clone(),
                    category: source_line.category.clone(),
                    quantity: source_line.quantity,
                    station_id,
                    status: PrepStatus::Pending,
                    prepared_by: None,
                    started_at: None,
                    completed_at: None,
                    note: source_line.note.clone(),
                });
            }

            let record = KitchenOrderRecord {
                id: uuid::Uuid::new_v4().to_string(),
                source_order_id: order.id.clone(),
                branch_id: order.branch_id,
                status: PrepStatus::Pending,
                priority: calculate_order_priority(order, now),
                notes: String::new(),
                created_at: now,
                started_at: None,
                completed_at: None,
                estimated_completion_at: Some(
                    now + i64::from(settings.default_preparation_minutes) * MINUTE_MS,
                ),
                preparation_duration_ms: None,
                lines,
            };
            self.storage.put_order(&txn, &record)?;
            txn.commit().map_err(StorageError::from)?;
            record
        };

        if settings.auto_assign_stations {
            // Best effort; a failed batch never fails order creation
            if let Err(e) = self.assignment.auto_assign_pending(order.branch_id) {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "Auto-assignment after order creation failed"
                );
            }
        }

        self.emit(record.branch_id, &record.source_order_id, "PENDING");
        tracing::info!(
            order_id = %record.source_order_id,
            branch_id = record.branch_id,
            priority = record.priority,
            lines = record.lines.len(),
            "Kitchen order created"
        );
        Ok(Some(self.storage.get_order(&order.id)?.unwrap_or(record)))
    }

    /// Mirror a source order status change
    ///
    /// Illegal mirrors (e.g. a completed source order whose kitchen order
    /// is already cancelled) are logged and ignored; the source of truth
    /// for the source order lives elsewhere.
    pub fn on_order_status_changed(
        &self,
        source_order_id: &str,
        new_status: SourceOrderStatus,
    ) -> KitchenResult<()> {
        if self.storage.get_order(source_order_id)?.is_none() {
            return Ok(());
        }
        let result = match new_status {
            SourceOrderStatus::Pending => Ok(()),
            SourceOrderStatus::Preparing => self.transition_start(source_order_id),
            // The mirror path accepts completed straight from pending
            SourceOrderStatus::Completed => self.transition_complete(source_order_id, true),
            SourceOrderStatus::Cancelled => self.transition_cancel(source_order_id),
        };
        match result {
            Ok(()) => Ok(()),
            Err(KitchenError::InvalidTransition(detail)) => {
                tracing::warn!(
                    order_id = %source_order_id,
                    status = ?new_status,
                    detail,
                    "Ignoring illegal status mirror"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Mirror a new source order line into the kitchen order
    ///
    /// Creates the whole kitchen order when the line arrives before the
    /// order was mirrored (or the order predates kitchen enablement).
    pub fn on_order_line_created(
        &self,
        order: &SourceOrder,
        line: &SourceOrderLine,
    ) -> KitchenResult<()> {
        if !self.branches.kitchen_enabled(order.branch_id) {
            return Ok(());
        }
        let existing = self.storage.get_order(&order.id)?;
        let Some(mut record) = existing else {
            self.on_order_created(order)?;
            return Ok(());
        };
        if record.lines.iter().any(|l| l.source_line_id == line.id) {
            return Ok(());
        }

        let txn = self.storage.begin_write()?;
        let station_id =
            self.assignment
                .select_station_txn(&txn, order.branch_id, line.category.as_deref())?;
        record.lines.push(KitchenLineRecord {
            id: self.storage.next_id(&txn, LINE_SEQ)?,
            source_line_id: line.id.clone(),
            name: line.name.clone(),
            category: line.category.clone(),
            quantity: line.quantity,
            station_id,
            status: PrepStatus::Pending,
            prepared_by: None,
            started_at: None,
            completed_at: None,
            note: line.note.clone(),
        });
        self.storage.put_order(&txn, &record)?;
        txn.commit().map_err(StorageError::from)?;

        self.emit(record.branch_id, &record.source_order_id, "ITEM_ADDED");
        Ok(())
    }

    /// Mirror a source line deletion; the last line takes the order with it
    pub fn on_order_line_deleted(
        &self,
        source_order_id: &str,
        source_line_id: &str,
    ) -> KitchenResult<()> {
        let txn = self.storage.begin_write()?;
        let Some(mut record) = self.storage.get_order_txn(&txn, source_order_id)? else {
            return Ok(());
        };
        let before = record.lines.len();
        record.lines.retain(|l| l.source_line_id != source_line_id);
        if record.lines.len() == before {
            return Ok(());
        }

        let removed_order = record.lines.is_empty();
        if removed_order {
            self.storage.delete_order(&txn, source_order_id)?;
            self.roster.release_order_txn(&txn, source_order_id)?;
        } else {
            self.storage.put_order(&txn, &record)?;
        }
        txn.commit().map_err(StorageError::from)?;

        if !removed_order {
            self.emit(record.branch_id, source_order_id, "ITEM_REMOVED");
        }
        Ok(())
    }

    /// Mirror a source order deletion
    pub fn on_order_deleted(&self, source_order_id: &str) -> KitchenResult<()> {
        let txn = self.storage.begin_write()?;
        if self.storage.get_order_txn(&txn, source_order_id)?.is_none() {
            return Ok(());
        }
        self.storage.delete_order(&txn, source_order_id)?;
        self.roster.release_order_txn(&txn, source_order_id)?;
        txn.commit().map_err(StorageError::from)?;
        tracing::info!(order_id = %source_order_id, "Kitchen order removed with source order");
        Ok(())
    }

    // ========== Order transitions ==========

    /// Start preparation of a pending order
    pub fn start(&self, ctx: &ActorContext, source_order_id: &str) -> KitchenResult<KitchenOrderRecord> {
        self.check_branch(ctx, source_order_id)?;
        self.transition_start(source_order_id)?;
        self.get(source_order_id)
    }

    /// Complete a preparing order
    pub fn complete(
        &self,
        ctx: &ActorContext,
        source_order_id: &str,
    ) -> KitchenResult<KitchenOrderRecord> {
        self.check_branch(ctx, source_order_id)?;
        self.transition_complete(source_order_id, false)?;
        self.get(source_order_id)
    }

    /// Cancel a pending or preparing order
    pub fn cancel(
        &self,
        ctx: &ActorContext,
        source_order_id: &str,
    ) -> KitchenResult<KitchenOrderRecord> {
        self.check_branch(ctx, source_order_id)?;
        self.transition_cancel(source_order_id)?;
        self.get(source_order_id)
    }

    fn transition_start(&self, source_order_id: &str) -> KitchenResult<()> {
        let branch_id;
        {
            let txn = self.storage.begin_write()?;
            let mut order = self
                .storage
                .get_order_txn(&txn, source_order_id)?
                .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
            if order.status != PrepStatus::Pending {
                return Err(invalid(order.status, PrepStatus::Preparing));
            }

            let now = now_millis();
            order.status = PrepStatus::Preparing;
            order.started_at = Some(now);
            for line in &mut order.lines {
                if line.station_id.is_some() {
                    line.started_at.get_or_insert(now);
                }
            }
            branch_id = order.branch_id;
            self.storage.put_order(&txn, &order)?;
            txn.commit().map_err(StorageError::from)?;
        }
        self.emit(branch_id, source_order_id, "PREPARING");
        Ok(())
    }

    fn transition_complete(&self, source_order_id: &str, allow_pending: bool) -> KitchenResult<()> {
        let branch_id;
        {
            let txn = self.storage.begin_write()?;
            let mut order = self
                .storage
                .get_order_txn(&txn, source_order_id)?
                .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
            let legal = order.status == PrepStatus::Preparing
                || order.status == PrepStatus::Ready
                || (allow_pending && order.status == PrepStatus::Pending);
            if !legal {
                return Err(invalid(order.status, PrepStatus::Completed));
            }

            let now = now_millis();
            order.status = PrepStatus::Completed;
            order.completed_at = Some(now);
            if let Some(started_at) = order.started_at {
                order.preparation_duration_ms.get_or_insert(now - started_at);
            }
            for line in &mut order.lines {
                if !line.status.is_terminal() {
                    line.status = PrepStatus::Completed;
                    line.completed_at.get_or_insert(now);
                }
            }

            for line in &order.lines {
                let (Some(station_id), Some(started), Some(completed)) =
                    (line.station_id, line.started_at, line.completed_at)
                else {
                    continue;
                };
                // Best effort per line; a bad record must not block the rest
                if let Err(e) = self.analytics.record_line_completion_txn(
                    &txn,
                    station_id,
                    completed - started,
                    completed,
                ) {
                    tracing::warn!(
                        order_id = %source_order_id,
                        line_id = line.id,
                        error = %e,
                        "Analytics update failed for completed line"
                    );
                }
            }

            self.roster.release_order_txn(&txn, source_order_id)?;
            branch_id = order.branch_id;
            self.storage.put_order(&txn, &order)?;
            txn.commit().map_err(StorageError::from)?;
        }
        self.emit(branch_id, source_order_id, "COMPLETED");
        Ok(())
    }

    fn transition_cancel(&self, source_order_id: &str) -> KitchenResult<()> {
        let branch_id;
        {
            let txn = self.storage.begin_write()?;
            let mut order = self
                .storage
                .get_order_txn(&txn, source_order_id)?
                .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
            if !matches!(order.status, PrepStatus::Pending | PrepStatus::Preparing) {
                return Err(invalid(order.status, PrepStatus::Cancelled));
            }

            order.status = PrepStatus::Cancelled;
            for line in &mut order.lines {
                if !line.status.is_terminal() {
                    line.status = PrepStatus::Cancelled;
                }
            }
            self.roster.release_order_txn(&txn, source_order_id)?;
            branch_id = order.branch_id;
            self.storage.put_order(&txn, &order)?;
            txn.commit().map_err(StorageError::from)?;
        }
        self.emit(branch_id, source_order_id, "CANCELLED");
        Ok(())
    }

    // ========== Line transitions ==========

    /// Start one pending line; the acting staff member becomes the preparer
    pub fn start_line(
        &self,
        ctx: &ActorContext,
        source_order_id: &str,
        line_id: u64,
    ) -> KitchenResult<KitchenOrderRecord> {
        self.check_branch(ctx, source_order_id)?;
        let branch_id;
        {
            let txn = self.storage.begin_write()?;
            let mut order = self
                .storage
                .get_order_txn(&txn, source_order_id)?
                .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
            branch_id = order.branch_id;
            let line = order
                .line_mut(line_id)
                .ok_or(KitchenError::LineNotFound(line_id))?;
            if line.status != PrepStatus::Pending {
                return Err(invalid(line.status, PrepStatus::Preparing));
            }
            if line.station_id.is_none() {
                return Err(KitchenError::NoStationAssigned(line_id));
            }

            line.status = PrepStatus::Preparing;
            line.started_at = Some(now_millis());
            line.prepared_by = ctx.staff_id;
            self.storage.put_order(&txn, &order)?;
            txn.commit().map_err(StorageError::from)?;
        }
        self.emit(branch_id, source_order_id, "ITEM_STARTED");
        self.get(source_order_id)
    }

    /// Complete one preparing line
    ///
    /// When the last sibling completes the order is promoted to `READY`;
    /// the explicit `complete` call still finishes it.
    pub fn complete_line(
        &self,
        ctx: &ActorContext,
        source_order_id: &str,
        line_id: u64,
    ) -> KitchenResult<KitchenOrderRecord> {
        self.check_branch(ctx, source_order_id)?;
        let branch_id;
        let promoted;
        {
            let txn = self.storage.begin_write()?;
            let mut order = self
                .storage
                .get_order_txn(&txn, source_order_id)?
                .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))?;
            branch_id = order.branch_id;
            let line = order
                .line_mut(line_id)
                .ok_or(KitchenError::LineNotFound(line_id))?;
            if line.status != PrepStatus::Preparing {
                return Err(invalid(line.status, PrepStatus::Completed));
            }

            line.status = PrepStatus::Completed;
            line.completed_at = Some(now_millis());

            // Auto-assignment can start lines while the order itself is
            // still pending, so promotion accepts both non-started states
            promoted = order.all_lines_completed()
                && matches!(order.status, PrepStatus::Pending | PrepStatus::Preparing);
            if promoted {
                order.status = PrepStatus::Ready;
            }
            self.storage.put_order(&txn, &order)?;
            txn.commit().map_err(StorageError::from)?;
        }
        self.emit(branch_id, source_order_id, "ITEM_COMPLETED");
        if promoted {
            self.emit(branch_id, source_order_id, "READY");
        }
        self.get(source_order_id)
    }

    // ========== Queries ==========

    pub fn get(&self, source_order_id: &str) -> KitchenResult<KitchenOrderRecord> {
        self.storage
            .get_order(source_order_id)?
            .ok_or_else(|| KitchenError::OrderNotFound(source_order_id.to_string()))
    }

    /// Non-terminal orders of a branch, highest priority first
    pub fn active_orders(&self, branch_id: i64) -> KitchenResult<Vec<KitchenOrderRecord>> {
        let mut orders: Vec<KitchenOrderRecord> = self
            .storage
            .active_orders()?
            .into_iter()
            .filter(|o| o.branch_id == branch_id)
            .collect();
        orders.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(orders)
    }

    fn check_branch(&self, ctx: &ActorContext, source_order_id: &str) -> KitchenResult<()> {
        let order = self.get(source_order_id)?;
        if order.branch_id != ctx.branch_id {
            // Cross-branch access reads as absence
            return Err(KitchenError::OrderNotFound(source_order_id.to_string()));
        }
        Ok(())
    }
}

fn invalid(from: PrepStatus, to: PrepStatus) -> KitchenError {
    KitchenError::InvalidTransition(format!("{} -> {}", from.as_str(), to.as_str()))
}
