//! The operation scheduler.
//!
//! # Tick semantics
//!
//! [`Scheduler::advance`] works in two phases so that results do not depend
//! on table order:
//!
//! 1. Readiness is snapshotted from the completion state at the start of the
//!    call.  Every ready, incomplete operation loses `elapsed` seconds and
//!    completes once `time_left + delay ≤ 0`, stamped with `now`.
//! 2. Operations that *became* ready during phase 1 record `start_time = now`
//!    but are not decremented until the next call.
//!
//! Root operations (no dependencies) record the start of their first tick,
//! `now - elapsed`, as their start time.

use std::collections::HashMap;

use tracing::{debug, info};

use apron_core::OpId;

use crate::graph::resolve;
use crate::operation::{Operation, OperationDef, Variant};
use crate::{ScheduleError, ScheduleResult};

// ── OperationTables ───────────────────────────────────────────────────────────

/// The declarative tables a scheduler can switch between on reset.
#[derive(Clone, Debug, Default)]
pub struct OperationTables {
    pub manual: Option<Vec<OperationDef>>,
    pub automated: Option<Vec<OperationDef>>,
}

impl OperationTables {
    /// Tables for a single-variant setup.
    pub fn single(variant: Variant, defs: Vec<OperationDef>) -> Self {
        let mut tables = Self::default();
        *tables.slot_mut(variant) = Some(defs);
        tables
    }

    pub fn get(&self, variant: Variant) -> ScheduleResult<&[OperationDef]> {
        match variant {
            Variant::Manual => self.manual.as_deref(),
            Variant::Automated => self.automated.as_deref(),
        }
        .ok_or_else(|| ScheduleError::UnknownVariant(variant.to_string()))
    }

    fn slot_mut(&mut self, variant: Variant) -> &mut Option<Vec<OperationDef>> {
        match variant {
            Variant::Manual => &mut self.manual,
            Variant::Automated => &mut self.automated,
        }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Owns every [`Operation`] of the active variant.
///
/// Iteration order is table order and is stable across resets of the same
/// variant; `OpId`s are positions in that order.
#[derive(Debug)]
pub struct Scheduler {
    tables: OperationTables,
    variant: Variant,
    ops: Vec<Operation>,
    by_name: HashMap<String, OpId>,
    finished: bool,
}

impl Scheduler {
    /// Build a scheduler on `variant`.
    ///
    /// Every table present in `tables` is validated up front, so a later
    /// variant switch cannot fail on a malformed table.
    pub fn new(tables: OperationTables, variant: Variant) -> ScheduleResult<Self> {
        for v in [Variant::Manual, Variant::Automated] {
            if let Ok(defs) = tables.get(v) {
                resolve(defs)?;
            }
        }
        let (ops, by_name) = resolve(tables.get(variant)?)?;
        info!(%variant, operations = ops.len(), "scheduler loaded");
        Ok(Self { tables, variant, ops, by_name, finished: false })
    }

    /// Convenience constructor for a single manual-variant table.
    pub fn from_defs(defs: Vec<OperationDef>) -> ScheduleResult<Self> {
        Self::new(OperationTables::single(Variant::Manual, defs), Variant::Manual)
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance all ready operations by `elapsed` seconds; `now` is the
    /// simulated time at the end of the step.
    ///
    /// Returns the operations that completed during this call, in table order.
    pub fn advance(&mut self, elapsed: f64, now: f64) -> Vec<OpId> {
        let ready: Vec<bool> = (0..self.ops.len())
            .map(|i| !self.ops[i].completed && self.deps_completed(i))
            .collect();

        let mut completed = Vec::new();
        for (i, op) in self.ops.iter_mut().enumerate() {
            if !ready[i] {
                continue;
            }
            if op.start_time.is_none() {
                op.start_time = Some(now - elapsed);
            }
            op.time_left -= elapsed;
            if op.time_left + op.delay_secs() <= 0.0 {
                op.completed = true;
                op.completion_time = Some(now);
                info!(operation = %op.name, t = now, "operation completed");
                completed.push(OpId(i as u16));
            }
        }

        if !completed.is_empty() {
            for i in 0..self.ops.len() {
                if !ready[i]
                    && !self.ops[i].completed
                    && self.ops[i].start_time.is_none()
                    && self.deps_completed(i)
                {
                    self.ops[i].start_time = Some(now);
                    debug!(operation = %self.ops[i].name, t = now, "operation ready");
                }
            }
        }

        self.finished = self.ops.iter().all(|op| op.completed);
        completed
    }

    fn deps_completed(&self, i: usize) -> bool {
        self.ops[i].deps.iter().all(|d| self.ops[d.index()].completed)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` iff every dependency of `id` is completed.
    pub fn is_ready(&self, id: OpId) -> bool {
        self.deps_completed(id.index())
    }

    pub fn is_completed(&self, id: OpId) -> bool {
        self.ops[id.index()].completed
    }

    /// `true` once every operation has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn lookup(&self, name: &str) -> Option<OpId> {
        self.by_name.get(name).copied()
    }

    /// Like [`lookup`](Self::lookup) but an unknown name is an error.
    pub fn id_of(&self, name: &str) -> ScheduleResult<OpId> {
        self.lookup(name).ok_or_else(|| ScheduleError::UnknownOperation(name.to_owned()))
    }

    pub fn get(&self, id: OpId) -> &Operation {
        &self.ops[id.index()]
    }

    /// All operations in table order.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn ids(&self) -> impl Iterator<Item = OpId> + '_ {
        (0..self.ops.len()).map(|i| OpId(i as u16))
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    // ── Operator controls ─────────────────────────────────────────────────

    /// Add `minutes` (possibly negative) to an operation's delay.
    pub fn adjust_delay(&mut self, id: OpId, minutes: i32) {
        let op = &mut self.ops[id.index()];
        op.delay_minutes = op.delay_minutes.saturating_add(minutes);
        debug!(operation = %op.name, delay_min = op.delay_minutes, "delay adjusted");
    }

    /// Zero every delay.
    pub fn reset_delays(&mut self) {
        for op in &mut self.ops {
            op.delay_minutes = 0;
        }
    }

    /// Restart on `variant`.
    ///
    /// The same variant resets every operation in place and keeps the
    /// operator's delays; a different variant reloads its own table.
    pub fn reset(&mut self, variant: Variant) -> ScheduleResult<()> {
        if variant == self.variant {
            for op in &mut self.ops {
                op.reset();
            }
        } else {
            let (ops, by_name) = resolve(self.tables.get(variant)?)?;
            self.ops = ops;
            self.by_name = by_name;
            self.variant = variant;
        }
        self.finished = false;
        info!(%variant, "scheduler reset");
        Ok(())
    }
}
