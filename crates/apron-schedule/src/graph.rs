//! Name resolution and dependency-graph validation.
//!
//! Rows may reference operations defined later in the table, so names are
//! resolved in a second pass.  The resulting graph must be acyclic; an
//! operation on a cycle could never become ready, so cycles are rejected at
//! load time with the offending operation names.

use std::collections::{HashMap, VecDeque};

use apron_core::OpId;

use crate::operation::{Operation, OperationDef};
use crate::{ScheduleError, ScheduleResult};

/// Resolve a table into ordered operations plus a name index.
///
/// Fails on duplicate names, unresolvable dependency names, tables too large
/// for `OpId`, and dependency cycles.
pub fn resolve(defs: &[OperationDef]) -> ScheduleResult<(Vec<Operation>, HashMap<String, OpId>)> {
    // ── Pass 1: assign ids in table order ─────────────────────────────────
    let mut by_name: HashMap<String, OpId> = HashMap::with_capacity(defs.len());
    for (i, def) in defs.iter().enumerate() {
        let id = OpId::try_from(i)
            .map_err(|_| ScheduleError::Parse(format!("too many operations ({})", defs.len())))?;
        if by_name.insert(def.name.clone(), id).is_some() {
            return Err(ScheduleError::DuplicateOperation(def.name.clone()));
        }
    }

    // ── Pass 2: resolve dependency names ──────────────────────────────────
    let mut ops = Vec::with_capacity(defs.len());
    for def in defs {
        let deps = def
            .deps
            .iter()
            .map(|dep| {
                by_name.get(dep).copied().ok_or_else(|| ScheduleError::UnknownDependency {
                    operation:  def.name.clone(),
                    dependency: dep.clone(),
                })
            })
            .collect::<ScheduleResult<Vec<OpId>>>()?;
        ops.push(Operation::new(def, deps));
    }

    check_acyclic(&ops)?;
    Ok((ops, by_name))
}

/// Kahn's algorithm over the dependency edges (`dep → dependent`).
fn check_acyclic(ops: &[Operation]) -> ScheduleResult<()> {
    let n = ops.len();
    let mut in_degree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, op) in ops.iter().enumerate() {
        in_degree[i] = op.deps.len();
        for dep in &op.deps {
            dependents[dep.index()].push(i);
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0usize;

    while let Some(i) = queue.pop_front() {
        visited += 1;
        for &d in &dependents[i] {
            in_degree[d] -= 1;
            if in_degree[d] == 0 {
                queue.push_back(d);
            }
        }
    }

    if visited == n {
        return Ok(());
    }

    // Whatever still has in-degree is on a cycle or downstream of one.
    let stuck: Vec<String> = (0..n)
        .filter(|&i| in_degree[i] > 0)
        .map(|i| ops[i].name.clone())
        .collect();
    Err(ScheduleError::CycleDetected(stuck))
}
