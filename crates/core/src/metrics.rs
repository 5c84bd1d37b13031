//! Task and sprint KPIs.
//!
//! Pure functions over entity snapshots: no store access, no side effects.
//! Values are rounded the way they are displayed, one decimal for day and
//! story-point amounts and whole numbers for percentages.

use chrono::{Datelike, Duration};
use serde::Serialize;

use crate::models::{Sprint, SprintTransversalActivity, Task};
use crate::status::{Rft, SprintStatus};
use crate::types::Timestamp;

/// Sprint progress when no story points are in scope.
pub const EMPTY_SCOPE_PROGRESS: f64 = 100.0;

// ---------------------------------------------------------------------------
// Task metrics
// ---------------------------------------------------------------------------

/// Derived fields of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskMetrics {
    /// Story points converted to days, `story_points / ratio`.
    pub technical_load: f64,
    /// `technical_load - updated`. Negative when the task overran.
    pub delta: f64,
    /// Share of the updated estimate already spent, in percent.
    pub progress: f64,
    /// Updated estimate, `time_spent + time_remaining`.
    pub updated: f64,
}

/// Compute a task's derived fields for the owning project's `ratio`.
///
/// A non-positive ratio yields a technical load of 0. An unset
/// `time_remaining` counts as 0.
pub fn task_metrics(task: &Task, ratio: f64) -> TaskMetrics {
    let technical_load = technical_load(task.story_points, ratio);
    let updated = task.time_spent + task.time_remaining.unwrap_or(0.0);
    let progress = if updated > 0.0 {
        task.time_spent / updated * 100.0
    } else {
        0.0
    };

    TaskMetrics {
        technical_load: round_to(technical_load, 1),
        delta: round_to(technical_load - updated, 1),
        progress: round_to(progress, 0),
        updated: round_to(updated, 1),
    }
}

/// Unrounded `story_points / ratio`, or 0 when the ratio is not positive.
pub fn technical_load(story_points: f64, ratio: f64) -> f64 {
    if ratio > 0.0 {
        story_points / ratio
    } else {
        0.0
    }
}

/// Write `metrics` into the task's derived fields.
pub fn apply_task_metrics(task: &mut Task, metrics: &TaskMetrics) {
    task.technical_load = metrics.technical_load;
    task.delta = Some(metrics.delta);
    task.progress = Some(metrics.progress);
}

// ---------------------------------------------------------------------------
// Sprint metrics
// ---------------------------------------------------------------------------

/// Sprint-level KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SprintMetrics {
    /// Weekdays between start and due date, both inclusive.
    pub duration: u32,
    /// Story points of non-cancelled tasks.
    pub scoped: f64,
    /// Story points of tasks done and delivered in this sprint.
    pub velocity: f64,
    /// Story-point weighted task progress, in percent.
    pub progress: f64,
    /// Task time plus transversal activity time, in days.
    pub time_spent: f64,
    /// On-time delivery, `velocity / scoped` in percent once the sprint is done.
    pub otd: f64,
    /// On-quality delivery, share of delivered tasks with RFT OK once done.
    pub oqd: f64,
    /// Story points earned so far, `sum(sp * progress / 100)`.
    pub progress_story_points: f64,
    /// Transversal activity time, in days.
    pub transversal_time: f64,
}

/// Compute the KPIs of `sprint` from its live tasks and activities.
///
/// Only tasks that are done *and* whose delivery sprint is this sprint count
/// toward `velocity` and `oqd`.
pub fn sprint_metrics(
    sprint: &Sprint,
    activities: &[SprintTransversalActivity],
    tasks: &[Task],
) -> SprintMetrics {
    let duration = weekdays_between(sprint.start_date, sprint.due_date);

    if tasks.is_empty() {
        return SprintMetrics {
            duration,
            scoped: 0.0,
            velocity: 0.0,
            progress: EMPTY_SCOPE_PROGRESS,
            time_spent: 0.0,
            otd: 0.0,
            oqd: 0.0,
            progress_story_points: 0.0,
            transversal_time: 0.0,
        };
    }

    let in_scope = || tasks.iter().filter(|t| !t.is_cancelled());
    let delivered = || tasks.iter().filter(|t| t.delivered_in(&sprint.name));

    let scoped: f64 = in_scope().map(|t| t.story_points).sum();
    let velocity: f64 = delivered().map(|t| t.story_points).sum();
    let weighted: f64 = in_scope()
        .map(|t| t.story_points * t.progress.unwrap_or(0.0))
        .sum();
    let progress = if scoped == 0.0 {
        EMPTY_SCOPE_PROGRESS
    } else {
        weighted / scoped
    };

    let transversal_time: f64 = activities.iter().map(|a| a.time_spent).sum();
    let task_time: f64 = tasks.iter().map(|t| t.time_spent).sum();

    let done = sprint.status == SprintStatus::Done;
    let otd = if done && scoped > 0.0 {
        velocity / scoped * 100.0
    } else {
        0.0
    };

    let delivered_count = delivered().count();
    let oqd = if done && delivered_count > 0 {
        let ok = delivered().filter(|t| t.rft == Rft::Ok).count();
        ok as f64 / delivered_count as f64 * 100.0
    } else {
        0.0
    };

    SprintMetrics {
        duration,
        scoped: round_to(scoped, 1),
        velocity: round_to(velocity, 1),
        progress: round_to(progress, 0),
        time_spent: round_to(task_time + transversal_time, 1),
        otd: round_to(otd, 0),
        oqd: round_to(oqd, 0),
        progress_story_points: round_to(weighted / 100.0, 1),
        transversal_time: round_to(transversal_time, 1),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Count Monday to Friday days between two instants, both ends inclusive.
///
/// Both instants are reduced to their UTC calendar date. The pair is swapped
/// when `start` is after `due`.
pub fn weekdays_between(start: Timestamp, due: Timestamp) -> u32 {
    let (mut first, mut last) = (start.date_naive(), due.date_naive());
    if first > last {
        std::mem::swap(&mut first, &mut last);
    }

    let total_days = (last - first).num_days() + 1;
    let full_weeks = total_days / 7;
    let tail_start = first + Duration::days(full_weeks * 7);
    let tail = (0..total_days % 7)
        .map(|offset| tail_start + Duration::days(offset))
        .filter(|day| day.weekday().num_days_from_monday() < 5)
        .count() as i64;

    (full_weeks * 5 + tail) as u32
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
