//! Cron expression handling for task and tour schedules.
//!
//! Spreadsheets carry classic five-field crontab strings
//! (`min hour dom month dow`). The `cron` crate wants a leading seconds field
//! and numbers weekdays 1-7 from Sunday, so five-field input is rewritten
//! before parsing. Six and seven field expressions pass through untouched.

use std::str::FromStr;

use chrono::Utc;
use cron::Schedule;

use crate::types::Timestamp;

/// Minimum gap between consecutive runs of an imported schedule.
pub const MIN_RUN_INTERVAL_SECS: i64 = 300;

/// Number of consecutive runs inspected by the frequency check.
const INTERVAL_SAMPLE: usize = 8;

/// Upper bound for [`upcoming`] so a preview request cannot ask for thousands.
pub const MAX_PREVIEW_COUNT: usize = 20;

/// Rewrite a crontab expression into the form the `cron` crate parses.
pub fn normalize_cron(expr: &str) -> Result<String, String> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    match fields.len() {
        5 => {
            let dow = shift_weekdays(fields[4])?;
            Ok(format!(
                "0 {} {} {} {} {}",
                fields[0], fields[1], fields[2], fields[3], dow
            ))
        }
        6 | 7 => Ok(fields.join(" ")),
        0 => Err("Cron expression is empty".to_string()),
        n => Err(format!("Cron expression must have 5 fields, got {n}")),
    }
}

/// Map crontab weekday numbers (0-7, Sunday = 0 or 7) onto 1-7 (Sunday = 1).
///
/// Step values after `/` are counts, not weekdays, and are left alone.
fn shift_weekdays(field: &str) -> Result<String, String> {
    let mut parts = Vec::new();
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (part, None),
        };
        let mut bounds = Vec::new();
        for bound in base.split('-') {
            if let Ok(day) = bound.parse::<u8>() {
                if day > 7 {
                    return Err(format!("Weekday {day} is out of range 0-7"));
                }
                bounds.push(((day % 7) + 1).to_string());
            } else {
                bounds.push(bound.to_string());
            }
        }
        let mut shifted = bounds.join("-");
        if let Some(step) = step {
            shifted.push('/');
            shifted.push_str(step);
        }
        parts.push(shifted);
    }
    Ok(parts.join(","))
}

/// Parse an expression (five, six or seven fields) into a [`Schedule`].
pub fn parse_cron(expr: &str) -> Result<Schedule, String> {
    let normalized = normalize_cron(expr)?;
    Schedule::from_str(&normalized).map_err(|e| format!("Invalid cron expression '{expr}': {e}"))
}

/// Validate an expression relative to the current time.
///
/// Returns the normalised form on success.
pub fn validate_cron(expr: &str) -> Result<String, String> {
    validate_cron_at(expr, Utc::now())
}

/// Validate an expression relative to `reference`.
///
/// Rejects expressions that never fire after `reference` and expressions
/// whose consecutive runs are closer than [`MIN_RUN_INTERVAL_SECS`].
pub fn validate_cron_at(expr: &str, reference: Timestamp) -> Result<String, String> {
    let schedule = parse_cron(expr)?;
    let runs: Vec<Timestamp> = schedule.after(&reference).take(INTERVAL_SAMPLE).collect();

    if runs.is_empty() {
        return Err(format!("Cron expression '{expr}' never fires"));
    }

    let min_gap = runs
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .min();
    if let Some(gap) = min_gap {
        if gap < MIN_RUN_INTERVAL_SECS {
            return Err(format!(
                "Cron expression '{expr}' runs every {gap}s; the minimum interval is {MIN_RUN_INTERVAL_SECS}s"
            ));
        }
    }

    normalize_cron(expr)
}

/// The next `count` run times strictly after `after`.
///
/// `count` is clamped to `1..=MAX_PREVIEW_COUNT`.
pub fn upcoming(expr: &str, after: Timestamp, count: usize) -> Result<Vec<Timestamp>, String> {
    let schedule = parse_cron(expr)?;
    let count = count.clamp(1, MAX_PREVIEW_COUNT);
    Ok(schedule.after(&after).take(count).collect())
}
