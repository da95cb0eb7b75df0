//! Bottom-up status derivation.
//!
//! Each tier recomputes its status from its direct child and an optional
//! explicit override. Nothing is remembered between invocations.

use crate::model::{Severity, Status};

/// Severity a run takes from its meter: `Fault`/`Offline` → Fault,
/// `Alarm` → Alarm, anything else → Normal.
pub fn meter_severity(meter: &Status) -> Severity {
    match meter {
        Status::Other(raw) => {
            tracing::debug!(status = %raw, "unrecognized meter status, treating as Normal");
            Severity::Normal
        }
        known => known.severity().unwrap_or(Severity::Normal),
    }
}

/// Severity a device takes from one run: `Fault` → Fault, `Alarm` → Alarm,
/// anything else (including `Offline`) → Normal.
pub fn run_severity(run: &Status) -> Severity {
    match run {
        Status::Fault => Severity::Fault,
        Status::Alarm => Severity::Alarm,
        _ => Severity::Normal,
    }
}

/// Run status: override, else mapped from the meter, else Normal.
pub fn derive_run_status(override_status: Option<&Status>, meter: Option<&Status>) -> Status {
    if let Some(explicit) = override_status {
        return explicit.clone();
    }
    meter.map(meter_severity).unwrap_or(Severity::Normal).to_status()
}

/// Status the device would take from its runs alone: the worst run severity,
/// Normal when there are no runs.
pub fn aggregate_run_status<'a>(runs: impl IntoIterator<Item = &'a Status>) -> Status {
    runs.into_iter()
        .map(run_severity)
        .max()
        .unwrap_or(Severity::Normal)
        .to_status()
}

/// Device status: override, else aggregated from the runs.
///
/// `runs` accepts `Option<&Status>` for the single-run case.
pub fn derive_device_status<'a>(
    override_status: Option<&Status>,
    runs: impl IntoIterator<Item = &'a Status>,
) -> Status {
    match override_status {
        Some(explicit) => explicit.clone(),
        None => aggregate_run_status(runs),
    }
}

/// Active alarm count: override verbatim, else one per run in `Alarm` or
/// `Fault` (pre-override run status).
pub fn derive_active_alarm_count<'a>(
    override_count: Option<i64>,
    runs: impl IntoIterator<Item = &'a Status>,
) -> i64 {
    if let Some(explicit) = override_count {
        return explicit;
    }
    runs.into_iter()
        .filter(|s| run_severity(s) > Severity::Normal)
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mapping() {
        assert_eq!(derive_run_status(None, Some(&Status::Offline)), Status::Fault);
        assert_eq!(derive_run_status(None, Some(&Status::Fault)), Status::Fault);
        assert_eq!(derive_run_status(None, Some(&Status::Alarm)), Status::Alarm);
        assert_eq!(derive_run_status(None, Some(&Status::Normal)), Status::Normal);
        assert_eq!(derive_run_status(None, Some(&Status::from("Calibrating"))), Status::Normal);
        assert_eq!(derive_run_status(None, None), Status::Normal);
    }

    #[test]
    fn test_run_override_wins() {
        assert_eq!(derive_run_status(Some(&Status::Alarm), Some(&Status::Fault)), Status::Alarm);
        let odd = Status::from("Maintenance");
        assert_eq!(derive_run_status(Some(&odd), Some(&Status::Normal)), odd);
    }

    #[test]
    fn test_device_status_precedence() {
        assert_eq!(derive_device_status(Some(&Status::Fault), Some(&Status::Normal)), Status::Fault);
        assert_eq!(derive_device_status(Some(&Status::Fault), None), Status::Fault);
        assert_eq!(derive_device_status(None, Some(&Status::Alarm)), Status::Alarm);
        assert_eq!(derive_device_status(None, Some(&Status::Normal)), Status::Normal);
        assert_eq!(derive_device_status(None, None), Status::Normal);
    }

    #[test]
    fn test_device_ignores_offline_from_run() {
        assert_eq!(derive_device_status(None, Some(&Status::Offline)), Status::Normal);
        assert_eq!(derive_active_alarm_count(None, Some(&Status::Offline)), 0);
    }

    #[test]
    fn test_alarm_count() {
        assert_eq!(derive_active_alarm_count(None, Some(&Status::Fault)), 1);
        assert_eq!(derive_active_alarm_count(None, Some(&Status::Alarm)), 1);
        assert_eq!(derive_active_alarm_count(None, Some(&Status::Normal)), 0);
        assert_eq!(derive_active_alarm_count(None, None), 0);
        assert_eq!(derive_active_alarm_count(Some(7), Some(&Status::Normal)), 7);
        assert_eq!(derive_active_alarm_count(Some(0), Some(&Status::Fault)), 0);
    }

    #[test]
    fn test_worst_run_wins() {
        let runs = [Status::Normal, Status::Fault, Status::Alarm];
        assert_eq!(aggregate_run_status(&runs), Status::Fault);
        assert_eq!(derive_active_alarm_count(None, &runs), 2);
    }
}
