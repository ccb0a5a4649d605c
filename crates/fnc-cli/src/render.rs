//! Text rendering of reports

use std::fmt::Write;

use fnc_runtime::{ControllerState, ScenarioEvent, ScenarioReport, StepOutcome};
use fnc_version::{allowed_targets, is_transition_safe, MajorVersion, ProbeResult};
use serde::Serialize;

/// Compatibility matrix keyed by running version
#[derive(Debug, Serialize)]
pub(crate) struct Matrix {
    pub(crate) targets: Vec<MajorVersion>,
    pub(crate) rows: Vec<MatrixRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MatrixRow {
    /// `None` when the running version is unknown
    pub(crate) from: Option<MajorVersion>,
    pub(crate) safe: Vec<bool>,
    pub(crate) allowed: Vec<MajorVersion>,
}

pub(crate) fn matrix() -> Matrix {
    let rows = std::iter::once(None)
        .chain(MajorVersion::ALL.into_iter().map(Some))
        .map(|from| MatrixRow {
            from,
            safe: MajorVersion::ALL
                .into_iter()
                .map(|to| is_transition_safe(from, to))
                .collect(),
            allowed: allowed_targets(from),
        })
        .collect();

    Matrix {
        targets: MajorVersion::ALL.to_vec(),
        rows,
    }
}

pub(crate) fn matrix_text(matrix: &Matrix) -> String {
    let mut out = format!("{:<10}", "from\\to");
    for target in &matrix.targets {
        let _ = write!(out, "{:<8}", target.to_string());
    }
    out.push('\n');

    for row in &matrix.rows {
        let from = row.from.map_or_else(|| "unknown".to_string(), |v| v.to_string());
        let _ = write!(out, "{from:<10}");
        for safe in &row.safe {
            let _ = write!(out, "{:<8}", if *safe { "safe" } else { "confirm" });
        }
        out.push('\n');
    }
    out
}

pub(crate) fn report_text(report: &ScenarioReport) -> String {
    let mut out = String::new();

    for (index, step) in report.steps.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {}",
            index + 1,
            event_text(&step.event),
            outcome_text(&step.outcome)
        );
    }

    let state = match report.state {
        ControllerState::Idle => "idle".to_string(),
        ControllerState::AwaitingConfirmation(target) => format!("awaiting confirmation of {target}"),
    };
    let _ = writeln!(out, "\nstate: {state}");

    let view = &report.view;
    if let Some(selected) = view.selected {
        let _ = writeln!(out, "selected: {selected}{}", if view.dirty { " (modified)" } else { "" });
    }
    if let Some(reason) = view.disabled_reason {
        let _ = writeln!(out, "disabled: {reason}");
    }
    if let Some(placeholder) = view.placeholder {
        let _ = writeln!(out, "placeholder: {placeholder}");
    }
    if let Some(bubble) = view.info_bubble {
        let _ = writeln!(out, "info: {bubble}");
    }
    if let Some(warning) = view.existing_functions_warning {
        let _ = writeln!(out, "warning: {warning}");
    }
    if let Some(advisory) = view.advisory {
        let _ = writeln!(out, "advisory: {advisory}");
    }
    if let Some(dialog) = view.confirmation {
        let _ = writeln!(out, "dialog: {dialog}");
    }

    let platform = if report.settings.is_linux() { "linux" } else { "windows" };
    let _ = writeln!(out, "\nsettings ({platform}):");
    for (name, value) in report.settings.iter() {
        let _ = writeln!(out, "  {name} = {value}");
    }
    out
}

fn event_text(event: &ScenarioEvent) -> String {
    match event {
        ScenarioEvent::Request { target } => format!("request {target}"),
        ScenarioEvent::Confirm => "confirm".to_string(),
        ScenarioEvent::Dismiss => "dismiss".to_string(),
        ScenarioEvent::FunctionCount { result } => {
            format!("function count {}", probe_text(&result.clone().map(|n| n.to_string())))
        }
        ScenarioEvent::HostStatus { result } => {
            format!("host status {}", probe_text(&result.clone().map(|s| s.version)))
        }
        ScenarioEvent::Edit { name, value: Some(value) } => format!("set {name}={value}"),
        ScenarioEvent::Edit { name, value: None } => format!("remove {name}"),
        ScenarioEvent::Reload { .. } => "reload".to_string(),
        ScenarioEvent::Permissions { .. } => "permissions".to_string(),
    }
}

fn probe_text(result: &ProbeResult<String>) -> String {
    match result {
        ProbeResult::Loading => "loading".to_string(),
        ProbeResult::Complete(value) => value.clone(),
        ProbeResult::Failed => "failed".to_string(),
    }
}

fn outcome_text(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Applied { target, advisory } => match advisory {
            Some(advisory) => format!("applied {target} ({advisory})"),
            None => format!("applied {target}"),
        },
        StepOutcome::ConfirmationRequired { dialog } => format!("needs confirmation: {dialog}"),
        StepOutcome::Confirmed { target } => format!("confirmed {target}"),
        StepOutcome::Dismissed { target } => format!("dismissed {target}"),
        StepOutcome::Rejected { error } => format!("rejected: {error}"),
        StepOutcome::ProbeObserved { accepted: true } => "recorded".to_string(),
        StepOutcome::ProbeObserved { accepted: false } => "ignored".to_string(),
        StepOutcome::Edited => "edited".to_string(),
        StepOutcome::Reloaded => "reloaded".to_string(),
        StepOutcome::PermissionsChanged => "updated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_has_unknown_row_first() {
        let matrix = matrix();
        assert_eq!(matrix.rows.len(), 6);
        assert_eq!(matrix.rows[0].from, None);
        assert!(matrix.rows[0].safe.iter().all(|safe| *safe));
    }

    #[test]
    fn matrix_text_marks_unsafe_moves() {
        let text = matrix_text(&matrix());
        let v1_row = text.lines().find(|line| line.starts_with("~1")).unwrap();
        assert_eq!(v1_row.matches("confirm").count(), 3);
    }
}
