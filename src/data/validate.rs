use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::data::catalog::PlayerCatalog;
use crate::data::player::Position;
use crate::data::roster::{Matchup, SlotKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check both sheets against the catalog.
///
/// Errors: empty slot, unknown key, a player listed twice anywhere in the
/// matchup. Warnings: a player slotted away from their catalog position, a
/// blank team name.
pub fn validate_matchup(matchup: &Matchup, catalog: &PlayerCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut first_seen: HashMap<String, String> = HashMap::new();

    for (index, sheet) in matchup.teams.iter().enumerate() {
        let base_context = format!("teams[{index}]");
        if sheet.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("{base_context}.name"),
                "team name is blank",
            );
        }

        for kind in [SlotKind::Starter, SlotKind::Bench] {
            for position in Position::ALL {
                let context = format!("{base_context}.{kind}.{position}");
                let Some(key) = sheet
                    .slots(kind)
                    .get(&position)
                    .map(|key| key.trim())
                    .filter(|key| !key.is_empty())
                else {
                    report.push(ValidationSeverity::Error, context, "slot is empty");
                    continue;
                };

                let Some(player) = catalog.resolve(key) else {
                    report.push(
                        ValidationSeverity::Error,
                        context,
                        format!("unknown player '{key}'"),
                    );
                    continue;
                };

                if let Some(previous) = first_seen.get(&player.id) {
                    report.push(
                        ValidationSeverity::Error,
                        context.clone(),
                        format!("'{}' is already listed at {previous}", player.name),
                    );
                } else {
                    first_seen.insert(player.id.clone(), context.clone());
                }

                if player.position != position {
                    report.push(
                        ValidationSeverity::Warning,
                        context,
                        format!("'{}' is a {} playing {position}", player.name, player.position),
                    );
                }
            }
        }
    }
    report
}

/// Sanity checks on catalog entries.
pub fn validate_catalog(catalog: &PlayerCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    if catalog.is_empty() {
        report.push(ValidationSeverity::Warning, "catalog", "catalog has no players");
    }

    for player in catalog.players() {
        let context = format!("players.{}", player.id);
        let tendencies = player.shot_tendencies.weights();
        if tendencies.iter().any(|weight| *weight < 0.0) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.shot_tendencies"),
                "negative shot tendency",
            );
        } else if tendencies.iter().all(|weight| *weight == 0.0) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.shot_tendencies"),
                "all shot tendencies are zero",
            );
        }

        if player.career_stats.usage_rate <= 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.career_stats.usage_rate"),
                format!("usage rate must be positive, got {}", player.career_stats.usage_rate),
            );
        }

        for (name, value) in player.attributes.named() {
            if !(0.0..=100.0).contains(&value) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.attributes.{name}"),
                    format!("{value} is outside 0..=100"),
                );
            }
        }

        if player.target_minutes == 0 {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.target_minutes"),
                "target minutes of 0 keeps this player from ever being subbed out",
            );
        }
    }
    report
}
