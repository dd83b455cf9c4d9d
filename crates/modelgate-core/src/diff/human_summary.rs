//! Human-readable summary renderer for gate results.

use crate::diff::model::{DiffClassification, DiffSummary, FieldAttributeChange, ModelDiff};
use crate::gate::GateResult;

/// Render a Markdown summary of a [`GateResult`].
///
/// The summary is intended for review workflows. It is informational only
/// and does not affect the structured result.
pub fn render_human_summary(result: &GateResult) -> String {
    let mut out = String::new();

    out.push_str("## Model Gate\n\n");
    let verdict = if result.gate_passed {
        "PASSED"
    } else if result.blocked_by_breaking {
        "BLOCKED (breaking changes)"
    } else {
        "FAILED"
    };
    out.push_str(&format!(
        "**Verdict**: {verdict}  \n**Reason**: {}\n\n",
        result.message
    ));

    let Some(diff) = &result.diff else {
        out.push_str("_No diff available._\n");
        return out;
    };

    out.push_str(&format!(
        "**Baseline**: `{}`  \n**Current**: `{}`\n\n",
        short(&diff.identity.old_digest),
        short(&diff.identity.new_digest),
    ));

    if diff.classification == DiffClassification::Identical {
        out.push_str("_No changes detected._\n");
        return out;
    }

    render_counts(&mut out, &diff.summary);
    render_breaking(&mut out, diff);
    render_entities(&mut out, diff);
    render_metrics(&mut out, diff);

    out
}

fn render_counts(out: &mut String, s: &DiffSummary) {
    out.push_str("### Summary\n\n");
    out.push_str("| Category | Added | Removed | Changed |\n|---|---|---|---|\n");
    out.push_str(&format!(
        "| Entities | {} | {} | {} |\n",
        s.added_entities, s.removed_entities, s.changed_entities
    ));
    out.push_str(&format!(
        "| Relationships | {} | {} | - |\n",
        s.added_relationships, s.removed_relationships
    ));
    out.push_str(&format!(
        "| Indexes | {} | {} | {} |\n",
        s.added_indexes, s.removed_indexes, s.changed_indexes
    ));
    out.push_str(&format!(
        "| Metrics | {} | {} | {} |\n\n",
        s.added_metrics, s.removed_metrics, s.changed_metrics
    ));
}

fn render_breaking(out: &mut String, diff: &ModelDiff) {
    if diff.breaking_changes.is_empty() {
        return;
    }
    out.push_str(&format!(
        "### Breaking Changes ({})\n\n",
        diff.breaking_changes.len()
    ));
    for change in &diff.breaking_changes {
        out.push_str(&format!("- {}\n", change));
    }
    out.push('\n');
}

fn render_entities(out: &mut String, diff: &ModelDiff) {
    let e = &diff.entities;
    if e.added.is_empty() && e.removed.is_empty() && e.changed.is_empty() {
        return;
    }
    out.push_str("### Entity Changes\n\n");
    if !e.added.is_empty() {
        out.push_str(&format!("- **Added**: {}\n", e.added.join(", ")));
    }
    if !e.removed.is_empty() {
        out.push_str(&format!("- **Removed**: {}\n", e.removed.join(", ")));
    }
    for change in &e.changed {
        out.push_str(&format!("- `{}`\n", change.entity));
        if !change.added_fields.is_empty() {
            out.push_str(&format!(
                "  - added fields: {}\n",
                change.added_fields.join(", ")
            ));
        }
        if !change.removed_fields.is_empty() {
            out.push_str(&format!(
                "  - removed fields: {}\n",
                change.removed_fields.join(", ")
            ));
        }
        for field in &change.changed_fields {
            let parts: Vec<String> = field.changes.iter().map(describe).collect();
            out.push_str(&format!("  - `{}`: {}\n", field.field, parts.join("; ")));
        }
    }
    out.push('\n');
}

fn render_metrics(out: &mut String, diff: &ModelDiff) {
    if diff.changed_metrics.is_empty() {
        return;
    }
    out.push_str("### Changed Metrics\n\n");
    for metric in &diff.changed_metrics {
        out.push_str(&format!(
            "- `{}`: {}\n",
            metric.metric,
            metric.changed_fields.join(", ")
        ));
    }
    out.push('\n');
}

fn describe(change: &FieldAttributeChange) -> String {
    match change {
        FieldAttributeChange::Type { old, new } => format!("type {} -> {}", old, new),
        FieldAttributeChange::Nullable { old, new } => format!("nullable {} -> {}", old, new),
        FieldAttributeChange::PrimaryKey { old, new } => {
            format!("primary_key {} -> {}", old, new)
        }
        FieldAttributeChange::Unique { old, new } => format!("unique {} -> {}", old, new),
        FieldAttributeChange::ForeignKey { old, new } => {
            format!("foreign_key {} -> {}", old, new)
        }
    }
}

/// First 12 hex chars of a digest
fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::MetricChange;

    #[test]
    fn test_missing_diff_is_reported() {
        let result = GateResult {
            gate_passed: false,
            blocked_by_breaking: false,
            message: "Cannot gate an invalid model: x".to_string(),
            diff: None,
        };
        let md = render_human_summary(&result);
        assert!(md.contains("**Verdict**: FAILED"));
        assert!(md.contains("_No diff available._"));
    }

    #[test]
    fn test_breaking_and_metrics_sections() {
        let mut diff = ModelDiff {
            classification: DiffClassification::Changed,
            ..ModelDiff::default()
        };
        diff.changed_metrics.push(MetricChange {
            metric: "revenue".to_string(),
            changed_fields: vec!["expression".to_string(), "grain".to_string()],
        });
        diff.breaking_changes
            .push("Metric contract changed: revenue".to_string());
        let result = GateResult {
            gate_passed: false,
            blocked_by_breaking: true,
            message: "Gate failed: 1 breaking change(s) detected".to_string(),
            diff: Some(diff),
        };
        let md = render_human_summary(&result);
        assert!(md.contains("BLOCKED"));
        assert!(md.contains("### Breaking Changes (1)"));
        assert!(md.contains("- `revenue`: expression, grain"));
    }
}
