//! Breaking-change classification.
//!
//! Wording is stable; downstream tooling matches on these strings.

use crate::diff::model::{FieldAttributeChange, ModelDiff};
use crate::policy::GatePolicy;

/// Classify the changes in `diff` that would invalidate data produced under
/// the baseline, and record them on the diff.
///
/// Replaces any previous classification, so re-classifying under a
/// different policy is safe.
pub fn classify(diff: &mut ModelDiff, policy: &GatePolicy) {
    let mut breaking = Vec::new();

    for entity in &diff.entities.removed {
        breaking.push(format!("Entity removed: {}", entity));
    }

    for relationship in &diff.relationships.removed {
        breaking.push(format!(
            "Relationship removed: {} ({} -> {})",
            relationship.name, relationship.from, relationship.to
        ));
    }

    for entity in &diff.entities.changed {
        for field in &entity.removed_fields {
            breaking.push(format!("Field removed: {}.{}", entity.entity, field));
        }
        for field in &entity.changed_fields {
            for change in &field.changes {
                let qualified = format!("{}.{}", entity.entity, field.field);
                match change {
                    FieldAttributeChange::Nullable {
                        old: true,
                        new: false,
                    } => {
                        breaking.push(format!("Field nullability tightened: {}", qualified));
                    }
                    FieldAttributeChange::PrimaryKey {
                        old: true,
                        new: false,
                    } => {
                        breaking.push(format!("Primary key removed: {}", qualified));
                    }
                    FieldAttributeChange::Unique {
                        old: true,
                        new: false,
                    } => {
                        breaking.push(format!("Unique constraint removed: {}", qualified));
                    }
                    FieldAttributeChange::Type { old, new } if policy.type_changes_breaking => {
                        breaking.push(format!(
                            "Field type changed: {} ({} -> {})",
                            qualified, old, new
                        ));
                    }
                    _ => {}
                }
            }
        }
    }

    for metric in &diff.changed_metrics {
        breaking.push(format!("Metric contract changed: {}", metric.metric));
    }

    diff.summary.breaking_change_count = breaking.len();
    diff.breaking_changes = breaking;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{EntityChange, FieldChange, MetricChange};

    fn diff_with_field_change(change: FieldAttributeChange) -> ModelDiff {
        let mut diff = ModelDiff::default();
        diff.entities.changed.push(EntityChange {
            entity: "orders".to_string(),
            added_fields: vec!["note".to_string()],
            removed_fields: Vec::new(),
            changed_fields: vec![FieldChange {
                field: "amount".to_string(),
                changes: vec![change],
            }],
        });
        diff
    }

    #[test]
    fn test_widening_is_not_breaking() {
        let mut diff = diff_with_field_change(FieldAttributeChange::Nullable {
            old: false,
            new: true,
        });
        classify(&mut diff, &GatePolicy::default());
        assert!(diff.breaking_changes.is_empty());
    }

    #[test]
    fn test_tightening_is_breaking() {
        let mut diff = diff_with_field_change(FieldAttributeChange::Nullable {
            old: true,
            new: false,
        });
        classify(&mut diff, &GatePolicy::default());
        assert_eq!(
            diff.breaking_changes,
            vec!["Field nullability tightened: orders.amount"]
        );
        assert_eq!(diff.summary.breaking_change_count, 1);
    }

    #[test]
    fn test_type_change_follows_policy() {
        let change = FieldAttributeChange::Type {
            old: "decimal(12,2)".to_string(),
            new: "integer".to_string(),
        };
        let mut diff = diff_with_field_change(change);
        classify(&mut diff, &GatePolicy::default());
        assert_eq!(
            diff.breaking_changes,
            vec!["Field type changed: orders.amount (decimal(12,2) -> integer)"]
        );

        let lenient = GatePolicy {
            type_changes_breaking: false,
            ..GatePolicy::default()
        };
        classify(&mut diff, &lenient);
        assert!(diff.breaking_changes.is_empty());
        assert_eq!(diff.summary.breaking_change_count, 0);
    }

    #[test]
    fn test_metric_contract_change() {
        let mut diff = ModelDiff::default();
        diff.changed_metrics.push(MetricChange {
            metric: "revenue".to_string(),
            changed_fields: vec!["expression".to_string()],
        });
        classify(&mut diff, &GatePolicy::default());
        assert_eq!(diff.breaking_changes, vec!["Metric contract changed: revenue"]);
    }
}
