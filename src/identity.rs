use crate::source::{SourceRelation, SourceTask};

/// Stable identifier for a task.
///
/// Tries the source's unique id, then `task-<id>` from the display id, then
/// `outline-<number>` from the outline position, and finally `fallback`.
pub fn resolve_id<T: SourceTask>(task: &T, fallback: &str) -> String {
    if let Some(uid) = task.unique_id() {
        return uid.to_string();
    }
    if let Some(id) = task.display_id() {
        return format!("task-{id}");
    }
    if let Some(outline) = task.outline_number() {
        let outline = outline.trim();
        if !outline.is_empty() {
            return format!("outline-{outline}");
        }
    }
    fallback.to_string()
}

/// Positional fallback id for the task at `index` in a collection.
pub fn row_fallback(index: usize) -> String {
    format!("row-{}", index + 1)
}

/// Identifier of an optional task, `None` when the task is missing or has
/// no identifier at all.
pub fn resolve_optional_id<T: SourceTask>(task: Option<&T>) -> Option<String> {
    task.map(|t| resolve_id(t, "")).filter(|id| !id.is_empty())
}

/// Both endpoints of a relation, preferring the predecessor/successor pair and
/// falling back to source/target for each side independently.
pub fn resolve_relation_endpoints<R: SourceRelation>(
    relation: &R,
) -> (Option<R::Task>, Option<R::Task>) {
    let predecessor = relation
        .predecessor_task()
        .or_else(|| relation.source_task());
    let successor = relation.successor_task().or_else(|| relation.target_task());
    (predecessor, successor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceAssignment, SourceResource};

    #[derive(Debug, Clone, Default)]
    struct Probe {
        unique_id: Option<i64>,
        display_id: Option<i64>,
        outline: Option<String>,
    }

    struct NoAssignment;

    impl SourceAssignment for NoAssignment {
        fn resource(&self) -> Option<SourceResource> {
            None
        }
    }

    #[derive(Default)]
    struct ProbeRelation {
        modern: (Option<Probe>, Option<Probe>),
        legacy: (Option<Probe>, Option<Probe>),
    }

    impl SourceRelation for ProbeRelation {
        type Task = Probe;

        fn predecessor_task(&self) -> Option<Probe> {
            self.modern.0.clone()
        }

        fn successor_task(&self) -> Option<Probe> {
            self.modern.1.clone()
        }

        fn source_task(&self) -> Option<Probe> {
            self.legacy.0.clone()
        }

        fn target_task(&self) -> Option<Probe> {
            self.legacy.1.clone()
        }
    }

    impl SourceTask for Probe {
        type Relation = ProbeRelation;
        type Assignment = NoAssignment;

        fn unique_id(&self) -> Option<i64> {
            self.unique_id
        }

        fn display_id(&self) -> Option<i64> {
            self.display_id
        }

        fn outline_number(&self) -> Option<String> {
            self.outline.clone()
        }
    }

    fn uid(id: i64) -> Probe {
        Probe {
            unique_id: Some(id),
            ..Probe::default()
        }
    }

    #[test]
    fn unique_id_wins() {
        let task = Probe {
            unique_id: Some(0),
            display_id: Some(4),
            outline: Some("1.2".into()),
        };
        assert_eq!(resolve_id(&task, "row-1"), "0");
    }

    #[test]
    fn falls_through_display_id_and_outline() {
        let by_id = Probe {
            display_id: Some(4),
            outline: Some("1.2".into()),
            ..Probe::default()
        };
        assert_eq!(resolve_id(&by_id, "row-1"), "task-4");

        let by_outline = Probe {
            outline: Some("1.2".into()),
            ..Probe::default()
        };
        assert_eq!(resolve_id(&by_outline, "row-1"), "outline-1.2");
    }

    #[test]
    fn blank_outline_uses_fallback() {
        let task = Probe {
            outline: Some("  ".into()),
            ..Probe::default()
        };
        assert_eq!(resolve_id(&task, &row_fallback(2)), "row-3");
        assert_eq!(resolve_optional_id(Some(&task)), None);
        assert_eq!(resolve_optional_id::<Probe>(None), None);
    }

    #[test]
    fn every_task_gets_an_identifier() {
        for index in 0..5 {
            let id = resolve_id(&Probe::default(), &row_fallback(index));
            assert!(!id.is_empty());
        }
    }

    #[test]
    fn legacy_pair_fills_missing_modern_endpoints() {
        let relation = ProbeRelation {
            modern: (None, Some(uid(2))),
            legacy: (Some(uid(1)), Some(uid(9))),
        };
        let (pred, succ) = resolve_relation_endpoints(&relation);
        assert_eq!(pred.and_then(|t| t.unique_id), Some(1));
        assert_eq!(succ.and_then(|t| t.unique_id), Some(2));

        let (pred, succ) = resolve_relation_endpoints(&ProbeRelation::default());
        assert!(pred.is_none());
        assert!(succ.is_none());
    }
}
