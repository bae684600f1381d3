use crate::task::{HierarchyType, TaskRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyStats {
    pub total_predecessor_links: usize,
    pub total_successor_links: usize,
    pub tasks_with_predecessors: usize,
    pub tasks_with_successors: usize,
    pub total_leaf_tasks: usize,
    pub linked_leaf_tasks: usize,
    pub isolated_leaf_tasks: usize,
    /// Share of leaf tasks with at least one link, 0-100, two decimals.
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub collected_task_count: usize,
    pub parsed_task_count: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_rows: usize,
    pub projects: usize,
    pub units: usize,
    pub phases: usize,
    pub tasks: usize,
    pub sub_tasks: usize,
    pub dependencies: DependencyStats,
    pub task_collection: CollectionStats,
}

impl SummaryStats {
    pub fn count(&self, tier: HierarchyType) -> usize {
        match tier {
            HierarchyType::Project => self.projects,
            HierarchyType::Unit => self.units,
            HierarchyType::Phase => self.phases,
            HierarchyType::Task => self.tasks,
            HierarchyType::SubTask => self.sub_tasks,
        }
    }
}

pub fn coverage_percent(linked: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = linked as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

pub fn dependency_stats(records: &[TaskRecord]) -> DependencyStats {
    let mut stats = DependencyStats::default();
    for record in records {
        stats.total_predecessor_links += record.predecessors.len();
        stats.total_successor_links += record.successors.len();
        if !record.predecessors.is_empty() {
            stats.tasks_with_predecessors += 1;
        }
        if !record.successors.is_empty() {
            stats.tasks_with_successors += 1;
        }
        if record.is_leaf() {
            stats.total_leaf_tasks += 1;
            if record.has_links() {
                stats.linked_leaf_tasks += 1;
            }
        }
    }
    stats.isolated_leaf_tasks = stats.total_leaf_tasks - stats.linked_leaf_tasks;
    stats.coverage_percent = coverage_percent(stats.linked_leaf_tasks, stats.total_leaf_tasks);
    stats
}

pub fn summarize(records: &[TaskRecord], collection: CollectionStats) -> SummaryStats {
    let mut summary = SummaryStats {
        total_rows: records.len(),
        dependencies: dependency_stats(records),
        task_collection: collection,
        ..SummaryStats::default()
    };
    for record in records {
        let tally = match record.hierarchy_type {
            HierarchyType::Project => &mut summary.projects,
            HierarchyType::Unit => &mut summary.units,
            HierarchyType::Phase => &mut summary.phases,
            HierarchyType::Task => &mut summary.tasks,
            HierarchyType::SubTask => &mut summary.sub_tasks,
        };
        *tally += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{PredecessorLink, RelationType};
    use serde_json::json;

    fn leaf(id: &str, linked: bool) -> TaskRecord {
        let mut record = TaskRecord::new(id, id, 4);
        if linked {
            record.predecessors.push(PredecessorLink {
                predecessor_task_id: "x".into(),
                predecessor_name: "X".into(),
                relationship: RelationType::FinishStart,
                lag_days: 0.0,
                is_external: false,
            });
        }
        record
    }

    #[test]
    fn coverage_rounds_to_two_decimals() {
        assert_eq!(coverage_percent(1, 3), 33.33);
        assert_eq!(coverage_percent(2, 3), 66.67);
        assert_eq!(coverage_percent(0, 0), 0.0);
        assert_eq!(coverage_percent(5, 5), 100.0);
    }

    #[test]
    fn summary_tasks_are_not_counted_as_leaves() {
        let mut parent = leaf("p", true);
        parent.is_summary = true;
        let records = vec![parent, leaf("a", true), leaf("b", false)];
        let stats = dependency_stats(&records);

        assert_eq!(stats.total_predecessor_links, 2);
        assert_eq!(stats.tasks_with_predecessors, 2);
        assert_eq!(stats.total_leaf_tasks, 2);
        assert_eq!(stats.linked_leaf_tasks, 1);
        assert_eq!(stats.isolated_leaf_tasks, 1);
        assert_eq!(stats.coverage_percent, 50.0);
    }

    #[test]
    fn only_summaries_means_zero_coverage() {
        let mut root = TaskRecord::new("1", "Root", 0);
        root.is_summary = true;
        let stats = dependency_stats(&[root]);
        assert_eq!(stats.total_leaf_tasks, 0);
        assert_eq!(stats.coverage_percent, 0.0);
    }

    #[test]
    fn tallies_tiers_and_serializes_camel_case() {
        let mut records = vec![leaf("a", false), leaf("b", false), leaf("c", false)];
        records[0].hierarchy_type = HierarchyType::Project;
        records[1].hierarchy_type = HierarchyType::SubTask;
        let summary = summarize(
            &records,
            CollectionStats {
                collected_task_count: 3,
                parsed_task_count: 3,
                candidate_count: 5,
            },
        );
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.count(HierarchyType::Project), 1);
        assert_eq!(summary.count(HierarchyType::SubTask), 1);
        assert_eq!(summary.count(HierarchyType::Task), 1);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["subTasks"], json!(1));
        assert_eq!(value["dependencies"]["isolatedLeafTasks"], json!(3));
        assert_eq!(value["taskCollection"]["candidateCount"], json!(5));
    }
}
