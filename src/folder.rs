use crate::task::TaskRecord;
use std::collections::{HashMap, HashSet};
use tracing::warn;

pub const FOLDER_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderWarning {
    /// A parent chain loops back on itself at this task.
    HierarchyCycleDetected { task_id: String },
}

#[derive(Debug, Clone)]
enum Slot {
    Done(String),
    /// On a cycle or below one.
    Cyclic,
}

/// Builds ancestor-name paths ("folders") over a record set, memoized per
/// record. Any record whose parent chain never reaches a root gets an empty
/// folder.
pub struct FolderBuilder<'a> {
    records: &'a [TaskRecord],
    index_by_id: HashMap<&'a str, usize>,
    cache: Vec<Option<Slot>>,
    warnings: Vec<FolderWarning>,
}

impl<'a> FolderBuilder<'a> {
    pub fn new(records: &'a [TaskRecord]) -> Self {
        let mut index_by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            index_by_id.entry(record.id.as_str()).or_insert(index);
        }
        Self {
            records,
            index_by_id,
            cache: vec![None; records.len()],
            warnings: Vec::new(),
        }
    }

    /// Folder of the record with `id`; empty for unknown ids.
    pub fn folder(&mut self, id: &str) -> String {
        match self.index_by_id.get(id) {
            Some(&index) => self.folder_at(index),
            None => String::new(),
        }
    }

    pub fn warnings(&self) -> &[FolderWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<FolderWarning> {
        self.warnings
    }

    fn parent_index(&self, index: usize) -> Option<usize> {
        self.records[index]
            .parent_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .and_then(|id| self.index_by_id.get(id))
            .copied()
    }

    fn mark_cyclic(&mut self, chain: &[usize]) {
        for &node in chain {
            self.cache[node] = Some(Slot::Cyclic);
        }
    }

    pub fn folder_at(&mut self, index: usize) -> String {
        match &self.cache[index] {
            Some(Slot::Done(folder)) => return folder.clone(),
            Some(Slot::Cyclic) => return String::new(),
            None => {}
        }

        // Climb until a node with a known folder (or a root) is reached.
        let mut chain = Vec::new();
        let mut on_chain = HashSet::new();
        let mut current = index;
        let mut parent_folder = loop {
            match &self.cache[current] {
                Some(Slot::Done(folder)) => break folder.clone(),
                Some(Slot::Cyclic) => {
                    self.mark_cyclic(&chain);
                    return String::new();
                }
                None => {}
            }
            if !on_chain.insert(current) {
                let task_id = self.records[current].id.clone();
                warn!(task_id = %task_id, "parent chain is cyclic; leaving folder empty");
                self.mark_cyclic(&chain);
                self.warnings
                    .push(FolderWarning::HierarchyCycleDetected { task_id });
                return String::new();
            }
            match self.parent_index(current) {
                Some(parent) => {
                    chain.push(current);
                    current = parent;
                }
                None => {
                    self.cache[current] = Some(Slot::Done(String::new()));
                    break String::new();
                }
            }
        };

        // Walk back down, each node's folder extending its parent's.
        let mut parent = current;
        for &node in chain.iter().rev() {
            let parent_name = &self.records[parent].name;
            let folder = if parent_folder.is_empty() {
                parent_name.clone()
            } else {
                format!("{parent_folder}{FOLDER_SEPARATOR}{parent_name}")
            };
            self.cache[node] = Some(Slot::Done(folder.clone()));
            parent_folder = folder;
            parent = node;
        }

        match &self.cache[index] {
            Some(Slot::Done(folder)) => folder.clone(),
            _ => String::new(),
        }
    }
}

/// Fills `folder` on every record and returns any cycle warnings.
pub fn assign_folders(records: &mut [TaskRecord]) -> Vec<FolderWarning> {
    let (folders, warnings) = {
        let mut builder = FolderBuilder::new(records);
        let folders: Vec<String> = (0..records.len())
            .map(|index| builder.folder_at(index))
            .collect();
        (folders, builder.into_warnings())
    };
    for (record, folder) in records.iter_mut().zip(folders) {
        record.folder = folder;
    }
    warnings
}
