//! In-memory dataset hierarchy implementing every host interface
//!
//! Used by the command line tool and by tests in place of a real application.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use subset_core::{Cluster, DataKind, DataSource, DatasetId, DatasetLock, Error, Partition, PointData, Result};

use crate::host::{DatasetFactory, DatasetStore, Dependent, NotificationSink, SelectionProvider};

#[derive(Debug)]
enum Content {
    /// Point table; `None` until data has been set
    Points(Option<PointData>),

    /// Cluster partition
    Clusters(Partition),

    /// View onto another dataset that holds the data
    Proxy(DatasetId),
}

#[derive(Debug)]
struct Entry {
    name: String,
    kind: DataKind,
    parent: Option<DatasetId>,
    children: Vec<(DatasetId, DataKind)>,
    content: Content,
    selection: Vec<usize>,
    properties: BTreeMap<String, String>,
    derived: bool,
}

impl Entry {
    fn new(name: &str, kind: DataKind, parent: Option<DatasetId>, content: Content) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parent,
            children: Vec::new(),
            content,
            selection: Vec::new(),
            properties: BTreeMap::new(),
            derived: false,
        }
    }
}

/// A dataset hierarchy held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryHost {
    entries: HashMap<DatasetId, Entry>,

    /// Creation order, for stable output
    order: Vec<DatasetId>,

    locked: Mutex<HashSet<DatasetId>>,
    lock_events: Mutex<Vec<(DatasetId, bool)>>,
}

impl InMemoryHost {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, entry: Entry) -> DatasetId {
        let id = DatasetId::new();
        if let Some(parent) = entry.parent.and_then(|p| self.entries.get_mut(&p)) {
            parent.children.push((id, entry.kind));
        }
        self.entries.insert(id, entry);
        self.order.push(id);
        id
    }

    fn entry(&self, id: DatasetId) -> Result<&Entry> {
        self.entries
            .get(&id)
            .ok_or_else(|| Error::InvalidDataset(format!("unknown dataset {id}")))
    }

    fn entry_mut(&mut self, id: DatasetId) -> Result<&mut Entry> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| Error::InvalidDataset(format!("unknown dataset {id}")))
    }

    /// Add a point table
    pub fn add_points(&mut self, name: &str, data: PointData, parent: Option<DatasetId>) -> DatasetId {
        self.insert(Entry::new(name, DataKind::Points, parent, Content::Points(Some(data))))
    }

    /// Add a cluster partition under `parent`
    pub fn add_clusters(&mut self, name: &str, partition: Partition, parent: DatasetId) -> DatasetId {
        self.insert(Entry::new(
            name,
            DataKind::Clusters,
            Some(parent),
            Content::Clusters(partition),
        ))
    }

    /// Add a view of kind `kind` under `parent` whose data lives in `full`
    pub fn add_proxy(&mut self, name: &str, kind: DataKind, full: DatasetId, parent: DatasetId) -> DatasetId {
        self.insert(Entry::new(name, kind, Some(parent), Content::Proxy(full)))
    }

    /// Replace the selection of a dataset
    pub fn set_selection(&mut self, id: DatasetId, selection: Vec<usize>) -> Result<()> {
        self.entry_mut(id)?.selection = selection;
        Ok(())
    }

    /// Drop a dataset, leaving any references to it dangling
    pub fn remove(&mut self, id: DatasetId) {
        self.entries.remove(&id);
        self.order.retain(|&o| o != id);
    }

    /// Number of live datasets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the hierarchy is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live datasets in creation order
    pub fn ids(&self) -> &[DatasetId] {
        &self.order
    }

    /// Display name of a live dataset
    pub fn name_of(&self, id: DatasetId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.name.as_str())
    }

    /// Parent of a dataset
    pub fn parent_of(&self, id: DatasetId) -> Option<DatasetId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    /// Children of a dataset, dangling ones included
    pub fn children_of(&self, id: DatasetId) -> Vec<DatasetId> {
        self.entries
            .get(&id)
            .map(|e| e.children.iter().map(|(c, _)| *c).collect())
            .unwrap_or_default()
    }

    /// Point data stored directly in a dataset
    pub fn points_data(&self, id: DatasetId) -> Option<&PointData> {
        match &self.entries.get(&id)?.content {
            Content::Points(data) => data.as_ref(),
            _ => None,
        }
    }

    /// Partition stored directly in a dataset
    pub fn partition(&self, id: DatasetId) -> Option<&Partition> {
        match &self.entries.get(&id)?.content {
            Content::Clusters(partition) => Some(partition),
            _ => None,
        }
    }

    /// Property value of a dataset
    pub fn property(&self, id: DatasetId, key: &str) -> Option<&str> {
        self.entries.get(&id)?.properties.get(key).map(String::as_str)
    }

    /// Whether a dataset was created as a derived dataset
    pub fn is_derived(&self, id: DatasetId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.derived)
    }

    /// Whether a dataset is currently flagged busy
    pub fn is_locked(&self, id: DatasetId) -> bool {
        self.locked.lock().unwrap_or_else(PoisonError::into_inner).contains(&id)
    }

    /// Every lock and unlock so far, in order
    pub fn lock_events(&self) -> Vec<(DatasetId, bool)> {
        self.lock_events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Serializable view of the hierarchy, top-level datasets first
    pub fn snapshot(&self) -> Vec<SnapshotNode> {
        self.order
            .iter()
            .filter(|id| self.parent_of(**id).is_none())
            .filter_map(|&id| self.snapshot_node(id))
            .collect()
    }

    fn snapshot_node(&self, id: DatasetId) -> Option<SnapshotNode> {
        let entry = self.entries.get(&id)?;
        let (data, clusters, full) = match &entry.content {
            Content::Points(data) => (data.clone(), None, None),
            Content::Clusters(partition) => (None, Some(partition.clone()), None),
            Content::Proxy(full) => (None, None, Some(*full)),
        };

        Some(SnapshotNode {
            id,
            name: entry.name.clone(),
            kind: entry.kind,
            derived: entry.derived,
            full,
            data,
            clusters,
            properties: entry.properties.clone(),
            children: entry
                .children
                .iter()
                .filter_map(|(child, _)| self.snapshot_node(*child))
                .collect(),
        })
    }
}

/// One dataset in a [`InMemoryHost::snapshot`]
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotNode {
    /// Handle
    pub id: DatasetId,
    /// Display name
    pub name: String,
    /// Artifact kind
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Created as a derived dataset
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub derived: bool,
    /// Dataset holding the data of a view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<DatasetId>,
    /// Point data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PointData>,
    /// Clusters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Partition>,
    /// Properties
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Live children
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl DatasetLock for InMemoryHost {
    fn set_locked(&self, id: DatasetId, locked: bool) {
        let mut set = self.locked.lock().unwrap_or_else(PoisonError::into_inner);
        if locked {
            set.insert(id);
        } else {
            set.remove(&id);
        }
        drop(set);

        self.lock_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, locked));
    }
}

impl DatasetStore for InMemoryHost {
    fn is_valid(&self, id: DatasetId) -> bool {
        self.entries.contains_key(&id)
    }

    fn gui_name(&self, id: DatasetId) -> Result<String> {
        Ok(self.entry(id)?.name.clone())
    }

    fn data_kind(&self, id: DatasetId) -> Result<DataKind> {
        Ok(self.entry(id)?.kind)
    }

    fn children(&self, id: DatasetId) -> Result<Vec<Dependent>> {
        Ok(self
            .entry(id)?
            .children
            .iter()
            .map(|&(child, kind)| Dependent::new(child, kind))
            .collect())
    }

    fn full_dataset(&self, id: DatasetId) -> Result<DatasetId> {
        match self.entry(id)?.content {
            Content::Proxy(full) if self.entries.contains_key(&full) => Ok(full),
            Content::Proxy(full) => Err(Error::InvalidDataset(format!(
                "full dataset {full} of {id} no longer exists"
            ))),
            _ => Ok(id),
        }
    }

    fn points(&self, id: DatasetId) -> Result<&dyn DataSource> {
        match &self.entry(id)?.content {
            Content::Points(Some(data)) => Ok(data),
            Content::Points(None) => Err(Error::InvalidDataset(format!("{id} has no data"))),
            _ => Err(Error::InvalidDataset(format!("{id} is not a full point dataset"))),
        }
    }

    fn clusters(&self, id: DatasetId) -> Result<&Partition> {
        match &self.entry(id)?.content {
            Content::Clusters(partition) => Ok(partition),
            _ => Err(Error::InvalidDataset(format!("{id} is not a full cluster dataset"))),
        }
    }
}

impl SelectionProvider for InMemoryHost {
    fn selection(&self, id: DatasetId) -> Result<Vec<usize>> {
        Ok(self.entry(id)?.selection.clone())
    }
}

impl DatasetFactory for InMemoryHost {
    fn create_dataset(&mut self, kind: DataKind, name: &str, parent: Option<DatasetId>) -> Result<DatasetId> {
        if let Some(parent) = parent {
            self.entry(parent)?;
        }
        let content = match kind {
            DataKind::Points => Content::Points(None),
            DataKind::Clusters => Content::Clusters(Partition::new()),
        };
        Ok(self.insert(Entry::new(name, kind, parent, content)))
    }

    fn create_derived_dataset(&mut self, name: &str, parent: DatasetId) -> Result<DatasetId> {
        let id = self.create_dataset(DataKind::Points, name, Some(parent))?;
        self.entry_mut(id)?.derived = true;
        Ok(id)
    }

    fn set_data(&mut self, id: DatasetId, values: Vec<f32>, rows: usize, dimensions: usize) -> Result<()> {
        let data = PointData::with_default_names(rows, dimensions, values)?;
        match &mut self.entry_mut(id)?.content {
            Content::Points(slot) => {
                *slot = Some(data);
                Ok(())
            }
            _ => Err(Error::InvalidDataset(format!("{id} is not a point dataset"))),
        }
    }

    fn set_dimension_names(&mut self, id: DatasetId, names: Vec<String>) -> Result<()> {
        match &mut self.entry_mut(id)?.content {
            Content::Points(Some(data)) => data.set_dimension_names(names),
            _ => Err(Error::InvalidDataset(format!("{id} has no point data to name"))),
        }
    }

    fn add_cluster(&mut self, id: DatasetId, cluster: Cluster) -> Result<()> {
        match &mut self.entry_mut(id)?.content {
            Content::Clusters(partition) => {
                partition.add_cluster(cluster);
                Ok(())
            }
            _ => Err(Error::InvalidDataset(format!("{id} is not a cluster dataset"))),
        }
    }

    fn set_property(&mut self, id: DatasetId, key: &str, value: &str) -> Result<()> {
        self.entry_mut(id)?.properties.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Notification sink that records what it was told
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSink {
    /// Datasets reported as added, in order
    pub added: Vec<DatasetId>,

    /// Datasets reported as changed, in order
    pub changed: Vec<DatasetId>,
}

impl NotificationSink for RecordingSink {
    fn dataset_added(&mut self, id: DatasetId) {
        self.added.push(id);
    }

    fn dataset_data_changed(&mut self, id: DatasetId) {
        self.changed.push(id);
    }
}
