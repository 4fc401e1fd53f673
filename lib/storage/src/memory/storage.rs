use crate::memory::index::QuadIndexes;
use crate::memory::object_id_mapping::ObjectIdMapping;
use crate::memory::reader::MemoryStorageReader;
use async_trait::async_trait;
use rdf_weave_common::error::StorageError;
use rdf_weave_common::{QuadDataset, QuadStorage};
use rdf_weave_model::{GraphNameRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef};
use std::sync::{Arc, RwLock};

/// The content of the in-memory storage: the term dictionary and the quad indexes.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryContent {
    pub(crate) object_ids: ObjectIdMapping,
    pub(crate) indexes: QuadIndexes,
}

/// In-memory quad storage with copy-on-write snapshots.
///
/// Readers obtain an [Arc] of the current content and never block writers. A writer mutates the
/// content in place if no snapshot is alive and clones it otherwise. Only a single writer is
/// active at a time.
#[derive(Debug, Default)]
pub struct MemoryQuadStorage {
    content: RwLock<Arc<MemoryContent>>,
}

impl MemoryQuadStorage {
    /// Creates a new, empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reader over the current state of the storage.
    pub fn reader(&self) -> Result<MemoryStorageReader, StorageError> {
        let content = self.content.read().map_err(|_| StorageError::Poisoned)?;
        Ok(MemoryStorageReader::new(Arc::clone(&content)))
    }

    /// Inserts quads. Returns the number of quads that were not present before.
    pub fn insert_quads(&self, quads: &[Quad]) -> Result<usize, StorageError> {
        self.write(|content| {
            let mut inserted = 0;
            for quad in quads {
                let encoded = content.object_ids.encode_quad(quad.as_ref());
                if content.indexes.insert(encoded) {
                    inserted += 1;
                }
            }
            inserted
        })
    }

    fn write<T>(&self, action: impl FnOnce(&mut MemoryContent) -> T) -> Result<T, StorageError> {
        let mut guard = self.content.write().map_err(|_| StorageError::Poisoned)?;
        Ok(action(Arc::make_mut(&mut guard)))
    }
}

#[async_trait]
impl QuadStorage for MemoryQuadStorage {
    fn snapshot(&self) -> Result<Arc<dyn QuadDataset>, StorageError> {
        Ok(Arc::new(self.reader()?))
    }

    async fn extend(&self, quads: Vec<Quad>) -> Result<usize, StorageError> {
        self.insert_quads(&quads)
    }

    async fn insert_named_graph<'a>(
        &self,
        graph_name: NamedOrBlankNodeRef<'a>,
    ) -> Result<bool, StorageError> {
        self.write(|content| {
            let id = content.object_ids.encode(graph_name.into());
            content.indexes.insert_named_graph(id)
        })
    }

    async fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.reader()?.named_graphs()
    }

    async fn contains_named_graph<'a>(
        &self,
        graph_name: NamedOrBlankNodeRef<'a>,
    ) -> Result<bool, StorageError> {
        self.reader()?.contains_named_graph(graph_name)
    }

    async fn contains(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        Ok(self.reader()?.contains(quad))
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.reader()?.len())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.write(|content| content.indexes.clear())
    }

    async fn clear_graph<'a>(&self, graph_name: GraphNameRef<'a>) -> Result<(), StorageError> {
        self.write(|content| {
            if let Some(id) = content.object_ids.try_get_graph_name(graph_name) {
                content.indexes.clear_graph(id);
            }
        })
    }

    async fn remove_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        self.write(|content| {
            content
                .object_ids
                .try_get(graph_name.into())
                .is_some_and(|id| content.indexes.remove_named_graph(id))
        })
    }

    async fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        self.write(|content| {
            content
                .object_ids
                .try_get_quad(quad)
                .is_some_and(|encoded| content.indexes.remove(encoded))
        })
    }
}
