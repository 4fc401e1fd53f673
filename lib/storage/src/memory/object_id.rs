/// Identifies an interned term within a single [MemoryQuadStorage](super::MemoryQuadStorage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ObjectId(pub(crate) u32);

impl ObjectId {
    /// The graph name of the default graph. No term is ever mapped to this id.
    pub(crate) const DEFAULT_GRAPH: ObjectId = ObjectId(0);
    pub(crate) const MIN: ObjectId = ObjectId(0);
    pub(crate) const MAX: ObjectId = ObjectId(u32::MAX);
}

/// A quad whose components are encoded as object ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EncodedQuad {
    pub(crate) graph_name: ObjectId,
    pub(crate) subject: ObjectId,
    pub(crate) predicate: ObjectId,
    pub(crate) object: ObjectId,
}

/// A quad pattern whose bound components are encoded as object ids.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EncodedQuadPattern {
    pub(crate) graph_name: Option<ObjectId>,
    pub(crate) subject: Option<ObjectId>,
    pub(crate) predicate: Option<ObjectId>,
    pub(crate) object: Option<ObjectId>,
}

impl EncodedQuadPattern {
    pub(crate) fn matches(&self, quad: &EncodedQuad) -> bool {
        self.graph_name.map_or(true, |g| g == quad.graph_name)
            && self.subject.map_or(true, |s| s == quad.subject)
            && self.predicate.map_or(true, |p| p == quad.predicate)
            && self.object.map_or(true, |o| o == quad.object)
    }
}
