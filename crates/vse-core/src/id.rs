use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for nodes and edges in a project graph.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
///
/// The id string itself is opaque: the store never parses it, it only
/// compares it. Serialization resolves back to the plain string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return the existing id if already interned.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

/// Source of fresh element ids.
///
/// Id generation lives outside the store so embedders can swap in their own
/// scheme (random ids from the host platform, server-assigned ids). The
/// contract: a generator never hands out the same id twice. The store adds a
/// second guard on top — it skips any generated id already present in the
/// graph — so even a snapshot loaded from elsewhere cannot collide with
/// generated ids.
pub trait IdGen {
    /// Return an id this generator has never handed out before.
    /// `prefix` names the element class ("node", "edge").
    fn fresh(&mut self, prefix: &str) -> ElementId;
}

/// Default generator: `node_0`, `edge_1`, … from a single shared counter.
#[derive(Debug, Default)]
pub struct CounterIds {
    next: u64,
}

impl IdGen for CounterIds {
    fn fresh(&mut self, prefix: &str) -> ElementId {
        let n = self.next;
        self.next += 1;
        ElementId::intern(&format!("{prefix}_{n}"))
    }
}
