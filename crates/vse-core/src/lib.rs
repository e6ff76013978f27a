pub mod id;
pub mod lint;
pub mod model;
pub mod naming;
pub mod snapshot;
pub mod store;

pub use id::{CounterIds, ElementId, IdGen};
pub use lint::{LintDiagnostic, LintSeverity, lint_snapshot};
pub use model::*;
pub use naming::{NamePolicy, TitleCaseNames};
pub use snapshot::{LoadError, ProjectSnapshot, SNAPSHOT_VERSION};
pub use store::GraphStore;
