//! silo-core: shared error taxonomy, tenant identity, and the event sink
//! capability used across the silo content service crates.

pub mod errors;
pub mod events;
pub mod tenant;

pub use errors::{ContentError, ContentResult};
pub use events::{emit_best_effort, ContentEvent, ContentEventKind, EventSink, NoopEventSink, RecordingEventSink};
pub use tenant::{OwnerRef, TenantId};
