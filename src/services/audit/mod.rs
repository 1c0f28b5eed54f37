pub mod memory;
pub mod recorder;
pub mod remote;
pub mod store;

pub use memory::MemoryAuditStore;
pub use recorder::AuditRecorder;
pub use remote::RemoteAuditSink;
pub use store::{AuditError, AuditQuery, AuditRecord, AuditStore, NewAuditRecord};
