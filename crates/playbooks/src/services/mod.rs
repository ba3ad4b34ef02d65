//! Service layer for the Playbooks service.
//!
//! Services coordinate the engine, the parser, and the database queries:
//!
//! - **PlaybookService**: Playbook CRUD and status management
//! - **RunService**: Runs playbooks, previews, and serves run history
//! - **RunRecorder**: Best-effort audit trail persistence
//! - **DispatchService**: Routes application events to active playbooks

pub mod dispatch;
pub mod playbook;
pub mod recorder;
pub mod run;

pub use dispatch::{DispatchResult, DispatchService, DispatchSummary, EventRequest};
pub use playbook::PlaybookService;
pub use recorder::{RunHandle, RunRecorder};
pub use run::{RunOutcome, RunService, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
