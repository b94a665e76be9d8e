//! Background tasks of the fresh-login path.
//!
//! The login task and the sink-write task share one deadline-bound
//! `TaskContext`, hand the token over through single-slot `oneshot`
//! mailboxes and always fire their `DoneSignal`.

pub mod context;
pub mod done;
pub mod login_task;
pub mod sink_task;
