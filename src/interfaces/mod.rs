//! Entry points into the engine: the named-operation dispatcher and the CSV
//! reader the CLI replays invocations from.

pub mod csv;
pub mod dispatch;
