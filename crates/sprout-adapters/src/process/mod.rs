//! Process runner adapters.

mod scripted;
mod tokio_runner;

pub use scripted::ScriptedRunner;
pub use tokio_runner::TokioProcessRunner;
