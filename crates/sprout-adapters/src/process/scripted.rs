//! Scripted process runner for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sprout_core::{
    application::{
        ApplicationError,
        ports::{CommandSpec, ProcessOutput, ProcessRunner, ProgressSink},
    },
    error::SproutResult,
};

#[derive(Debug, Clone)]
enum Script {
    Exit {
        code: i32,
        progress: Vec<String>,
        stderr: String,
    },
    SpawnError(String),
}

/// Records every command and answers from a queue of scripted results.
///
/// When the queue is empty, commands succeed with no output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Arc<Mutex<VecDeque<Script>>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a run that exits with `code` after writing `stderr`.
    pub fn exit_with(self, code: i32, stderr: &str) -> Self {
        self.push(Script::Exit {
            code,
            progress: vec![],
            stderr: stderr.to_string(),
        })
    }

    /// Queue a successful run that reports `chunks` as progress.
    pub fn succeed_with_progress<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Script::Exit {
            code: 0,
            progress: chunks.into_iter().map(Into::into).collect(),
            stderr: String::new(),
        })
    }

    /// Queue a run whose program cannot be started.
    pub fn fail_to_spawn(self, reason: &str) -> Self {
        self.push(Script::SpawnError(reason.to_string()))
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(self, script: Script) -> Self {
        if let Ok(mut queue) = self.script.lock() {
            queue.push_back(script);
        }
        self
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        command: &CommandSpec,
        progress: &dyn ProgressSink,
    ) -> SproutResult<ProcessOutput> {
        self.calls
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .push(command.clone());

        let next = self
            .script
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .pop_front();

        match next {
            None => Ok(ProcessOutput {
                success: true,
                code: Some(0),
                stderr: String::new(),
            }),
            Some(Script::Exit {
                code,
                progress: chunks,
                stderr,
            }) => {
                for chunk in &chunks {
                    progress.report(chunk);
                }
                Ok(ProcessOutput {
                    success: code == 0,
                    code: Some(code),
                    stderr,
                })
            }
            Some(Script::SpawnError(reason)) => Err(ApplicationError::ProcessSpawn {
                program: command.program.clone(),
                reason,
            }
            .into()),
        }
    }
}
