//! Process creation for one command or a two-command pipe.
//!
//! Every descriptor handed to a child (redirection file or pipe end) is an
//! owned value moved into the child's `Stdio`. The `Command` holding it is a
//! temporary that is dropped as soon as `spawn` returns, so the parent never
//! keeps a copy open past that point. In particular the pipe's write end lives
//! only in the first child, and the reader sees end-of-file when it exits.

use crate::command::{EXIT_NOT_EXECUTABLE, EXIT_NOT_FOUND, ProcessResult};
use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::redirect::RedirectionSpec;
use std::io;
use std::process::{Child, Command, Stdio};

enum Stage {
    Running { program: String, child: Child },
    /// The program could not be executed; the failure was already reported.
    Failed(ProcessResult),
}

/// Run the segments and return the status of the last one.
pub fn execute(
    first: Vec<String>,
    second: Option<Vec<String>>,
    redirects: RedirectionSpec,
    env: &Environment,
) -> Result<ProcessResult> {
    let statuses = execute_stages(first, second, redirects, env)?;
    Ok(statuses
        .last()
        .copied()
        .unwrap_or_else(ProcessResult::success))
}

/// Run the segments and return one status per segment, in order.
///
/// Blocks until every spawned child has terminated.
pub fn execute_stages(
    first: Vec<String>,
    second: Option<Vec<String>>,
    mut redirects: RedirectionSpec,
    env: &Environment,
) -> Result<Vec<ProcessResult>> {
    let stdin = redirects
        .take_input()
        .map_or_else(Stdio::inherit, Stdio::from);
    let output = redirects.take_output();

    let Some(second) = second else {
        let stdout = output.map_or_else(Stdio::inherit, Stdio::from);
        let stage = spawn_stage(&first, stdin, stdout, env)?;
        return Ok(vec![wait_stage(stage)?]);
    };

    let (reader, writer) = os_pipe::pipe().map_err(|e| ShellError::io("pipe", e))?;

    // An explicit `>` wins over the pipe; the writer is then released unused.
    let stdout = match output {
        Some(file) => {
            drop(writer);
            Stdio::from(file)
        }
        None => Stdio::from(writer),
    };

    // On error the reader is dropped on return, nothing to wait for.
    let producer = spawn_stage(&first, stdin, stdout, env)?;

    let consumer = match spawn_stage(&second, Stdio::from(reader), Stdio::inherit(), env) {
        Ok(stage) => stage,
        Err(e) => {
            // The producer may already be running; reap it before bailing out.
            if let Err(wait_err) = wait_stage(producer) {
                log::warn!("{wait_err}");
            }
            return Err(e);
        }
    };

    let producer = wait_stage(producer);
    let consumer = wait_stage(consumer);
    Ok(vec![producer?, consumer?])
}

fn spawn_stage(args: &[String], stdin: Stdio, stdout: Stdio, env: &Environment) -> Result<Stage> {
    let Some((program, rest)) = args.split_first() else {
        return Err(ShellError::process("pipesh", "empty command"));
    };

    // A vanished working directory also surfaces as NotFound from spawn;
    // catch it here so the program is not reported as missing.
    if !env.current_dir.is_dir() {
        return Err(ShellError::process(
            program.as_str(),
            format!("working directory {} does not exist", env.current_dir.display()),
        ));
    }

    // The builder is a temporary: the parent's copies of `stdin`/`stdout`
    // are closed when this statement ends, on success and on failure.
    let spawned = Command::new(program)
        .args(rest)
        .stdin(stdin)
        .stdout(stdout)
        .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&env.current_dir)
        .spawn();

    match spawned {
        Ok(child) => {
            log::debug!("spawned {program} as pid {}", child.id());
            Ok(Stage::Running {
                program: program.clone(),
                child,
            })
        }
        Err(e) => match exec_failure_status(&e) {
            Some(code) => {
                eprintln!("{program}: {}", exec_failure_reason(code, &e));
                log::debug!("{program} failed to exec: {e}");
                Ok(Stage::Failed(ProcessResult::exited(code)))
            }
            None => Err(ShellError::process(program.as_str(), e)),
        },
    }
}

fn wait_stage(stage: Stage) -> Result<ProcessResult> {
    match stage {
        Stage::Running { program, mut child } => {
            let status = child
                .wait()
                .map_err(|e| ShellError::process(program.as_str(), e))?;
            let result = ProcessResult::from(status);
            log::debug!("{program} (pid {}) finished: {result:?}", child.id());
            Ok(result)
        }
        Stage::Failed(result) => Ok(result),
    }
}

/// Status for errors meaning "the program could not be run" rather than
/// "the system could not create a process".
fn exec_failure_status(e: &io::Error) -> Option<i32> {
    match e.kind() {
        io::ErrorKind::NotFound => Some(EXIT_NOT_FOUND),
        io::ErrorKind::PermissionDenied => Some(EXIT_NOT_EXECUTABLE),
        _ => None,
    }
}

fn exec_failure_reason(code: i32, e: &io::Error) -> String {
    if code == EXIT_NOT_FOUND {
        "command not found".to_string()
    } else {
        e.to_string()
    }
}
