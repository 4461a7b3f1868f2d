use crate::builtin::try_builtin;
use crate::command::ProcessResult;
use crate::config::Config;
use crate::env::Environment;
use crate::error::ShellError;
use crate::line_reader::LineReader;
use crate::{lexer, process, redirect, rewrite};
use std::io::{self, Write};

/// A minimal shell-like interpreter.
///
/// The interpreter owns the [`Environment`] (working directory, variables and
/// aliases) and the [`Config`]. Lines are evaluated one at a time; nothing runs
/// in the background.
///
/// Example
/// ```no_run
/// use pipesh::Interpreter;
/// let mut sh = Interpreter::default();
/// let status = sh.evaluate("echo hello world").unwrap();
/// assert_eq!(status.map(|s| s.exit_code), Some(0));
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
}

impl Interpreter {
    pub fn new(env: Environment, config: Config) -> Self {
        Self { env, config }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluate one line.
    ///
    /// Returns `Ok(None)` when the line holds no command, otherwise the status
    /// of the builtin or of the last process. Errors cover only this line.
    pub fn evaluate(&mut self, line: &str) -> Result<Option<ProcessResult>, ShellError> {
        let tokens = lexer::tokenize(line, &self.env.aliases);
        if tokens.is_empty() {
            return Ok(None);
        }
        log::debug!("tokens: {tokens:?}");

        let builtin = {
            let mut stdout = io::stdout().lock();
            let mut stderr = io::stderr().lock();
            let result = try_builtin(&tokens, &mut self.env, &mut stdout, &mut stderr);
            let _ = stdout.flush();
            result
        };
        if builtin.is_some() {
            return Ok(builtin);
        }

        let args = rewrite::rewrite(tokens, &self.config);
        let parsed = redirect::parse(args)?;
        process::execute(parsed.first, parsed.second, parsed.redirects, &self.env).map(Some)
    }

    /// Evaluate one line, reporting any error on stderr.
    ///
    /// Returns whether the loop should keep prompting.
    pub fn eval_line(&mut self, line: &str) -> bool {
        match self.evaluate(line) {
            Ok(Some(status)) if !status.is_success() => {
                log::debug!("exit status {status:?}");
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("command failed: {e:?}");
                eprintln!("pipesh: {e}");
            }
        }
        true
    }

    /// Read-eval loop. Returns at end of input.
    pub fn repl(&mut self, reader: &mut dyn LineReader) -> anyhow::Result<()> {
        while let Some(line) = reader.read_line(&self.config.prompt)? {
            if !line.trim().is_empty() {
                reader.add_history(&line);
            }
            if !self.eval_line(&line) {
                break;
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    /// Capture the process environment and read configuration overrides from it.
    fn default() -> Self {
        let env = Environment::new();
        let config = Config::from_env(&env);
        Self::new(env, config)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::alias::AliasTable;
    use std::fs;
    use std::path::PathBuf;

    fn interpreter() -> Interpreter {
        let env = Environment {
            current_dir: std::env::temp_dir(),
            aliases: AliasTable::new(),
            ..Environment::new()
        };
        Interpreter::new(env, Config::default())
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pipesh_interp_{}_{}", std::process::id(), tag))
    }

    #[test]
    fn blank_lines_run_nothing() {
        let mut sh = interpreter();
        assert_eq!(sh.evaluate("").unwrap(), None);
        assert_eq!(sh.evaluate("   \t ").unwrap(), None);
    }

    #[test]
    fn builtins_short_circuit() {
        let mut sh = interpreter();
        let status = sh.evaluate("alias hi echo hi").unwrap();
        assert_eq!(status, Some(ProcessResult::success()));
        assert_eq!(sh.env().aliases.lookup("hi"), Some("echo hi"));
    }

    #[test]
    fn alias_feeds_the_process() {
        let mut sh = interpreter();
        sh.evaluate("alias say echo from-alias").unwrap();

        let out = temp_path("alias_out");
        let status = sh.evaluate(&format!("say extra > {}", out.display())).unwrap();
        assert_eq!(status, Some(ProcessResult::success()));
        assert_eq!(fs::read_to_string(&out).unwrap(), "from-alias extra\n");
        let _ = fs::remove_file(out);
    }

    #[test]
    fn scripts_run_through_interpreter() {
        let mut sh = interpreter();
        let script = temp_path("script.sh");
        let out = temp_path("script_out");
        // Not executable: only works because it is passed to `sh`.
        fs::write(&script, "echo \"script got $1\"\n").unwrap();

        let line = format!("{} arg1 > {}", script.display(), out.display());
        let status = sh.evaluate(&line).unwrap();
        assert_eq!(status, Some(ProcessResult::success()));
        assert_eq!(fs::read_to_string(&out).unwrap(), "script got arg1\n");

        let _ = fs::remove_file(script);
        let _ = fs::remove_file(out);
    }

    #[test]
    fn redirection_errors_abort_the_line() {
        let mut sh = interpreter();
        let missing = temp_path("missing_input");
        let err = sh
            .evaluate(&format!("cat < {}", missing.display()))
            .unwrap_err();
        assert!(matches!(err, ShellError::Io { .. }));
        // The loop keeps going after any error.
        assert!(sh.eval_line(&format!("cat < {}", missing.display())));
    }
}
