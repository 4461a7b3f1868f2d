use crate::command::{ExitCode, ProcessResult};
use crate::env::Environment;
use crate::error::ShellError;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "pwd" or "cd".
    fn name() -> &'static str;

    /// Executes the command against the interpreter environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Run `args` as a builtin if its name is one.
///
/// Returns `None` when `args[0]` is not a builtin (or `args` is empty), leaving
/// the line to process creation. Builtin failures are written to `stderr` and
/// turned into a non-zero result; they never escape as errors.
pub fn try_builtin(
    args: &[String],
    env: &mut Environment,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Option<ProcessResult> {
    let (name, rest) = args.split_first()?;
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    match name.as_str() {
        "cd" => Some(run::<Cd>(&rest, env, stdout, stderr)),
        "pwd" => Some(run::<Pwd>(&rest, env, stdout, stderr)),
        "alias" => Some(run::<Alias>(&rest, env, stdout, stderr)),
        "unalias" => Some(run::<Unalias>(&rest, env, stdout, stderr)),
        _ => None,
    }
}

fn run<T: BuiltinCommand>(
    args: &[&str],
    env: &mut Environment,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ProcessResult {
    let cmd = match T::from_args(&[T::name()], args) {
        Ok(cmd) => cmd,
        Err(EarlyExit { output, status }) => {
            // --help goes to stdout, usage errors to stderr
            return if status.is_ok() {
                let _ = stdout.write_all(output.as_bytes());
                ProcessResult::success()
            } else {
                let _ = stderr.write_all(output.as_bytes());
                ProcessResult::exited(1)
            };
        }
    };
    match cmd.execute(stdout, env) {
        Ok(code) => ProcessResult::exited(code),
        Err(e) => {
            log::debug!("builtin {} failed: {e:?}", T::name());
            let _ = writeln!(stderr, "{e:#}");
            ProcessResult::exited(1)
        }
    }
}

fn expected_argument(name: &str) -> anyhow::Error {
    ShellError::Path(format!("{name}: expected argument")).into()
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => return Err(expected_argument("cd")),
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir).map_err(|e| {
            ShellError::Path(format!("cd: {}: {e}", new_dir.display()))
        })?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Define or list aliases.
/// With no arguments, print every alias, most recent first.
pub struct Alias {
    #[argh(positional, greedy)]
    /// alias name followed by the command it expands to (or `name=command`).
    pub args: Vec<String>,
}

impl BuiltinCommand for Alias {
    fn name() -> &'static str {
        "alias"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some((first, values)) = self.args.split_first() else {
            for (name, expansion) in env.aliases.iter_recent_first() {
                writeln!(stdout, "alias {name}='{expansion}'")?;
            }
            return Ok(0);
        };

        let (name, expansion) = match first.split_once('=') {
            Some((name, head)) => {
                let mut parts = vec![head];
                parts.extend(values.iter().map(String::as_str));
                let expansion = strip_quotes(&parts.join(" ")).to_string();
                if expansion.trim().is_empty() {
                    return Err(expected_argument("alias"));
                }
                (name, expansion)
            }
            None if values.is_empty() => return Err(expected_argument("alias")),
            None => (first.as_str(), values.join(" ")),
        };

        if name.is_empty() {
            return Err(ShellError::Path(format!("alias: invalid name in `{first}`")).into());
        }

        log::debug!("alias {name} -> {expansion:?}");
        env.aliases.add(name, expansion);
        Ok(0)
    }
}

/// Drop one pair of matching surrounding quotes.
fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[derive(FromArgs)]
/// Remove an alias.
pub struct Unalias {
    #[argh(positional)]
    /// name of the alias to remove.
    pub name: Option<String>,
}

impl BuiltinCommand for Unalias {
    fn name() -> &'static str {
        "unalias"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let Some(name) = self.name else {
            return Err(expected_argument("unalias"));
        };
        if env.aliases.remove(&name) {
            Ok(0)
        } else {
            Err(ShellError::Path(format!("unalias: {name}: not found")).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasTable;
    use std::collections::HashMap;
    use std::env as stdenv;
    use std::io;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn test_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap(),
            aliases: AliasTable::new(),
        }
    }

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    /// Runs a builtin line, returning (result, stdout, stderr).
    fn run_line(env: &mut Environment, line: &str) -> (Option<ProcessResult>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let res = try_builtin(&argv(line), env, &mut out, &mut err);
        (
            res,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn make_unique_temp_dir() -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("pipesh_test_cd_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }

    #[test]
    fn test_non_builtin_is_not_handled() {
        let mut env = test_env();
        let (res, out, err) = run_line(&mut env, "ls -l");
        assert!(res.is_none());
        assert!(out.is_empty() && err.is_empty());
        assert!(try_builtin(&[], &mut env, &mut Vec::new(), &mut Vec::new()).is_none());
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let mut env = test_env();
        let (res, out, _) = run_line(&mut env, "pwd");
        assert_eq!(res, Some(ProcessResult::success()));
        assert_eq!(out, format!("{}\n", env.current_dir.to_string_lossy()));
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir().expect("failed to create temp dir");
        let canonical_temp = fs::canonicalize(&temp).expect("canonicalize failed");
        let orig = stdenv::current_dir().unwrap();

        let mut env = test_env();
        let cmd = Cd {
            target: Some(canonical_temp.to_string_lossy().to_string()),
        };
        let res = cmd.execute(&mut Vec::new(), &mut env);
        assert!(res.is_ok());

        let new_canonical = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        assert_eq!(new_canonical, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);

        stdenv::set_current_dir(orig).expect("failed to restore cwd");
        let _ = fs::remove_dir_all(&temp);
    }

    #[test]
    fn test_cd_without_argument_is_path_error() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = test_env();

        let err = Cd { target: None }
            .execute(&mut Vec::new(), &mut env)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ShellError>(),
            Some(ShellError::Path(_))
        ));
        assert_eq!(err.to_string(), "cd: expected argument");
        assert_eq!(stdenv::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_nonexistent_path_reports_and_continues() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = test_env();

        let line = format!("cd nonexistent_dir_for_pipesh_test_{}", std::process::id());
        let (res, _, err) = run_line(&mut env, &line);
        assert_eq!(res, Some(ProcessResult::exited(1)));
        assert!(err.starts_with("cd: "));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_alias_define_and_list() {
        let mut env = test_env();
        let (res, _, _) = run_line(&mut env, "alias ll ls -l -a");
        assert_eq!(res, Some(ProcessResult::success()));
        assert_eq!(env.aliases.lookup("ll"), Some("ls -l -a"));

        run_line(&mut env, "alias g grep");
        let (_, out, _) = run_line(&mut env, "alias");
        assert_eq!(out, "alias g='grep'\nalias ll='ls -l -a'\n");
    }

    #[test]
    fn test_alias_assignment_form_strips_quotes() {
        let mut env = test_env();
        let args = vec![
            "alias".to_string(),
            "foo=\"ls".to_string(),
            "-la\"".to_string(),
        ];
        let res = try_builtin(&args, &mut env, &mut Vec::new(), &mut Vec::new());
        assert_eq!(res, Some(ProcessResult::success()));
        assert_eq!(env.aliases.lookup("foo"), Some("ls -la"));

        run_line(&mut env, "alias bar='pwd'");
        assert_eq!(env.aliases.lookup("bar"), Some("pwd"));
    }

    #[test]
    fn test_alias_name_without_value_errors() {
        let mut env = test_env();
        let (res, _, err) = run_line(&mut env, "alias foo");
        assert_eq!(res, Some(ProcessResult::exited(1)));
        assert_eq!(err, "alias: expected argument\n");
        assert!(env.aliases.is_empty());
    }

    #[test]
    fn test_alias_assignment_with_empty_value_errors() {
        let mut env = test_env();
        for line in ["alias x=", "alias x=''", "alias x=\"\""] {
            let (res, _, err) = run_line(&mut env, line);
            assert_eq!(res, Some(ProcessResult::exited(1)), "{line}");
            assert_eq!(err, "alias: expected argument\n");
        }
        assert_eq!(env.aliases.lookup("x"), None);
    }

    #[test]
    fn test_unalias() {
        let mut env = test_env();
        env.aliases.add("x", "echo hi");

        let (res, _, _) = run_line(&mut env, "unalias x");
        assert_eq!(res, Some(ProcessResult::success()));
        assert_eq!(env.aliases.lookup("x"), None);

        let (res, _, err) = run_line(&mut env, "unalias");
        assert_eq!(res, Some(ProcessResult::exited(1)));
        assert_eq!(err, "unalias: expected argument\n");

        let (res, _, err) = run_line(&mut env, "unalias x");
        assert_eq!(res, Some(ProcessResult::exited(1)));
        assert_eq!(err, "unalias: x: not found\n");
    }

    #[test]
    fn test_help_goes_to_stdout() {
        let mut env = test_env();
        let (res, out, err) = run_line(&mut env, "pwd --help");
        assert_eq!(res, Some(ProcessResult::success()));
        assert!(out.contains("Usage: pwd"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let mut env = test_env();
        let (res, out, err) = run_line(&mut env, "pwd --bogus");
        assert_eq!(res, Some(ProcessResult::exited(1)));
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }
}
