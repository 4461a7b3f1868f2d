use crate::alias::AliasTable;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process state used by the interpreter.
///
/// The environment contains:
/// - `vars`: environment variables handed to every spawned program.
/// - `current_dir`: the working directory for command execution.
/// - `aliases`: the user's command shortcuts, consulted by the tokenizer and
///   mutated by the `alias`/`unalias` builtins.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// Alias table; starts empty and is never persisted.
    pub aliases: AliasTable,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            aliases: AliasTable::new(),
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::alias::AliasTable;
    use crate::env::Environment;
    use std::collections::HashMap;
    use std::env as stdenv;

    #[test]
    fn test_env_get_var_prefers_own_vars() {
        let env = Environment {
            vars: HashMap::from([("PATH".to_string(), "/only/here".to_string())]),
            current_dir: stdenv::current_dir().unwrap(),
            aliases: AliasTable::new(),
        };

        assert_eq!(env.get_var("PATH"), Some("/only/here".to_string()));
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);
    }

    #[test]
    fn test_env_starts_with_process_vars_and_no_aliases() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(env.aliases.is_empty());
    }
}
