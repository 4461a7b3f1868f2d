use crate::env::Environment;

/// Interpreter settings.
///
/// Defaults can be overridden through environment variables:
/// `PIPESH_PROMPT`, `PIPESH_SCRIPT_SUFFIX` and `PIPESH_SCRIPT_INTERPRETER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prompt printed before every line.
    pub prompt: String,
    /// Program names ending with this suffix are run through `script_interpreter`.
    pub script_suffix: String,
    /// Interpreter prepended to script invocations.
    pub script_interpreter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "pipesh$ ".to_string(),
            script_suffix: ".sh".to_string(),
            script_interpreter: "sh".to_string(),
        }
    }
}

impl Config {
    pub fn from_env(env: &Environment) -> Self {
        let mut config = Self::default();
        if let Some(prompt) = env.get_var("PIPESH_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(suffix) = env.get_var("PIPESH_SCRIPT_SUFFIX").filter(|s| !s.is_empty()) {
            config.script_suffix = suffix;
        }
        if let Some(interp) = env
            .get_var("PIPESH_SCRIPT_INTERPRETER")
            .filter(|s| !s.is_empty())
        {
            config.script_interpreter = interp;
        }
        config
    }
}
