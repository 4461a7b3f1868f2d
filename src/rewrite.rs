use crate::config::Config;

/// Prepend the configured interpreter when the program name looks like a script.
///
/// Only the suffix of `args[0]` is checked; the file itself is never opened.
pub fn rewrite(mut args: Vec<String>, config: &Config) -> Vec<String> {
    let is_script = args
        .first()
        .is_some_and(|program| program.ends_with(&config.script_suffix));
    if is_script {
        log::debug!("running {} through {}", args[0], config.script_interpreter);
        args.insert(0, config.script_interpreter.clone());
    }
    args
}
