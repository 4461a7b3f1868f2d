use pipesh::{Interpreter, RustylineReader};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut reader = RustylineReader::new()?;
    Interpreter::default().repl(&mut reader)
}
