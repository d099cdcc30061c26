use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// Step banner for the pipeline stages.
pub fn step(message: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{}", message.bold().cyan());
    } else {
        eprintln!("{message}");
    }
}

/// Indented detail line under a step.
pub fn detail(message: &str) {
    eprintln!("  → {message}");
}

pub fn warn(message: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {message}", "warning:".bold().yellow());
    } else {
        eprintln!("warning: {message}");
    }
}

pub fn success(message: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {message}", "✓".bold().green());
    } else {
        eprintln!("✓ {message}");
    }
}
