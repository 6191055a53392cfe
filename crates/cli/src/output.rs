//! Terminal output formatting.

use console::style;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", style("ℹ").blue().bold(), message);
}

/// Prints the result of a lifecycle hook.
pub fn hook_result(hook: &str, value: &str) {
    println!(
        "{} {:<7} {}",
        style("▶").cyan().bold(),
        style(hook).cyan(),
        value
    );
}

/// Prints a failed lifecycle hook.
pub fn hook_failed(hook: &str, error: &str) {
    eprintln!("{} {:<7} {}", style("✗").red(), style(hook).red(), error);
}

/// Prints an item result the way the agent test mode does.
pub fn item_result(key: &str, tag: char, value: &str) {
    println!("{:<46}[{}|{}]", key, tag, value);
}

/// Prints a header for a section.
pub fn section_header(title: &str) {
    println!("\n{}", style(format!("── {} ──", title)).bold());
}

/// Prints a list item.
pub fn list_item(text: &str) {
    println!("  {} {}", style("•").dim(), text);
}

/// Prints a key-value pair.
pub fn key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}
