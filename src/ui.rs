//! Console formatting for build output

use colored::Colorize;

const RULE: &str = "============================================================";

/// Build banner with the script title
pub fn banner(title: &str) -> String {
    format!(
        "\n{}\n{}\n{}\n",
        RULE.magenta().bold(),
        format!("   {}", title).magenta().bold(),
        RULE.magenta().bold()
    )
}

pub fn plan_summary(steps: usize) -> String {
    format!("{}\n", format!("Plan: {} steps to execute.", steps).bold())
}

fn counter(step: usize, total: usize) -> String {
    format!("[{}/{}]", step, total).dimmed().to_string()
}

pub fn step_start(step: usize, total: usize, name: &str) -> String {
    format!("{} {} {}...", counter(step, total), "i".blue(), name)
}

pub fn step_done(step: usize, total: usize, name: &str) -> String {
    format!(
        "{} {} {} {}",
        counter(step, total),
        "✔".green(),
        name,
        "(Done)".dimmed()
    )
}

pub fn step_failed(step: usize, total: usize, name: &str, status: i32) -> String {
    format!(
        "{} {} {} {}\n{}",
        counter(step, total),
        "✖".red(),
        name,
        format!("(exit status {})", status).dimmed(),
        "Failed!".red()
    )
}

pub fn custom_task(name: &str) -> String {
    format!("Custom task: ${}", name).dimmed().to_string()
}

/// Line printed by the `echo` task
pub fn echo_line(message: &str) -> String {
    format!("  {} {}", ">".cyan(), message)
}

/// Disable or re-enable colored output for the whole process
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}
