use std::fmt::Display;

use crate::terminal::{colors, logging::PRINT_TARGET};
use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
const TREE_KEY_WIDTH: usize = 8;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// A full-width line of `fill` with `label` centred in it.
fn rule_line(fill: &str, label: Option<ColoredString>) -> String {
    let Some(label) = label else {
        return fill.repeat(TOTAL_WIDTH).bright_black().to_string();
    };

    let spare: usize = TOTAL_WIDTH.saturating_sub(console::measure_text_width(&label.to_string()));
    let left: String = fill.repeat(spare / 2);
    let right: String = fill.repeat(spare - spare / 2);
    format!("{}{}{}", left.bright_black(), label, right.bright_black())
}

fn rule(fill: &str, label: Option<ColoredString>) {
    print(&rule_line(fill, label));
}

pub fn banner(q_level: u8) {
    if q_level == 0 {
        let title = format!("⟦ SWEEPR v{} ⟧", env!("CARGO_PKG_VERSION"));
        rule("═", Some(title.bright_green().bold()));
    }
}

pub fn header(msg: &str, q_level: u8) {
    if q_level == 0 {
        let title = format!("⟦ {} ⟧", msg.to_uppercase());
        rule("─", Some(title.bright_green()));
    }
}

pub fn fat_separator() {
    rule("═", None);
}

/// `> key......: value`, keys padded to `key_width`.
pub fn aligned_line(key: &str, key_width: usize, value: impl Display) {
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    print(&format!(
        "{} {}{}{} {}",
        ">".color(colors::SEPARATOR),
        key.color(colors::PRIMARY),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

/// Prints `(key, value)` pairs as the branches of the last [`tree_head`].
pub fn as_tree_one_level(branches: Vec<(String, ColoredString)>) {
    let last: usize = branches.len().saturating_sub(1);

    for (i, (key, value)) in branches.into_iter().enumerate() {
        let branch: &str = if i == last { "└─" } else { "├─" };
        let dots: String = ".".repeat(TREE_KEY_WIDTH.saturating_sub(key.len()));
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let pad: String = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{pad}{msg}"));
}
