use colored::*;

pub fn format_header(text: &str) -> String {
    format!("{}", text.blue().bold())
}

pub fn format_highlight(text: &str) -> String {
    format!("{}", text.cyan())
}

pub fn format_success(text: &str) -> String {
    format!("{}", text.green())
}

pub fn format_warning(text: &str) -> String {
    format!("{}", text.yellow())
}

/// `old -> new` with the new name highlighted.
pub fn format_rename(old: &str, new: &str) -> String {
    format!("{} {} {}", old.dimmed(), "->".dimmed(), new.cyan())
}
