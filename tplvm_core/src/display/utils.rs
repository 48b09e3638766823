use crate::label::Label;
use crate::vm::VmState;

use owo_colors::OwoColorize;

pub fn display_some_bytes(size: &Option<u64>) -> String {
    match size {
        Some(size) => human_bytes::human_bytes(*size as f64).replace(" ", ""),
        None => "".to_owned(),
    }
}
pub fn display_names(names: &Vec<String>) -> String {
    names.join("\n")
}
pub fn display_some_name(name: &Option<String>) -> String {
    name.to_owned().unwrap_or_default()
}
pub fn display_label(label: &Label) -> String {
    let (r, g, b) = (
        (label.color() >> 16) as u8,
        (label.color() >> 8) as u8,
        label.color() as u8,
    );
    // Black label is unreadable on dark terminals.
    match label {
        Label::Black => label.to_string().bold().to_string(),
        _ => label.to_string().truecolor(r, g, b).bold().to_string(),
    }
}
pub fn display_state(state: &VmState) -> String {
    let res = match state {
        VmState::Stopped => "stopped".red().to_string(),
        VmState::Running => "running".green().to_string(),
        VmState::Unknown => "unknown".white().to_string(),
    };
    format!("{}", res)
}
