use crate::grammar::{find_top_level, is_control};
use crate::line::LineKind;

/// Assign a syntactic kind to one trimmed line. First matching rule wins.
pub fn classify(text: &str) -> LineKind {
    if text.is_empty() || text.starts_with('#') {
        LineKind::Comment
    } else if text == "packages:" {
        LineKind::SectionHeader
    } else if text.starts_with("function ") {
        LineKind::FunctionDef
    } else if text.starts_with("for ") {
        LineKind::Loop
    } else if text.starts_with("print:") {
        LineKind::Print
    } else if find_top_level(text, ':').is_some() && !is_control(text) {
        LineKind::Assignment
    } else if is_control(text) {
        LineKind::Control
    } else if text.ends_with(';') {
        LineKind::BareCall
    } else {
        LineKind::Unknown
    }
}
