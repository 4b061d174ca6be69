use crate::block;
use crate::emitter::Context;
use crate::grammar::match_list_item;
use crate::line::{LineKind, SourceLine};

/// `packages:` followed by `- name` items. Emits nothing itself; the declared
/// names are resolved into imports once the body is done.
pub fn emit(lines: &[SourceLine], i: usize, ctx: &mut Context) -> usize {
    let header = &lines[i];
    let section = block::scan(lines, i + 1, header.width);

    for child in section.children {
        if child.kind == LineKind::Comment {
            continue;
        }
        match match_list_item(&child.text) {
            Some(name) if !name.is_empty() => {
                log::debug!("line {}: declared package {}", child.number, name);
                ctx.imports.insert(name.to_string());
            }
            Some(_) => ctx.warn(child, "empty package declaration ignored"),
            None => ctx.warn(child, "expected `- name` inside `packages:`; line ignored"),
        }
    }

    if section.is_empty() {
        ctx.warn(header, "`packages:` declares no packages");
    }
    section.next
}
