use proptest::prelude::*;
use pyml::block::scan;
use pyml::line::read_lines;

fn texts(lines: &[pyml::SourceLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn block_stops_at_parent_width() {
    let lines = read_lines("for i in range.3:\n  print: i\n  x: i\ny: 1\n", false);
    let block = scan(&lines, 1, lines[0].width);
    assert_eq!(texts(block.children), vec!["print: i", "x: i"]);
    assert_eq!(block.next, 3);
}

#[test]
fn block_runs_to_end_of_input() {
    let lines = read_lines("items:\n  - a\n  - b\n", false);
    let block = scan(&lines, 1, 0);
    assert_eq!(block.children.len(), 2);
    assert_eq!(block.next, lines.len());
}

#[test]
fn empty_block() {
    let lines = read_lines("x:\ny: 1\n", false);
    let block = scan(&lines, 1, 0);
    assert!(block.is_empty());
    assert_eq!(block.next, 1);

    let block = scan(&lines, 2, 0);
    assert!(block.is_empty());
    assert_eq!(block.next, 2);
}

#[test]
fn deeper_lines_belong_to_the_block() {
    let source = "\
server:
  host: localhost
  ports:
    - 80
    - 443
  debug: true
done: 1
";
    let lines = read_lines(source, false);
    let block = scan(&lines, 1, 0);
    assert_eq!(block.children.len(), 5);
    assert_eq!(block.next, 6);

    let entries: Vec<_> = block.entries().collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].line.text, "host: localhost");
    assert!(entries[0].body.is_empty());
    assert_eq!(entries[1].line.text, "ports:");
    assert_eq!(texts(entries[1].body.children), vec!["- 80", "- 443"]);
    assert_eq!(entries[2].line.text, "debug: true");
}

#[test]
fn scanning_twice_gives_the_same_block() {
    let lines = read_lines("a:\n  - 1\n    - 2\n  - 3\nb: 2\n", false);
    assert_eq!(scan(&lines, 1, 0), scan(&lines, 1, 0));
}

proptest! {
    #[test]
    fn block_bounds_hold_for_any_indentation(
        widths in prop::collection::vec(0usize..8, 1..40),
        start in 0usize..40,
        parent in 0usize..8,
    ) {
        let source: String = widths
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{}x{}: {}\n", " ".repeat(*w), i, i))
            .collect();
        let lines = read_lines(&source, false);
        let start = start.min(lines.len());
        let block = scan(&lines, start, parent);

        prop_assert!(block.next >= start);
        prop_assert!(block.next <= lines.len());
        prop_assert_eq!(block.children.len(), block.next - start);
        for child in block.children {
            prop_assert!(child.width > parent);
        }
        if let Some(stop) = lines.get(block.next) {
            prop_assert!(stop.width <= parent);
        }
    }
}
