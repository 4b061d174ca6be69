use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use pyml::{Diagnostic, Options, Transpiler};
use runner::{RunError, Runner};

use crate::config::TranspileConfig;

pub const TEST_SUFFIX: &str = ".test.pyml";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected generated Python (trimmed comparison).
    #[serde(default)]
    pub expect_transpiled: Option<String>,

    /// Expected stdout of the generated program (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Arguments passed to the generated program.
    #[serde(default)]
    pub args: Vec<String>,

    /// Expected warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,

    /// Stage overrides on top of the command-line options.
    #[serde(default)]
    pub transpile: TranspileConfig,
}

/// Split a `.test.pyml` file into its TOML front matter and PyML source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    /// Passed what could be checked; the rest needs something unavailable here.
    Skip(String),
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

/// What every test in a run shares.
pub struct Harness<'a> {
    pub options: &'a Options,
    pub runner: &'a Runner,
}

fn run_single_test(path: &Path, harness: &Harness<'_>) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let mut options = harness.options.clone();
    config.transpile.apply(&mut options);
    let result = Transpiler::new(options).transpile(source, 0);

    if let Some(expected) = &config.expect_transpiled {
        let actual = result.code.trim();
        let expected = expected.trim();
        if actual != expected {
            return fail(
                description,
                format!(
                    "transpiled code mismatch\n  expected:\n{}\n  actual:\n{}",
                    indent(expected),
                    indent(actual)
                ),
            );
        }
    }

    if let Some(expected) = &config.expect_warnings {
        let warnings: Vec<&Diagnostic> = result.warnings().collect();
        if let Some(reason) = check_warnings(source, &warnings, expected) {
            return fail(description, reason);
        }
    }

    if let Some(expected) = &config.expect_output {
        let mut runner = harness.runner.clone();
        runner.script_args = config.args.clone();
        runner.place_beside(path);
        let stem = path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(TEST_SUFFIX))
            .unwrap_or("test");

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        match runner.run(&result.code, stem, &mut stdout, &mut stderr) {
            Err(RunError::InterpreterNotFound(name)) => {
                return TestResult {
                    path: path.to_path_buf(),
                    description,
                    outcome: TestOutcome::Skip(format!("{} not available; output not checked", name)),
                };
            }
            Err(e) => return fail(description, format!("run failed: {}", e)),
            Ok(outcome) if outcome.exit_code != 0 => {
                return fail(
                    description,
                    format!(
                        "program exited with {}\n{}",
                        outcome.exit_code,
                        String::from_utf8_lossy(&stderr).trim_end()
                    ),
                );
            }
            Ok(_) => {}
        }

        let actual = String::from_utf8_lossy(&stdout);
        let actual = actual.trim();
        let expected = expected.trim();
        if actual != expected {
            return fail(
                description,
                format!("output mismatch\n  expected: {}\n  actual:   {}", expected, actual),
            );
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    warnings: &[&Diagnostic],
    expected: &[ExpectedWarning],
) -> Option<String> {
    if warnings.len() != expected.len() {
        let actual_msgs: Vec<String> = warnings
            .iter()
            .map(|w| format!("  - {}", w.message))
            .collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }

        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover test files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(TEST_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

#[derive(Default)]
struct Tally {
    passed: usize,
    skipped: usize,
    failures: Vec<TestResult>,
}

impl Tally {
    fn record(&mut self, result: TestResult, label: &str, no_color: bool) {
        match &result.outcome {
            TestOutcome::Pass => {
                self.passed += 1;
                eprintln!("  {}  {}", paint("PASS", "32", no_color), label);
            }
            TestOutcome::Skip(reason) => {
                self.skipped += 1;
                eprintln!("  {}  {} ({})", paint("SKIP", "33", no_color), label, reason);
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", paint("FAIL", "31", no_color), label);
                self.failures.push(result);
            }
        }
    }

    /// Print failure details and the summary line; returns the exit code.
    fn finish(self, no_color: bool) -> i32 {
        if !self.failures.is_empty() {
            eprintln!();
            eprintln!("failures:");
            for f in &self.failures {
                eprintln!();
                eprintln!("  --- {} ---", f.path.display());
                if let TestOutcome::Fail(reason) = &f.outcome {
                    for line in reason.lines() {
                        eprintln!("  {}", line);
                    }
                }
            }
        }

        let failed = self.failures.len();
        eprintln!();
        if failed == 0 {
            eprintln!(
                "test result: {}. {} passed, 0 failed, {} skipped",
                paint("ok", "32", no_color),
                self.passed,
                self.skipped
            );
            0
        } else {
            eprintln!(
                "test result: {}. {} passed, {} failed, {} skipped (of {})",
                paint("FAILED", "31", no_color),
                self.passed,
                failed,
                self.skipped,
                self.passed + failed + self.skipped
            );
            1
        }
    }
}

fn label_for(result: &TestResult) -> String {
    result.description.clone().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_end_matches(TEST_SUFFIX).to_string())
            .unwrap_or_else(|| "?".to_string())
    })
}

/// Run all test files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, harness: &Harness<'_>, no_color: bool, categories: &[String]) -> i32 {
    let mut tally = Tally::default();

    if path.is_file() {
        let result = run_single_test(path, harness);
        let label = label_for(&result);
        tally.record(result, &label, no_color);
        return tally.finish(no_color);
    }

    let all_categories = discover_categorized(path);
    if all_categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return 1;
    }

    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let mut found = false;
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&format!("{}/", req)) {
                    filtered.insert(cat.as_str(), files);
                    found = true;
                }
            }
            if !found {
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    all_categories
                        .keys()
                        .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    for (cat, files) in &run_categories {
        let header = if cat.is_empty() { "(root)" } else { *cat };
        eprintln!();
        eprintln!("{}", paint(header, "1", no_color));

        for file in *files {
            let result = run_single_test(file, harness);
            let label = label_for(&result);
            tally.record(result, &label, no_color);
        }
    }

    tally.finish(no_color)
}
