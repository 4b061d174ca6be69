pub mod fold;
pub mod interpolate;

use std::collections::HashMap;

pub use fold::{FoldError, fold, is_arithmetic};
pub use interpolate::{INTERPOLATION_THRESHOLD, interpolate};

/// Best-effort rewriting of value expressions.
///
/// Never fails: any rewrite that does not apply leaves the text unchanged.
/// Applying the optimizer to its own output is a no-op.
#[derive(Debug)]
pub struct Optimizer {
    constant_folding: bool,
    string_interpolation: bool,
    memo: HashMap<String, String>,
}

impl Optimizer {
    pub fn new(constant_folding: bool, string_interpolation: bool) -> Self {
        Optimizer {
            constant_folding,
            string_interpolation,
            memo: HashMap::new(),
        }
    }

    pub fn optimize(&mut self, expr: &str) -> String {
        let expr = expr.trim();
        if let Some(done) = self.memo.get(expr) {
            return done.clone();
        }
        let result = optimize_with(expr, self.constant_folding, self.string_interpolation);
        self.memo.insert(expr.to_string(), result.clone());
        result
    }
}

/// Optimize with every rewrite enabled.
pub fn optimize(expr: &str) -> String {
    optimize_with(expr.trim(), true, true)
}

fn optimize_with(expr: &str, constant_folding: bool, string_interpolation: bool) -> String {
    if constant_folding && is_arithmetic(expr) {
        match fold(expr) {
            Ok(folded) => {
                log::trace!("folded `{}` -> {}", expr, folded);
                return folded;
            }
            Err(e) => log::trace!("not folding `{}`: {}", expr, e),
        }
    }

    if string_interpolation && expr.contains('+') && expr.contains(['"', '\'']) {
        if let Some(rewritten) = interpolate(expr) {
            log::trace!("interpolated `{}` -> {}", expr, rewritten);
            return rewritten;
        }
    }

    expr.to_string()
}
