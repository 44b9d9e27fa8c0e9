//! Per-domain manager: algorithm/option flags, scratch space, and the
//! last-exception slot, mirroring the source library's `ap_manager_t`
//! minus the cross-domain function-pointer table (the managers here are
//! owned one per concrete domain, not shared through a vtable).

use crate::error::ExceptionKind;
use std::cell::RefCell;

/// Which algorithm an operation should run, mirroring the library's
/// per-function `algorithm` integer (e.g. polyhedra conversion strategy,
/// octagon closure variant). `0` always means "the library's default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Algorithm(pub i32);

/// How a widening with thresholds should be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WideningThresholdMode {
    #[default]
    Disabled,
    Enabled,
}

/// Option flags controlling numerical precision/performance tradeoffs,
/// analogous to `ap_manager_t`'s `option_t` array indexed by function.
#[derive(Debug, Clone)]
pub struct Options {
    pub exact: bool,
    pub algorithm: Algorithm,
    /// Cap on coefficient bit size for the exact backends; `0` means
    /// unbounded.
    pub max_coeff_size: u32,
    /// Target bit size hint when an operation approximates a coefficient
    /// rather than computing it exactly.
    pub approximate_max_coeff_size: u32,
    pub widening_threshold_mode: WideningThresholdMode,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            exact: false,
            algorithm: Algorithm::default(),
            max_coeff_size: 0,
            approximate_max_coeff_size: 0,
            widening_threshold_mode: WideningThresholdMode::default(),
        }
    }
}

/// One manager per domain instance. Cheap to construct; cloning shares
/// nothing — each clone gets its own scratch state and exception slot.
#[derive(Debug)]
pub struct Manager {
    name: &'static str,
    options: RefCell<Options>,
    last_exception: RefCell<Option<ExceptionKind>>,
    last_exception_op: RefCell<Option<&'static str>>,
}

impl Manager {
    pub fn new(name: &'static str) -> Self {
        Manager {
            name,
            options: RefCell::new(Options::default()),
            last_exception: RefCell::new(None),
            last_exception_op: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    pub fn set_options(&self, options: Options) {
        *self.options.borrow_mut() = options;
    }

    /// Record an exception raised by `op`, overwriting any previously
    /// recorded one — the source library keeps only the most recent
    /// exception per manager.
    pub fn record_exception(&self, op: &'static str, kind: ExceptionKind) {
        tracing::warn!(manager = self.name, operation = op, error = %kind, "operation raised an exception");
        *self.last_exception.borrow_mut() = Some(kind);
        *self.last_exception_op.borrow_mut() = Some(op);
    }

    pub fn clear_exceptions(&self) {
        *self.last_exception.borrow_mut() = None;
        *self.last_exception_op.borrow_mut() = None;
    }

    pub fn last_exception(&self) -> Option<ExceptionKind> {
        self.last_exception.borrow().clone()
    }

    /// Name of the operation that raised [`Manager::last_exception`], if any.
    pub fn last_exception_op(&self) -> Option<&'static str> {
        *self.last_exception_op.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_clears_exceptions() {
        let m = Manager::new("test");
        assert!(m.last_exception().is_none());
        m.record_exception("meet", ExceptionKind::InvalidArgument("bad dimension".into()));
        assert!(m.last_exception().is_some());
        assert_eq!(m.last_exception_op(), Some("meet"));
        m.clear_exceptions();
        assert!(m.last_exception().is_none());
        assert!(m.last_exception_op().is_none());
    }

    #[test]
    fn options_round_trip() {
        let m = Manager::new("test");
        let mut opts = m.options();
        opts.max_coeff_size = 64;
        m.set_options(opts);
        assert_eq!(m.options().max_coeff_size, 64);
    }
}
