//! Portfolio-level capacity limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of a limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitCheck {
    /// Entry allowed
    Allowed,
    /// Entry blocked with reason
    Blocked { reason: String },
}

impl LimitCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, LimitCheck::Allowed)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, LimitCheck::Blocked { .. })
    }
}

/// Position count limits.
///
/// A tick looks for new entries only if it starts with fewer than
/// `entry_gate` positions. Within that tick buys continue up to `hard_cap`,
/// which also bounds the portfolio after pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioLimits {
    /// Entries are considered only while holdings are below this
    pub entry_gate: usize,
    /// Maximum positions kept after a tick
    pub hard_cap: usize,
}

impl Default for PortfolioLimits {
    fn default() -> Self {
        Self {
            entry_gate: 5,
            hard_cap: 10,
        }
    }
}

impl PortfolioLimits {
    /// Check whether a tick starting with `held` positions may look for
    /// entries at all.
    pub fn check_entry_gate(&self, held: usize) -> LimitCheck {
        if held >= self.entry_gate {
            return LimitCheck::Blocked {
                reason: format!("Entry gate reached: {} held (gate: {})", held, self.entry_gate),
            };
        }
        LimitCheck::Allowed
    }

    /// Check whether one more position fits under the hard cap.
    pub fn check_capacity(&self, held: usize) -> LimitCheck {
        if held >= self.hard_cap {
            return LimitCheck::Blocked {
                reason: format!("Hard cap reached: {} held (cap: {})", held, self.hard_cap),
            };
        }
        LimitCheck::Allowed
    }

    /// Whether holdings exceed the hard cap.
    pub fn needs_prune(&self, held: usize) -> bool {
        held > self.hard_cap
    }

    /// Symbol with the lowest unrealized return. Ties go to the first seen.
    pub fn prune_candidate<'a, I>(&self, returns: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = (&'a str, Decimal)>,
    {
        let mut worst: Option<(&'a str, Decimal)> = None;
        for (symbol, ret) in returns {
            match worst {
                Some((_, current)) if ret >= current => {}
                _ => worst = Some((symbol, ret)),
            }
        }
        worst.map(|(symbol, _)| symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_gate() {
        let limits = PortfolioLimits::default();

        assert!(limits.check_entry_gate(0).is_allowed());
        assert!(limits.check_entry_gate(4).is_allowed());
        assert!(limits.check_entry_gate(5).is_blocked());
        assert!(limits.check_entry_gate(11).is_blocked());
    }

    #[test]
    fn test_capacity_is_independent_of_gate() {
        let limits = PortfolioLimits::default();

        assert!(limits.check_capacity(5).is_allowed());
        assert!(limits.check_capacity(9).is_allowed());
        match limits.check_capacity(10) {
            LimitCheck::Blocked { reason } => assert!(reason.contains("Hard cap")),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_needs_prune() {
        let limits = PortfolioLimits::default();

        assert!(!limits.needs_prune(10));
        assert!(limits.needs_prune(11));
    }

    #[test]
    fn test_prune_candidate_is_lowest_return() {
        let limits = PortfolioLimits::default();
        let returns = vec![
            ("KRW-A", dec!(0.05)),
            ("KRW-B", dec!(-0.03)),
            ("KRW-C", dec!(0.01)),
            ("KRW-D", dec!(-0.03)),
        ];

        assert_eq!(limits.prune_candidate(returns), Some("KRW-B"));
        assert_eq!(limits.prune_candidate(Vec::<(&str, Decimal)>::new()), None);
    }
}
