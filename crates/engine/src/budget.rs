//! Progress of a category's spend against its monthly budget.

use crate::Money;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BudgetProgress {
    pub spend: Money,
    pub limit: Option<Money>,
    /// `min(100, spend / limit * 100)`; `None` without a positive limit.
    pub percent: Option<f64>,
    pub over_budget: bool,
    /// `spend - limit` when over budget, zero otherwise.
    pub overage: Money,
}

impl BudgetProgress {
    /// A zero or absent limit means unlimited: only the raw spend is kept.
    #[must_use]
    pub fn new(spend: Money, limit: Option<Money>) -> Self {
        let Some(limit) = limit.filter(|limit| limit.is_positive()) else {
            return Self {
                spend,
                limit: None,
                percent: None,
                over_budget: false,
                overage: Money::ZERO,
            };
        };

        let percent = (spend.as_major_f64() / limit.as_major_f64() * 100.0).min(100.0);
        let over_budget = spend > limit;
        Self {
            spend,
            limit: Some(limit),
            percent: Some(percent),
            over_budget,
            overage: if over_budget { spend - limit } else { Money::ZERO },
        }
    }

    /// Percentage as a gauge value.
    #[must_use]
    pub fn percent_u16(&self) -> Option<u16> {
        self.percent.map(|p| p.clamp(0.0, 100.0).round() as u16)
    }

    /// Ratio in `[0, 1]`, for gauges and color thresholds.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.percent.map(|p| (p / 100.0).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_budget_is_clamped_and_reports_overage() {
        let progress =
            BudgetProgress::new(Money::from_major(600), Some(Money::from_major(500)));
        assert_eq!(progress.percent, Some(100.0));
        assert!(progress.over_budget);
        assert_eq!(progress.overage, Money::from_major(100));
    }

    #[test]
    fn zero_or_absent_limit_has_no_progress() {
        for limit in [Some(Money::ZERO), None] {
            let progress = BudgetProgress::new(Money::from_major(600), limit);
            assert_eq!(progress.percent, None);
            assert!(!progress.over_budget);
            assert_eq!(progress.overage, Money::ZERO);
            assert_eq!(progress.spend, Money::from_major(600));
        }
    }

    #[test]
    fn partial_spend() {
        let progress =
            BudgetProgress::new(Money::from_major(125), Some(Money::from_major(500)));
        assert_eq!(progress.percent, Some(25.0));
        assert_eq!(progress.percent_u16(), Some(25));
        assert!(!progress.over_budget);
    }

    #[test]
    fn spend_equal_to_limit_is_not_over() {
        let progress =
            BudgetProgress::new(Money::from_major(500), Some(Money::from_major(500)));
        assert_eq!(progress.percent, Some(100.0));
        assert!(!progress.over_budget);
        assert_eq!(progress.ratio(), Some(1.0));
    }
}
