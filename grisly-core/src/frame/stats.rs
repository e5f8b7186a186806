//! Per-pass statistics for waterfall joins.

use grisly_types::DataType;

/// What one waterfall pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassStats {
    /// Left key column used in this pass.
    pub key: String,
    /// Type of that key column.
    pub dtype: DataType,
    /// Left rows still unclaimed when the pass started.
    pub candidates: usize,
    /// Left rows claimed by this pass.
    pub matched: usize,
}

impl PassStats {
    /// Fraction of candidates claimed, `0.0` when there were none.
    pub fn hit_rate(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            self.matched as f64 / self.candidates as f64
        }
    }
}

/// Summary of a whole waterfall join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaterfallStats {
    /// Rows in the left table.
    pub left_rows: usize,
    /// One entry per `left_on` key, in pass order.
    pub passes: Vec<PassStats>,
}

impl WaterfallStats {
    /// Left rows claimed by any pass.
    pub fn matched(&self) -> usize {
        self.passes.iter().map(|p| p.matched).sum()
    }

    /// Left rows no pass claimed.
    pub fn unmatched(&self) -> usize {
        self.left_rows.saturating_sub(self.matched())
    }

    /// The pass that claimed the most rows, first one on ties.
    pub fn best_pass(&self) -> Option<&PassStats> {
        self.passes
            .iter()
            .rev()
            .max_by_key(|p| p.matched)
    }
}

impl core::fmt::Display for WaterfallStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} of {} left rows matched in {} passes",
            self.matched(),
            self.left_rows,
            self.passes.len()
        )?;

        for (i, pass) in self.passes.iter().enumerate() {
            write!(
                f,
                "; pass {} `{}`: {}/{} ({:.1}%)",
                i + 1,
                pass.key,
                pass.matched,
                pass.candidates,
                pass.hit_rate() * 100.0
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(key: &str, candidates: usize, matched: usize) -> PassStats {
        PassStats {
            key: key.to_string(),
            dtype: DataType::Int64,
            candidates,
            matched,
        }
    }

    #[test]
    fn totals() {
        let stats = WaterfallStats {
            left_rows: 10,
            passes: vec![pass("a", 10, 4), pass("b", 6, 3)],
        };
        assert_eq!(stats.matched(), 7);
        assert_eq!(stats.unmatched(), 3);
        assert_eq!(stats.best_pass().map(|p| p.key.as_str()), Some("a"));
    }

    #[test]
    fn best_pass_prefers_earliest_on_tie() {
        let stats = WaterfallStats {
            left_rows: 4,
            passes: vec![pass("a", 4, 2), pass("b", 2, 2)],
        };
        assert_eq!(stats.best_pass().map(|p| p.key.as_str()), Some("a"));
        assert!(WaterfallStats::default().best_pass().is_none());
    }

    #[test]
    fn hit_rate_handles_zero_candidates() {
        assert_eq!(pass("x", 0, 0).hit_rate(), 0.0);
        assert_eq!(pass("x", 4, 1).hit_rate(), 0.25);
    }

    #[test]
    fn display() {
        let stats = WaterfallStats {
            left_rows: 3,
            passes: vec![pass("a", 3, 2), pass("b", 1, 1)],
        };
        assert_eq!(
            stats.to_string(),
            "3 of 3 left rows matched in 2 passes; pass 1 `a`: 2/3 (66.7%); pass 2 `b`: 1/1 (100.0%)"
        );
    }
}
