//! Benchmark parameter labels.

use std::fmt;

use peakclus_core::VariateCount;

/// Parameters identifying one extraction benchmark.
#[derive(Clone, Copy, Debug)]
pub struct LatticeBenchParams {
    /// Nodes per lattice side.
    pub side: usize,
    /// Variate count selecting the resel formula.
    pub variates: VariateCount,
}

impl fmt::Display for LatticeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={}",
            self.side.saturating_mul(self.side),
            self.variates.get()
        )
    }
}
