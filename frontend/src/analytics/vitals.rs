use serde::{Deserialize, Serialize};

/// Web performance signals reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metric {
    /// Largest contentful paint, ms.
    Lcp,
    /// First input delay, ms.
    Fid,
    /// Cumulative layout shift, unitless.
    Cls,
    /// First contentful paint, ms.
    Fcp,
    /// Time to first byte, ms.
    Ttfb,
    /// Interaction to next paint, ms.
    Inp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs_improvement",
            Rating::Poor => "poor",
        }
    }
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Lcp => "LCP",
            Metric::Fid => "FID",
            Metric::Cls => "CLS",
            Metric::Fcp => "FCP",
            Metric::Ttfb => "TTFB",
            Metric::Inp => "INP",
        }
    }

    /// Upper bounds (exclusive) for `good` and `needs_improvement`.
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            Metric::Lcp => (2500.0, 4000.0),
            Metric::Fid => (100.0, 300.0),
            Metric::Cls => (0.1, 0.25),
            Metric::Fcp => (1800.0, 3000.0),
            Metric::Ttfb => (800.0, 1800.0),
            Metric::Inp => (200.0, 500.0),
        }
    }

    pub fn rate(&self, value: f64) -> Rating {
        let (good, needs_improvement) = self.thresholds();
        if value < good {
            Rating::Good
        } else if value < needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcp_boundaries() {
        assert_eq!(Metric::Lcp.rate(2499.0), Rating::Good);
        assert_eq!(Metric::Lcp.rate(2500.0), Rating::NeedsImprovement);
        assert_eq!(Metric::Lcp.rate(3999.9), Rating::NeedsImprovement);
        assert_eq!(Metric::Lcp.rate(4000.0), Rating::Poor);
    }

    #[test]
    fn thresholds_differ_per_metric() {
        assert_eq!(Metric::Fid.rate(150.0), Rating::NeedsImprovement);
        assert_eq!(Metric::Cls.rate(0.05), Rating::Good);
        assert_eq!(Metric::Cls.rate(0.3), Rating::Poor);
        assert_eq!(Metric::Ttfb.rate(900.0), Rating::NeedsImprovement);
        assert_eq!(Metric::Inp.rate(600.0).as_str(), "poor");
    }
}
