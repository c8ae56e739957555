//! Relative quality tiers for ratios.
//!
//! Tiers are relative to the ratios currently displayed: the cheapest
//! visible item is always `Best` and the most expensive `Worst`, whatever
//! their absolute values.

use serde::{Deserialize, Serialize};

/// Relative quality bucket of a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// No ratio, or nothing to compare against
    None,
    Best,
    Good,
    Mid,
    Poor,
    Worst,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Best => "best",
            Self::Good => "good",
            Self::Mid => "mid",
            Self::Poor => "poor",
            Self::Worst => "worst",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `ratio` against the sibling ratios in `all`.
///
/// `all` may contain absent ratios; they are ignored. When every valid
/// ratio is equal the result is [`Tier::Mid`], since there is no spread
/// to rank against.
pub fn classify(ratio: Option<f64>, all: &[Option<f64>]) -> Tier {
    let Some(ratio) = ratio.filter(|r| r.is_finite()) else {
        return Tier::None;
    };

    let Some((min, max)) = spread(all) else {
        return Tier::None;
    };

    if min == max {
        return Tier::Mid;
    }

    let t = ((ratio - min) / (max - min)).clamp(0.0, 1.0);
    if t <= 0.2 {
        Tier::Best
    } else if t <= 0.4 {
        Tier::Good
    } else if t <= 0.6 {
        Tier::Mid
    } else if t <= 0.8 {
        Tier::Poor
    } else {
        Tier::Worst
    }
}

/// Classify every entry of a displayed column at once
pub fn classify_all(all: &[Option<f64>]) -> Vec<Tier> {
    all.iter().map(|r| classify(*r, all)).collect()
}

fn spread(all: &[Option<f64>]) -> Option<(f64, f64)> {
    all.iter()
        .flatten()
        .copied()
        .filter(|r| r.is_finite())
        .fold(None, |acc, r| match acc {
            None => Some((r, r)),
            Some((min, max)) => Some((min.min(r), max.max(r))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equal_is_mid() {
        let all = [Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(classify_all(&all), vec![Tier::Mid; 3]);
    }

    #[test]
    fn test_five_point_spread() {
        let all = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        assert_eq!(classify(Some(1.0), &all), Tier::Best);
        assert_eq!(classify(Some(2.0), &all), Tier::Good);
        assert_eq!(classify(Some(3.0), &all), Tier::Mid);
        assert_eq!(classify(Some(4.0), &all), Tier::Poor);
        assert_eq!(classify(Some(5.0), &all), Tier::Worst);
    }

    #[test]
    fn test_band_boundaries_are_inclusive() {
        let all = [Some(0.0), Some(10.0)];
        assert_eq!(classify(Some(2.0), &all), Tier::Best);
        assert_eq!(classify(Some(2.0001), &all), Tier::Good);
        assert_eq!(classify(Some(8.0), &all), Tier::Poor);
        assert_eq!(classify(Some(8.0001), &all), Tier::Worst);
    }

    #[test]
    fn test_none_inputs() {
        assert_eq!(classify(None, &[Some(1.0), Some(2.0)]), Tier::None);
        assert_eq!(classify(Some(1.0), &[None, None]), Tier::None);
        assert_eq!(classify(Some(1.0), &[]), Tier::None);
    }

    #[test]
    fn test_nulls_are_filtered_from_spread() {
        let all = [None, Some(1.0), None, Some(3.0)];
        assert_eq!(classify(Some(1.0), &all), Tier::Best);
        assert_eq!(classify(Some(3.0), &all), Tier::Worst);
        assert_eq!(classify_all(&all)[0], Tier::None);
    }

    #[test]
    fn test_spread_is_relative_to_displayed_set() {
        let wide = [Some(1.0), Some(3.0), Some(100.0)];
        let narrow = [Some(1.0), Some(3.0)];
        assert_eq!(classify(Some(3.0), &wide), Tier::Best);
        assert_eq!(classify(Some(3.0), &narrow), Tier::Worst);
    }
}
