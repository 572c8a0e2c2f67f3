//! Threshold classification of smoothed metric values.

use crate::color::Rgba;
use crate::config::{AdviceSpec, Config, ThresholdSpec};
use crate::error::Result;
use crate::metric::{Metric, Tier};

/// The verdict for one smoothed metric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Severity tier.
    pub tier: Tier,
    /// Display color for the tier.
    pub color: Rgba,
    /// Advice text, absent for [`Tier::Good`].
    pub advice: Option<String>,
}

#[derive(Debug, Clone)]
struct Rule {
    threshold: ThresholdSpec,
    advice: AdviceSpec,
}

/// Maps smoothed values to tiers using per-metric cut points.
///
/// Built once from a [`Config`]; every metric is resolved up front so
/// classification itself cannot fail.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// One rule per metric, indexed by [`Metric::index`].
    rules: Vec<Rule>,
}

impl Classifier {
    /// Resolves the threshold and advice entry of every metric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfigKey`](crate::Error::MissingConfigKey) for
    /// the first metric without a threshold or advice entry.
    pub fn from_config(config: &Config) -> Result<Self> {
        let rules = Metric::ALL
            .into_iter()
            .map(|metric| {
                Ok(Rule {
                    threshold: config.threshold(metric)?,
                    advice: config.advice(metric)?.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Tier of a value: Good up to and including `good_max`, Warning up to
    /// and including `warn_max`, Poor above.
    #[must_use]
    pub fn tier(&self, metric: Metric, value: f32) -> Tier {
        let t = &self.rules[metric.index()].threshold;
        if value <= t.good_max {
            Tier::Good
        } else if value <= t.warn_max {
            Tier::Warning
        } else {
            Tier::Poor
        }
    }

    /// Tier, color and advice for a smoothed value.
    #[must_use]
    pub fn classify(&self, metric: Metric, value: f32) -> Classification {
        let tier = self.tier(metric, value);
        let advice = &self.rules[metric.index()].advice;
        let advice = match tier {
            Tier::Good => None,
            Tier::Warning => Some(advice.warn.clone()),
            Tier::Poor => Some(advice.poor.clone()),
        };

        Classification {
            tier,
            color: tier.color(),
            advice,
        }
    }

    /// Cut points in effect for a metric.
    #[must_use]
    pub fn threshold(&self, metric: Metric) -> ThresholdSpec {
        self.rules[metric.index()].threshold
    }
}
