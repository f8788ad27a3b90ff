use serde::Serialize;

use crate::matching::MatchError;

pub const TECHNICAL_WEIGHT: f64 = 0.45;
pub const EXPERIENCE_WEIGHT: f64 = 0.20;
pub const ACTIVITY_WEIGHT: f64 = 0.15;
pub const EDUCATION_WEIGHT: f64 = 0.10;
pub const SOFT_SKILLS_WEIGHT: f64 = 0.10;

pub const REQUIRED_TIER_WEIGHT: f64 = 0.7;
pub const PREFERRED_TIER_WEIGHT: f64 = 0.2;
pub const NICE_TO_HAVE_TIER_WEIGHT: f64 = 0.1;

const SUM_TOLERANCE: f64 = 1e-9;

/// The five component scores of one candidate, each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComponentScores {
    pub technical: f64,
    pub experience: f64,
    pub activity: f64,
    pub education: f64,
    pub soft_skills: f64,
}

/// Weights for combining component scores. Always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentWeights {
    technical: f64,
    experience: f64,
    activity: f64,
    education: f64,
    soft_skills: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            technical: TECHNICAL_WEIGHT,
            experience: EXPERIENCE_WEIGHT,
            activity: ACTIVITY_WEIGHT,
            education: EDUCATION_WEIGHT,
            soft_skills: SOFT_SKILLS_WEIGHT,
        }
    }
}

impl ComponentWeights {
    pub fn new(
        technical: f64,
        experience: f64,
        activity: f64,
        education: f64,
        soft_skills: f64,
    ) -> Result<Self, MatchError> {
        ensure_unit_sum(
            "component",
            &[
                ("technical", technical),
                ("experience", experience),
                ("activity", activity),
                ("education", education),
                ("soft_skills", soft_skills),
            ],
        )?;
        Ok(Self {
            technical,
            experience,
            activity,
            education,
            soft_skills,
        })
    }

    pub fn sum(&self) -> f64 {
        self.technical + self.experience + self.activity + self.education + self.soft_skills
    }

    /// Weighted sum of the components, clamped to 0–100.
    pub fn combine(&self, scores: &ComponentScores) -> f64 {
        (self.technical * scores.technical
            + self.experience * scores.experience
            + self.activity * scores.activity
            + self.education * scores.education
            + self.soft_skills * scores.soft_skills)
            .clamp(0.0, 100.0)
    }
}

/// Credit split across the required / preferred / nice-to-have tiers. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierWeights {
    required: f64,
    preferred: f64,
    nice_to_have: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            required: REQUIRED_TIER_WEIGHT,
            preferred: PREFERRED_TIER_WEIGHT,
            nice_to_have: NICE_TO_HAVE_TIER_WEIGHT,
        }
    }
}

impl TierWeights {
    pub fn new(required: f64, preferred: f64, nice_to_have: f64) -> Result<Self, MatchError> {
        ensure_unit_sum(
            "tier",
            &[
                ("required", required),
                ("preferred", preferred),
                ("nice_to_have", nice_to_have),
            ],
        )?;
        Ok(Self {
            required,
            preferred,
            nice_to_have,
        })
    }

    /// Most a candidate can earn with no required match: everything but the required share.
    pub fn required_miss_ceiling(&self) -> f64 {
        self.preferred + self.nice_to_have
    }

    /// Blends per-tier match fractions (each 0–1) into one 0–1 value.
    pub fn blend(&self, required: f64, preferred: f64, nice_to_have: f64) -> f64 {
        self.required * required + self.preferred * preferred + self.nice_to_have * nice_to_have
    }
}

/// Everything the scorer needs besides its two input records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoringConfig {
    pub components: ComponentWeights,
    pub tiers: TierWeights,
}

impl ScoringConfig {
    /// The shipped weights, run through the same validation as any custom set.
    pub fn checked() -> Result<Self, MatchError> {
        Ok(Self {
            components: ComponentWeights::new(
                TECHNICAL_WEIGHT,
                EXPERIENCE_WEIGHT,
                ACTIVITY_WEIGHT,
                EDUCATION_WEIGHT,
                SOFT_SKILLS_WEIGHT,
            )?,
            tiers: TierWeights::new(
                REQUIRED_TIER_WEIGHT,
                PREFERRED_TIER_WEIGHT,
                NICE_TO_HAVE_TIER_WEIGHT,
            )?,
        })
    }
}

fn ensure_unit_sum(label: &str, weights: &[(&str, f64)]) -> Result<(), MatchError> {
    for &(name, weight) in weights {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(MatchError::invalid(format!(
                "{label} weight '{name}' must be within 0.0–1.0, got {weight}"
            )));
        }
    }
    let sum: f64 = weights.iter().map(|&(_, w)| w).sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(MatchError::invalid(format!(
            "{label} weights must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scores() -> ComponentScores {
        ComponentScores {
            technical: 80.0,
            experience: 60.0,
            activity: 40.0,
            education: 50.0,
            soft_skills: 30.0,
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ComponentWeights::default().sum() - 1.0).abs() < 1e-12);
        let tiers = TierWeights::default();
        assert!((tiers.blend(1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_weights_pass_validation() {
        assert_eq!(ScoringConfig::checked().unwrap(), ScoringConfig::default());
    }

    #[test]
    fn test_combine_full() {
        let all = ComponentScores {
            technical: 100.0,
            experience: 100.0,
            activity: 100.0,
            education: 100.0,
            soft_skills: 100.0,
        };
        assert!((ComponentWeights::default().combine(&all) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_partial() {
        // 0.45*80 + 0.2*60 + 0.15*40 + 0.1*50 + 0.1*30 = 36 + 12 + 6 + 5 + 3 = 62
        let score = ComponentWeights::default().combine(&sample_scores());
        assert!((score - 62.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_raising_one_weight_moves_score_with_component_value() {
        let base = ComponentWeights::default();
        let scores = sample_scores();
        let before = base.combine(&scores);

        let delta = 0.05;
        let bumped = [
            ComponentWeights { technical: base.technical + delta, ..base },
            ComponentWeights { experience: base.experience + delta, ..base },
            ComponentWeights { activity: base.activity + delta, ..base },
            ComponentWeights { education: base.education + delta, ..base },
            ComponentWeights { soft_skills: base.soft_skills + delta, ..base },
        ];
        let values = [
            scores.technical,
            scores.experience,
            scores.activity,
            scores.education,
            scores.soft_skills,
        ];

        for (weights, value) in bumped.iter().zip(values) {
            let after = weights.combine(&scores);
            assert!(after > before);
            assert!((after - before - delta * value).abs() < 1e-9);
        }

        let zero_component = ComponentScores { activity: 0.0, ..scores };
        let unchanged = ComponentWeights { activity: base.activity + delta, ..base };
        assert!((unchanged.combine(&zero_component) - base.combine(&zero_component)).abs() < 1e-9);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        assert!(ComponentWeights::new(0.5, 0.2, 0.15, 0.1, 0.1).is_err());
        assert!(TierWeights::new(0.7, 0.2, 0.2).is_err());
    }

    #[test]
    fn test_weights_reject_out_of_range_values() {
        assert!(ComponentWeights::new(1.2, -0.2, 0.0, 0.0, 0.0).is_err());
        assert!(TierWeights::new(f64::NAN, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_required_miss_ceiling_is_thirty_percent() {
        assert!((TierWeights::default().required_miss_ceiling() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_combine_clamped() {
        let w = ComponentWeights::default();
        let over = ComponentScores {
            technical: 150.0,
            experience: 150.0,
            activity: 150.0,
            education: 150.0,
            soft_skills: 150.0,
        };
        assert_eq!(w.combine(&over), 100.0);
    }
}
