use serde::Serialize;

/// How a section's weight is spread once N/A criteria are taken out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightRedistribution {
    pub total_weight: f64,
    pub na_weight: f64,
    pub applicable_weight: f64,
    /// Multiplier applied to every applicable weight. `1` with no N/A members, `0` when
    /// every member is N/A.
    pub factor: f64,
}

impl WeightRedistribution {
    /// Computes the adjustment from `(weight, applicable)` pairs.
    pub fn compute<I>(members: I) -> Self
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let mut total_weight = 0.0;
        let mut na_weight = 0.0;
        for (weight, applicable) in members {
            total_weight += weight;
            if !applicable {
                na_weight += weight;
            }
        }

        let applicable_weight = total_weight - na_weight;
        let factor = if na_weight <= 0.0 {
            1.0
        } else if applicable_weight > 0.0 {
            total_weight / applicable_weight
        } else {
            0.0
        };

        Self {
            total_weight,
            na_weight,
            applicable_weight,
            factor,
        }
    }

    /// True when every member is N/A and the section has nothing left to score.
    pub fn all_not_applicable(&self) -> bool {
        self.na_weight > 0.0 && self.applicable_weight <= 0.0
    }

    pub fn adjusted(&self, weight: f64) -> f64 {
        weight * self.factor
    }
}
