use crate::models::{BodyMeasurements, Sex};

/// Reference baselines for the circumference regressions
struct Baseline {
    height: f64,
    weight: f64,
    offset: f64,
    height_coef: f64,
    weight_coef: f64,
    bmi_coef: f64,
}

impl Baseline {
    #[inline]
    fn apply(&self, height: f64, weight: f64, bmi: f64) -> f64 {
        self.offset
            + (height - self.height) * self.height_coef
            + (weight - self.weight) * self.weight_coef
            + (bmi - REFERENCE_BMI) * self.bmi_coef
    }
}

const REFERENCE_BMI: f64 = 22.0;

const MALE_CHEST: Baseline = Baseline {
    height: 170.0,
    weight: 70.0,
    offset: 50.0,
    height_coef: 0.3,
    weight_coef: 0.4,
    bmi_coef: 2.0,
};
const MALE_WAIST: Baseline = Baseline {
    height: 170.0,
    weight: 70.0,
    offset: 42.0,
    height_coef: 0.2,
    weight_coef: 0.5,
    bmi_coef: 2.8,
};
const MALE_HIPS: Baseline = Baseline {
    height: 170.0,
    weight: 70.0,
    offset: 48.0,
    height_coef: 0.25,
    weight_coef: 0.45,
    bmi_coef: 1.6,
};

const FEMALE_CHEST: Baseline = Baseline {
    height: 160.0,
    weight: 60.0,
    offset: 45.0,
    height_coef: 0.3,
    weight_coef: 0.4,
    bmi_coef: 1.6,
};
const FEMALE_WAIST: Baseline = Baseline {
    height: 160.0,
    weight: 60.0,
    offset: 70.0,
    height_coef: 0.4,
    weight_coef: 0.8,
    bmi_coef: 3.2,
};
const FEMALE_HIPS: Baseline = Baseline {
    height: 160.0,
    weight: 60.0,
    offset: 50.0,
    height_coef: 0.25,
    weight_coef: 0.45,
    bmi_coef: 2.4,
};

const LEG_LENGTH_FACTOR: f64 = 0.52;
const ARM_LENGTH_FACTOR: f64 = 0.38;
const SHOULDER_FACTOR: f64 = 0.95;

/// Body mass index from height (cm) and weight (kg)
#[inline]
pub fn bmi(height_cm: u32, weight_kg: u32) -> f64 {
    let meters = height_cm as f64 / 100.0;
    weight_kg as f64 / (meters * meters)
}

#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Estimate circumferences, limb lengths and proportions
///
/// Pure and deterministic. Inputs are expected to be validated already;
/// a zero height yields non-finite values rather than an error.
pub fn compute_measurements(height: u32, weight: u32, sex: Sex) -> BodyMeasurements {
    let h = height as f64;
    let w = weight as f64;
    let bmi = bmi(height, weight);

    let (chest, waist, hips) = match sex {
        Sex::Male => (
            MALE_CHEST.apply(h, w, bmi),
            MALE_WAIST.apply(h, w, bmi),
            MALE_HIPS.apply(h, w, bmi),
        ),
        Sex::Female => (
            FEMALE_CHEST.apply(h, w, bmi),
            FEMALE_WAIST.apply(h, w, bmi),
            FEMALE_HIPS.apply(h, w, bmi),
        ),
    };

    let leg_length = h * LEG_LENGTH_FACTOR;
    let arm_length = h * ARM_LENGTH_FACTOR;
    let shoulder_width = chest * SHOULDER_FACTOR;

    let shoulder_hip_ratio = round_to(shoulder_width / hips, 2);
    let chest_waist_ratio = round_to(chest / waist, 2);
    let leg_length_ratio = round_to(leg_length / h, 2);

    // Placeholder render value for the mannequin, darker for higher BMI
    let silhouette_gray = ((100.0 + (bmi - REFERENCE_BMI) * 10.0) as i32).clamp(100, 180);

    BodyMeasurements {
        height,
        weight,
        sex,
        chest_circumference: round_to(chest, 1),
        waist_circumference: round_to(waist, 1),
        hip_circumference: round_to(hips, 1),
        shoulder_width: round_to(shoulder_width, 1),
        leg_length: round_to(leg_length, 1),
        arm_length: round_to(arm_length, 1),
        shoulder_hip_ratio: format!("{:.2}", shoulder_hip_ratio),
        chest_waist_ratio: format!("{:.2}", chest_waist_ratio),
        leg_length_ratio: format!("{:.2}", leg_length_ratio),
        silhouette_gray,
        bmi: round_to(bmi, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_male() {
        let m = compute_measurements(173, 70, Sex::Male);
        assert_eq!(m.bmi, 23.4);
        assert_eq!(m.chest_circumference, 53.7);
        assert_eq!(m.leg_length, 90.0);
        assert_eq!(m.arm_length, 65.7);
        assert_eq!(m.leg_length_ratio, "0.52");
    }

    #[test]
    fn test_silhouette_gray_is_clamped() {
        assert_eq!(compute_measurements(190, 50, Sex::Male).silhouette_gray, 100);
        assert_eq!(compute_measurements(150, 200, Sex::Female).silhouette_gray, 180);
    }

    #[test]
    fn test_ratios_render_two_decimals() {
        let m = compute_measurements(165, 55, Sex::Female);
        for ratio in [&m.shoulder_hip_ratio, &m.chest_waist_ratio, &m.leg_length_ratio] {
            let (_, decimals) = ratio.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2);
        }
    }

    #[test]
    fn test_monotonic_in_weight() {
        for sex in [Sex::Male, Sex::Female] {
            for height in (150..=200).step_by(10) {
                let mut previous = compute_measurements(height, 40, sex);
                for weight in 41..=200 {
                    let current = compute_measurements(height, weight, sex);
                    assert!(current.chest_circumference >= previous.chest_circumference);
                    assert!(current.waist_circumference >= previous.waist_circumference);
                    assert!(current.hip_circumference >= previous.hip_circumference);
                    previous = current;
                }
            }
        }
    }
}
