use crate::models::Medal;
use crate::rules::Thresholds;

/// Step function from a percentile (lower is more exceptional) to a tier.
/// Each threshold is inclusive.
pub fn determine_medal(percentage: f64, thresholds: &Thresholds) -> Medal {
    if percentage <= thresholds.gold_threshold {
        Medal::Gold
    } else if percentage <= thresholds.silver_threshold {
        Medal::Silver
    } else if percentage <= thresholds.bronze_threshold {
        Medal::Bronze
    } else {
        Medal::NoMedal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_steps() {
        let thresholds = Thresholds::new(5.0, 10.0, 15.0);
        let cases = [
            (4.99, Medal::Gold),
            (5.0, Medal::Gold),
            (9.99, Medal::Silver),
            (10.0, Medal::Silver),
            (14.99, Medal::Bronze),
            (15.0, Medal::Bronze),
            (100.0, Medal::NoMedal),
            (0.0, Medal::Gold),
            (6.0, Medal::Silver),
            (11.0, Medal::Bronze),
            (20.0, Medal::NoMedal),
        ];
        for (percentage, expected) in cases {
            assert_eq!(determine_medal(percentage, &thresholds), expected, "{percentage}");
        }
    }

    #[test]
    fn just_past_a_boundary_drops_a_tier() {
        let thresholds = Thresholds::new(5.0, 10.0, 15.0);
        assert_eq!(determine_medal(5.01, &thresholds), Medal::Silver);
        assert_eq!(determine_medal(10.01, &thresholds), Medal::Bronze);
        assert_eq!(determine_medal(15.01, &thresholds), Medal::NoMedal);
    }
}
