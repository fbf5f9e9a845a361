//! Pitch geometry relative to the acting team's attacking direction.

use crate::model::Location;
use crate::utils::config::PitchConfig;

/// Which goal line a team attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalEnd {
    /// Toward x = length
    High,
    /// Toward x = 0
    Low,
}

impl PitchConfig {
    /// Attacking end of a team; unknown teams attack the high end
    pub fn attacking_end(&self, team_id: Option<u64>) -> GoalEnd {
        match team_id {
            Some(id) if self.low_end_teams.contains(&id) => GoalEnd::Low,
            _ => GoalEnd::High,
        }
    }

    /// Centre of the goal mouth at one end
    pub fn goal_mouth(&self, end: GoalEnd) -> Location {
        let y = self.width / 2.0;
        match end {
            GoalEnd::High => Location::new(self.length, y),
            GoalEnd::Low => Location::new(0.0, y),
        }
    }

    /// Distance from a location to the goal a team attacks
    pub fn distance_to_goal(&self, location: Location, team_id: Option<u64>) -> f64 {
        location.distance_to(self.goal_mouth(self.attacking_end(team_id)))
    }

    /// Whether a location lies in the penalty box a team attacks (edges included)
    pub fn in_penalty_box(&self, location: Location, team_id: Option<u64>) -> bool {
        let (x_min, x_max) = match self.attacking_end(team_id) {
            GoalEnd::High => (self.length - self.penalty_box_depth, self.length),
            GoalEnd::Low => (0.0, self.penalty_box_depth),
        };

        (x_min..=x_max).contains(&location.x)
            && (self.penalty_box_y_min..=self.penalty_box_y_max).contains(&location.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_high_goal() {
        let pitch = PitchConfig::default();
        let d = pitch.distance_to_goal(Location::new(90.0, 0.0), Some(1));
        assert_eq!(d, 50.0);
    }

    #[test]
    fn test_low_end_team_mirrors() {
        let mut pitch = PitchConfig::default();
        pitch.low_end_teams.insert(2);

        assert_eq!(pitch.attacking_end(Some(2)), GoalEnd::Low);
        assert_eq!(pitch.distance_to_goal(Location::new(10.0, 40.0), Some(2)), 10.0);
        assert!(pitch.in_penalty_box(Location::new(5.0, 40.0), Some(2)));
        assert!(!pitch.in_penalty_box(Location::new(115.0, 40.0), Some(2)));
    }

    #[test]
    fn test_penalty_box_bounds() {
        let pitch = PitchConfig::default();
        assert!(pitch.in_penalty_box(Location::new(115.0, 40.0), None));
        assert!(pitch.in_penalty_box(Location::new(102.0, 18.0), None));
        assert!(!pitch.in_penalty_box(Location::new(60.0, 40.0), None));
        assert!(!pitch.in_penalty_box(Location::new(110.0, 70.0), None));
    }
}
