//! Score ("persistence") bookkeeping.

use crate::config::GameConfig;

/// Persistence drains a little every frame and takes a hit on every wall
/// collision. The run is lost when it reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    value: f64,
    penalty: f64,
    collision_penalty: f64,
    goal_reward: f64,
}

impl Score {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            value: config.initial_score,
            penalty: config.score_penalty,
            collision_penalty: config.collision_penalty,
            goal_reward: config.goal_reward,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Per-frame drain, halved while the player stands in a box.
    pub fn tick(&mut self, inside_box: bool) {
        let factor = if inside_box { 0.5 } else { 1.0 };
        self.value -= self.penalty * factor;
    }

    /// Collisions cost more the more of them there have been.
    pub fn collide(&mut self, collision_count: u32) {
        self.value -= self.collision_penalty * f64::from(collision_count);
    }

    /// Changes what the next [`Score::reach_goal`] pays.
    pub fn set_goal_reward(&mut self, reward: f64) {
        self.goal_reward = reward;
    }

    pub fn reach_goal(&mut self) {
        self.value += self.goal_reward;
    }

    pub fn is_depleted(&self) -> bool {
        self.value <= 0.0
    }

    pub fn text(&self) -> String {
        format!("Persistence: {:03}", self.value.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drain_and_collisions() {
        let mut score = Score::new(&GameConfig::default());
        score.tick(false);
        score.tick(true);
        assert!((score.value() - (200.0 - 0.05 - 0.025)).abs() < 1e-9);

        score.collide(1);
        score.collide(2);
        assert!((score.value() - (200.0 - 0.075 - 6.0)).abs() < 1e-9);
        assert_eq!(score.text(), "Persistence: 193");
    }

    #[test]
    fn test_depletion() {
        let config = GameConfig {
            initial_score: 3.0,
            ..GameConfig::default()
        };
        let mut score = Score::new(&config);
        assert!(!score.is_depleted());
        score.collide(2);
        assert!(score.is_depleted());
        assert_eq!(score.text(), "Persistence: 000");
        score.reach_goal();
        assert!(!score.is_depleted());
    }

    #[test]
    fn test_goal_reward_can_change_between_levels() {
        let mut score = Score::new(&GameConfig::default());
        score.reach_goal();
        assert_eq!(score.value(), 400.0);
        score.set_goal_reward(50.0);
        score.reach_goal();
        assert_eq!(score.value(), 450.0);
    }
}
