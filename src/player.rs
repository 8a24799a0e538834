use crate::sprite::DirectionalSprite;

#[derive(Clone, Debug)]
pub struct Player {
    score: u32,
    alive: bool,
    power_ticks: u32,
    sprite: DirectionalSprite,
}

impl Player {
    pub fn new(sprite: DirectionalSprite) -> Self {
        Self {
            score: 0,
            alive: true,
            power_ticks: 0,
            sprite,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Applies a signed score delta; the score never drops below zero.
    pub fn add_points(&mut self, delta: i32) {
        self.score = self.score.saturating_add_signed(delta);
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn is_powered(&self) -> bool {
        self.power_ticks > 0
    }

    pub fn power_ticks(&self) -> u32 {
        self.power_ticks
    }

    /// Power-ups stack with whatever is left of the current one.
    pub fn empower(&mut self, ticks: u32) {
        self.power_ticks = self.power_ticks.saturating_add(ticks);
    }

    pub fn tick_power(&mut self) {
        self.power_ticks = self.power_ticks.saturating_sub(1);
    }

    pub fn sprite(&self) -> &DirectionalSprite {
        &self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{SpriteStore, TerminalSprites};

    #[test]
    fn score_saturates_at_zero() {
        let mut player = Player::new(TerminalSprites.player_sprite());
        player.add_points(10);
        player.add_points(-25);
        assert_eq!(player.score(), 0);
        player.add_points(7);
        assert_eq!(player.score(), 7);
    }

    #[test]
    fn power_runs_down_one_tick_at_a_time() {
        let mut player = Player::new(TerminalSprites.player_sprite());
        player.empower(2);
        assert!(player.is_powered());
        player.tick_power();
        player.tick_power();
        assert!(!player.is_powered());
        player.tick_power();
        assert_eq!(player.power_ticks(), 0);
    }
}
