use crate::sprite::Sprite;

#[derive(Clone, Debug)]
pub struct Pellet {
    value: u32,
    power_ticks: u32,
    sprite: Sprite,
}

impl Pellet {
    pub fn new(value: u32, sprite: Sprite) -> Self {
        Self {
            value,
            power_ticks: 0,
            sprite,
        }
    }

    /// A pellet that frightens the ghosts for `power_ticks` once eaten.
    pub fn power(value: u32, power_ticks: u32, sprite: Sprite) -> Self {
        Self {
            value,
            power_ticks,
            sprite,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn power_ticks(&self) -> u32 {
        self.power_ticks
    }

    pub fn is_power(&self) -> bool {
        self.power_ticks > 0
    }

    pub fn sprite(&self) -> Sprite {
        self.sprite
    }
}
