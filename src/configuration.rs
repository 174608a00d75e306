use clap::ValueEnum;

/// What to do when a tick asks for the exact opposite of the current heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReversalPolicy {
    /// Take the requested direction anyway. With a body behind the head
    /// this runs into the neck and ends the game.
    #[default]
    Collide,
    /// Keep going in the current heading.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Seed for food and snake placement; a random one is drawn when unset.
    pub seed: Option<u64>,
    pub reversal: ReversalPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            seed: None,
            reversal: ReversalPolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reversal(mut self, reversal: ReversalPolicy) -> Self {
        self.reversal = reversal;
        self
    }
}
