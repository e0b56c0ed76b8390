/// Statistics for the current process; nothing is written to disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetrics {
    pub high_score: u32,
    pub games_played: u32,
    /// Food eaten in the game in progress
    pub foods_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_start(&mut self) {
        self.foods_eaten = 0;
    }

    pub fn on_food_eaten(&mut self) {
        self.foods_eaten += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }
}
