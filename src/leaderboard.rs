pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// In-memory high-score table, best first.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Leaderboard {
    pub fn seeded() -> Self {
        Self {
            entries: vec![
                LeaderboardEntry::new("Mark S.", 2500),
                LeaderboardEntry::new("Helly R.", 2100),
                LeaderboardEntry::new("Irving B.", 1950),
                LeaderboardEntry::new("Dylan G.", 1800),
            ],
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `name` with `score`. Blank names are ignored. Ties keep earlier
    /// entries ahead, and only the best `LEADERBOARD_CAPACITY` survive.
    pub fn submit(&mut self, name: &str, score: u32) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.entries.push(LeaderboardEntry::new(name, score));
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
        true
    }
}
