use std::fmt;

/// Display tier for a player's score. Client-side only; no account stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankTier {
    Trace,
    Vector,
    Node,
    Cipher,
    Archon,
    Root,
    Neo,
}

impl RankTier {
    pub const ALL: [RankTier; 7] = [
        RankTier::Trace,
        RankTier::Vector,
        RankTier::Node,
        RankTier::Cipher,
        RankTier::Archon,
        RankTier::Root,
        RankTier::Neo,
    ];

    pub const fn min_score(self) -> u64 {
        match self {
            RankTier::Trace => 0,
            RankTier::Vector => 100,
            RankTier::Node => 500,
            RankTier::Cipher => 1_500,
            RankTier::Archon => 4_000,
            RankTier::Root => 10_000,
            RankTier::Neo => 10_000_000,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RankTier::Trace => "TRACE",
            RankTier::Vector => "VECTOR",
            RankTier::Node => "NODE",
            RankTier::Cipher => "CIPHER",
            RankTier::Archon => "ARCHON",
            RankTier::Root => "ROOT",
            RankTier::Neo => "NEO",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Highest tier whose threshold `score` reaches.
pub fn rank_for_score(score: u64) -> RankTier {
    RankTier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| score >= tier.min_score())
        .unwrap_or(RankTier::Trace)
}
