// the ratings service contract
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One item instance to look up.
///
/// `available_perks` disambiguates rolls of the same reference id; items with
/// a fixed roll leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub reference_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_perks: Option<Vec<u32>>,
}

impl FetchRequest {
    pub fn new(reference_id: u32) -> Self {
        Self {
            reference_id,
            available_perks: None,
        }
    }

    pub fn with_perks(reference_id: u32, perks: Vec<u32>) -> Self {
        Self {
            reference_id,
            available_perks: Some(perks),
        }
    }
}

/// Raw vote counts as reported by the service.
///
/// The service also sends `upvotes`, `score` and echo fields; only the two
/// counts below feed the local score. Missing counts decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub downvotes: u32,
}

impl VoteTally {
    pub fn new(total: u32, downvotes: u32) -> Self {
        Self { total, downvotes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub reference_id: u32,
    #[serde(default)]
    pub available_perks: Option<Vec<u32>>,
    #[serde(default)]
    pub votes: VoteTally,
    #[serde(default)]
    pub review_votes: VoteTally,
}

impl FetchResponse {
    pub fn new(reference_id: u32, votes: VoteTally, review_votes: VoteTally) -> Self {
        Self {
            reference_id,
            available_perks: None,
            votes,
            review_votes,
        }
    }
}

/// Membership platform the votes are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Platform {
    Xbox,
    Psn,
    Steam,
    Blizzard,
    Stadia,
}

impl Platform {
    /// Numeric membership type used in the query string
    pub fn wire_value(self) -> u8 {
        match self {
            Platform::Xbox => 1,
            Platform::Psn => 2,
            Platform::Steam => 3,
            Platform::Blizzard => 4,
            Platform::Stadia => 5,
        }
    }
}

/// Activity the votes were cast for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ActivityMode {
    #[value(name = "any")]
    NotSpecified,
    Raid,
    #[value(name = "pvp")]
    PlayerVersusPlayer,
    #[value(name = "pve")]
    PlayerVersusEnemy,
    IronBanner,
    Trials,
    Gambit,
}

impl ActivityMode {
    pub fn wire_value(self) -> u8 {
        match self {
            ActivityMode::NotSpecified => 0,
            ActivityMode::Raid => 4,
            ActivityMode::PlayerVersusPlayer => 5,
            ActivityMode::PlayerVersusEnemy => 7,
            ActivityMode::IronBanner => 19,
            ActivityMode::Trials => 39,
            ActivityMode::Gambit => 63,
        }
    }
}
