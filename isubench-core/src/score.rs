//! Weighted score tags and the run-wide score board

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// One scored step of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreTag {
    Login,
    Home,
    ListPresent,
    ReceivePresent,
    Reward,
    ListGacha,
    DrawGacha,
    CreateUser,
    ListItem,
    AddExpToCard,
    SetDeck,
    LoginBan,
}

impl ScoreTag {
    pub const ALL: [ScoreTag; 12] = [
        ScoreTag::Login,
        ScoreTag::Home,
        ScoreTag::ListPresent,
        ScoreTag::ReceivePresent,
        ScoreTag::Reward,
        ScoreTag::ListGacha,
        ScoreTag::DrawGacha,
        ScoreTag::CreateUser,
        ScoreTag::ListItem,
        ScoreTag::AddExpToCard,
        ScoreTag::SetDeck,
        ScoreTag::LoginBan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTag::Login => "POST /login",
            ScoreTag::Home => "GET /user/:userId/home",
            ScoreTag::ListPresent => "GET /user/:userId/present/index/:n",
            ScoreTag::ReceivePresent => "POST /user/:userId/present/receive",
            ScoreTag::Reward => "POST /user/:userId/reward",
            ScoreTag::ListGacha => "GET /user/:userId/gacha/index",
            ScoreTag::DrawGacha => "POST /user/:userId/gacha/draw/:gachaId",
            ScoreTag::CreateUser => "POST /user",
            ScoreTag::ListItem => "GET /user/:userId/item",
            ScoreTag::AddExpToCard => "POST /user/:userId/card/addexp/:cardId",
            ScoreTag::SetDeck => "POST /user/:userId/card",
            ScoreTag::LoginBan => "POST /login(ban)",
        }
    }

    pub fn weight(&self) -> i64 {
        match self {
            ScoreTag::Login => 3,
            ScoreTag::Home => 1,
            ScoreTag::ListPresent => 3,
            ScoreTag::ReceivePresent => 2,
            ScoreTag::Reward => 1,
            ScoreTag::ListGacha => 1,
            ScoreTag::DrawGacha => 2,
            ScoreTag::CreateUser => 3,
            ScoreTag::ListItem => 1,
            ScoreTag::AddExpToCard => 1,
            ScoreTag::SetDeck => 1,
            ScoreTag::LoginBan => 1,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Per-tag line of the breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: &'static str,
    pub weight: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub total: i64,
    pub addition: i64,
    pub deduction: i64,
    pub breakdown: Vec<TagCount>,
}

/// Lock-free tally of scored steps; adds after `close` are dropped
#[derive(Debug, Default)]
pub struct ScoreBoard {
    counts: [AtomicU64; 12],
    closed: AtomicBool,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, tag: ScoreTag) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        self.counts[tag.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn count(&self, tag: ScoreTag) -> u64 {
        self.counts[tag.index()].load(Ordering::Relaxed)
    }

    /// Every tag with its weight and count, zero-count tags included
    pub fn breakdown(&self) -> Vec<TagCount> {
        ScoreTag::ALL
            .iter()
            .map(|tag| TagCount {
                tag: tag.as_str(),
                weight: tag.weight(),
                count: self.count(*tag),
            })
            .collect()
    }

    pub fn addition(&self) -> i64 {
        ScoreTag::ALL
            .iter()
            .map(|tag| tag.weight() * self.count(*tag) as i64)
            .sum()
    }

    /// Final numbers given the scenario error count and the flat per-error deduction
    pub fn summarize(&self, scenario_errors: u64, per_error: i64) -> ScoreSummary {
        let addition = self.addition();
        let deduction = scenario_errors as i64 * per_error;
        ScoreSummary {
            total: (addition - deduction).max(0),
            addition,
            deduction,
            breakdown: self.breakdown(),
        }
    }
}
