//! Remote leaderboard contract
//!
//! Wire types match the leaderboard service JSON exactly. `Leaderboard` holds
//! the ranking rules (validation, stable ordering, top 100) so the same code
//! backs the in-process service used by the native driver and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::{BestStore, record_best};
use crate::sim::RunSummary;

/// Entries kept by the service
pub const MAX_SCORES: usize = 100;
pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 20;
/// Anti-cheat ceiling per level reached
pub const MAX_SCORE_PER_LEVEL: i64 = 10_000;
pub const DEFAULT_FETCH_LIMIT: u32 = 20;

const FORBIDDEN_NAME_CHARS: [char; 4] = ['<', '>', '"', '\''];

/// Why a submission was rejected. Checked before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("invalid name")]
    InvalidName,

    #[error("invalid score data")]
    InvalidScore,

    /// Score above `level * 10000`
    #[error("score {score} too high for level {level}")]
    ScoreTooHigh { score: i64, level: i64 },
}

/// Failure reaching the leaderboard service
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("leaderboard unreachable: {0}")]
    Unreachable(String),

    #[error("malformed leaderboard payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// `{"action":"submit","name":s,"score":n,"level":n,"dust":n}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub action: String,
    pub name: String,
    pub score: i64,
    pub level: i64,
    pub dust: i64,
}

impl SubmitRequest {
    pub const ACTION: &'static str = "submit";

    pub fn new(name: &str, score: i64, level: i64, dust: i64) -> Self {
        Self {
            action: Self::ACTION.to_string(),
            name: name.trim().to_string(),
            score,
            level,
            dust,
        }
    }

    pub fn from_summary(name: &str, summary: &RunSummary) -> Self {
        let clamp = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
        Self::new(
            name,
            clamp(summary.score),
            i64::from(summary.level),
            clamp(summary.dust),
        )
    }

    /// Check the submission without touching any board
    pub fn validate(&self) -> Result<(), SubmissionError> {
        validate_name(&self.name)?;
        if self.score < 0 || self.level < 1 || self.dust < 0 {
            return Err(SubmissionError::InvalidScore);
        }
        if self.score > self.level.saturating_mul(MAX_SCORE_PER_LEVEL) {
            return Err(SubmissionError::ScoreTooHigh {
                score: self.score,
                level: self.level,
            });
        }
        Ok(())
    }
}

/// Trimmed name, 2..=20 characters, none of `< > " '`
pub fn validate_name(name: &str) -> Result<&str, SubmissionError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(SubmissionError::InvalidName);
    }
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(SubmissionError::InvalidName);
    }
    Ok(name)
}

/// `{"success":true,"rank":i}` or `{"success":false,"error":s}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    pub fn ranked(rank: u32) -> Self {
        Self {
            success: true,
            rank: Some(rank),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            rank: None,
            error: Some(error.into()),
        }
    }
}

/// Query `action=get&limit=N`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub limit: u32,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FETCH_LIMIT,
        }
    }
}

impl FetchRequest {
    pub fn new(limit: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_SCORES as i64) as u32,
        }
    }

    pub fn to_query(&self) -> String {
        format!("action=get&limit={}", self.limit)
    }

    /// Parse a query string. A missing limit means the default; an
    /// unparsable one reads as 0 and is clamped up to 1.
    pub fn parse_query(query: &str) -> Self {
        let limit = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "limit")
            .map(|(_, value)| value.trim().parse::<i64>().unwrap_or(0));

        match limit {
            Some(limit) => Self::new(limit),
            None => Self::default(),
        }
    }
}

/// Public leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
    pub level: i64,
    pub dust: i64,
    /// Unix seconds
    pub timestamp: u64,
}

/// `{"success":true,"scores":[...],"count":i}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    pub scores: Vec<ScoreEntry>,
    pub count: usize,
}

/// Ranked score table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate and insert. Returns the 1-based rank, or 0 when the entry
    /// did not make the top 100.
    pub fn submit(&mut self, request: &SubmitRequest, timestamp: u64) -> Result<u32, SubmissionError> {
        request.validate()?;
        let name = validate_name(&request.name)?.to_string();

        // Ties keep submission order: insert after every equal score
        let index = self
            .entries
            .iter()
            .position(|e| e.score < request.score)
            .unwrap_or(self.entries.len());

        self.entries.insert(
            index,
            ScoreEntry {
                name,
                score: request.score,
                level: request.level,
                dust: request.dust,
                timestamp,
            },
        );
        self.entries.truncate(MAX_SCORES);

        if index < MAX_SCORES {
            Ok(index as u32 + 1)
        } else {
            Ok(0)
        }
    }

    /// Top `limit` entries in rank order
    pub fn top(&self, request: FetchRequest) -> &[ScoreEntry] {
        let limit = (request.limit as usize).clamp(1, MAX_SCORES);
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn handle_submit(&mut self, request: &SubmitRequest, timestamp: u64) -> SubmitResponse {
        if request.action != SubmitRequest::ACTION {
            return SubmitResponse::failed("unknown action");
        }
        match self.submit(request, timestamp) {
            Ok(rank) => SubmitResponse::ranked(rank),
            Err(err) => SubmitResponse::failed(err.to_string()),
        }
    }

    pub fn handle_fetch(&self, request: FetchRequest) -> FetchResponse {
        let scores = self.top(request).to_vec();
        FetchResponse {
            success: true,
            count: scores.len(),
            scores,
        }
    }
}

/// Transport to a leaderboard service
pub trait LeaderboardClient {
    fn submit(&mut self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError>;
    fn fetch(&mut self, request: FetchRequest) -> Result<FetchResponse, TransportError>;
}

/// Leaderboard served in-process; requests still cross the JSON wire format
#[derive(Debug, Default)]
pub struct InProcessClient {
    pub board: Leaderboard,
    /// Timestamp for the next submission
    pub clock: u64,
}

impl InProcessClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardClient for InProcessClient {
    fn submit(&mut self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
        let body = serde_json::to_string(request)?;
        let received: SubmitRequest = serde_json::from_str(&body)?;
        self.clock += 1;
        let response = self.board.handle_submit(&received, self.clock);
        Ok(serde_json::from_str(&serde_json::to_string(&response)?)?)
    }

    fn fetch(&mut self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let received = FetchRequest::parse_query(&request.to_query());
        let response = self.board.handle_fetch(received);
        Ok(serde_json::from_str(&serde_json::to_string(&response)?)?)
    }
}

/// Result of handing a finished run to the scoring collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub personal_best: bool,
    /// Leaderboard rank; `None` when the service could not be reached or
    /// refused the entry
    pub rank: Option<u32>,
}

/// Validate, record the local best, then submit. Transport failures fall
/// back to local-only tracking.
pub fn submit_run(
    client: &mut dyn LeaderboardClient,
    store: &mut dyn BestStore,
    name: &str,
    summary: &RunSummary,
) -> Result<SubmitOutcome, SubmissionError> {
    let request = SubmitRequest::from_summary(name, summary);
    request.validate()?;

    let personal_best = record_best(store, summary);

    let rank = match client.submit(&request) {
        Ok(SubmitResponse {
            success: true,
            rank,
            ..
        }) => rank,
        Ok(response) => {
            log::warn!(
                "Leaderboard refused submission: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
            None
        }
        Err(err) => {
            log::warn!("Leaderboard unavailable, keeping local best only: {}", err);
            None
        }
    };

    Ok(SubmitOutcome {
        personal_best,
        rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryBestStore, load_best};
    use proptest::prelude::*;

    struct OfflineClient;

    impl LeaderboardClient for OfflineClient {
        fn submit(&mut self, _: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
            Err(TransportError::Unreachable("offline".into()))
        }

        fn fetch(&mut self, _: FetchRequest) -> Result<FetchResponse, TransportError> {
            Err(TransportError::Unreachable("offline".into()))
        }
    }

    #[test]
    fn test_anti_cheat_bound() {
        let too_high = SubmitRequest::new("Nova", 20000, 1, 0);
        assert_eq!(
            too_high.validate(),
            Err(SubmissionError::ScoreTooHigh {
                score: 20000,
                level: 1
            })
        );
        assert_eq!(SubmitRequest::new("Nova", 9000, 1, 0).validate(), Ok(()));
        assert_eq!(SubmitRequest::new("Nova", 10000, 1, 0).validate(), Ok(()));
    }

    #[test]
    fn test_score_fields() {
        assert_eq!(
            SubmitRequest::new("Nova", -1, 1, 0).validate(),
            Err(SubmissionError::InvalidScore)
        );
        assert_eq!(
            SubmitRequest::new("Nova", 0, 0, 0).validate(),
            Err(SubmissionError::InvalidScore)
        );
        assert_eq!(
            SubmitRequest::new("Nova", 0, 1, -5).validate(),
            Err(SubmissionError::InvalidScore)
        );
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("  Ada  "), Ok("Ada"));
        assert!(validate_name("A").is_err());
        assert!(validate_name("   A   ").is_err());
        assert!(validate_name("abcdefghijklmnopqrstu").is_err());
        assert!(validate_name("abcdefghijklmnopqrst").is_ok());
        // Counted in characters, not bytes
        assert!(validate_name("ééééééééééééééé").is_ok());
        for bad in ["<b>", "Ada>", "say \"hi\"", "O'Neil"] {
            assert_eq!(validate_name(bad), Err(SubmissionError::InvalidName));
        }
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut board = Leaderboard::new();
        assert_eq!(board.submit(&SubmitRequest::new("first", 500, 1, 0), 1), Ok(1));
        assert_eq!(board.submit(&SubmitRequest::new("second", 500, 1, 0), 2), Ok(2));
        assert_eq!(board.submit(&SubmitRequest::new("top", 900, 1, 0), 3), Ok(1));
        let names: Vec<&str> = board
            .top(FetchRequest::new(10))
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["top", "first", "second"]);
    }

    #[test]
    fn test_board_keeps_top_hundred() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_SCORES as i64 {
            board.submit(&SubmitRequest::new("pilot", 1000 + i, 1, 0), 0).unwrap();
        }
        assert_eq!(board.submit(&SubmitRequest::new("late", 5, 1, 0), 0), Ok(0));
        assert_eq!(board.len(), MAX_SCORES);
        assert_eq!(board.submit(&SubmitRequest::new("ace", 5000, 1, 0), 0), Ok(1));
        assert_eq!(board.len(), MAX_SCORES);
    }

    #[test]
    fn test_rejected_submission_changes_nothing() {
        let mut board = Leaderboard::new();
        let response = board.handle_submit(&SubmitRequest::new("x", 100, 1, 0), 1);
        assert_eq!(response, SubmitResponse::failed("invalid name"));
        assert!(board.is_empty());
    }

    #[test]
    fn test_fetch_limit_clamped() {
        assert_eq!(FetchRequest::parse_query("action=get").limit, 20);
        assert_eq!(FetchRequest::parse_query("action=get&limit=0").limit, 1);
        assert_eq!(FetchRequest::parse_query("action=get&limit=500").limit, 100);
        assert_eq!(FetchRequest::parse_query("?action=get&limit=abc").limit, 1);
        assert_eq!(FetchRequest::new(35).to_query(), "action=get&limit=35");
    }

    #[test]
    fn test_wire_format() {
        let request = SubmitRequest::new(" Ada ", 9000, 2, 14);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"action":"submit","name":"Ada","score":9000,"level":2,"dust":14}"#
        );
        assert_eq!(
            serde_json::to_string(&SubmitResponse::ranked(3)).unwrap(),
            r#"{"success":true,"rank":3}"#
        );
        assert_eq!(
            serde_json::to_string(&SubmitResponse::failed("invalid name")).unwrap(),
            r#"{"success":false,"error":"invalid name"}"#
        );

        let mut board = Leaderboard::new();
        board.submit(&request, 1_700_000_000).unwrap();
        assert_eq!(
            serde_json::to_string(&board.handle_fetch(FetchRequest::default())).unwrap(),
            r#"{"success":true,"scores":[{"name":"Ada","score":9000,"level":2,"dust":14,"timestamp":1700000000}],"count":1}"#
        );
    }

    #[test]
    fn test_submit_run_ranks_and_records_best() {
        let mut client = InProcessClient::new();
        let mut store = MemoryBestStore::new();
        let summary = RunSummary {
            score: 4200,
            level: 3,
            dust: 40,
        };
        let outcome = submit_run(&mut client, &mut store, "Vega", &summary).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome {
                personal_best: true,
                rank: Some(1)
            }
        );
        let fetched = client.fetch(FetchRequest::default()).unwrap();
        assert_eq!(fetched.count, 1);
        assert_eq!(fetched.scores[0].name, "Vega");
    }

    #[test]
    fn test_submit_run_offline_keeps_local_best() {
        let mut store = MemoryBestStore::new();
        let summary = RunSummary {
            score: 800,
            level: 1,
            dust: 4,
        };
        let outcome = submit_run(&mut OfflineClient, &mut store, "Vega", &summary).unwrap();
        assert!(outcome.personal_best);
        assert_eq!(outcome.rank, None);
        assert_eq!(load_best(&store).score, 800);
    }

    #[test]
    fn test_submit_run_validates_first() {
        let mut client = InProcessClient::new();
        let mut store = MemoryBestStore::new();
        let summary = RunSummary {
            score: 20000,
            level: 1,
            dust: 0,
        };
        assert!(submit_run(&mut client, &mut store, "Vega", &summary).is_err());
        assert_eq!(load_best(&store).score, 0);
        assert!(client.board.is_empty());
    }

    proptest! {
        #[test]
        fn prop_anti_cheat_bound(level in 1i64..500, score in 0i64..10_000_000) {
            let request = SubmitRequest::new("pilot", score, level, 0);
            prop_assert_eq!(request.validate().is_ok(), score <= level * MAX_SCORE_PER_LEVEL);
        }

        #[test]
        fn prop_ranks_are_in_range(scores in prop::collection::vec(0i64..10_000, 1..150)) {
            let mut board = Leaderboard::new();
            for score in scores {
                let rank = board.submit(&SubmitRequest::new("pilot", score, 1, 0), 0).unwrap();
                prop_assert!(rank as usize <= MAX_SCORES);
                prop_assert!(board.len() <= MAX_SCORES);
            }
            let top = board.top(FetchRequest::new(100));
            prop_assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
