//! Event records: the raw decoded form and the strongly typed form.
//!
//! A raw event is whatever JSON object the feed produced. Once the validator
//! accepts it, it is decoded into an [`Event`] whose [`EventKind`] is a closed
//! set of variants, each carrying its own typed detail block.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Untyped event record as decoded from the input file
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent(pub serde_json::Value);

impl RawEvent {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for RawEvent {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Time since the start of a period, millisecond precision
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Parse a feed timestamp such as `00:47:12.345`
    pub fn parse(text: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f").ok()?;
        let millis = u64::from(time.num_seconds_from_midnight()) * 1000
            + u64::from(time.nanosecond() / 1_000_000);
        Some(Self(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0 / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60,
            self.0 % 1000
        )
    }
}

/// A point on the pitch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn from_coords(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y, ..] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }

    pub fn distance_to(&self, other: Location) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Reference to a team as it appears inside an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Reference to a player as it appears inside an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Closed set of event type tags known to the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    StartingXi,
    HalfStart,
    HalfEnd,
    Pass,
    BallReceipt,
    Carry,
    Pressure,
    Shot,
    GoalKeeper,
    Dribble,
    DribbledPast,
    Duel,
    Clearance,
    Interception,
    Block,
    BallRecovery,
    Dispossessed,
    Miscontrol,
    FoulCommitted,
    FoulWon,
    Substitution,
    TacticalShift,
    InjuryStoppage,
    RefereeBallDrop,
    PlayerOff,
    PlayerOn,
    Shield,
    FiftyFifty,
    Error,
    Offside,
    OwnGoalAgainst,
    OwnGoalFor,
    BadBehaviour,
    CameraOn,
    CameraOff,
}

impl EventType {
    pub const ALL: &'static [EventType] = &[
        EventType::StartingXi,
        EventType::HalfStart,
        EventType::HalfEnd,
        EventType::Pass,
        EventType::BallReceipt,
        EventType::Carry,
        EventType::Pressure,
        EventType::Shot,
        EventType::GoalKeeper,
        EventType::Dribble,
        EventType::DribbledPast,
        EventType::Duel,
        EventType::Clearance,
        EventType::Interception,
        EventType::Block,
        EventType::BallRecovery,
        EventType::Dispossessed,
        EventType::Miscontrol,
        EventType::FoulCommitted,
        EventType::FoulWon,
        EventType::Substitution,
        EventType::TacticalShift,
        EventType::InjuryStoppage,
        EventType::RefereeBallDrop,
        EventType::PlayerOff,
        EventType::PlayerOn,
        EventType::Shield,
        EventType::FiftyFifty,
        EventType::Error,
        EventType::Offside,
        EventType::OwnGoalAgainst,
        EventType::OwnGoalFor,
        EventType::BadBehaviour,
        EventType::CameraOn,
        EventType::CameraOff,
    ];

    /// Feed name of this type
    pub fn name(self) -> &'static str {
        match self {
            EventType::StartingXi => "Starting XI",
            EventType::HalfStart => "Half Start",
            EventType::HalfEnd => "Half End",
            EventType::Pass => "Pass",
            EventType::BallReceipt => "Ball Receipt*",
            EventType::Carry => "Carry",
            EventType::Pressure => "Pressure",
            EventType::Shot => "Shot",
            EventType::GoalKeeper => "Goal Keeper",
            EventType::Dribble => "Dribble",
            EventType::DribbledPast => "Dribbled Past",
            EventType::Duel => "Duel",
            EventType::Clearance => "Clearance",
            EventType::Interception => "Interception",
            EventType::Block => "Block",
            EventType::BallRecovery => "Ball Recovery",
            EventType::Dispossessed => "Dispossessed",
            EventType::Miscontrol => "Miscontrol",
            EventType::FoulCommitted => "Foul Committed",
            EventType::FoulWon => "Foul Won",
            EventType::Substitution => "Substitution",
            EventType::TacticalShift => "Tactical Shift",
            EventType::InjuryStoppage => "Injury Stoppage",
            EventType::RefereeBallDrop => "Referee Ball-Drop",
            EventType::PlayerOff => "Player Off",
            EventType::PlayerOn => "Player On",
            EventType::Shield => "Shield",
            EventType::FiftyFifty => "50/50",
            EventType::Error => "Error",
            EventType::Offside => "Offside",
            EventType::OwnGoalAgainst => "Own Goal Against",
            EventType::OwnGoalFor => "Own Goal For",
            EventType::BadBehaviour => "Bad Behaviour",
            EventType::CameraOn => "Camera On",
            EventType::CameraOff => "Camera off",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    /// Case-insensitive match against the feed names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unrecognized event type '{}'", s))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pass detail block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassDetail {
    pub recipient: Option<PlayerRef>,
    /// None means the pass was completed
    pub outcome: Option<String>,
    pub length: Option<f64>,
    pub end_location: Option<Location>,
}

/// Shot detail block
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDetail {
    pub outcome: String,
    pub technique: Option<String>,
    pub body_part: Option<String>,
    pub xg: Option<f64>,
    pub end_location: Option<Location>,
}

impl ShotDetail {
    pub fn is_goal(&self) -> bool {
        self.outcome.eq_ignore_ascii_case("goal")
    }
}

/// Foul detail block (often absent in the feed)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FoulDetail {
    pub foul_type: Option<String>,
    pub card: Option<String>,
}

/// Substitution detail block: the acting player goes off
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionDetail {
    pub replacement: PlayerRef,
    pub outcome: Option<String>,
}

/// Card shown outside of a foul
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardDetail {
    pub card: Option<String>,
}

/// Whether a card name removes the player from the match
pub fn is_sending_off(card: &str) -> bool {
    card.eq_ignore_ascii_case("red card") || card.eq_ignore_ascii_case("second yellow")
}

/// Typed event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Pass(PassDetail),
    Shot(ShotDetail),
    FoulCommitted(FoulDetail),
    Substitution(SubstitutionDetail),
    BadBehaviour(CardDetail),
    /// Known type without a detail block we read
    Other(EventType),
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Pass(_) => EventType::Pass,
            EventKind::Shot(_) => EventType::Shot,
            EventKind::FoulCommitted(_) => EventType::FoulCommitted,
            EventKind::Substitution(_) => EventType::Substitution,
            EventKind::BadBehaviour(_) => EventType::BadBehaviour,
            EventKind::Other(t) => *t,
        }
    }
}

/// A validated, strongly typed match event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub index: i64,
    pub period: u8,
    pub timestamp: Timestamp,
    pub minute: u32,
    pub second: u32,
    pub team: Option<TeamRef>,
    pub player: Option<PlayerRef>,
    pub location: Option<Location>,
    pub kind: EventKind,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.event_type().name()
    }

    pub fn team_id(&self) -> Option<u64> {
        self.team.as_ref().map(|t| t.id)
    }

    pub fn team_name(&self) -> &str {
        self.team
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn player_id(&self) -> Option<u64> {
        self.player.as_ref().map(|p| p.id)
    }

    pub fn player_name(&self) -> &str {
        self.player
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Ordering key for "time of occurrence": period, clock, then feed index
    pub fn occurrence_key(&self) -> (u8, Timestamp, i64) {
        (self.period, self.timestamp, self.index)
    }

    /// Card shown with this event, if any
    pub fn card(&self) -> Option<&str> {
        match &self.kind {
            EventKind::FoulCommitted(foul) => foul.card.as_deref(),
            EventKind::BadBehaviour(detail) => detail.card.as_deref(),
            _ => None,
        }
    }

    /// Decode a raw JSON object into a typed event
    ///
    /// The validator runs its presence/type/structure rules first; this is
    /// the final typed decode and reports anything the rules did not catch.
    pub fn decode(value: &serde_json::Value) -> Result<Self, String> {
        let record = EventRecord::deserialize(value).map_err(|e| e.to_string())?;
        record.into_event()
    }
}

// ---------------------------------------------------------------------------
// Wire records (serde only)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeTag {
    Named(Named),
    Plain(String),
}

impl TypeTag {
    fn name(&self) -> &str {
        match self {
            TypeTag::Named(named) => &named.name,
            TypeTag::Plain(name) => name,
        }
    }
}

fn default_period() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    id: String,
    #[serde(default)]
    index: i64,
    #[serde(default = "default_period")]
    period: u8,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    minute: u32,
    #[serde(default)]
    second: u32,
    #[serde(rename = "type")]
    type_tag: TypeTag,
    team: Option<TeamRef>,
    player: Option<PlayerRef>,
    location: Option<Vec<f64>>,
    pass: Option<PassRecord>,
    shot: Option<ShotRecord>,
    foul_committed: Option<FoulRecord>,
    substitution: Option<SubstitutionRecord>,
    bad_behaviour: Option<CardRecord>,
}

#[derive(Debug, Deserialize)]
struct PassRecord {
    recipient: Option<PlayerRef>,
    outcome: Option<Named>,
    length: Option<f64>,
    end_location: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct ShotRecord {
    outcome: Named,
    technique: Option<Named>,
    body_part: Option<Named>,
    statsbomb_xg: Option<f64>,
    end_location: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct FoulRecord {
    card: Option<Named>,
    #[serde(rename = "type")]
    foul_type: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct SubstitutionRecord {
    replacement: PlayerRef,
    outcome: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct CardRecord {
    card: Option<Named>,
}

fn name_of(named: Option<Named>) -> Option<String> {
    named.map(|n| n.name)
}

impl EventRecord {
    fn into_event(self) -> Result<Event, String> {
        let event_type: EventType = self.type_tag.name().parse()?;

        let timestamp = match self.timestamp.as_deref() {
            Some(text) => {
                Timestamp::parse(text).ok_or_else(|| format!("unparseable timestamp '{}'", text))?
            }
            None => Timestamp::ZERO,
        };

        let location = match &self.location {
            Some(coords) => Some(
                Location::from_coords(coords)
                    .ok_or_else(|| "location needs at least two coordinates".to_string())?,
            ),
            None => None,
        };

        let kind = match event_type {
            EventType::Pass => {
                let pass = self.pass.ok_or("pass event without pass block")?;
                EventKind::Pass(PassDetail {
                    recipient: pass.recipient,
                    outcome: name_of(pass.outcome),
                    length: pass.length,
                    end_location: pass.end_location.as_deref().and_then(Location::from_coords),
                })
            }
            EventType::Shot => {
                let shot = self.shot.ok_or("shot event without shot block")?;
                EventKind::Shot(ShotDetail {
                    outcome: shot.outcome.name,
                    technique: name_of(shot.technique),
                    body_part: name_of(shot.body_part),
                    xg: shot.statsbomb_xg,
                    end_location: shot.end_location.as_deref().and_then(Location::from_coords),
                })
            }
            EventType::FoulCommitted => {
                EventKind::FoulCommitted(self.foul_committed.map_or_else(FoulDetail::default, |f| {
                    FoulDetail {
                        foul_type: name_of(f.foul_type),
                        card: name_of(f.card),
                    }
                }))
            }
            EventType::Substitution => {
                let sub = self
                    .substitution
                    .ok_or("substitution event without substitution block")?;
                EventKind::Substitution(SubstitutionDetail {
                    replacement: sub.replacement,
                    outcome: name_of(sub.outcome),
                })
            }
            EventType::BadBehaviour => EventKind::BadBehaviour(CardDetail {
                card: self.bad_behaviour.and_then(|b| name_of(b.card)),
            }),
            other => EventKind::Other(other),
        };

        Ok(Event {
            id: self.id,
            index: self.index,
            period: self.period,
            timestamp,
            minute: self.minute,
            second: self.second,
            team: self.team,
            player: self.player,
            location,
            kind,
        })
    }
}
