//! Decision-tree game ("Dilema Ramadan")
//!
//! A chat-style story: each scenario offers two choices that nudge two
//! attributes (iman and social, both kept within 0..=100) and lead to the
//! next scenario or straight to WIN/LOSE. Either attribute reaching zero
//! loses on the spot, whatever the choice said.
//!
//! Scenario graphs are validated when they are built; a graph that points at
//! a missing scenario never reaches gameplay.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::session::{GameRules, Outcome, Session};
use super::snapshot::DilemmaView;
use crate::consts::{ATTRIBUTE_MAX, ATTRIBUTE_MIN};
use crate::error::{ArcadeError, Result};
use crate::scores::GameKind;
use crate::tuning::DilemmaTuning;

/// Terminal tags a choice may lead to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ending {
    Win,
    Lose,
}

/// Where a choice leads: a scenario id (JSON number) or `"WIN"` / `"LOSE"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Next {
    Scenario(u32),
    End(Ending),
}

/// Signed attribute change applied by a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Effect {
    pub iman: i32,
    pub social: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub effect: Effect,
    pub next: Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    /// Who is talking in the chat
    pub sender: String,
    pub text: String,
    pub options: [Choice; 2],
}

/// Validated scenario graph
#[derive(Debug, Clone)]
pub struct ScenarioGraph {
    start: u32,
    scenarios: BTreeMap<u32, Scenario>,
}

#[derive(Deserialize)]
struct GraphFile {
    start: u32,
    scenarios: Vec<Scenario>,
}

impl ScenarioGraph {
    /// Build a graph, rejecting duplicate ids, a missing start and dangling links
    pub fn new(start: u32, scenarios: Vec<Scenario>) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        for scenario in scenarios {
            let id = scenario.id;
            if by_id.insert(id, scenario).is_some() {
                return Err(ArcadeError::DuplicateScenario(id));
            }
        }
        if !by_id.contains_key(&start) {
            return Err(ArcadeError::MissingStart(start));
        }

        let ids: BTreeSet<u32> = by_id.keys().copied().collect();
        for scenario in by_id.values() {
            for (option, choice) in scenario.options.iter().enumerate() {
                if let Next::Scenario(target) = choice.next {
                    if !ids.contains(&target) {
                        return Err(ArcadeError::DanglingReference {
                            scenario: scenario.id,
                            option,
                            target,
                        });
                    }
                }
            }
        }

        Ok(Self {
            start,
            scenarios: by_id,
        })
    }

    /// Parse `{"start": 1, "scenarios": [...]}` and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let file: GraphFile = serde_json::from_str(json)?;
        Self::new(file.start, file.scenarios)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn get(&self, id: u32) -> Option<&Scenario> {
        self.scenarios.get(&id)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    /// The built-in five-scenario Ramadan story
    pub fn ramadan() -> Self {
        let scenarios = vec![
            scenario(
                1,
                "Ukhti Dila",
                "Eh, bukber yuk tapi di bar yang ada alkoholnya, gmn? Tempatnya aesthetic bgt loh!",
                choice("Gas aja lah! Kan cuma minum es teh.", -40, 20, Next::Scenario(2)),
                choice("Skip, cari tempat halal aja.", 20, -10, Next::Scenario(3)),
            ),
            scenario(
                2,
                "Hati Kecil",
                "Kamu sampai di tempat itu. Musik kencang, bau alkohol menyengat. Adzan Maghrib berkumandang samar-samar.",
                choice("Tetap stay demi konten instastory.", -50, 10, Next::End(Ending::Lose)),
                choice("Ijin pulang, sholat di masjid sebelah.", 30, -20, Next::Scenario(4)),
            ),
            scenario(
                3,
                "Grup WA 'Sobat Hijrah'",
                "Alhamdulillah kamu nolak. Eh, kita mau galang dana buat panti asuhan, mau ikut nyumbang?",
                choice("Transfer 500rb diem-diem.", 40, 0, Next::Scenario(4)),
                choice("Transfer 10rb trus pamer di status WA.", -20, 30, Next::Scenario(4)),
            ),
            scenario(
                4,
                "Boss Kantor",
                "Lembur ya hari ini? Ada meeting dadakan jam 5 sore sampai jam 7 malam. Buka puasa di ruang meeting aja.",
                choice("Siap pak! Kerja adalah ibadah.", 10, 20, Next::Scenario(5)),
                choice(
                    "Waduh, saya sudah janji sama Ibu buka dirumah.",
                    20,
                    -30,
                    Next::Scenario(5),
                ),
            ),
            scenario(
                5,
                "Tetangga Julid",
                "Lihat tuh si A, puasa-puasa kok lemes banget kerjanya. Pasti sahurnya mie instan doang.",
                choice("Ikutan ghibahin si A.", -30, 10, Next::End(Ending::Lose)),
                choice("Istighfar, tegur tetangga dengan sopan.", 30, -10, Next::End(Ending::Win)),
            ),
        ];
        Self {
            start: 1,
            scenarios: scenarios.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

fn scenario(id: u32, sender: &str, text: &str, first: Choice, second: Choice) -> Scenario {
    Scenario {
        id,
        sender: sender.to_string(),
        text: text.to_string(),
        options: [first, second],
    }
}

fn choice(text: &str, iman: i32, social: i32, next: Next) -> Choice {
    Choice {
        text: text.to_string(),
        effect: Effect { iman, social },
        next,
    }
}

/// Position in the story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Node {
    Scenario(u32),
    Win,
    Lose,
}

/// Why a story was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoseReason {
    /// Iman hit rock bottom
    Iman,
    /// Social life is ruined
    Social,
    /// The chosen option led straight to LOSE
    Choice,
}

/// State of one story run
#[derive(Debug, Clone)]
pub struct DilemmaRun {
    pub node: Node,
    pub iman: i32,
    pub social: i32,
    /// Scenarios answered so far
    pub survived: u32,
    /// (scenario, option) pairs in the order they were chosen
    pub history: Vec<(u32, usize)>,
}

impl DilemmaRun {
    pub fn new(start: u32, tuning: &DilemmaTuning) -> Self {
        Self {
            node: Node::Scenario(start),
            iman: tuning.start_iman,
            social: tuning.start_social,
            survived: 0,
            history: Vec::new(),
        }
    }

    /// Pick option `index` of the current scenario.
    ///
    /// Returns false (and changes nothing) after the story ended or for an
    /// option that does not exist.
    pub fn choose(&mut self, index: usize, graph: &ScenarioGraph) -> bool {
        let Node::Scenario(id) = self.node else {
            return false;
        };
        let Some(choice) = graph.get(id).and_then(|s| s.options.get(index)) else {
            return false;
        };

        self.iman = apply(self.iman, choice.effect.iman);
        self.social = apply(self.social, choice.effect.social);
        self.survived += 1;
        self.history.push((id, index));

        self.node = if self.iman <= ATTRIBUTE_MIN || self.social <= ATTRIBUTE_MIN {
            Node::Lose
        } else {
            match choice.next {
                Next::Scenario(next) => Node::Scenario(next),
                Next::End(Ending::Win) => Node::Win,
                Next::End(Ending::Lose) => Node::Lose,
            }
        };
        true
    }

    pub fn score(&self, points_per_scenario: u64) -> u64 {
        u64::from(self.survived) * points_per_scenario
            + self.iman.max(0) as u64
            + self.social.max(0) as u64
    }

    pub fn lose_reason(&self) -> Option<LoseReason> {
        if self.node != Node::Lose {
            return None;
        }
        Some(if self.iman <= ATTRIBUTE_MIN {
            LoseReason::Iman
        } else if self.social <= ATTRIBUTE_MIN {
            LoseReason::Social
        } else {
            LoseReason::Choice
        })
    }
}

/// Add a signed delta to an attribute and keep it within 0..=100
fn apply(value: i32, delta: i32) -> i32 {
    value.saturating_add(delta).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

/// Decision-game rules for a [`Session`]
#[derive(Debug, Clone)]
pub struct DilemmaRules {
    pub graph: ScenarioGraph,
    pub tuning: DilemmaTuning,
}

impl DilemmaRules {
    pub fn new(graph: ScenarioGraph, tuning: DilemmaTuning) -> Self {
        Self { graph, tuning }
    }
}

impl GameRules for DilemmaRules {
    type Run = DilemmaRun;
    type View = DilemmaView;

    fn game(&self) -> GameKind {
        GameKind::Dilema
    }

    fn new_run(&mut self) -> DilemmaRun {
        DilemmaRun::new(self.graph.start(), &self.tuning)
    }

    fn outcome(&self, run: &DilemmaRun) -> Option<Outcome> {
        match run.node {
            Node::Scenario(_) => None,
            Node::Win => Some(Outcome::Win),
            Node::Lose => Some(Outcome::Lose),
        }
    }

    fn score(&self, run: &DilemmaRun) -> u64 {
        run.score(self.tuning.points_per_scenario)
    }

    fn view(&self, run: &DilemmaRun) -> DilemmaView {
        let scenario = match run.node {
            Node::Scenario(id) => self.graph.get(id).cloned(),
            _ => None,
        };
        DilemmaView {
            node: run.node,
            scenario,
            iman: run.iman,
            social: run.social,
            survived: run.survived,
            lose_reason: run.lose_reason(),
        }
    }
}

/// Decision game session
pub type DilemmaGame = Session<DilemmaRules>;

impl Session<DilemmaRules> {
    /// Choice command, ignored outside PLAYING
    pub fn choose(&mut self, index: usize) -> bool {
        self.update(|rules, run| run.choose(index, &rules.graph)).unwrap_or(false)
    }
}
