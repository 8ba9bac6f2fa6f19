// Multiple-choice question construction from a sampled player-season record.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::source::{TeamRef, TriviaSource};

/// Number of options on every question.
pub const OPTION_COUNT: usize = 4;

/// Stat-count distractors are `correct + offset`, offset drawn from this
/// inclusive range, clamped at zero.
pub const DISTRACTOR_OFFSET_MIN: i64 = -8;
pub const DISTRACTOR_OFFSET_MAX: i64 = 12;

/// One player-season-team line as sampled for trivia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaRecord {
    pub player_id: String,
    pub player_name: String,
    pub year: i32,
    pub team_id: String,
    pub team_name: String,
    pub hits: u32,
    pub home_runs: u32,
    pub runs_batted_in: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionShape {
    TeamIdentity,
    Hits,
    HomeRuns,
    RunsBattedIn,
}

impl QuestionShape {
    pub const ALL: [QuestionShape; 4] = [
        QuestionShape::TeamIdentity,
        QuestionShape::Hits,
        QuestionShape::HomeRuns,
        QuestionShape::RunsBattedIn,
    ];

    /// Noun for a count of this stat, singular only for exactly one.
    fn noun(&self, value: u32) -> &'static str {
        match (self, value == 1) {
            (QuestionShape::Hits, true) => "hit",
            (QuestionShape::Hits, false) => "hits",
            (QuestionShape::HomeRuns, true) => "home run",
            (QuestionShape::HomeRuns, false) => "home runs",
            (QuestionShape::RunsBattedIn, true) => "RBI",
            (QuestionShape::RunsBattedIn, false) => "RBIs",
            (QuestionShape::TeamIdentity, _) => "team",
        }
    }

    /// The raw counting stat a count question asks about; `None` for the
    /// team-identity shape.
    fn counted_value(&self, record: &TriviaRecord) -> Option<u32> {
        match self {
            QuestionShape::TeamIdentity => None,
            QuestionShape::Hits => Some(record.hits),
            QuestionShape::HomeRuns => Some(record.home_runs),
            QuestionShape::RunsBattedIn => Some(record.runs_batted_in),
        }
    }

    fn count_label(&self, value: u32) -> String {
        format!("{value} {}", self.noun(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaOption {
    pub id: String,
    pub label: String,
}

/// A question lives for one ask/answer round trip. `correct_id` appears
/// exactly once among `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub shape: QuestionShape,
    pub prompt: String,
    pub options: Vec<TriviaOption>,
    pub correct_id: String,
    pub correct_label: String,
    pub detail: String,
}

impl TriviaQuestion {
    pub fn option(&self, id: &str) -> Option<&TriviaOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// Four distinct non-negative values including `correct`, in random order.
pub fn count_choices(correct: u32, rng: &mut dyn RngCore) -> Vec<u32> {
    let mut values = vec![correct];
    // Offsets cover at least 13 distinct clamped values, so this terminates.
    while values.len() < OPTION_COUNT {
        let offset = rng.gen_range(DISTRACTOR_OFFSET_MIN..=DISTRACTOR_OFFSET_MAX);
        let candidate = (correct as i64 + offset).max(0) as u32;
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    values.shuffle(rng);
    values
}

fn count_question(
    record: &TriviaRecord,
    shape: QuestionShape,
    correct: u32,
    rng: &mut dyn RngCore,
) -> TriviaQuestion {
    let verb = match shape {
        QuestionShape::Hits => "collect",
        QuestionShape::HomeRuns => "hit",
        _ => "drive in",
    };
    let prompt = format!(
        "How many {} did {} {verb} for the {} in {}?",
        shape.noun(2),
        record.player_name,
        record.team_name,
        record.year
    );

    let options = count_choices(correct, rng)
        .into_iter()
        .map(|value| TriviaOption {
            id: value.to_string(),
            label: shape.count_label(value),
        })
        .collect();

    let correct_label = shape.count_label(correct);
    TriviaQuestion {
        shape,
        prompt,
        options,
        correct_id: correct.to_string(),
        detail: format!(
            "{} had {correct_label} for the {} in {}.",
            record.player_name, record.team_name, record.year
        ),
        correct_label,
    }
}

/// Build a team-identity question, or `None` if fewer than three usable
/// distractor teams were supplied.
fn team_question(
    record: &TriviaRecord,
    others: &[TeamRef],
    rng: &mut dyn RngCore,
) -> Option<TriviaQuestion> {
    let mut distractors: Vec<&TeamRef> = Vec::with_capacity(OPTION_COUNT - 1);
    for team in others {
        if team.team_id == record.team_id || distractors.iter().any(|d| d.team_id == team.team_id) {
            continue;
        }
        distractors.push(team);
        if distractors.len() == OPTION_COUNT - 1 {
            break;
        }
    }
    if distractors.len() < OPTION_COUNT - 1 {
        return None;
    }

    let mut options: Vec<TriviaOption> = distractors
        .into_iter()
        .map(|t| TriviaOption {
            id: t.team_id.clone(),
            label: t.name.clone(),
        })
        .collect();
    options.push(TriviaOption {
        id: record.team_id.clone(),
        label: record.team_name.clone(),
    });
    options.shuffle(rng);

    Some(TriviaQuestion {
        shape: QuestionShape::TeamIdentity,
        prompt: format!(
            "Which team did {} play for in {}?",
            record.player_name, record.year
        ),
        options,
        correct_id: record.team_id.clone(),
        correct_label: record.team_name.clone(),
        detail: format!(
            "{} played for the {} in {}.",
            record.player_name, record.team_name, record.year
        ),
    })
}

/// Sample a record and build the first question shape (in random order)
/// whose data requirements are met.
///
/// `Ok(None)` means no eligible record exists; the caller shows a "no
/// question available" notice.
pub fn generate_question(
    source: &dyn TriviaSource,
    rng: &mut dyn RngCore,
) -> Result<Option<TriviaQuestion>> {
    let Some(record) = source.sample_record(rng)? else {
        debug!("no eligible trivia record");
        return Ok(None);
    };

    let mut shapes = QuestionShape::ALL;
    shapes.shuffle(rng);

    for shape in shapes {
        if let Some(correct) = shape.counted_value(&record) {
            return Ok(Some(count_question(&record, shape, correct, rng)));
        }

        let others = source.other_teams(&record, OPTION_COUNT - 1, rng)?;
        if let Some(question) = team_question(&record, &others, rng) {
            return Ok(Some(question));
        }
        debug!(
            "only {} distractor teams for {} in {}, trying another shape",
            others.len(),
            record.team_id,
            record.year
        );
    }

    // Unreachable in practice: three of the four shapes always qualify.
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn test_rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn record() -> TriviaRecord {
        TriviaRecord {
            player_id: "griffke02".into(),
            player_name: "Ken Griffey".into(),
            year: 1997,
            team_id: "SEA".into(),
            team_name: "Seattle Mariners".into(),
            hits: 185,
            home_runs: 1,
            runs_batted_in: 147,
        }
    }

    fn teams(ids: &[&str]) -> Vec<TeamRef> {
        ids.iter()
            .map(|id| TeamRef {
                team_id: id.to_string(),
                name: format!("Team {id}"),
            })
            .collect()
    }

    struct StubSource {
        record: Option<TriviaRecord>,
        others: Vec<TeamRef>,
    }

    impl TriviaSource for StubSource {
        fn sample_record(&self, _rng: &mut dyn RngCore) -> Result<Option<TriviaRecord>> {
            Ok(self.record.clone())
        }

        fn other_teams(
            &self,
            _record: &TriviaRecord,
            count: usize,
            _rng: &mut dyn RngCore,
        ) -> Result<Vec<TeamRef>> {
            Ok(self.others.iter().take(count).cloned().collect())
        }
    }

    #[test]
    fn count_choices_for_five() {
        for seed in 0..50 {
            let values = count_choices(5, &mut test_rng(seed));
            assert_eq!(values.len(), 4);
            let distinct: HashSet<u32> = values.iter().copied().collect();
            assert_eq!(distinct.len(), 4);
            assert!(values.contains(&5));
            assert!(values.iter().all(|&v| v <= 17));
        }
    }

    #[test]
    fn count_choices_are_reproducible_for_a_seed() {
        assert_eq!(count_choices(5, &mut test_rng(42)), vec![10, 3, 5, 11]);
        assert_eq!(
            count_choices(5, &mut test_rng(42)),
            count_choices(5, &mut test_rng(42))
        );
    }

    #[test]
    fn count_choices_clamp_at_zero() {
        for seed in 0..50 {
            let values = count_choices(0, &mut test_rng(seed));
            assert!(values.contains(&0));
            assert!(values.iter().all(|&v| v <= 12));
            let distinct: HashSet<u32> = values.iter().copied().collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn count_question_pluralizes() {
        let q = count_question(&record(), QuestionShape::HomeRuns, 1, &mut test_rng(1));
        assert_eq!(q.correct_id, "1");
        assert_eq!(q.correct_label, "1 home run");
        assert!(q.prompt.contains("How many home runs did Ken Griffey hit"));
        for option in &q.options {
            let value: u32 = option.id.parse().unwrap();
            if value == 1 {
                assert_eq!(option.label, "1 home run");
            } else {
                assert_eq!(option.label, format!("{value} home runs"));
            }
        }
        assert_eq!(q.options.iter().filter(|o| o.id == q.correct_id).count(), 1);
    }

    #[test]
    fn rbi_labels() {
        let q = count_question(&record(), QuestionShape::RunsBattedIn, 147, &mut test_rng(3));
        assert_eq!(q.correct_label, "147 RBIs");
        assert_eq!(q.detail, "Ken Griffey had 147 RBIs for the Seattle Mariners in 1997.");
    }

    #[test]
    fn team_question_has_three_distractors() {
        let q = team_question(&record(), &teams(&["NYA", "BOS", "CLE"]), &mut test_rng(7)).unwrap();
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_id, "SEA");
        assert_eq!(q.options.iter().filter(|o| o.id == "SEA").count(), 1);
        assert_eq!(q.prompt, "Which team did Ken Griffey play for in 1997?");
    }

    #[test]
    fn team_question_skips_own_team_and_repeats() {
        let q = team_question(
            &record(),
            &teams(&["SEA", "NYA", "NYA", "BOS", "CLE"]),
            &mut test_rng(7),
        )
        .unwrap();
        let ids: HashSet<&str> = q.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn team_question_needs_three_other_teams() {
        assert!(team_question(&record(), &teams(&["NYA", "BOS"]), &mut test_rng(7)).is_none());
    }

    #[test]
    fn generate_falls_back_to_stat_shapes() {
        let source = StubSource {
            record: Some(record()),
            others: teams(&["NYA"]),
        };
        for seed in 0..20 {
            let q = generate_question(&source, &mut test_rng(seed)).unwrap().unwrap();
            assert_ne!(q.shape, QuestionShape::TeamIdentity);
        }
    }

    #[test]
    fn generate_uses_every_shape_eventually() {
        let source = StubSource {
            record: Some(record()),
            others: teams(&["NYA", "BOS", "CLE", "OAK"]),
        };
        let mut rng = test_rng(11);
        let seen: HashSet<QuestionShape> = (0..200)
            .map(|_| generate_question(&source, &mut rng).unwrap().unwrap().shape)
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn generate_without_records_is_none() {
        let source = StubSource {
            record: None,
            others: vec![],
        };
        assert!(generate_question(&source, &mut test_rng(0)).unwrap().is_none());
    }
}
