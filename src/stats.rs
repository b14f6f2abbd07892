//! Summaries of finished games.

use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CompletedGame;

/// The UTC day a game was finished on, from its `created_at` timestamp.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn day_of(game: &CompletedGame) -> Option<NaiveDate> {
    let secs = i64::try_from(game.created_at).ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|time| time.date_naive())
}

/// Who played, and how many attempts they needed, across a set of games.
///
/// # Examples
///
/// ```rust
/// use terminal_rs::{stats::Summary, CompletedGame, Session};
///
/// let mut session = Session::create(["abcd", "efgh", "ijkl"])?;
/// session.submit_attempt("abcd", 0);
/// session.submit_attempt("efgh", 4);
/// let game = CompletedGame::from_session("me", &session).unwrap();
///
/// let summary = Summary::from_games(&[game]);
/// assert_eq!(summary.total_games(), 1);
/// assert_eq!(summary.games_with(2), 1);
/// assert_eq!(summary.games_by("me"), 1);
/// #
/// # Ok::<_, terminal_rs::ValidationError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Summary {
    total_games: u32,
    /// player -> number of games
    players: BTreeMap<String, u32>,
    /// attempts needed -> number of games
    histogram: BTreeMap<usize, u32>,
}

impl Summary {
    pub fn from_games<'a>(games: impl IntoIterator<Item = &'a CompletedGame>) -> Self {
        let mut summary = Summary::default();
        for game in games {
            summary.total_games += 1;
            *summary.players.entry(game.player.clone()).or_insert(0) += 1;
            *summary.histogram.entry(game.attempts).or_insert(0) += 1;
        }
        summary
    }

    /// Summarizes only the games finished on `day`, in UTC.
    pub fn on_day(games: &[CompletedGame], day: NaiveDate) -> Self {
        Self::from_games(games.iter().filter(|game| day_of(game) == Some(day)))
    }

    pub fn total_games(&self) -> u32 {
        self.total_games
    }

    /// The number of games `player` finished.
    pub fn games_by(&self, player: &str) -> u32 {
        self.players.get(player).copied().unwrap_or(0)
    }

    /// `(player, games)` pairs, most games first. Ties are in name order.
    pub fn players(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.players
            .iter()
            .map(|(player, &games)| (player.as_str(), games))
            .sorted_by(|a, b| b.1.cmp(&a.1))
    }

    /// The number of games finished in exactly `attempts` attempts.
    pub fn games_with(&self, attempts: usize) -> u32 {
        self.histogram.get(&attempts).copied().unwrap_or(0)
    }

    /// The percentage of games finished in exactly `attempts` attempts.
    pub fn percent_with(&self, attempts: usize) -> f32 {
        if self.total_games == 0 {
            return 0.;
        }
        self.games_with(attempts) as f32 / self.total_games as f32 * 100.
    }

    /// The average number of attempts per game.
    pub fn mean_attempts(&self) -> f32 {
        if self.total_games == 0 {
            return 0.;
        }
        let sum: u32 = self
            .histogram
            .iter()
            .map(|(&attempts, &count)| attempts as u32 * count)
            .sum();
        sum as f32 / self.total_games as f32
    }

    /// `(attempts, games)` pairs, fewest attempts first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.histogram.iter().map(|(&a, &c)| (a, c))
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", "Games played")?;
        writeln!(
            f,
            "{} games, {:.2} attempts on average",
            self.total_games,
            self.mean_attempts()
        )?;
        for (player, games) in self.players() {
            let noun = if games == 1 { "game" } else { "games" };
            writeln!(f, " - {} {} played by {}", games, noun, player)?;
        }

        let max = match self.histogram.values().max() {
            Some(&max) => max,
            None => return Ok(()),
        };
        writeln!(f, "{:-^80}", "Attempts ratio")?;

        let digits =
            std::iter::successors(Some(max), |&n| (n >= 10).then(|| n / 10)).count() as u32;
        let count_per_mark = (max as f32 / (60. - digits as f32)).max(1.0);

        for (attempts, count) in self.iter() {
            let marks = (count as f32 / count_per_mark).floor() as usize;
            writeln!(
                f,
                "{:>2} |{:■>marks$} {} ({:.2}%)",
                attempts,
                "",
                count,
                self.percent_with(attempts),
                marks = marks
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compute_words_hash;

    // 2024-03-01T12:00:00Z
    const MARCH_1: u64 = 1_709_294_400;
    const DAY: u64 = 24 * 60 * 60;

    fn game(attempts: usize) -> CompletedGame {
        played("p", attempts, MARCH_1)
    }

    fn played(player: &str, attempts: usize, created_at: u64) -> CompletedGame {
        CompletedGame {
            player: player.into(),
            words: vec!["abcd".into()],
            target: "abcd".into(),
            attempts,
            words_hash: compute_words_hash(["abcd"]),
            created_at,
        }
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn distribution() {
        let summary = Summary::from_games(&[game(2), game(3), game(2), game(1)]);
        assert_eq!(summary.total_games(), 4);
        assert_eq!(summary.iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2), (3, 1)]);
        assert!((summary.percent_with(2) - 50.).abs() < f32::EPSILON);
        assert!((summary.mean_attempts() - 2.).abs() < f32::EPSILON);
    }

    #[test]
    fn empty() {
        let summary = Summary::from_games(&Vec::<CompletedGame>::new());
        assert_eq!(summary.mean_attempts(), 0.);
        assert_eq!(summary.percent_with(1), 0.);
        assert_eq!(summary.players().count(), 0);
        assert_eq!(summary.to_string().lines().count(), 2);
    }

    #[test]
    fn renders_bars() {
        let summary = Summary::from_games(&[game(1), game(2), game(2)]);
        let text = summary.to_string();
        assert!(text.contains(" 1 |■ 1 (33.33%)"));
        assert!(text.contains(" 2 |■■ 2 (66.67%)"));
    }

    #[test]
    fn games_per_player() {
        let games = [
            played("zoe", 2, MARCH_1),
            played("amy", 3, MARCH_1),
            played("zoe", 1, MARCH_1),
            played("bob", 2, MARCH_1),
        ];
        let summary = Summary::from_games(&games);
        assert_eq!(summary.games_by("zoe"), 2);
        assert_eq!(summary.games_by("nobody"), 0);
        assert_eq!(
            summary.players().collect::<Vec<_>>(),
            vec![("zoe", 2), ("amy", 1), ("bob", 1)]
        );

        let text = summary.to_string();
        assert!(text.contains(" - 2 games played by zoe"));
        assert!(text.contains(" - 1 game played by amy"));
    }

    #[test]
    fn utc_days() {
        assert_eq!(day_of(&game(1)), Some(march(1)));
        // one second before midnight
        assert_eq!(day_of(&played("p", 1, MARCH_1 + DAY / 2 - 1)), Some(march(1)));
        assert_eq!(day_of(&played("p", 1, MARCH_1 + DAY / 2)), Some(march(2)));
        assert_eq!(day_of(&played("p", 1, u64::MAX)), None);
    }

    #[test]
    fn daily_report() {
        let games = [
            played("amy", 2, MARCH_1 - DAY),
            played("amy", 3, MARCH_1),
            played("bob", 1, MARCH_1 + 60),
            played("bob", 4, MARCH_1 + DAY),
        ];

        let summary = Summary::on_day(&games, march(1));
        assert_eq!(summary.total_games(), 2);
        assert_eq!(summary.games_by("amy"), 1);
        assert_eq!(summary.games_by("bob"), 1);
        assert_eq!(summary.iter().collect::<Vec<_>>(), vec![(1, 1), (3, 1)]);

        assert_eq!(Summary::on_day(&games, march(5)), Summary::default());
    }
}
