//! Round rules: the three choices, the beats-relation and the outcome of a round.

use std::fmt;

/// One of the three hands a player (or the computer) can throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

/// Outcome of a single round, seen from the player's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundResult {
    PlayerWins,
    ComputerWins,
    Draw,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Element id of the matching input button (`#rock`, `#paper`, `#scissors`).
    pub fn id(self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    /// Portuguese label used in result messages.
    pub fn label(self) -> &'static str {
        match self {
            Choice::Rock => "Pedra",
            Choice::Paper => "Papel",
            Choice::Scissors => "Tesoura",
        }
    }

    /// Map a value in `0..3` onto a choice; larger values wrap.
    pub fn from_index(idx: u8) -> Self {
        Self::ALL[(idx % 3) as usize]
    }

    /// Explicit beats-relation. Every off-diagonal pair is listed.
    pub fn beats(self, other: Choice) -> bool {
        match (self, other) {
            (Choice::Rock, Choice::Scissors) => true,
            (Choice::Scissors, Choice::Paper) => true,
            (Choice::Paper, Choice::Rock) => true,
            (Choice::Rock, Choice::Paper) => false,
            (Choice::Paper, Choice::Scissors) => false,
            (Choice::Scissors, Choice::Rock) => false,
            (Choice::Rock, Choice::Rock)
            | (Choice::Paper, Choice::Paper)
            | (Choice::Scissors, Choice::Scissors) => false,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl TryFrom<&str> for Choice {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(Choice::Rock),
            "paper" => Ok(Choice::Paper),
            "scissors" => Ok(Choice::Scissors),
            other => Err(anyhow::anyhow!("unknown choice '{}'", other)),
        }
    }
}

/// Decide a round. Draw iff both sides threw the same hand.
pub fn resolve(player: Choice, computer: Choice) -> RoundResult {
    if player == computer {
        RoundResult::Draw
    } else if player.beats(computer) {
        RoundResult::PlayerWins
    } else {
        RoundResult::ComputerWins
    }
}

impl RoundResult {
    /// Style key for the outcome (`--win-color`, `--lose-color`, `--draw-color`).
    pub fn tone(self) -> &'static str {
        match self {
            RoundResult::PlayerWins => "win",
            RoundResult::ComputerWins => "lose",
            RoundResult::Draw => "draw",
        }
    }

    /// Result line shown under the arena.
    pub fn message(self, player: Choice, computer: Choice) -> String {
        match self {
            RoundResult::PlayerWins => {
                format!("{} vence {}. Você ganhou!", player.label(), computer.label())
            }
            RoundResult::ComputerWins => {
                format!("{} vence {}. Você perdeu!", computer.label(), player.label())
            }
            RoundResult::Draw => "Um empate!".to_string(),
        }
    }
}
