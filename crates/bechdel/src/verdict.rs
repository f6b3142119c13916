use std::fmt;

use serde::Serialize;

/// The provider's 0–3 score: how many of the three criteria a film meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BechdelRating {
    /// Fewer than two named women.
    NoNamedWomen = 0,
    /// The women never talk to each other.
    WomenDontTalk = 1,
    /// They only talk about a man.
    OnlyAboutMen = 2,
    Passes = 3,
}

impl BechdelRating {
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            0 => Some(BechdelRating::NoNamedWomen),
            1 => Some(BechdelRating::WomenDontTalk),
            2 => Some(BechdelRating::OnlyAboutMen),
            3 => Some(BechdelRating::Passes),
            _ => None,
        }
    }

    pub fn criteria_met(self) -> u8 {
        self as u8
    }

    pub fn passes(self) -> bool {
        self == BechdelRating::Passes
    }

    pub fn description(self) -> &'static str {
        match self {
            BechdelRating::NoNamedWomen => "fewer than two named women",
            BechdelRating::WomenDontTalk => "the women don't talk to each other",
            BechdelRating::OnlyAboutMen => "the women only talk about a man",
            BechdelRating::Passes => "two named women talk about something besides a man",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub rating: BechdelRating,
    /// Contributors disagree about the rating.
    pub dubious: bool,
}

impl Verdict {
    pub fn new(score: u8, dubious: bool) -> Option<Self> {
        BechdelRating::from_score(score).map(|rating| Self { rating, dubious })
    }

    pub fn passes(&self) -> bool {
        self.rating.passes()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.passes() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{} ({}/3): {}",
            outcome,
            self.rating.criteria_met(),
            self.rating.description()
        )?;
        if self.dubious {
            f.write_str(" [dubious]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_full_score_passes() {
        assert!(Verdict::new(3, false).expect("verdict").passes());
        for score in 0..3 {
            assert!(!Verdict::new(score, false).expect("verdict").passes());
        }
    }

    #[test]
    fn out_of_range_score_has_no_verdict() {
        assert_eq!(Verdict::new(4, false), None);
    }

    #[test]
    fn displays_outcome_and_criteria() {
        let verdict = Verdict::new(1, true).expect("verdict");
        assert_eq!(
            verdict.to_string(),
            "FAIL (1/3): the women don't talk to each other [dubious]"
        );
        assert_eq!(
            Verdict::new(3, false).expect("verdict").to_string(),
            "PASS (3/3): two named women talk about something besides a man"
        );
    }
}
