use std::fmt;

use serde::{Deserialize, Serialize};

/// Overs and balls bowled, displayed as `overs.balls`.
///
/// This is not a decimal fraction: with six-ball overs `3.5` is followed by
/// `4.0`. Ordering follows the number of legal deliveries.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OverBall {
    pub overs: u32,
    pub balls: u32,
}

impl OverBall {
    pub const fn zero() -> Self {
        Self { overs: 0, balls: 0 }
    }

    /// Counter after `legal_balls` legal deliveries.
    pub fn from_legal_balls(legal_balls: u32, balls_per_over: u32) -> Self {
        Self {
            overs: legal_balls / balls_per_over,
            balls: legal_balls % balls_per_over,
        }
    }

    pub fn legal_balls(&self, balls_per_over: u32) -> u32 {
        self.overs * balls_per_over + self.balls
    }

    /// Advance by one delivery. Returns the next counter and whether the
    /// delivery completed an over. Wides and no-balls never advance.
    pub fn advance(self, legal: bool, balls_per_over: u32) -> (Self, bool) {
        if !legal {
            return (self, false);
        }
        let balls = self.balls + 1;
        if balls >= balls_per_over {
            (
                Self {
                    overs: self.overs + 1,
                    balls: 0,
                },
                true,
            )
        } else {
            (
                Self {
                    overs: self.overs,
                    balls,
                },
                false,
            )
        }
    }
}

impl fmt::Display for OverBall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.overs, self.balls)
    }
}
