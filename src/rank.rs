// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/rank.rs - Go ranks and their relation to AGA ratings.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{Error, Result};

const KYU_GRADES: u8 = 30;
const DAN_GRADES: u8 = 9;

/// A rank on the amateur scale, from 30 kyu (weakest) to 9 dan (strongest).
///
/// Ranks compare by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    /// 30 kyu, the rank of an unrated player.
    pub const WEAKEST: Rank = Rank(1);
    /// 9 dan.
    pub const STRONGEST: Rank = Rank(KYU_GRADES + DAN_GRADES);

    /// Returns the kyu rank `n`, or `None` unless `1 <= n <= 30`.
    pub fn kyu(n: u8) -> Option<Rank> {
        (1..=KYU_GRADES).contains(&n).then(|| Rank(KYU_GRADES + 1 - n))
    }

    /// Returns the dan rank `n`, or `None` unless `1 <= n <= 9`.
    pub fn dan(n: u8) -> Option<Rank> {
        (1..=DAN_GRADES).contains(&n).then(|| Rank(KYU_GRADES + n))
    }

    /// Whether this is a dan rank.
    pub fn is_dan(self) -> bool {
        self.0 > KYU_GRADES
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dan() {
            write!(f, "{}D", self.0 - KYU_GRADES)
        } else {
            write!(f, "{}K", KYU_GRADES + 1 - self.0)
        }
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRank(s.to_string());
        let split = s.len().checked_sub(1).ok_or_else(invalid)?;
        if !s.is_char_boundary(split) {
            return Err(invalid());
        }
        let (number, grade) = s.split_at(split);
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n: u8 = number.parse().map_err(|_| invalid())?;
        match grade {
            "K" => Rank::kyu(n),
            "D" => Rank::dan(n),
            _ => None,
        }
        .ok_or_else(invalid)
    }
}

/// Converts an AGA rating to a rank.
///
/// Ratings are truncated toward zero; 1.0 and up are dan ranks and -1.0 and
/// below are kyu ranks. Ratings strictly between -1 and 1, and ratings off
/// either end of the scale, are invalid.
pub fn rank_from_rating(rating: Decimal) -> Result<Rank> {
    let r = rating.trunc().to_i64().ok_or(Error::InvalidRating(rating))?;
    let rank = if r >= 1 {
        u8::try_from(r).ok().and_then(Rank::dan)
    } else if r <= -1 {
        u8::try_from(-r).ok().and_then(Rank::kyu)
    } else {
        None
    };
    rank.ok_or(Error::InvalidRating(rating))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("9.9", "9D")]
    #[case("-30", "30K")]
    #[case("-1.2", "1K")]
    #[case("1.1", "1D")]
    #[case("5", "5D")]
    #[case("-12.99", "12K")]
    fn test_rank_from_rating(#[case] rating: &str, #[case] expected: &str) {
        let rating = Decimal::from_str(rating).unwrap();
        assert_eq!(rank_from_rating(rating).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("0.5")]
    #[case("-0.9")]
    #[case("10")]
    #[case("-31")]
    fn test_rank_from_invalid_rating(#[case] rating: &str) {
        let rating = Decimal::from_str(rating).unwrap();
        assert_matches!(rank_from_rating(rating), Err(Error::InvalidRating(_)));
    }

    #[test]
    fn test_scale_order() {
        assert_eq!(Rank::kyu(30), Some(Rank::WEAKEST));
        assert_eq!(Rank::dan(9), Some(Rank::STRONGEST));
        assert!(Rank::kyu(1).unwrap() < Rank::dan(1).unwrap());
        assert!(Rank::kyu(2).unwrap() < Rank::kyu(1).unwrap());
        assert!(Rank::dan(2).unwrap() > Rank::dan(1).unwrap());
    }

    #[test]
    fn test_every_rank_round_trips_through_text() {
        let mut count = 0;
        for n in 1..=30 {
            let rank = Rank::kyu(n).unwrap();
            assert_eq!(rank.to_string().parse::<Rank>().unwrap(), rank);
            count += 1;
        }
        for n in 1..=9 {
            let rank = Rank::dan(n).unwrap();
            assert_eq!(rank.to_string().parse::<Rank>().unwrap(), rank);
            count += 1;
        }
        assert_eq!(count, 39);
    }

    #[rstest]
    #[case("")]
    #[case("K")]
    #[case("0K")]
    #[case("31K")]
    #[case("10D")]
    #[case("3P")]
    #[case("5k")]
    #[case("-5K")]
    #[case("5 K")]
    fn test_parse_invalid_rank(#[case] text: &str) {
        assert_matches!(text.parse::<Rank>(), Err(Error::InvalidRank(_)));
    }
}
