//! Tier-indexed problem generators
//!
//! Each generator picks the answer (or the pieces it is built from) first
//! and derives the printed question from it, so the correct answer is exact
//! by construction. Difficulty climbs monotonically within each band.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::PlacementConfig;
use crate::core::types::Tier;
use crate::problems::{Answer, Problem};

/// Percentages offered on tier 6; every base is a multiple of 20 so all divide evenly
const PERCENT_OF_CHOICES: [i64; 4] = [10, 25, 50, 75];

/// Percentages offered on tier 8
const PERCENT_INCREASE_CHOICES: [i64; 9] = [5, 10, 12, 15, 20, 25, 30, 40, 50];

/// Noun pairs for ratio problems
const RATIO_SUBJECTS: [(&str, &str, &str); 4] = [
    ("red", "blue", "marbles"),
    ("boys", "girls", "students"),
    ("cats", "dogs", "pets"),
    ("adults", "children", "visitors"),
];

/// Generate a fresh problem for `tier`
pub fn generate_problem<R: Rng + ?Sized>(
    tier: Tier,
    rng: &mut R,
    config: &PlacementConfig,
) -> Problem {
    match tier.value() {
        1 => addition(tier, rng),
        2 => subtraction(tier, rng, config.allow_negative_differences),
        3 => exact_division(tier, rng),
        4 => decimal_shift(tier, rng),
        5 => fraction_cancellation(tier, rng),
        6 => percent_of(tier, rng),
        7 => ratio_total(tier, rng),
        8 => percent_increase(tier, rng),
        9 => one_step_equation(tier, rng),
        _ => two_step_equation(tier, rng),
    }
}

fn addition<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let a: i64 = rng.gen_range(1..=20);
    let b: i64 = rng.gen_range(1..=20);
    Problem::new(tier, format!("What is {} + {}?", a, b), Answer::whole(a + b))
}

fn subtraction<R: Rng + ?Sized>(tier: Tier, rng: &mut R, allow_negative: bool) -> Problem {
    let mut minuend: i64 = rng.gen_range(1..=20);
    let mut subtrahend: i64 = rng.gen_range(1..=20);
    if !allow_negative && minuend < subtrahend {
        std::mem::swap(&mut minuend, &mut subtrahend);
    }
    Problem::new(
        tier,
        format!("What is {} - {}?", minuend, subtrahend),
        Answer::whole(minuend - subtrahend),
    )
}

fn exact_division<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let quotient: i64 = rng.gen_range(2..=12);
    let divisor: i64 = rng.gen_range(2..=12);
    let dividend = quotient * divisor;
    debug_assert_eq!(dividend % divisor, 0);
    Problem::new(
        tier,
        format!("What is {} ÷ {}?", dividend, divisor),
        Answer::whole(quotient),
    )
}

fn decimal_shift<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    // n hundredths, shown as a two-place decimal between 1.01 and 9.99
    let n: i64 = rng.gen_range(101..=999);
    let operand = Answer::from_hundredths(n);
    Problem::new(
        tier,
        format!("What is {} × 10?", operand),
        Answer::from_hundredths(n * 10),
    )
}

fn fraction_cancellation<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let denominator: i64 = rng.gen_range(2..=12);
    let numerator: i64 = rng.gen_range(1..denominator);
    Problem::new(
        tier,
        format!("What is ({})/({}) × ({})?", numerator, denominator, denominator),
        Answer::whole(numerator),
    )
}

fn percent_of<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let percent = *PERCENT_OF_CHOICES.choose(rng).unwrap_or(&50);
    let base: i64 = 20 * rng.gen_range(1..=10);
    debug_assert_eq!((base * percent) % 100, 0);
    Problem::new(
        tier,
        format!("What is {}% of {}?", percent, base),
        Answer::whole(base * percent / 100),
    )
}

fn ratio_total<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let (first, second, whole) = *RATIO_SUBJECTS.choose(rng).unwrap_or(&RATIO_SUBJECTS[0]);
    let a: i64 = rng.gen_range(1..=5);
    let b: i64 = rng.gen_range(1..=5);
    let scale: i64 = rng.gen_range(2..=10);
    Problem::new(
        tier,
        format!(
            "The ratio of {} to {} is {}:{}. There are {} {}. How many {} are there in total?",
            first,
            second,
            a,
            b,
            a * scale,
            first,
            whole
        ),
        Answer::whole((a + b) * scale),
    )
}

fn percent_increase<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let percent = *PERCENT_INCREASE_CHOICES.choose(rng).unwrap_or(&10);
    let base: i64 = rng.gen_range(20..=200);
    // base * (100 + percent) / 100, kept in hundredths
    let increased = base * (100 + percent);
    Problem::new(
        tier,
        format!(
            "A price of ${} increases by {}%. What is the new price?",
            base, percent
        ),
        Answer::from_hundredths(increased),
    )
}

fn one_step_equation<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let x: i64 = rng.gen_range(1..=20);
    let text = if rng.gen_bool(0.5) {
        let b: i64 = rng.gen_range(1..=20);
        format!("Solve for x: x + {} = {}", b, x + b)
    } else {
        let a: i64 = rng.gen_range(2..=9);
        format!("Solve for x: {}x = {}", a, a * x)
    };
    Problem::new(tier, text, Answer::whole(x))
}

fn two_step_equation<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Problem {
    let x: i64 = rng.gen_range(1..=12);
    let a: i64 = rng.gen_range(2..=9);
    let b: i64 = rng.gen_range(1..=20);
    let text = if rng.gen_bool(0.5) {
        format!("Solve for x: {}x + {} = {}", a, b, a * x + b)
    } else {
        format!("Solve for x: {}x - {} = {}", a, b, a * x - b)
    };
    Problem::new(tier, text, Answer::whole(x))
}
