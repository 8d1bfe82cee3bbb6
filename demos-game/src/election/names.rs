//! Display names for election blocks.
//!
//! Most blocks get a composed `<age> <class> <unit>` name, some are named
//! after one of the ten tribes, and a rare few get a special name.
use rand::Rng;

use crate::constants::{NAME_REROLL_LIMIT, NAME_SPECIAL_CHANCE, NAME_TRIBE_CHANCE};

const SPECIAL_NAMES: &[&str] = &[
    "The Oracle's Chosen",
    "Veterans of Marathon",
    "The Thirty",
    "Friends of the Tyrant",
    "The Sacred Band",
];

const TRIBE_NAMES: &[&str] = &[
    "Erechtheis",
    "Aegeis",
    "Pandionis",
    "Leontis",
    "Acamantis",
    "Oeneis",
    "Cecropis",
    "Hippothontis",
    "Aeantis",
    "Antiochis",
];

const AGES: &[&str] = &["Young", "Elder", "Veteran", "Retired", "Ambitious", "Pious"];

const CLASSES: &[&str] = &[
    "Farmers",
    "Merchants",
    "Sailors",
    "Potters",
    "Priests",
    "Smiths",
    "Scribes",
    "Herders",
    "Vintners",
];

const UNITS: &[&str] = &["Guild", "League", "Assembly", "Circle", "Union", "Brotherhood"];

fn pick<'a>(table: &[&'a str], rng: &mut impl Rng) -> &'a str {
    table[rng.gen_range(0..table.len())]
}

/// Draw one candidate name.
pub fn roll_name(rng: &mut impl Rng) -> String {
    let roll = rng.r#gen::<f64>();
    if roll < NAME_SPECIAL_CHANCE {
        pick(SPECIAL_NAMES, rng).to_string()
    } else if roll < NAME_SPECIAL_CHANCE + NAME_TRIBE_CHANCE {
        format!("Tribe of {}", pick(TRIBE_NAMES, rng))
    } else {
        format!(
            "{} {} {}",
            pick(AGES, rng),
            pick(CLASSES, rng),
            pick(UNITS, rng)
        )
    }
}

/// Draw a name not present in `taken`, re-rolling on collision. After a
/// bounded number of re-rolls a numeric suffix forces uniqueness.
pub fn unique_name(taken: &[&str], rng: &mut impl Rng) -> String {
    let mut name = roll_name(rng);
    for _ in 0..NAME_REROLL_LIMIT {
        if !taken.contains(&name.as_str()) {
            return name;
        }
        name = roll_name(rng);
    }
    let base = name;
    let mut suffix = 2_u32;
    loop {
        let candidate = format!("{base} {suffix}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix = suffix.saturating_add(1);
    }
}
