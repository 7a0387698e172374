//! Deterministic customer name generation from curated name lists.
//!
//! Same seed = same names, so demo datasets are reproducible.

use crate::rng::DataRng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "Michael", "Jennifer", "William", "Linda",
    "David", "Elizabeth", "Richard", "Barbara", "Joseph", "Susan", "Thomas", "Jessica",
    "Carlos", "Sarah", "Daniel", "Karen", "Matthew", "Lisa", "Anthony", "Nancy",
    "Wei", "Emily", "Andrew", "Michelle", "Joshua", "Amanda", "Kenneth", "Melissa",
    "Kevin", "Stephanie", "Brian", "Rebecca", "George", "Laura", "Edward", "Sharon",
    "Priya", "Cynthia", "Ronald", "Kathleen", "Timothy", "Amy", "Jason", "Angela",
    "Omar", "Anna", "Ryan", "Nicole", "Jacob", "Samantha", "Gary", "Katherine",
    "Nicholas", "Christine", "Eric", "Rachel", "Jonathan", "Carolyn", "Stephen", "Maria",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
    "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young",
    "Chen", "Patel", "Nguyen", "Kim", "Ali", "Singh", "Okafor", "Murphy",
    "Scott", "Green", "Adams", "Baker", "Nelson", "Hill", "Rivera", "Campbell",
];

/// Generate a full name (first + last) deterministically.
pub fn full_name(rng: &mut DataRng) -> String {
    format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES))
}
