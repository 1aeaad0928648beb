//! Deduction
//!
//! Three people, three colours, three pets. One of the 36 possible worlds is
//! drawn as the truth, three clues are sampled from it, and the question asks
//! who owns a given pet.
//!
//! Clue sets are redrawn up to [`MAX_CLUE_ATTEMPTS`] times looking for one
//! that leaves exactly one consistent world. When none does, the drawn world
//! stands as the answer even though the clues may not pin it down.
//!
//! With one clue of each kind no clue set is ever unique: every draw leaves
//! at least two consistent worlds, so the drawn world always stands.

use std::fmt;

use serde::{Serialize, Deserialize};

use super::{AttemptError, Hint, PuzzleParams, Verdict};
use crate::core::rng::DeterministicRng;

/// Clue sets tried before falling back to the drawn world.
pub const MAX_CLUE_ATTEMPTS: u32 = 50;

/// A person in the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Person {
    /// Anna
    Anna,
    /// Tom
    Tom,
    /// Leo
    Leo,
}

/// A favourite colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Green
    Green,
}

/// A pet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pet {
    /// Dog
    Dog,
    /// Cat
    Cat,
    /// Bird
    Bird,
}

impl Person {
    /// All people, in world index order.
    pub const ALL: [Person; 3] = [Person::Anna, Person::Tom, Person::Leo];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Person::Anna => "Anna",
            Person::Tom => "Tom",
            Person::Leo => "Leo",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Color {
    /// All colours.
    pub const ALL: [Color; 3] = [Color::Red, Color::Blue, Color::Green];
}

impl Pet {
    /// All pets.
    pub const ALL: [Pet; 3] = [Pet::Dog, Pet::Cat, Pet::Bird];
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One full assignment of colours and pets, indexed by [`Person`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Colour per person.
    pub colors: [Color; 3],
    /// Pet per person.
    pub pets: [Pet; 3],
}

impl World {
    /// Colour liked by `person`.
    pub fn color_of(&self, person: Person) -> Color {
        self.colors[person.index()]
    }

    /// Pet owned by `person`.
    pub fn pet_of(&self, person: Person) -> Pet {
        self.pets[person.index()]
    }

    /// Who owns `pet`.
    pub fn owner_of(&self, pet: Pet) -> Person {
        Person::ALL
            .into_iter()
            .find(|p| self.pet_of(*p) == pet)
            .unwrap_or(Person::Anna)
    }

    /// True when every clue holds.
    pub fn satisfies(&self, clues: &[Clue]) -> bool {
        clues.iter().all(|clue| clue.holds_in(self))
    }
}

/// A statement about the hidden world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Clue {
    /// `person` likes `color`.
    Likes {
        /// Subject.
        person: Person,
        /// Their colour.
        color: Color,
    },
    /// `person` does not own `pet`.
    DoesNotOwn {
        /// Subject.
        person: Person,
        /// A pet they do not own.
        pet: Pet,
    },
    /// Whoever owns `pet` likes `color`.
    PetColor {
        /// The pet.
        pet: Pet,
        /// Its owner's colour.
        color: Color,
    },
}

impl Clue {
    /// Whether the clue is true in `world`.
    pub fn holds_in(&self, world: &World) -> bool {
        match *self {
            Clue::Likes { person, color } => world.color_of(person) == color,
            Clue::DoesNotOwn { person, pet } => world.pet_of(person) != pet,
            Clue::PetColor { pet, color } => Person::ALL
                .into_iter()
                .any(|p| world.pet_of(p) == pet && world.color_of(p) == color),
        }
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clue::Likes { person, color } => write!(f, "{} likes {}.", person, color),
            Clue::DoesNotOwn { person, pet } => write!(f, "{} does not own the {}.", person, pet),
            Clue::PetColor { pet, color } => {
                write!(f, "The person who owns the {} likes {}.", pet, color)
            }
        }
    }
}

/// Permutations in lexicographic index order.
fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (i, &head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

/// All 36 worlds, colour permutation outer, pet permutation inner.
pub fn all_worlds() -> Vec<World> {
    let color_perms = permutations(&Color::ALL);
    let pet_perms = permutations(&Pet::ALL);
    let mut worlds = Vec::with_capacity(color_perms.len() * pet_perms.len());
    for cp in &color_perms {
        for pp in &pet_perms {
            worlds.push(World {
                colors: [cp[0], cp[1], cp[2]],
                pets: [pp[0], pp[1], pp[2]],
            });
        }
    }
    worlds
}

/// Sample one clue of each kind from `world`. Consumes three draws.
fn sample_clues(world: &World, rng: &mut DeterministicRng) -> [Clue; 3] {
    let likes = Person::ALL[rng.next_index(3)];
    let owner = Person::ALL[rng.next_index(3)];
    let linked = Person::ALL[rng.next_index(3)];
    clue_set(world, likes, owner, linked)
}

/// The clues true in `world` about the three chosen people.
fn clue_set(world: &World, likes: Person, owner: Person, linked: Person) -> [Clue; 3] {
    let not_owned = Pet::ALL
        .into_iter()
        .find(|p| *p != world.pet_of(owner))
        .unwrap_or(Pet::Dog);

    [
        Clue::Likes { person: likes, color: world.color_of(likes) },
        Clue::DoesNotOwn { person: owner, pet: not_owned },
        Clue::PetColor { pet: world.pet_of(linked), color: world.color_of(linked) },
    ]
}

/// Deduction puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionPuzzle {
    /// The three clues shown.
    pub clues: [Clue; 3],
    /// Pet asked about.
    pub question_pet: Pet,
    /// Owner of `question_pet` in `world`.
    pub answer: Person,
    /// World the answer is read from.
    pub world: World,
    /// Worlds consistent with the final clue set.
    pub consistent_worlds: usize,
    /// Clue sets drawn.
    pub clue_attempts: u32,
}

impl DeductionPuzzle {
    /// Generate from params.
    ///
    /// Draw order: true world, three draws per clue set, question pet.
    pub fn generate(params: &PuzzleParams) -> Self {
        let mut rng = params.rng();
        let worlds = all_worlds();
        let truth = worlds[rng.next_index(worlds.len())];

        let mut clues = sample_clues(&truth, &mut rng);
        let mut consistent: Vec<World> = worlds.iter().copied().filter(|w| w.satisfies(&clues)).collect();
        let mut clue_attempts = 1;
        while consistent.len() != 1 && clue_attempts < MAX_CLUE_ATTEMPTS {
            clues = sample_clues(&truth, &mut rng);
            consistent = worlds.iter().copied().filter(|w| w.satisfies(&clues)).collect();
            clue_attempts += 1;
        }

        let world = if consistent.len() == 1 { consistent[0] } else { truth };
        let question_pet = Pet::ALL[rng.next_index(Pet::ALL.len())];

        Self {
            clues,
            question_pet,
            answer: world.owner_of(question_pet),
            world,
            consistent_worlds: consistent.len(),
            clue_attempts,
        }
    }

    /// True when the clues pin down a single world.
    pub fn is_unique(&self) -> bool {
        self.consistent_worlds == 1
    }

    /// Prompt text.
    pub fn prompt(&self) -> String {
        let mut lines: Vec<String> = self.clues.iter().map(|c| format!("- {}", c)).collect();
        lines.push(format!("Who owns the {}? (Anna, Tom or Leo)", self.question_pet));
        lines.join("\n")
    }

    /// Check a typed name, trimmed and case-insensitive.
    pub fn check(&self, text: &str) -> Result<Verdict, AttemptError> {
        let name = text.trim();
        if name.is_empty() {
            return Err(AttemptError::EmptyAnswer);
        }
        if name.eq_ignore_ascii_case(self.answer.name()) {
            Ok(Verdict::Correct)
        } else {
            Ok(Verdict::Incorrect)
        }
    }

    /// Tier 1 is strategy; tier 2 rules out one person.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        match tier {
            1 => Some(Hint::text(
                1,
                "Start from the clue that fixes someone's colour, then use the pet clues to rule people out.",
            )),
            2 => {
                let wrong = Person::ALL.into_iter().find(|p| *p != self.answer)?;
                Some(Hint::text(
                    2,
                    format!("{} does NOT own the {}.", wrong, self.question_pet),
                ))
            }
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
