// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// Fixture payload: a person or an animal, each with one number to compute with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TestData {
    Person { name: String, age: u32 },
    Animal { species: String, legs: u32 },
}

impl TestData {
    /// The person's age or the animal's leg count.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        match self {
            Self::Person { age, .. } => *age,
            Self::Animal { legs, .. } => *legs,
        }
    }

    /// The person's name or the animal's species.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Person { name, .. } => name,
            Self::Animal { species, .. } => species,
        }
    }

    fn person(name: &str, age: u32) -> Self {
        Self::Person {
            name: name.to_string(),
            age,
        }
    }

    fn animal(species: &str, legs: u32) -> Self {
        Self::Animal {
            species: species.to_string(),
            legs,
        }
    }
}

impl Display for TestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person { name, age } => write!(f, "{name} ({age})"),
            Self::Animal { species, legs } => write!(f, "{species} ({legs} legs)"),
        }
    }
}

pub fn person_alice() -> TestData {
    TestData::person("Alice", 25)
}

pub fn person_bob() -> TestData {
    TestData::person("Bob", 30)
}

pub fn person_charlie() -> TestData {
    TestData::person("Charlie", 35)
}

pub fn person_diane() -> TestData {
    TestData::person("Diane", 40)
}

pub fn animal_dog() -> TestData {
    TestData::animal("Dog", 4)
}

pub fn animal_spider() -> TestData {
    TestData::animal("Spider", 8)
}

pub fn animal_bird() -> TestData {
    TestData::animal("Bird", 2)
}
