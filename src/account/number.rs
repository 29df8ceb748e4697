//! External account number generation

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::Rng;
use rand::rngs::OsRng;

/// Default length of an external account number
pub const ACCOUNT_NUMBER_LENGTH: usize = 16;

/// Source of candidate account numbers.
///
/// Uniqueness is enforced by the store; a generator only has to make
/// collisions unlikely and numbers unpredictable.
pub trait AccountNumberGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Fixed-length decimal numbers drawn from the operating system CSPRNG
pub struct RandomAccountNumbers {
    length: usize,
}

impl RandomAccountNumbers {
    pub fn new(length: usize) -> Self {
        Self {
            length: if length == 0 {
                ACCOUNT_NUMBER_LENGTH
            } else {
                length
            },
        }
    }
}

impl Default for RandomAccountNumbers {
    fn default() -> Self {
        Self::new(ACCOUNT_NUMBER_LENGTH)
    }
}

impl AccountNumberGenerator for RandomAccountNumbers {
    fn generate(&self) -> String {
        (0..self.length)
            .map(|_| char::from(b'0' + OsRng.gen_range(0..10u8)))
            .collect()
    }
}

/// Hands out a preset list of numbers first, then random ones.
///
/// Used to replay a known allocation order (fixtures, collision drills).
pub struct PresetAccountNumbers {
    preset: Mutex<VecDeque<String>>,
    fallback: RandomAccountNumbers,
}

impl PresetAccountNumbers {
    pub fn new<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preset: Mutex::new(numbers.into_iter().map(Into::into).collect()),
            fallback: RandomAccountNumbers::default(),
        }
    }
}

impl AccountNumberGenerator for PresetAccountNumbers {
    fn generate(&self) -> String {
        let next = match self.preset.lock() {
            Ok(mut preset) => preset.pop_front(),
            Err(_) => None,
        };
        next.unwrap_or_else(|| self.fallback.generate())
    }
}
