//! The outside world as seen by built-in functions.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::io::{self, BufRead, Write};

/// Backs `print`, `input` and `random`.
pub trait Host {
    fn print(&mut self, text: &str);

    /// One line of input without its line terminator.
    fn input(&mut self) -> String;

    /// A number in `0..maximum`, or 0 when `maximum` isn't positive.
    fn random(&mut self, maximum: i32) -> i32;
}

/// Standard streams and a xorshift generator.
#[derive(Debug)]
pub struct StdHost {
    state: u64,
}

impl StdHost {
    pub fn new() -> Self {
        let seed = RandomState::new().build_hasher().finish();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        // xorshift never leaves zero
        Self { state: seed | 1 }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for StdHost {
    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
    }

    fn input(&mut self) -> String {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            line.clear();
        }
        line.trim_end_matches(['\r', '\n']).to_string()
    }

    fn random(&mut self, maximum: i32) -> i32 {
        if maximum <= 0 {
            return 0;
        }
        (self.next() % maximum as u64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let mut host = StdHost::with_seed(42);
        for _ in 0..1000 {
            let value = host.random(10);
            assert!((0..10).contains(&value));
        }
        assert_eq!(host.random(0), 0);
        assert_eq!(host.random(-5), 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = StdHost::with_seed(7);
        let mut b = StdHost::with_seed(7);
        let first: Vec<i32> = (0..16).map(|_| a.random(1000)).collect();
        let second: Vec<i32> = (0..16).map(|_| b.random(1000)).collect();
        assert_eq!(first, second);
    }
}
