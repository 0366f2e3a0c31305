//! Keystream obfuscation for hidden payloads.
//!
//! A seeded additive byte recurrence XORed over the payload disguises
//! byte patterns in the carrier's low bits. This is not encryption:
//! anyone knowing the seed replays the exact same sequence.

/// Additive (Fibonacci-like) byte recurrence, advanced once per payload byte.
///
/// Both registers start at the seed; every emitted byte is the wrapping sum
/// of the two, which then shifts into the registers. Hide and extract seed
/// identical streams, so applying the stream twice restores the plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystream {
    prev: u8,
    cur: u8,
}

impl Keystream {
    /// Seeds both registers. Seed 0 means "disabled" to callers, the
    /// session never constructs a stream for it.
    pub fn new(seed: u8) -> Self {
        Self {
            prev: seed,
            cur: seed,
        }
    }

    /// Emits the next keystream byte, wrapping at 256.
    pub fn next_byte(&mut self) -> u8 {
        let v = self.prev.wrapping_add(self.cur);
        self.prev = self.cur;
        self.cur = v;
        v
    }

    /// XORs every byte of `buf` in place, advancing once per byte.
    pub fn apply(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte ^= self.next_byte();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_one_yields_the_fibonacci_sequence() {
        let mut ks = Keystream::new(1);
        let emitted: Vec<u8> = (0..8).map(|_| ks.next_byte()).collect();

        assert_eq!(emitted, vec![2, 3, 5, 8, 13, 21, 34, 55]);
    }

    #[test]
    fn registers_wrap_modulo_256() {
        let mut ks = Keystream::new(200);

        // 200 + 200 = 400 -> 144
        assert_eq!(ks.next_byte(), 144);
        // 200 + 144 = 344 -> 88
        assert_eq!(ks.next_byte(), 88);
    }

    #[test]
    fn applying_the_same_seed_twice_restores_the_plaintext() {
        let plaintext = b"attack at dawn, bring snacks".to_vec();
        let mut masked = plaintext.clone();

        Keystream::new(42).apply(&mut masked);
        assert_ne!(masked, plaintext);

        Keystream::new(42).apply(&mut masked);
        assert_eq!(masked, plaintext);
    }

    #[test]
    fn different_seeds_do_not_cancel_out() {
        let plaintext = b"attack at dawn".to_vec();
        let mut masked = plaintext.clone();

        Keystream::new(42).apply(&mut masked);
        Keystream::new(43).apply(&mut masked);

        assert_ne!(masked, plaintext);
    }
}
