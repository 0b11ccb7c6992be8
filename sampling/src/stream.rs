use aes::{
    Aes128, Block,
    cipher::{BlockEncrypt, KeyInit},
};
use rand_core::{CryptoRng, RngCore};

pub const KEY_BYTES: usize = 16;
pub const IV_BYTES: usize = 16;

const BLOCK_BYTES: usize = 16;

/// Deterministic keyed byte stream: AES-128 in counter mode.
///
/// The keystream is `AES_k(iv) || AES_k(iv + 1) || ...` where the counter is the
/// IV read as a big-endian 128-bit integer, wrapping on overflow. Two streams
/// built from the same key and IV produce the same bytes regardless of how
/// the reads are chunked.
pub struct KeyedStream {
    cipher: Aes128,
    counter: u128,
    block: [u8; BLOCK_BYTES],
    // Bytes of `block` already handed out.
    used: usize,
}

impl KeyedStream {
    pub fn new(key: [u8; KEY_BYTES], iv: [u8; IV_BYTES]) -> KeyedStream {
        KeyedStream {
            cipher: Aes128::new(&key.into()),
            counter: u128::from_be_bytes(iv),
            block: [0u8; BLOCK_BYTES],
            used: BLOCK_BYTES,
        }
    }

    /// Splits `seed` into a key (first [KEY_BYTES] bytes) and an IV (the
    /// remaining bytes, zero-padded or truncated to [IV_BYTES]).
    ///
    /// # Panics
    /// Panics if `seed` is shorter than [KEY_BYTES].
    pub fn from_seed(seed: &[u8]) -> KeyedStream {
        assert!(
            seed.len() >= KEY_BYTES,
            "invalid seed: seed.len()={} < {}",
            seed.len(),
            KEY_BYTES
        );
        let mut key: [u8; KEY_BYTES] = [0u8; KEY_BYTES];
        key.copy_from_slice(&seed[..KEY_BYTES]);
        let mut iv: [u8; IV_BYTES] = [0u8; IV_BYTES];
        let tail: &[u8] = &seed[KEY_BYTES..];
        let len: usize = tail.len().min(IV_BYTES);
        iv[..len].copy_from_slice(&tail[..len]);
        KeyedStream::new(key, iv)
    }

    fn refill(&mut self) {
        let mut block: Block = Block::from(self.counter.to_be_bytes());
        self.cipher.encrypt_block(&mut block);
        self.block.copy_from_slice(&block);
        self.counter = self.counter.wrapping_add(1);
        self.used = 0;
    }
}

impl RngCore for KeyedStream {
    fn next_u32(&mut self) -> u32 {
        let mut bytes: [u8; 4] = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes: [u8; 8] = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        let mut filled: usize = 0;
        while filled < bytes.len() {
            if self.used == BLOCK_BYTES {
                self.refill();
            }
            let take: usize = (BLOCK_BYTES - self.used).min(bytes.len() - filled);
            bytes[filled..filled + take].copy_from_slice(&self.block[self.used..self.used + take]);
            self.used += take;
            filled += take;
        }
    }
}

impl CryptoRng for KeyedStream {}
