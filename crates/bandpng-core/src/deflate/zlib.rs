//! zlib framing: the two-byte stream header and the Adler-32 trailer.

use crate::encode::CompressionLevel;

/// CMF byte: DEFLATE with a 32 KiB window.
const CMF: u8 = 0x78;

/// Largest number of bytes that can be summed before `b` may overflow u32.
const NMAX: usize = 5552;
const MOD_ADLER: u32 = 65521;

/// zlib stream header for `level`.
///
/// The FLEVEL bits follow zlib's own mapping (0-1 fastest, 2-5 fast,
/// 6 default, 7-9 maximum), and FCHECK makes the header a multiple of 31.
pub fn zlib_header(level: CompressionLevel) -> [u8; 2] {
    let flevel: u8 = match level.value() {
        0..=1 => 0,
        2..=5 => 1,
        6 => 2,
        _ => 3,
    };
    let flg = flevel << 6;
    let check = (31 - ((CMF as u16) << 8 | flg as u16) % 31) % 31;
    [CMF, flg | check as u8]
}

/// Running Adler-32 checksum.
#[derive(Debug, Clone, Copy)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self { a: 1, b: 0 }
    }
}

impl Adler32 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                self.a += byte as u32;
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    pub fn finish(self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// Adler-32 of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.update(data);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_headers() {
        let header = |level: u8| zlib_header(CompressionLevel::new(level).unwrap());
        assert_eq!(header(0), [0x78, 0x01]);
        assert_eq!(header(1), [0x78, 0x01]);
        assert_eq!(header(4), [0x78, 0x5E]);
        assert_eq!(header(6), [0x78, 0x9C]);
        assert_eq!(header(9), [0x78, 0xDA]);
    }

    #[test]
    fn test_headers_pass_fcheck() {
        for level in 0..=9u8 {
            let [cmf, flg] = zlib_header(CompressionLevel::new(level).unwrap());
            assert_eq!(((cmf as u16) << 8 | flg as u16) % 31, 0, "level {level}");
        }
    }

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(&[]), 1);
        assert_eq!(adler32(b"a"), 0x0062_0062);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_adler32_incremental_matches_one_shot() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 255) as u8 ^ 0x5A).collect();
        let mut hasher = Adler32::new();
        for piece in data.chunks(777) {
            hasher.update(piece);
        }
        assert_eq!(hasher.finish(), adler32(&data));
    }

    #[test]
    fn test_adler32_long_run_of_max_bytes() {
        // Exercises the modulo reduction across several NMAX blocks
        let data = vec![0xFFu8; 3 * NMAX + 17];
        let mut a: u64 = 1;
        let mut b: u64 = 0;
        for &byte in &data {
            a = (a + byte as u64) % MOD_ADLER as u64;
            b = (b + a) % MOD_ADLER as u64;
        }
        assert_eq!(adler32(&data), ((b << 16) | a) as u32);
    }
}
