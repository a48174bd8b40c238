//! CRC-32 as used by ZIP and PNG.
//!
//! Reflected polynomial `0xEDB88320`, initial register `0xFFFFFFFF`,
//! final XOR `0xFFFFFFFF`. Readers verify every entry against this value,
//! so the variant is fixed.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Lookup table, built at compile time and shared read-only.
static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut c = i as u32;
        let mut bit = 0;
        while bit < 8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            bit += 1;
        }
        table[i] = c;
        i += 1;
    }
    table
}

/// Compute the CRC-32 checksum of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let crc = data.iter().fold(0xFFFF_FFFFu32, |crc, &byte| {
        TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8)
    });
    crc ^ 0xFFFF_FFFF
}
