//! CRC-32 used for stored-value checksums and word-list fingerprints.

const POLY: u32 = 0xEDB8_8320;

/// Incremental CRC-32 (ISO 3309 / ITU-T V.42).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub(crate) const fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        let mut crc = self.state;
        for &byte in data {
            crc ^= u32::from(byte);
            for _ in 0..8 {
                if crc & 1 == 1 {
                    crc = (crc >> 1) ^ POLY;
                } else {
                    crc >>= 1;
                }
            }
        }
        self.state = crc;
    }

    pub(crate) const fn finish(self) -> u32 {
        !self.state
    }
}

/// CRC-32 of `data`.
pub(crate) fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(data);
    hasher.finish()
}

/// CRC-32 of `data` as a lowercase hex string.
pub(crate) fn crc32_hex(data: &[u8]) -> String {
    format!("{:08x}", crc32(data))
}
