pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Mono 16-bit PCM record handed to speech recognizers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl PcmAudio {
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Little-endian sample bytes, the `LINEAR16` wire encoding.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
