use crate::error::{AcousticsError, Result};

/// Planar multi-channel audio: one contiguous block of samples per channel.
///
/// Allocated once; the real-time paths only ever read and write in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    num_channels: usize,
    num_samples: usize,
    data: Vec<f32>,
}

impl AudioBuffer {
    /// A silent buffer.
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            num_channels,
            num_samples,
            data: vec![0.0; num_channels * num_samples],
        }
    }

    /// Builds a buffer from per-channel sample vectors of equal length.
    pub fn from_planar(channels: Vec<Vec<f32>>) -> Result<Self> {
        let num_channels = channels.len();
        let num_samples = channels.first().map_or(0, Vec::len);

        if let Some(bad) = channels.iter().position(|c| c.len() != num_samples) {
            return Err(AcousticsError::Configuration(format!(
                "Channel {} has {} samples, expected {}",
                bad,
                channels[bad].len(),
                num_samples
            )));
        }

        Ok(Self {
            num_channels,
            num_samples,
            data: channels.concat(),
        })
    }

    /// Builds a buffer from interleaved samples (`LRLRLR...`).
    pub fn deinterleave(interleaved: &[f32], num_channels: usize) -> Result<Self> {
        if num_channels == 0 || interleaved.len() % num_channels != 0 {
            return Err(AcousticsError::Configuration(format!(
                "Cannot split {} interleaved samples into {} channels",
                interleaved.len(),
                num_channels
            )));
        }

        let mut buffer = Self::new(num_channels, interleaved.len() / num_channels);
        for (frame_index, frame) in interleaved.chunks_exact(num_channels).enumerate() {
            for (channel, &sample) in frame.iter().enumerate() {
                buffer.channel_mut(channel)[frame_index] = sample;
            }
        }
        Ok(buffer)
    }

    /// Writes the buffer into `output` in interleaved order. `output` must hold
    /// at least `num_channels * num_samples` samples.
    pub fn interleave(&self, output: &mut [f32]) {
        for (frame_index, frame) in output
            .chunks_exact_mut(self.num_channels.max(1))
            .take(self.num_samples)
            .enumerate()
        {
            for (channel, sample) in frame.iter_mut().enumerate() {
                *sample = self.channel(channel)[frame_index];
            }
        }
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.num_samples;
        &self.data[start..start + self.num_samples]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.num_samples;
        &mut self.data[start..start + self.num_samples]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.num_samples.max(1)).take(self.num_channels)
    }

    pub fn make_silent(&mut self) {
        self.data.fill(0.0);
    }

    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |peak, x| peak.max(x.abs()))
    }
}
