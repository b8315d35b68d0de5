use super::ReverbParams;
use crate::bands::Bands;
use crate::config::{AudioSettings, ReverbEffectSettings};
use crate::dsp::{AudioBuffer, BandSplitter, flush_denormal};
use crate::error::{AcousticsError, Result};

const FDN_ORDER: usize = 4;

/// Mutually prime at common sampling rates.
const FDN_DELAYS_MS: [f32; FDN_ORDER] = [29.7, 37.1, 41.1, 43.7];

const NUM_ALLPASSES: usize = 2;
const ALLPASS_DELAYS: [usize; NUM_ALLPASSES] = [225, 341];
const ALLPASS_GAIN: f32 = 0.5;

/// Every delay of channel `c` is lengthened by `c * CHANNEL_SPREAD` samples
/// so that channels decorrelate.
const CHANNEL_SPREAD: usize = 23;

/// Longest decay time the effect renders, in seconds. Longer decay times are
/// clamped to it.
pub const MAX_DECAY_TIME: f32 = 60.0;

/// Whether an effect still has audible output after its input stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    TailRemaining,
    TailComplete,
}

#[derive(Debug, Clone)]
struct DelayLine {
    buffer: Vec<f32>,
    position: usize,
}

impl DelayLine {
    fn new(delay: usize) -> Self {
        Self {
            buffer: vec![0.0; delay.max(1)],
            position: 0,
        }
    }

    fn delay(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the sample written `delay()` calls ago and stores `value`.
    #[inline]
    fn exchange(&mut self, value: f32) -> f32 {
        let out = self.buffer[self.position];
        self.buffer[self.position] = value;
        self.position += 1;
        if self.position == self.buffer.len() {
            self.position = 0;
        }
        out
    }

    #[inline]
    fn peek(&self) -> f32 {
        self.buffer[self.position]
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.position = 0;
    }
}

/// Orthonormal 4x4 Hadamard mix.
#[inline]
fn hadamard([a, b, c, d]: [f32; FDN_ORDER]) -> [f32; FDN_ORDER] {
    [
        0.5 * (a + b + c + d),
        0.5 * (a - b + c - d),
        0.5 * (a + b - c - d),
        0.5 * (a - b - c + d),
    ]
}

/// Feedback delay network: four delay lines whose attenuated outputs are
/// mixed by [`hadamard`] and fed back into every line together with the
/// input.
#[derive(Debug, Clone)]
struct FeedbackDelayNetwork {
    lines: [DelayLine; FDN_ORDER],
}

impl FeedbackDelayNetwork {
    fn new(sampling_rate: u32, spread: usize) -> Self {
        Self {
            lines: FDN_DELAYS_MS.map(|ms| {
                DelayLine::new((ms * 1e-3 * sampling_rate as f32).round() as usize + spread)
            }),
        }
    }

    /// Line gains for a 60 dB decay over `decay_time` seconds.
    ///
    /// The per-sample gain is g = 10^(-3 / (T * fs)); a line of d samples
    /// uses g^d, so every path through the network decays at the same rate.
    fn feedback(&self, decay_time: f32, sampling_rate: f32) -> [f32; FDN_ORDER] {
        std::array::from_fn(|k| {
            10f32.powf(-3.0 * self.lines[k].delay() as f32 / (decay_time * sampling_rate))
        })
    }

    #[inline]
    fn process(&mut self, x: f32, feedback: &[f32; FDN_ORDER]) -> f32 {
        let outputs: [f32; FDN_ORDER] =
            std::array::from_fn(|k| feedback[k] * self.lines[k].peek());
        for (line, mixed) in self.lines.iter_mut().zip(hadamard(outputs)) {
            line.exchange(flush_denormal(x + mixed));
        }
        outputs.iter().sum()
    }

    fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }
}

/// Schroeder allpass.
#[derive(Debug, Clone)]
struct Allpass {
    line: DelayLine,
}

impl Allpass {
    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        let delayed = self.line.peek();
        let w = flush_denormal(x + ALLPASS_GAIN * delayed);
        self.line.exchange(w);
        delayed - ALLPASS_GAIN * w
    }
}

#[derive(Debug, Clone)]
struct ChannelState {
    splitter: BandSplitter,
    /// One network per band.
    networks: Vec<FeedbackDelayNetwork>,
    active: Vec<bool>,
    allpasses: [Allpass; NUM_ALLPASSES],
}

impl ChannelState {
    fn new(bands: Bands, sampling_rate: u32, channel: usize) -> Self {
        let spread = channel * CHANNEL_SPREAD;

        Self {
            splitter: BandSplitter::new(bands, sampling_rate),
            networks: (0..bands.num_bands())
                .map(|_| FeedbackDelayNetwork::new(sampling_rate, spread))
                .collect(),
            active: vec![false; bands.num_bands()],
            allpasses: ALLPASS_DELAYS.map(|delay| Allpass {
                line: DelayLine::new(delay + spread),
            }),
        }
    }

    fn reset(&mut self) {
        self.splitter.reset();
        for network in &mut self.networks {
            network.clear();
        }
        self.active.fill(false);
        for allpass in &mut self.allpasses {
            allpass.line.clear();
        }
    }
}

/// Multi-band reverberator driven by per-band decay times.
///
/// Each output channel splits its input into bands and feeds every band
/// through its own four-line feedback delay network, with line gains that
/// make the band decay by 60 dB in exactly its decay time. The Hadamard
/// feedback matrix keeps echo density building up over the tail. The band
/// outputs are summed and diffused by two allpasses. Channels use slightly different delays, so a mono input
/// produces a decorrelated multi-channel tail.
///
/// Everything is allocated in [`new`](Self::new); [`apply`](Self::apply) and
/// [`tail`](Self::tail) never allocate, lock or log above trace level.
pub struct ReverbEffect {
    sampling_rate: u32,
    frame_size: usize,
    bands: Bands,
    channels: Vec<ChannelState>,
    band_input: Vec<f32>,
    decay_times: Vec<f32>,
    tone_gains: Vec<f32>,
    tail_frames_remaining: usize,
}

impl ReverbEffect {
    pub fn new(audio: &AudioSettings, settings: &ReverbEffectSettings) -> Result<Self> {
        audio.validate()?;
        settings.validate()?;

        let bands = settings.bands();
        let num_bands = bands.num_bands();
        let channels = (0..settings.num_channels)
            .map(|channel| ChannelState::new(bands, audio.sampling_rate, channel))
            .collect();

        log::info!(
            "Created reverb effect: {} Hz, {} samples per frame, {} channels, {} bands",
            audio.sampling_rate,
            audio.frame_size,
            settings.num_channels,
            num_bands
        );

        Ok(Self {
            sampling_rate: audio.sampling_rate,
            frame_size: audio.frame_size,
            bands,
            channels,
            band_input: vec![0.0; audio.frame_size],
            decay_times: vec![0.0; num_bands],
            tone_gains: vec![0.0; num_bands],
            tail_frames_remaining: 0,
        })
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn bands(&self) -> Bands {
        self.bands
    }

    /// Checks that `params` was produced for this effect's band layout.
    ///
    /// Call before handing parameters to the audio thread.
    pub fn validate_params(&self, params: &ReverbParams) -> Result<()> {
        self.bands.ensure_compatible(&params.bands())?;
        if params.decay_times().len() != self.bands.num_bands() {
            return Err(AcousticsError::Configuration(format!(
                "Expected {} decay times, got {}",
                self.bands.num_bands(),
                params.decay_times().len()
            )));
        }
        Ok(())
    }

    /// Renders one frame of reverb for `input` into `output`.
    ///
    /// `input` may be mono, in which case every output channel is fed from it,
    /// or have one channel per output channel. Decay times of zero silence
    /// their band; negative or non-finite decay times are treated as zero,
    /// and decay times above [`MAX_DECAY_TIME`] are clamped to it.
    ///
    /// # Errors
    ///
    /// Mismatched band layouts, frame sizes or channel counts are rejected
    /// before any state is touched.
    pub fn apply(
        &mut self,
        params: &ReverbParams,
        input: &AudioBuffer,
        output: &mut AudioBuffer,
    ) -> Result<EffectState> {
        self.validate_params(params)?;
        self.check_input(input)?;
        self.check_output(output)?;

        for (dst, &t) in self.decay_times.iter_mut().zip(params.decay_times()) {
            *dst = if t.is_finite() && t > 0.0 {
                t.min(MAX_DECAY_TIME)
            } else {
                0.0
            };
        }

        self.process(Some(input), output);

        let max_decay_time = self.decay_times.iter().copied().fold(0.0, f32::max);
        // Twice the longest decay, so the tail is rendered well below -60 dB.
        let frames = (max_decay_time as f64 * self.sampling_rate as f64
            / self.frame_size as f64)
            .ceil() as usize;
        self.tail_frames_remaining = frames.saturating_mul(2);

        Ok(self.state())
    }

    /// Renders one frame of the tail left by previous calls to
    /// [`apply`](Self::apply), with no new input.
    pub fn tail(&mut self, output: &mut AudioBuffer) -> Result<EffectState> {
        self.check_output(output)?;

        self.process(None, output);
        self.tail_frames_remaining = self.tail_frames_remaining.saturating_sub(1);

        Ok(self.state())
    }

    /// Samples per channel of tail still to be rendered.
    pub fn tail_samples_remaining(&self) -> usize {
        self.tail_frames_remaining.saturating_mul(self.frame_size)
    }

    /// Clears all filter history and the pending tail.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
        self.tail_frames_remaining = 0;
    }

    fn state(&self) -> EffectState {
        if self.tail_frames_remaining > 0 {
            EffectState::TailRemaining
        } else {
            EffectState::TailComplete
        }
    }

    fn check_input(&self, input: &AudioBuffer) -> Result<()> {
        if input.num_samples() != self.frame_size {
            return Err(AcousticsError::FrameSizeMismatch {
                expected: self.frame_size,
                actual: input.num_samples(),
            });
        }
        if input.num_channels() != 1 && input.num_channels() != self.channels.len() {
            return Err(AcousticsError::ChannelCountMismatch {
                expected: self.channels.len(),
                actual: input.num_channels(),
            });
        }
        Ok(())
    }

    fn check_output(&self, output: &AudioBuffer) -> Result<()> {
        if output.num_samples() != self.frame_size {
            return Err(AcousticsError::FrameSizeMismatch {
                expected: self.frame_size,
                actual: output.num_samples(),
            });
        }
        if output.num_channels() != self.channels.len() {
            return Err(AcousticsError::ChannelCountMismatch {
                expected: self.channels.len(),
                actual: output.num_channels(),
            });
        }
        Ok(())
    }

    fn update_tone_gains(&mut self) {
        // Shorter decays are louder per unit time; scale so the total energy
        // of each band's tail is roughly equal.
        for (gain, &t) in self.tone_gains.iter_mut().zip(&self.decay_times) {
            *gain = if t > 0.0 { (1.0 / t).sqrt() } else { 0.0 };
        }
        let max_gain = self.tone_gains.iter().copied().fold(0.0, f32::max);
        if max_gain > 0.0 {
            for gain in &mut self.tone_gains {
                *gain /= max_gain;
            }
        }
    }

    fn process(&mut self, input: Option<&AudioBuffer>, output: &mut AudioBuffer) {
        self.update_tone_gains();

        let sampling_rate = self.sampling_rate as f32;
        let Self {
            channels,
            band_input,
            decay_times,
            tone_gains,
            ..
        } = self;

        for (c, state) in channels.iter_mut().enumerate() {
            let out = output.channel_mut(c);
            out.fill(0.0);

            for (band, &decay_time) in decay_times.iter().enumerate() {
                if decay_time <= 0.0 {
                    if state.active[band] {
                        state.networks[band].clear();
                        state.active[band] = false;
                    }
                    continue;
                }
                state.active[band] = true;

                match input {
                    Some(input) => {
                        let source = if input.num_channels() == 1 { 0 } else { c };
                        band_input.copy_from_slice(input.channel(source));
                    }
                    None => band_input.fill(0.0),
                }
                state.splitter.split_in_place(band, band_input);

                let network = &mut state.networks[band];
                let feedback = network.feedback(decay_time, sampling_rate);
                let gain = tone_gains[band] / FDN_ORDER as f32;

                for (y, &x) in out.iter_mut().zip(band_input.iter()) {
                    *y += gain * network.process(x, &feedback);
                }
            }

            for y in out.iter_mut() {
                for allpass in &mut state.allpasses {
                    *y = allpass.process(*y);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandLayout;

    const FRAME: usize = 1024;

    fn effect(sampling_rate: u32) -> ReverbEffect {
        ReverbEffect::new(
            &AudioSettings::new().sampling_rate(sampling_rate).frame_size(FRAME),
            &ReverbEffectSettings::default(),
        )
        .unwrap()
    }

    fn impulse() -> AudioBuffer {
        let mut buffer = AudioBuffer::new(1, FRAME);
        buffer.channel_mut(0)[0] = 1.0;
        buffer
    }

    /// Renders the impulse response and returns its energy per sample,
    /// summed over channels.
    fn impulse_response_energy(
        effect: &mut ReverbEffect,
        params: &ReverbParams,
        seconds: f32,
    ) -> Vec<f64> {
        let sampling_rate = effect.sampling_rate as f32;
        let num_frames = (seconds * sampling_rate / FRAME as f32).ceil() as usize;
        let silence = AudioBuffer::new(1, FRAME);
        let mut output = AudioBuffer::new(effect.num_channels(), FRAME);
        let mut energy = Vec::with_capacity(num_frames * FRAME);

        for frame in 0..num_frames {
            let input = if frame == 0 { impulse() } else { silence.clone() };
            effect.apply(params, &input, &mut output).unwrap();
            for i in 0..FRAME {
                energy.push(
                    output
                        .channels()
                        .map(|ch| (ch[i] as f64) * (ch[i] as f64))
                        .sum(),
                );
            }
        }
        energy
    }

    /// Backward-integrated decay curve fitted between -5 and -35 dB,
    /// extrapolated to 60 dB.
    fn measure_decay_time(energy: &[f64], sampling_rate: u32) -> f32 {
        let total: f64 = energy.iter().sum();
        let mut remaining = total;
        let (mut n, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);

        for (i, e) in energy.iter().enumerate() {
            let db = 10.0 * (remaining / total).log10();
            if (-35.0..=-5.0).contains(&db) {
                let t = i as f64 / sampling_rate as f64;
                n += 1.0;
                sx += t;
                sy += db;
                sxx += t * t;
                sxy += t * db;
            }
            remaining -= e;
        }

        let slope = (n * sxy - sx * sy) / (n * sxx - sx * sx);
        (-60.0 / slope) as f32
    }

    #[test]
    fn test_decay_time_matches_parameters() {
        let _ = env_logger::builder().is_test(true).try_init();

        for sampling_rate in [44100, 48000] {
            for decay_time in [0.5f32, 1.0, 2.0] {
                let mut effect = effect(sampling_rate);
                let params = ReverbParams::uniform(BandLayout::ThreeBand, decay_time);
                let energy =
                    impulse_response_energy(&mut effect, &params, 1.5 * decay_time + 0.2);
                let measured = measure_decay_time(&energy, sampling_rate);

                assert!(
                    (measured - decay_time).abs() / decay_time < 0.1,
                    "{sampling_rate} Hz: expected {decay_time} s, measured {measured} s"
                );
            }
        }
    }

    fn assert_decay_time(sampling_rate: u32, params: &ReverbParams, expected: f32) {
        let mut effect = ReverbEffect::new(
            &AudioSettings::new().sampling_rate(sampling_rate).frame_size(FRAME),
            &ReverbEffectSettings::new().band_layout(params.band_layout()),
        )
        .unwrap();
        let energy = impulse_response_energy(&mut effect, params, 1.5 * expected + 0.2);
        let measured = measure_decay_time(&energy, sampling_rate);

        assert!(
            (measured - expected).abs() / expected < 0.1,
            "{sampling_rate} Hz, {:?}: expected {expected} s, measured {measured} s",
            params.decay_times()
        );
    }

    #[test]
    fn test_single_band_decay_time_matches_parameters() {
        for sampling_rate in [44100, 48000] {
            for decay_time in [0.5f32, 1.0, 2.0] {
                let params =
                    ReverbParams::new(BandLayout::ThreeBand, vec![0.0, decay_time, 0.0]).unwrap();
                assert_decay_time(sampling_rate, &params, decay_time);
            }
        }
    }

    #[test]
    fn test_single_octave_band_decay_time_matches_parameters() {
        let bands = Bands::new(BandLayout::Octave);
        for band in [4, 6] {
            for decay_time in [0.5f32, 1.5] {
                let mut decay_times = vec![0.0; bands.num_bands()];
                decay_times[band] = decay_time;
                let params = ReverbParams::new(BandLayout::Octave, decay_times).unwrap();
                assert_decay_time(48000, &params, decay_time);
            }
        }
    }

    #[test]
    fn test_hadamard_preserves_energy() {
        let input = [0.3f32, -1.2, 0.7, 2.0];
        let mixed = hadamard(input);
        let energy = |v: [f32; FDN_ORDER]| v.iter().map(|x| x * x).sum::<f32>();
        assert!((energy(mixed) - energy(input)).abs() < 1e-5);
        for (x, y) in hadamard(mixed).iter().zip(&input) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_huge_decay_time_is_clamped() {
        let expected_frames = 2 * (MAX_DECAY_TIME as f64 * 48000.0 / FRAME as f64).ceil() as usize;

        for decay_time in [1e20f32, f32::MAX] {
            let mut effect = effect(48000);
            let params = ReverbParams::uniform(BandLayout::ThreeBand, decay_time);
            let mut output = AudioBuffer::new(2, FRAME);

            let state = effect.apply(&params, &impulse(), &mut output).unwrap();
            assert_eq!(state, EffectState::TailRemaining);
            assert_eq!(effect.tail_samples_remaining(), expected_frames * FRAME);
            assert!(output.channels().flatten().all(|x| x.is_finite()));

            effect.tail(&mut output).unwrap();
            assert!(output.channels().flatten().all(|x| x.is_finite()));
            assert!(output.peak() > 0.0);
        }
    }

    #[test]
    fn test_zero_decay_is_silent() {
        let mut effect = effect(48000);
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 0.0);
        let mut output = AudioBuffer::new(2, FRAME);
        let mut input = AudioBuffer::new(1, FRAME);
        for (i, x) in input.channel_mut(0).iter_mut().enumerate() {
            *x = ((i * 31) % 17) as f32 / 17.0 - 0.5;
        }

        for _ in 0..4 {
            effect.apply(&params, &input, &mut output).unwrap();
            assert_eq!(output.peak(), 0.0);
        }
        assert_eq!(effect.tail_samples_remaining(), 0);
    }

    #[test]
    fn test_negative_and_nan_decay_are_clamped_to_zero() {
        let mut effect = effect(48000);
        let params =
            ReverbParams::new(BandLayout::ThreeBand, vec![-1.0, f32::NAN, f32::INFINITY]).unwrap();
        let mut output = AudioBuffer::new(2, FRAME);
        let state = effect.apply(&params, &impulse(), &mut output).unwrap();
        assert_eq!(output.peak(), 0.0);
        assert_eq!(state, EffectState::TailComplete);
    }

    #[test]
    fn test_silencing_one_band_keeps_others() {
        let mut effect = effect(48000);
        let params = ReverbParams::new(BandLayout::ThreeBand, vec![0.0, 1.0, 0.0]).unwrap();
        let energy = impulse_response_energy(&mut effect, &params, 0.3);
        assert!(energy.iter().sum::<f64>() > 0.0);
    }

    #[test]
    fn test_history_carries_across_frames() {
        let mut effect = effect(48000);
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 1.0);
        let mut output = AudioBuffer::new(2, FRAME);
        effect.apply(&params, &impulse(), &mut output).unwrap();

        // The first echo arrives ~30 ms in, after the first frame.
        effect
            .apply(&params, &AudioBuffer::new(1, FRAME), &mut output)
            .unwrap();
        assert!(output.peak() > 0.0);
    }

    #[test]
    fn test_channels_are_decorrelated() {
        let mut effect = effect(48000);
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 1.0);
        let mut output = AudioBuffer::new(2, FRAME);
        effect.apply(&params, &impulse(), &mut output).unwrap();
        effect
            .apply(&params, &AudioBuffer::new(1, FRAME), &mut output)
            .unwrap();
        assert_ne!(output.channel(0), output.channel(1));
    }

    #[test]
    fn test_mismatches_are_rejected_without_touching_state() {
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 1.0);
        let mut reference = effect(48000);
        let mut checked = effect(48000);
        let mut output = AudioBuffer::new(2, FRAME);
        let mut scratch = AudioBuffer::new(2, FRAME);

        reference.apply(&params, &impulse(), &mut output).unwrap();
        checked.apply(&params, &impulse(), &mut scratch).unwrap();

        let short = AudioBuffer::new(1, FRAME / 2);
        assert_eq!(
            checked.apply(&params, &short, &mut scratch),
            Err(AcousticsError::FrameSizeMismatch {
                expected: FRAME,
                actual: FRAME / 2
            })
        );

        let mut short_output = AudioBuffer::new(2, FRAME - 1);
        assert!(matches!(
            checked.apply(&params, &impulse(), &mut short_output),
            Err(AcousticsError::FrameSizeMismatch { .. })
        ));

        let three_channels = AudioBuffer::new(3, FRAME);
        assert_eq!(
            checked.apply(&params, &three_channels, &mut scratch),
            Err(AcousticsError::ChannelCountMismatch {
                expected: 2,
                actual: 3
            })
        );

        let mut mono_output = AudioBuffer::new(1, FRAME);
        assert!(matches!(
            checked.tail(&mut mono_output),
            Err(AcousticsError::ChannelCountMismatch { .. })
        ));

        let octave = ReverbParams::uniform(BandLayout::Octave, 1.0);
        assert!(matches!(
            checked.apply(&octave, &impulse(), &mut scratch),
            Err(AcousticsError::BandModelMismatch { .. })
        ));
        assert!(checked.validate_params(&octave).is_err());
        assert!(checked.validate_params(&params).is_ok());

        let silence = AudioBuffer::new(1, FRAME);
        reference.apply(&params, &silence, &mut output).unwrap();
        checked.apply(&params, &silence, &mut scratch).unwrap();
        assert_eq!(output, scratch);
    }

    #[test]
    fn test_tail_runs_to_completion() {
        let mut effect = effect(48000);
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 0.5);
        let mut output = AudioBuffer::new(2, FRAME);

        let state = effect.apply(&params, &impulse(), &mut output).unwrap();
        assert_eq!(state, EffectState::TailRemaining);

        // 2 * ceil(0.5 s * 48000 / 1024) frames.
        let expected_frames = 2 * 24;
        assert_eq!(effect.tail_samples_remaining(), expected_frames * FRAME);

        let mut frames = 0;
        let mut early_peak = 0.0f32;
        loop {
            let state = effect.tail(&mut output).unwrap();
            frames += 1;
            if frames <= 4 {
                early_peak = early_peak.max(output.peak());
            }
            if state == EffectState::TailComplete {
                break;
            }
        }
        assert_eq!(frames, expected_frames);
        assert!(early_peak > 0.0);
        // 2 decay times later the tail is far below its start.
        assert!(output.peak() < 1e-3 * early_peak);

        assert_eq!(effect.tail(&mut output).unwrap(), EffectState::TailComplete);
    }

    #[test]
    fn test_reset_clears_tail() {
        let mut effect = effect(48000);
        let params = ReverbParams::uniform(BandLayout::ThreeBand, 1.0);
        let mut output = AudioBuffer::new(2, FRAME);
        effect.apply(&params, &impulse(), &mut output).unwrap();

        effect.reset();
        assert_eq!(effect.tail_samples_remaining(), 0);
        effect.tail(&mut output).unwrap();
        assert_eq!(output.peak(), 0.0);
    }

    #[test]
    fn test_invalid_construction() {
        let settings = ReverbEffectSettings::default();
        assert!(ReverbEffect::new(&AudioSettings::new().sampling_rate(0), &settings).is_err());
        assert!(ReverbEffect::new(&AudioSettings::new().frame_size(0), &settings).is_err());
        assert!(
            ReverbEffect::new(&AudioSettings::new(), &settings.num_channels(0)).is_err()
        );

        let octave = ReverbEffect::new(
            &AudioSettings::new(),
            &ReverbEffectSettings::new().band_layout(BandLayout::Octave).num_channels(1),
        )
        .unwrap();
        assert_eq!(octave.bands().num_bands(), 10);
        assert_eq!(octave.num_channels(), 1);
    }
}
