//! Host-facing lifecycle: describe a filter, prepare it against caller-owned
//! memory, then run blocks.
//!
//! ```text
//! FilterInstance --prepare--> PreparedFilter --begin_block--> BlockProcessor
//!       ^                          ^                               |
//!       |                          +------- conclude / drop -------+
//!   set_model / set_config
//! ```
//!
//! Audio-rate calls exist only on [`BlockProcessor`], which pushes the voices'
//! coefficients when it opens and pulls the interpolated coefficients back
//! when it closes, so the two can never be forgotten or reordered.

use thiserror::Error;
use tracing::{debug, warn};
use wide::f32x4;

use crate::coefficients::{CoefficientExtras, CoefficientMaker};
use crate::config::{self, FilterModel, ModelConfig};
use crate::control::{FilterMessage, MessageReceiver};
use crate::dispatch::{get_compensated_qf_ptr, get_qf_ptr, CompensatedFilter};
use crate::dsp::delay::CombBuffer;
use crate::dsp::lanes::select_active;
use crate::dsp::sinc::sinc_table;
use crate::state::QuadFilterUnitState;
use crate::types::LegacyPair;
use crate::{MAX_BLOCK_SIZE, N_LANES};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrepareError {
    #[error("no filter model selected")]
    Unconfigured,

    #[error("{config} is not a valid configuration of {model}")]
    UnsupportedConfig { model: FilterModel, config: ModelConfig },

    #[error("{0} has no processing implementation")]
    NotImplemented(FilterModel),

    #[error("lane {lane} needs a comb delay buffer")]
    MissingDelayBuffer { lane: usize },

    #[error("sample rate {0} must be finite and positive")]
    InvalidSampleRate(f32),

    #[error("block size {0} must be between 1 and {max}", max = MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),

    #[error("lane {0} is out of range")]
    LaneOutOfRange(usize),
}

/// Control parameters of one voice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoiceParams {
    /// Cutoff in semitones relative to A440.
    pub freq: f32,
    pub resonance: f32,
    pub extras: CoefficientExtras,
}

impl VoiceParams {
    pub fn new(freq: f32, resonance: f32) -> Self {
        Self {
            freq,
            resonance,
            extras: CoefficientExtras::default(),
        }
    }
}

/// Unprepared description of a filter. Cheap to clone and edit on any thread.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterInstance {
    sample_rate: f32,
    block_size: usize,
    model: Option<FilterModel>,
    config: ModelConfig,
    gain_compensation: bool,
}

impl FilterInstance {
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        Self {
            sample_rate,
            block_size,
            model: None,
            config: ModelConfig::default(),
            gain_compensation: false,
        }
    }

    pub fn with_model(mut self, model: FilterModel) -> Self {
        self.set_model(model);
        self
    }

    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn with_gain_compensation(mut self, enabled: bool) -> Self {
        self.gain_compensation = enabled;
        self
    }

    pub fn set_model(&mut self, model: FilterModel) {
        self.model = Some(model);
    }

    pub fn set_config(&mut self, config: ModelConfig) {
        self.config = config;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size;
    }

    pub fn set_gain_compensation(&mut self, enabled: bool) {
        self.gain_compensation = enabled;
    }

    /// Replace the tuple with the closest valid one for the current model.
    pub fn snap_to_valid_config(&mut self) -> Option<ModelConfig> {
        let closest = config::closest_valid_config(self.model?, self.config)?;
        self.config = closest;
        Some(closest)
    }

    pub fn model(&self) -> Option<FilterModel> {
        self.model
    }

    pub fn config(&self) -> ModelConfig {
        self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Resolve the configuration and bind the state to `delay_buffers`.
    ///
    /// Comb models need a buffer for every lane; other models ignore them.
    /// On failure nothing is built and the description is unchanged.
    pub fn prepare<'a>(
        &self,
        delay_buffers: [Option<&'a mut CombBuffer>; N_LANES],
    ) -> Result<PreparedFilter<'a>, PrepareError> {
        self.try_prepare(delay_buffers).inspect_err(|error| {
            warn!(%error, model = ?self.model, config = %self.config, "filter preparation failed");
        })
    }

    fn try_prepare<'a>(
        &self,
        delay_buffers: [Option<&'a mut CombBuffer>; N_LANES],
    ) -> Result<PreparedFilter<'a>, PrepareError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(PrepareError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(PrepareError::InvalidBlockSize(self.block_size));
        }
        let model = self.model.ok_or(PrepareError::Unconfigured)?;
        if !model.is_implemented() {
            return Err(PrepareError::NotImplemented(model));
        }
        let legacy = config::resolve(model, self.config).ok_or(PrepareError::UnsupportedConfig {
            model,
            config: self.config,
        })?;

        let filter = if self.gain_compensation {
            get_compensated_qf_ptr(legacy.filter_type, legacy.sub_type)
        } else {
            get_qf_ptr(legacy.filter_type, legacy.sub_type).map(CompensatedFilter::uncompensated)
        }
        .ok_or(PrepareError::NotImplemented(model))?;

        if legacy.filter_type.needs_delay_buffer() {
            if let Some(lane) = delay_buffers.iter().position(Option::is_none) {
                return Err(PrepareError::MissingDelayBuffer { lane });
            }
            sinc_table();
        }

        let mut state = QuadFilterUnitState::with_delay_buffers(self.sample_rate, delay_buffers);
        state.reset_registers();

        debug!(
            %model,
            config = %self.config,
            filter_type = ?legacy.filter_type,
            sub_type = %legacy.sub_type,
            gain = filter.gain,
            "filter configuration resolved"
        );

        Ok(PreparedFilter {
            state,
            makers: std::array::from_fn(|_| CoefficientMaker::new(self.sample_rate, self.block_size)),
            voices: [VoiceParams::default(); N_LANES],
            frozen: [false; N_LANES],
            legacy,
            model,
            config: self.config,
            filter,
            block_size: self.block_size,
        })
    }
}

/// A resolved filter bound to its delay memory, ready to run blocks.
pub struct PreparedFilter<'a> {
    state: QuadFilterUnitState<'a>,
    makers: [CoefficientMaker; N_LANES],
    voices: [VoiceParams; N_LANES],
    frozen: [bool; N_LANES],
    legacy: LegacyPair,
    model: FilterModel,
    config: ModelConfig,
    filter: CompensatedFilter,
    block_size: usize,
}

impl<'a> PreparedFilter<'a> {
    pub fn model(&self) -> FilterModel {
        self.model
    }

    pub fn config(&self) -> ModelConfig {
        self.config
    }

    pub fn legacy_pair(&self) -> LegacyPair {
        self.legacy
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn gain(&self) -> f32 {
        self.filter.gain
    }

    pub fn state(&self) -> &QuadFilterUnitState<'a> {
        &self.state
    }

    pub fn maker(&self, lane: usize) -> Result<&CoefficientMaker, PrepareError> {
        self.makers.get(lane).ok_or(PrepareError::LaneOutOfRange(lane))
    }

    pub fn voice(&self, lane: usize) -> Result<VoiceParams, PrepareError> {
        self.voices.get(lane).copied().ok_or(PrepareError::LaneOutOfRange(lane))
    }

    pub fn set_voice(&mut self, lane: usize, params: VoiceParams) -> Result<(), PrepareError> {
        *self.voices.get_mut(lane).ok_or(PrepareError::LaneOutOfRange(lane))? = params;
        Ok(())
    }

    pub fn active_voices(&self) -> usize {
        self.state.active_lanes()
    }

    pub fn is_lane_active(&self, lane: usize) -> bool {
        self.state.active.get(lane).copied().unwrap_or(false)
    }

    /// Turn a voice on or off. A voice that comes on starts from silence.
    pub fn set_lane_active(&mut self, lane: usize, active: bool) -> Result<(), PrepareError> {
        check_lane(lane)?;
        if active
            && self.legacy.filter_type.needs_delay_buffer()
            && self.state.delay_buffers[lane].is_none()
        {
            return Err(PrepareError::MissingDelayBuffer { lane });
        }
        if active && !self.state.active[lane] {
            self.reset_voice(lane)?;
        }
        self.state.active[lane] = active;
        Ok(())
    }

    /// Voice start: clear registers, delay memory and smoothing history.
    pub fn reset_voice(&mut self, lane: usize) -> Result<(), PrepareError> {
        check_lane(lane)?;
        self.makers[lane].reset();
        self.state.reset_lane(lane);
        self.frozen[lane] = false;
        Ok(())
    }

    /// While frozen a voice keeps gliding toward its last computed target and
    /// ignores parameter changes.
    pub fn freeze_lane(&mut self, lane: usize, frozen: bool) -> Result<(), PrepareError> {
        check_lane(lane)?;
        self.frozen[lane] = frozen;
        Ok(())
    }

    /// Compute one voice's coefficients for the next block.
    pub fn make_coefficients(&mut self, lane: usize) -> Result<(), PrepareError> {
        check_lane(lane)?;
        let maker = &mut self.makers[lane];
        if self.frozen[lane] && !maker.is_first_run() {
            maker.reapply_last();
        } else {
            let voice = &self.voices[lane];
            let LegacyPair { filter_type, sub_type } = self.legacy;
            maker.make_coefficients(voice.freq, voice.resonance, filter_type, sub_type, &voice.extras);
        }
        Ok(())
    }

    /// Compute coefficients for every active voice.
    pub fn update_coefficients(&mut self) {
        for lane in 0..N_LANES {
            if self.state.active[lane] {
                let result = self.make_coefficients(lane);
                debug_assert!(result.is_ok());
            }
        }
    }

    /// Drain queued control messages. Messages for lanes that do not exist are
    /// dropped.
    pub fn apply_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            let lane = message.lane();
            if lane >= N_LANES {
                continue;
            }
            let result = match message {
                FilterMessage::SetCutoff { freq, .. } => {
                    self.voices[lane].freq = freq;
                    Ok(())
                }
                FilterMessage::SetResonance { resonance, .. } => {
                    self.voices[lane].resonance = resonance;
                    Ok(())
                }
                FilterMessage::SetExtras { extras, .. } => {
                    self.voices[lane].extras = extras;
                    Ok(())
                }
                FilterMessage::SetActive { active, .. } => self.set_lane_active(lane, active),
                FilterMessage::ResetVoice { .. } => self.reset_voice(lane),
                FilterMessage::Freeze { frozen, .. } => self.freeze_lane(lane, frozen),
            };
            if let Err(error) = result {
                warn!(%error, lane, "control message rejected");
            }
        }
    }

    /// Open a block: every active voice's coefficients are written into its
    /// lane and inactive lanes hold still. Exactly `block_size` samples must
    /// be processed before the processor is dropped.
    pub fn begin_block(&mut self) -> BlockProcessor<'_, 'a> {
        for lane in 0..N_LANES {
            if self.state.active[lane] {
                self.makers[lane].to_state_lane(&mut self.state, lane);
            } else {
                self.state.hold_lane(lane);
            }
        }
        BlockProcessor {
            filter: self,
            processed: 0,
        }
    }

    /// Convenience for a full control-rate step followed by one block.
    pub fn process_block(&mut self, block: &mut [f32x4]) {
        self.update_coefficients();
        let mut processor = self.begin_block();
        for frame in block.iter_mut() {
            *frame = processor.process_sample(*frame);
        }
    }
}

fn check_lane(lane: usize) -> Result<(), PrepareError> {
    if lane < N_LANES {
        Ok(())
    } else {
        Err(PrepareError::LaneOutOfRange(lane))
    }
}

/// The only place audio is processed. Dropping it pulls the interpolated
/// coefficients back into the voices' makers.
pub struct BlockProcessor<'p, 'a> {
    filter: &'p mut PreparedFilter<'a>,
    processed: usize,
}

impl BlockProcessor<'_, '_> {
    /// One sample for all four lanes. Inactive lanes output silence.
    #[inline]
    pub fn process_sample(&mut self, input: f32x4) -> f32x4 {
        debug_assert!(
            self.processed < self.filter.block_size,
            "more than {} samples in one block",
            self.filter.block_size
        );
        self.processed += 1;
        let state = &mut self.filter.state;
        let out = self.filter.filter.run(state, input);
        select_active(out, &state.active)
    }

    #[inline]
    pub fn process_lanes(&mut self, input: [f32; N_LANES]) -> [f32; N_LANES] {
        self.process_sample(f32x4::from(input)).to_array()
    }

    pub fn remaining(&self) -> usize {
        self.filter.block_size.saturating_sub(self.processed)
    }

    pub fn conclude(self) {}
}

impl Drop for BlockProcessor<'_, '_> {
    fn drop(&mut self) {
        debug_assert!(
            std::thread::panicking() || self.processed == self.filter.block_size,
            "block closed after {} of {} samples",
            self.processed,
            self.filter.block_size
        );
        let filter = &mut *self.filter;
        for lane in 0..N_LANES {
            if filter.state.active[lane] {
                filter.makers[lane].update_from_state_lane(&filter.state, lane);
            }
        }
    }
}
