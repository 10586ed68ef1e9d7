//! EXS24 instrument-wide parameters

use crate::MOD_SLOTS;

/// One modulation matrix routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModSlot {
    pub destination: i16,
    pub source: i16,
    pub via: i16,
    pub amount: i16,
    pub amount_via: i16,
    pub invert_via: bool,
    pub invert: bool,
    pub bypass: bool,
}

/// Settings decoded from the sparse params table
///
/// Fields not present in a file keep their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub output_volume: i16,
    pub key_scale: i16,
    pub pitch_bend_up: i16,
    pub pitch_bend_down: i16,
    pub mono_mode: i16,
    pub voices: i16,
    pub unison: bool,
    pub transpose: i16,
    pub coarse_tune: i16,
    pub fine_tune: i16,
    pub glide_time: i16,
    pub filter_on: bool,
    pub filter_type: i16,
    pub filter_via_key: i16,
    pub filter_drive: i16,
    pub filter_fat: bool,
    pub lfo1_decay_delay: i16,
    pub lfo1_rate: i16,
    pub lfo1_waveform: i16,
    pub lfo2_rate: i16,
    pub lfo2_waveform: i16,
    pub lfo3_rate: i16,
    pub pitcher: i16,
    pub pitcher_via_vel: i16,
    pub env1_attack: i16,
    pub env1_attack_via_vel: i16,
    pub env1_decay: i16,
    pub env1_sustain: i16,
    pub env1_release: i16,
    pub env2_attack: i16,
    pub env2_attack_via_vel: i16,
    pub env2_decay: i16,
    pub env2_sustain: i16,
    pub env2_release: i16,
    pub level_via_vel: i16,
    pub level_fixed: i16,
    /// Shared attack curve; values at or above 0xFF00 encode negatives
    pub time_curve: i16,
    pub time_via: i16,
    pub hold_via: i16,
    pub velocity_offset: i16,
    pub velocity_xfade: i16,
    pub velocity_xfade_type: i16,
    pub velocity_random: i16,
    pub random_detune: i16,
    pub sample_select_random: i16,
    pub mod_slots: [ModSlot; MOD_SLOTS],
}

impl Default for Params {
    fn default() -> Self {
        Self {
            output_volume: 0,
            key_scale: 0,
            pitch_bend_up: 2,
            pitch_bend_down: 2,
            mono_mode: 0,
            voices: 16,
            unison: false,
            transpose: 0,
            coarse_tune: 0,
            fine_tune: 0,
            glide_time: 0,
            filter_on: false,
            filter_type: 0,
            filter_via_key: 0,
            filter_drive: 0,
            filter_fat: false,
            lfo1_decay_delay: 0,
            lfo1_rate: 0,
            lfo1_waveform: 0,
            lfo2_rate: 0,
            lfo2_waveform: 0,
            lfo3_rate: 0,
            pitcher: 0,
            pitcher_via_vel: 0,
            env1_attack: 0,
            env1_attack_via_vel: 0,
            env1_decay: 0,
            env1_sustain: 127,
            env1_release: 0,
            env2_attack: 0,
            env2_attack_via_vel: 0,
            env2_decay: 0,
            env2_sustain: 127,
            env2_release: 0,
            level_via_vel: 0,
            level_fixed: 0,
            time_curve: 0,
            time_via: 0,
            hold_via: 0,
            velocity_offset: 0,
            velocity_xfade: 0,
            velocity_xfade_type: 0,
            velocity_random: 0,
            random_detune: 0,
            sample_select_random: 0,
            mod_slots: [ModSlot::default(); MOD_SLOTS],
        }
    }
}
