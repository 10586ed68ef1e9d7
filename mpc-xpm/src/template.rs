//! Keygroup and drum program templates
//!
//! Templates carry the default values the MPC software writes for a fresh
//! program. Instruments and layers are created on demand rather than
//! pre-allocated, so unused slots never reach the output.

use serde_json::{Map, Value, json};

use crate::program::{
    AudioRoute, Instrument, Instruments, Layer, Layers, Lfo, LfoReset, PadGroupMap, PadNote, PadNoteMap,
    Program, ProgramType,
};
use crate::{PAD_COUNT, SLICE_INDEX_WHOLE};

/// Unity gain on the MPC volume scale (-3 dB)
const DEFAULT_VOLUME: f64 = 0.707946;

/// Default curve shape (linear)
const LINEAR_CURVE: f64 = 0.5;

/// The `ProgramPads` JSON payload: universal pad, every pad unassigned
pub fn program_pads_json() -> String {
    let mut pads = Map::new();
    for i in 0..PAD_COUNT {
        pads.insert(format!("value{i}"), json!(0));
    }

    let value = json!({
        "ProgramPads": {
            "Universal": { "value0": true },
            "Type": { "value0": 1 },
            "universalPad": 32512,
            "pads": Value::Object(pads),
            "UnusedPads": { "value0": 1 }
        }
    });
    format!("{value:#}")
}

impl Program {
    /// Fields shared by both program layouts
    fn base(program_type: ProgramType) -> Self {
        Self {
            program_type,
            program_name: String::new(),
            program_pads: program_pads_json(),
            cue_bus_enable: false,
            audio_route: AudioRoute::new(2),
            send1: 0.0,
            send2: 0.0,
            send3: 0.0,
            send4: 0.0,
            volume: DEFAULT_VOLUME,
            mute: false,
            solo: false,
            pan: 0.5,
            automation_filter: 1,
            pitch: 0.0,
            tune_coarse: 0,
            tune_fine: 0,
            mono: false,
            polyphony: 0,
            portamento_time: 0.0,
            portamento_legato: false,
            portamento_quantized: false,
            xfader_route: 0,
            instruments: Instruments::default(),
            pad_note_map: None,
            pad_group_map: None,
            master_transpose: 0.5,
            num_keygroups: 0,
            pitch_bend_range: 0.0,
            wheel_to_lfo: 0.0,
            aftertouch_to_filter: 0.0,
        }
    }

    /// Empty keygroup program
    pub fn keygroup() -> Self {
        Self {
            pitch_bend_range: 0.34,
            wheel_to_lfo: 0.94,
            aftertouch_to_filter: 0.41,
            ..Self::base(ProgramType::Keygroup)
        }
    }

    /// Empty drum program with pad `n` mapped to MIDI note `n - 1`
    pub fn drum() -> Self {
        let pad_note = (0..PAD_COUNT)
            .map(|i| PadNote {
                number: i as u32 + 1,
                note: i as i32,
            })
            .collect();

        Self {
            pad_note_map: Some(PadNoteMap { pad_note }),
            pad_group_map: Some(PadGroupMap::default()),
            ..Self::base(ProgramType::Drum)
        }
    }

    /// A fresh instrument with this program type's defaults
    pub fn new_instrument(&self, number: u32) -> Instrument {
        let instrument = Instrument::template(number);
        match self.program_type {
            ProgramType::Keygroup => instrument,
            ProgramType::Drum => Instrument {
                polyphony: 1,
                low_note: 0,
                high_note: 0,
                trigger_mode: 0,
                filter_type: 0,
                cutoff: 1.0,
                resonance: 0.0,
                filter_env_amt: 0.5,
                velocity_to_filter_envelope: 0.0,
                filter_decay: 0.0,
                filter_sustain: 1.0,
                volume_decay: 0.0,
                volume_release: 0.005,
                velocity_sensitivity: 0.5,
                lfo: Lfo {
                    lfo_type: "Sine".to_string(),
                    rate: 0.25,
                    reset: LfoReset::Free,
                    ..Lfo::default()
                },
                warp_tempo: 0.0,
                bpm_lock: false,
                ..instrument
            },
        }
    }
}

impl Instrument {
    /// Keygroup defaults
    fn template(number: u32) -> Self {
        Self {
            number,
            cue_bus_enable: false,
            audio_route: AudioRoute::new(0),
            send1: 0.0,
            send2: 0.0,
            send3: 0.0,
            send4: 0.0,
            volume: DEFAULT_VOLUME,
            mute: false,
            solo: false,
            pan: 0.5,
            automation_filter: 1,
            tune_coarse: 0,
            tune_fine: 0,
            mono: false,
            polyphony: 0,
            filter_keytrack: 0.0,
            low_note: 0,
            high_note: 127,
            ignore_base_note: false,
            zone_play: 0,
            trigger_mode: 2,
            mute_group: 0,
            mute_target1: 0,
            mute_target2: 0,
            mute_target3: 0,
            mute_target4: 0,
            simult_target1: 0,
            simult_target2: 0,
            simult_target3: 0,
            simult_target4: 0,
            lfo_pitch: 0.0,
            lfo_cutoff: 0.0,
            lfo_volume: 0.0,
            lfo_pan: 0.0,
            one_shot: false,
            filter_type: 3,
            cutoff: 0.24,
            resonance: 0.03,
            filter_env_amt: 0.33,
            after_touch_to_filter: 0.0,
            velocity_to_start: 0.0,
            velocity_to_filter_attack: 0.0,
            velocity_to_filter: 0.0,
            velocity_to_filter_envelope: 0.25,
            filter_attack: 0.0,
            filter_decay: 0.64,
            filter_sustain: 0.0078,
            filter_release: 0.0,
            filter_hold: 0.0,
            filter_attack_curve: LINEAR_CURVE,
            filter_decay_curve: LINEAR_CURVE,
            filter_release_curve: LINEAR_CURVE,
            filter_decay_type: true,
            filter_ad_envelope: true,
            volume_hold: 0.0,
            volume_decay_type: true,
            volume_ad_envelope: true,
            volume_attack: 0.0,
            volume_decay: 0.04,
            volume_sustain: 1.0,
            volume_release: 0.0,
            volume_attack_curve: LINEAR_CURVE,
            volume_decay_curve: LINEAR_CURVE,
            volume_release_curve: LINEAR_CURVE,
            pitch_attack: 0.0,
            pitch_hold: 0.0,
            pitch_decay: 0.0,
            pitch_sustain: 0.5,
            pitch_release: 0.0,
            pitch_attack_curve: LINEAR_CURVE,
            pitch_decay_curve: LINEAR_CURVE,
            pitch_release_curve: LINEAR_CURVE,
            pitch_env_amount: 0.5,
            velocity_to_pitch: 0.0,
            velocity_to_volume_attack: 0.0,
            velocity_sensitivity: 0.31,
            velocity_to_pan: 0.0,
            lfo: Lfo::default(),
            warp_tempo: 97.272003,
            bpm_lock: true,
            warp_enable: false,
            stretch_percentage: 100,
            layers: Layers::default(),
        }
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self {
            lfo_type: "sine".to_string(),
            rate: 0.5,
            sync: 0,
            reset: LfoReset::Off,
            pitch_amount: 0.0,
            cutoff_amount: 0.0,
            volume_amount: 0.0,
            pan_amount: 0.0,
            delay: 0.0,
            fade_in: 0.0,
            attack: 0.0,
            depth: 1.0,
            phase: 0.0,
            offset: 0.0,
        }
    }
}

impl Layer {
    /// An active, full-velocity layer with no sample assigned
    pub fn new(number: u32) -> Self {
        Self {
            number,
            active: true,
            volume: 1.0,
            pan: 0.5,
            pitch: 0.0,
            tune_coarse: 0,
            tune_fine: 0,
            vel_start: 0,
            vel_end: 127,
            sample_start: 0,
            sample_end: 0,
            loop_enabled: false,
            loop_start: 0,
            loop_end: 0,
            loop_crossfade_length: 0,
            loop_tune: 0,
            mute: false,
            root_note: 0,
            key_track: 0.0,
            sample_name: String::new(),
            sample_file: String::new(),
            slice_index: SLICE_INDEX_WHOLE,
            direction: 0,
            offset: 0,
            slice_start: 0,
            slice_end: 0,
            slice_loop_start: 0,
            slice_loop: 0,
            slice_loop_crossfade_length: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_pads_payload() {
        let text = program_pads_json();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        let pads = &parsed["ProgramPads"];

        assert_eq!(pads["Universal"]["value0"], json!(true));
        assert_eq!(pads["Type"]["value0"], json!(1));
        assert_eq!(pads["universalPad"], json!(32512));
        assert_eq!(pads["pads"].as_object().unwrap().len(), PAD_COUNT);
        assert_eq!(pads["pads"]["value127"], json!(0));
        assert_eq!(pads["UnusedPads"]["value0"], json!(1));
    }

    #[test]
    fn test_program_pads_key_order() {
        let text = program_pads_json();
        let universal = text.find("Universal").unwrap();
        let unused = text.find("UnusedPads").unwrap();
        let v2 = text.find("\"value2\"").unwrap();
        let v10 = text.find("\"value10\"").unwrap();
        assert!(universal < unused);
        assert!(v2 < v10);
    }

    #[test]
    fn test_keygroup_template() {
        let program = Program::keygroup();
        assert_eq!(program.program_type, ProgramType::Keygroup);
        assert!(program.pad_note_map.is_none());
        assert_eq!(program.instrument_count(), 0);

        let instrument = program.new_instrument(3);
        assert_eq!(instrument.number, 3);
        assert_eq!(instrument.high_note, 127);
        assert_eq!(instrument.audio_route.channel_bitmap, 3);
        assert!(instrument.layers.layer.is_empty());
    }

    #[test]
    fn test_drum_template() {
        let program = Program::drum();
        assert_eq!(program.program_type, ProgramType::Drum);
        assert_eq!(program.pitch_bend_range, 0.0);

        let map = program.pad_note_map.as_ref().unwrap();
        assert_eq!(map.pad_note.len(), PAD_COUNT);
        for (i, pad) in map.pad_note.iter().enumerate() {
            assert_eq!(pad.number, i as u32 + 1);
            assert_eq!(pad.note, i as i32);
        }
        assert!(program.pad_group_map.as_ref().unwrap().pad_group.is_empty());

        let instrument = program.new_instrument(1);
        assert_eq!(instrument.polyphony, 1);
        assert_eq!(instrument.trigger_mode, 0);
        assert_eq!(instrument.cutoff, 1.0);
        assert_eq!(instrument.filter_env_amt, 0.5);
        assert_eq!(instrument.volume_release, 0.005);
        assert_eq!(instrument.lfo.reset, LfoReset::Free);
    }

    #[test]
    fn test_layer_defaults() {
        let layer = Layer::new(2);
        assert_eq!(layer.number, 2);
        assert!(layer.active);
        assert_eq!(layer.vel_end, 127);
        assert_eq!(layer.slice_index, SLICE_INDEX_WHOLE);
    }
}
