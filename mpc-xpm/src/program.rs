//! XPM program schema
//!
//! Field order matches what the MPC software writes. Element names are given
//! explicitly through `serde(rename)`; attributes use the `@` prefix.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::XpmError;
use crate::format::{fixed6, flag};
use crate::{APPLICATION, APPLICATION_VERSION, FILE_VERSION, MAX_INSTRUMENTS, PLATFORM};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Destination program layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ProgramType {
    /// Instruments span key ranges
    #[default]
    Keygroup,
    /// One instrument per pad, fixed note
    Drum,
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keygroup => f.write_str("Keygroup"),
            Self::Drum => f.write_str("Drum"),
        }
    }
}

impl FromStr for ProgramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keygroup" => Ok(Self::Keygroup),
            "drum" => Ok(Self::Drum),
            other => Err(format!("unknown program type: {other}")),
        }
    }
}

/// Root element of an `.xpm` document
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "MPCVObject")]
pub struct MpcvObject {
    #[serde(rename = "Version")]
    pub version: Version,
    #[serde(rename = "Program")]
    pub program: Program,
}

impl MpcvObject {
    /// Build an empty program of the given type from its template
    pub fn new(program_type: ProgramType, name: &str) -> Self {
        let mut program = match program_type {
            ProgramType::Keygroup => Program::keygroup(),
            ProgramType::Drum => Program::drum(),
        };
        program.program_name = name.to_string();
        Self {
            version: Version::default(),
            program,
        }
    }

    /// Serialize to an indented XML document, header included
    pub fn to_xml_string(&self) -> Result<String, XpmError> {
        let mut body = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut body);
        ser.indent(' ', 2);
        self.serialize(ser)
            .map_err(|e| XpmError::Serialize(e.to_string()))?;

        let mut out = String::with_capacity(XML_HEADER.len() + body.len() + 2);
        out.push_str(XML_HEADER);
        out.push('\n');
        out.push_str(&body);
        out.push('\n');
        Ok(out)
    }

    /// Write the document to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), XpmError> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;
        fs::write(path, xml).map_err(|source| XpmError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `Version` block
#[derive(Debug, Clone, Serialize)]
pub struct Version {
    #[serde(rename = "File_Version")]
    pub file_version: String,
    #[serde(rename = "Application")]
    pub application: String,
    #[serde(rename = "Application_Version")]
    pub application_version: String,
    #[serde(rename = "Platform")]
    pub platform: String,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            file_version: FILE_VERSION.to_string(),
            application: APPLICATION.to_string(),
            application_version: APPLICATION_VERSION.to_string(),
            platform: PLATFORM.to_string(),
        }
    }
}

/// Output routing shared by programs and instruments
#[derive(Debug, Clone, Serialize)]
pub struct AudioRoute {
    #[serde(rename = "AudioRoute")]
    pub audio_route: i32,
    #[serde(rename = "AudioRouteSubIndex")]
    pub sub_index: i32,
    #[serde(rename = "AudioRouteChannelBitmap")]
    pub channel_bitmap: i32,
    #[serde(rename = "InsertsEnabled", serialize_with = "flag")]
    pub inserts_enabled: bool,
}

impl AudioRoute {
    pub(crate) fn new(audio_route: i32) -> Self {
        Self {
            audio_route,
            sub_index: 0,
            channel_bitmap: 3,
            inserts_enabled: true,
        }
    }
}

/// `Program` element
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    #[serde(rename = "@type")]
    pub program_type: ProgramType,
    #[serde(rename = "ProgramName")]
    pub program_name: String,
    /// JSON payload, written as escaped text
    #[serde(rename = "ProgramPads")]
    pub program_pads: String,
    #[serde(rename = "CueBusEnable", serialize_with = "flag")]
    pub cue_bus_enable: bool,
    #[serde(rename = "AudioRoute")]
    pub audio_route: AudioRoute,
    #[serde(rename = "Send1", serialize_with = "fixed6")]
    pub send1: f64,
    #[serde(rename = "Send2", serialize_with = "fixed6")]
    pub send2: f64,
    #[serde(rename = "Send3", serialize_with = "fixed6")]
    pub send3: f64,
    #[serde(rename = "Send4", serialize_with = "fixed6")]
    pub send4: f64,
    #[serde(rename = "Volume", serialize_with = "fixed6")]
    pub volume: f64,
    #[serde(rename = "Mute", serialize_with = "flag")]
    pub mute: bool,
    #[serde(rename = "Solo", serialize_with = "flag")]
    pub solo: bool,
    #[serde(rename = "Pan", serialize_with = "fixed6")]
    pub pan: f64,
    #[serde(rename = "AutomationFilter")]
    pub automation_filter: i32,
    #[serde(rename = "Pitch", serialize_with = "fixed6")]
    pub pitch: f64,
    #[serde(rename = "TuneCoarse")]
    pub tune_coarse: i32,
    #[serde(rename = "TuneFine")]
    pub tune_fine: i32,
    #[serde(rename = "Mono", serialize_with = "flag")]
    pub mono: bool,
    #[serde(rename = "Program_Polyphony")]
    pub polyphony: i32,
    #[serde(rename = "PortamentoTime", serialize_with = "fixed6")]
    pub portamento_time: f64,
    #[serde(rename = "PortamentoLegato", serialize_with = "flag")]
    pub portamento_legato: bool,
    #[serde(rename = "PortamentoQuantized", serialize_with = "flag")]
    pub portamento_quantized: bool,
    #[serde(rename = "Program.Xfader.Route")]
    pub xfader_route: i32,
    #[serde(rename = "Instruments")]
    pub instruments: Instruments,
    #[serde(rename = "PadNoteMap", skip_serializing_if = "Option::is_none")]
    pub pad_note_map: Option<PadNoteMap>,
    #[serde(rename = "PadGroupMap", skip_serializing_if = "Option::is_none")]
    pub pad_group_map: Option<PadGroupMap>,
    #[serde(rename = "KeygroupMasterTranspose", serialize_with = "fixed6")]
    pub master_transpose: f64,
    #[serde(rename = "KeygroupNumKeygroups")]
    pub num_keygroups: usize,
    #[serde(rename = "KeygroupPitchBendRange", serialize_with = "fixed6")]
    pub pitch_bend_range: f64,
    #[serde(rename = "KeygroupWheelToLfo", serialize_with = "fixed6")]
    pub wheel_to_lfo: f64,
    #[serde(rename = "KeygroupAftertouchToFilter", serialize_with = "fixed6")]
    pub aftertouch_to_filter: f64,
}

impl Program {
    /// Number of instruments currently in the program
    pub fn instrument_count(&self) -> usize {
        self.instruments.instrument.len()
    }

    /// Append an instrument, failing once every slot is taken
    pub fn push_instrument(&mut self, instrument: Instrument) -> Result<(), XpmError> {
        if self.instruments.instrument.len() >= MAX_INSTRUMENTS {
            return Err(XpmError::TooManyInstruments(MAX_INSTRUMENTS + 1));
        }
        self.instruments.instrument.push(instrument);
        Ok(())
    }

    /// Iterate over the instruments in slot order
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.instrument.iter()
    }
}

/// `Instruments` list
#[derive(Debug, Clone, Default, Serialize)]
pub struct Instruments {
    #[serde(rename = "Instrument")]
    pub instrument: Vec<Instrument>,
}

/// One instrument slot
#[derive(Debug, Clone, Serialize)]
pub struct Instrument {
    #[serde(rename = "@number")]
    pub number: u32,
    #[serde(rename = "CueBusEnable", serialize_with = "flag")]
    pub cue_bus_enable: bool,
    #[serde(rename = "AudioRoute")]
    pub audio_route: AudioRoute,
    #[serde(rename = "Send1", serialize_with = "fixed6")]
    pub send1: f64,
    #[serde(rename = "Send2", serialize_with = "fixed6")]
    pub send2: f64,
    #[serde(rename = "Send3", serialize_with = "fixed6")]
    pub send3: f64,
    #[serde(rename = "Send4", serialize_with = "fixed6")]
    pub send4: f64,
    #[serde(rename = "Volume", serialize_with = "fixed6")]
    pub volume: f64,
    #[serde(rename = "Mute", serialize_with = "flag")]
    pub mute: bool,
    #[serde(rename = "Solo", serialize_with = "flag")]
    pub solo: bool,
    #[serde(rename = "Pan", serialize_with = "fixed6")]
    pub pan: f64,
    #[serde(rename = "AutomationFilter")]
    pub automation_filter: i32,
    #[serde(rename = "TuneCoarse")]
    pub tune_coarse: i32,
    #[serde(rename = "TuneFine")]
    pub tune_fine: i32,
    #[serde(rename = "Mono", serialize_with = "flag")]
    pub mono: bool,
    #[serde(rename = "Polyphony")]
    pub polyphony: i32,
    #[serde(rename = "FilterKeytrack", serialize_with = "fixed6")]
    pub filter_keytrack: f64,
    #[serde(rename = "LowNote")]
    pub low_note: i32,
    #[serde(rename = "HighNote")]
    pub high_note: i32,
    #[serde(rename = "IgnoreBaseNote", serialize_with = "flag")]
    pub ignore_base_note: bool,
    /// 0 = cycle (round robin), 1 = velocity switch
    #[serde(rename = "ZonePlay")]
    pub zone_play: i32,
    /// 0 = one-shot, 1 = release, 2 = normal attack
    #[serde(rename = "TriggerMode")]
    pub trigger_mode: i32,
    #[serde(rename = "MuteGroup")]
    pub mute_group: i32,
    #[serde(rename = "MuteTarget1")]
    pub mute_target1: i32,
    #[serde(rename = "MuteTarget2")]
    pub mute_target2: i32,
    #[serde(rename = "MuteTarget3")]
    pub mute_target3: i32,
    #[serde(rename = "MuteTarget4")]
    pub mute_target4: i32,
    #[serde(rename = "SimultTarget1")]
    pub simult_target1: i32,
    #[serde(rename = "SimultTarget2")]
    pub simult_target2: i32,
    #[serde(rename = "SimultTarget3")]
    pub simult_target3: i32,
    #[serde(rename = "SimultTarget4")]
    pub simult_target4: i32,
    #[serde(rename = "LfoPitch", serialize_with = "fixed6")]
    pub lfo_pitch: f64,
    #[serde(rename = "LfoCutoff", serialize_with = "fixed6")]
    pub lfo_cutoff: f64,
    #[serde(rename = "LfoVolume", serialize_with = "fixed6")]
    pub lfo_volume: f64,
    #[serde(rename = "LfoPan", serialize_with = "fixed6")]
    pub lfo_pan: f64,
    #[serde(rename = "OneShot", serialize_with = "flag")]
    pub one_shot: bool,
    #[serde(rename = "FilterType")]
    pub filter_type: i32,
    #[serde(rename = "Cutoff", serialize_with = "fixed6")]
    pub cutoff: f64,
    #[serde(rename = "Resonance", serialize_with = "fixed6")]
    pub resonance: f64,
    #[serde(rename = "FilterEnvAmt", serialize_with = "fixed6")]
    pub filter_env_amt: f64,
    #[serde(rename = "AfterTouchToFilter", serialize_with = "fixed6")]
    pub after_touch_to_filter: f64,
    #[serde(rename = "VelocityToStart", serialize_with = "fixed6")]
    pub velocity_to_start: f64,
    #[serde(rename = "VelocityToFilterAttack", serialize_with = "fixed6")]
    pub velocity_to_filter_attack: f64,
    #[serde(rename = "VelocityToFilter", serialize_with = "fixed6")]
    pub velocity_to_filter: f64,
    #[serde(rename = "VelocityToFilterEnvelope", serialize_with = "fixed6")]
    pub velocity_to_filter_envelope: f64,
    #[serde(rename = "FilterAttack", serialize_with = "fixed6")]
    pub filter_attack: f64,
    #[serde(rename = "FilterDecay", serialize_with = "fixed6")]
    pub filter_decay: f64,
    #[serde(rename = "FilterSustain", serialize_with = "fixed6")]
    pub filter_sustain: f64,
    #[serde(rename = "FilterRelease", serialize_with = "fixed6")]
    pub filter_release: f64,
    #[serde(rename = "FilterHold", serialize_with = "fixed6")]
    pub filter_hold: f64,
    #[serde(rename = "FilterAttackCurve", serialize_with = "fixed6")]
    pub filter_attack_curve: f64,
    #[serde(rename = "FilterDecayCurve", serialize_with = "fixed6")]
    pub filter_decay_curve: f64,
    #[serde(rename = "FilterReleaseCurve", serialize_with = "fixed6")]
    pub filter_release_curve: f64,
    #[serde(rename = "FilterDecayType", serialize_with = "flag")]
    pub filter_decay_type: bool,
    #[serde(rename = "FilterADEnvelope", serialize_with = "flag")]
    pub filter_ad_envelope: bool,
    #[serde(rename = "VolumeHold", serialize_with = "fixed6")]
    pub volume_hold: f64,
    #[serde(rename = "VolumeDecayType", serialize_with = "flag")]
    pub volume_decay_type: bool,
    #[serde(rename = "VolumeADEnvelope", serialize_with = "flag")]
    pub volume_ad_envelope: bool,
    #[serde(rename = "VolumeAttack", serialize_with = "fixed6")]
    pub volume_attack: f64,
    #[serde(rename = "VolumeDecay", serialize_with = "fixed6")]
    pub volume_decay: f64,
    #[serde(rename = "VolumeSustain", serialize_with = "fixed6")]
    pub volume_sustain: f64,
    #[serde(rename = "VolumeRelease", serialize_with = "fixed6")]
    pub volume_release: f64,
    #[serde(rename = "VolumeAttackCurve", serialize_with = "fixed6")]
    pub volume_attack_curve: f64,
    #[serde(rename = "VolumeDecayCurve", serialize_with = "fixed6")]
    pub volume_decay_curve: f64,
    #[serde(rename = "VolumeReleaseCurve", serialize_with = "fixed6")]
    pub volume_release_curve: f64,
    #[serde(rename = "PitchAttack", serialize_with = "fixed6")]
    pub pitch_attack: f64,
    #[serde(rename = "PitchHold", serialize_with = "fixed6")]
    pub pitch_hold: f64,
    #[serde(rename = "PitchDecay", serialize_with = "fixed6")]
    pub pitch_decay: f64,
    #[serde(rename = "PitchSustain", serialize_with = "fixed6")]
    pub pitch_sustain: f64,
    #[serde(rename = "PitchRelease", serialize_with = "fixed6")]
    pub pitch_release: f64,
    #[serde(rename = "PitchAttackCurve", serialize_with = "fixed6")]
    pub pitch_attack_curve: f64,
    #[serde(rename = "PitchDecayCurve", serialize_with = "fixed6")]
    pub pitch_decay_curve: f64,
    #[serde(rename = "PitchReleaseCurve", serialize_with = "fixed6")]
    pub pitch_release_curve: f64,
    #[serde(rename = "PitchEnvAmount", serialize_with = "fixed6")]
    pub pitch_env_amount: f64,
    #[serde(rename = "VelocityToPitch", serialize_with = "fixed6")]
    pub velocity_to_pitch: f64,
    #[serde(rename = "VelocityToVolumeAttack", serialize_with = "fixed6")]
    pub velocity_to_volume_attack: f64,
    #[serde(rename = "VelocitySensitivity", serialize_with = "fixed6")]
    pub velocity_sensitivity: f64,
    #[serde(rename = "VelocityToPan", serialize_with = "fixed6")]
    pub velocity_to_pan: f64,
    #[serde(rename = "LFO")]
    pub lfo: Lfo,
    #[serde(rename = "WarpTempo", serialize_with = "fixed6")]
    pub warp_tempo: f64,
    #[serde(rename = "BpmLock", serialize_with = "flag")]
    pub bpm_lock: bool,
    #[serde(rename = "WarpEnable", serialize_with = "flag")]
    pub warp_enable: bool,
    #[serde(rename = "StretchPercentage")]
    pub stretch_percentage: i32,
    #[serde(rename = "Layers")]
    pub layers: Layers,
}

/// LFO phase behaviour on note-on
///
/// The MPC writes `False` for "retrigger off" and `Free` for a free-running
/// LFO, so this is an enumeration rather than a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LfoReset {
    #[default]
    #[serde(rename = "False")]
    Off,
    Free,
}

/// Per-instrument LFO
#[derive(Debug, Clone, Serialize)]
pub struct Lfo {
    #[serde(rename = "Type")]
    pub lfo_type: String,
    #[serde(rename = "Rate", serialize_with = "fixed6")]
    pub rate: f64,
    #[serde(rename = "Sync")]
    pub sync: i32,
    #[serde(rename = "Reset")]
    pub reset: LfoReset,
    #[serde(rename = "PitchAmount", serialize_with = "fixed6")]
    pub pitch_amount: f64,
    #[serde(rename = "CutoffAmount", serialize_with = "fixed6")]
    pub cutoff_amount: f64,
    #[serde(rename = "VolumeAmount", serialize_with = "fixed6")]
    pub volume_amount: f64,
    #[serde(rename = "PanAmount", serialize_with = "fixed6")]
    pub pan_amount: f64,
    #[serde(rename = "Delay", serialize_with = "fixed6")]
    pub delay: f64,
    #[serde(rename = "FadeIn", serialize_with = "fixed6")]
    pub fade_in: f64,
    #[serde(rename = "Attack", serialize_with = "fixed6")]
    pub attack: f64,
    #[serde(rename = "Depth", serialize_with = "fixed6")]
    pub depth: f64,
    #[serde(rename = "Phase", serialize_with = "fixed6")]
    pub phase: f64,
    #[serde(rename = "Offset", serialize_with = "fixed6")]
    pub offset: f64,
}

/// `Layers` list
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layers {
    #[serde(rename = "Layer")]
    pub layer: Vec<Layer>,
}

/// One sample layer inside an instrument
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    #[serde(rename = "@number")]
    pub number: u32,
    #[serde(rename = "Active", serialize_with = "flag")]
    pub active: bool,
    #[serde(rename = "Volume", serialize_with = "fixed6")]
    pub volume: f64,
    #[serde(rename = "Pan", serialize_with = "fixed6")]
    pub pan: f64,
    #[serde(rename = "Pitch", serialize_with = "fixed6")]
    pub pitch: f64,
    #[serde(rename = "TuneCoarse")]
    pub tune_coarse: i32,
    #[serde(rename = "TuneFine")]
    pub tune_fine: i32,
    #[serde(rename = "VelStart")]
    pub vel_start: i32,
    #[serde(rename = "VelEnd")]
    pub vel_end: i32,
    #[serde(rename = "SampleStart")]
    pub sample_start: i32,
    #[serde(rename = "SampleEnd")]
    pub sample_end: i32,
    #[serde(rename = "Loop", serialize_with = "flag")]
    pub loop_enabled: bool,
    #[serde(rename = "LoopStart")]
    pub loop_start: i32,
    #[serde(rename = "LoopEnd")]
    pub loop_end: i32,
    #[serde(rename = "LoopCrossfadeLength")]
    pub loop_crossfade_length: i32,
    #[serde(rename = "LoopTune")]
    pub loop_tune: i32,
    #[serde(rename = "Mute", serialize_with = "flag")]
    pub mute: bool,
    /// MIDI note + 1
    #[serde(rename = "RootNote")]
    pub root_note: i32,
    #[serde(rename = "KeyTrack", serialize_with = "fixed6")]
    pub key_track: f64,
    #[serde(rename = "SampleName")]
    pub sample_name: String,
    #[serde(rename = "SampleFile")]
    pub sample_file: String,
    #[serde(rename = "SliceIndex")]
    pub slice_index: i32,
    #[serde(rename = "Direction")]
    pub direction: i32,
    #[serde(rename = "Offset")]
    pub offset: i32,
    #[serde(rename = "SliceStart")]
    pub slice_start: i32,
    #[serde(rename = "SliceEnd")]
    pub slice_end: i32,
    #[serde(rename = "SliceLoopStart")]
    pub slice_loop_start: i32,
    #[serde(rename = "SliceLoop")]
    pub slice_loop: i32,
    #[serde(rename = "SliceLoopCrossFadeLength")]
    pub slice_loop_crossfade_length: i32,
}

/// Drum pad to MIDI note table
#[derive(Debug, Clone, Default, Serialize)]
pub struct PadNoteMap {
    #[serde(rename = "PadNote")]
    pub pad_note: Vec<PadNote>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PadNote {
    #[serde(rename = "@number")]
    pub number: u32,
    #[serde(rename = "Note")]
    pub note: i32,
}

/// Drum pad to mute group table
#[derive(Debug, Clone, Default, Serialize)]
pub struct PadGroupMap {
    #[serde(rename = "PadGroup")]
    pub pad_group: Vec<PadGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PadGroup {
    #[serde(rename = "@number")]
    pub number: u32,
    #[serde(rename = "Group")]
    pub group: i32,
}
