//! EXS model to XPM program projection
//!
//! Projection performs no I/O. It resolves samples against the prebuilt
//! [`SampleIndex`] and returns the copies the writer stage must perform
//! alongside the finished program.

use hashbrown::HashSet;
use tracing::{debug, trace, warn};

use exs24::{Group, Instrument, Params, Zone, ZoneCluster};
use mpc_xpm::{Layer, LfoReset, MAX_INSTRUMENTS, MpcvObject, ProgramType};

use crate::error::{ConvertError, Result};
use crate::samples::{SampleCopy, SampleIndex, sample_stem};
use crate::units::{
    LINEAR_CURVE, env_level, env_time, envelope_curve, filter_normalize, legacy_gain,
    output_to_audio_route, pan_to_normalized, scale_to_key_track, volume_db_to_linear,
};

/// Two semitones over the MPC's 12-semitone bend scale
const PITCH_BEND_RANGE: f64 = 2.0 / 12.0;

/// A program ready to be written, plus the samples it needs
#[derive(Debug, Clone)]
pub struct Projection {
    /// Instrument name, used for the output directory and file
    pub name: String,
    pub program_type: ProgramType,
    pub program: MpcvObject,
    /// Distinct sample copies in first-use order
    pub copies: Vec<SampleCopy>,
}

impl Projection {
    pub fn instrument_count(&self) -> usize {
        self.program.program.instrument_count()
    }
}

/// Raw envelope values before normalisation
#[derive(Debug, Clone, Copy, Default)]
struct Stages {
    attack: i32,
    hold: i32,
    decay: i32,
    sustain: i32,
    release: i32,
}

impl Stages {
    fn from_params_env1(params: &Params) -> Self {
        Self {
            attack: params.env1_attack.into(),
            hold: 0,
            decay: params.env1_decay.into(),
            sustain: params.env1_sustain.into(),
            release: params.env1_release.into(),
        }
    }

    fn from_params_env2(params: &Params) -> Self {
        Self {
            attack: params.env2_attack.into(),
            hold: 0,
            decay: params.env2_decay.into(),
            sustain: params.env2_sustain.into(),
            release: params.env2_release.into(),
        }
    }
}

/// Narrow `low..=high` to a group bound where the bound is non-zero
///
/// Returns `None` when the range lies entirely outside the bound.
pub fn limit_range(low: i32, high: i32, bound_low: i32, bound_high: i32) -> Option<(i32, i32)> {
    let mut low = low;
    let mut high = high;
    if bound_low != 0 && low < bound_low {
        low = bound_low;
    }
    if bound_high != 0 && high > bound_high {
        high = bound_high;
    }
    if high < bound_low || (bound_high != 0 && low > bound_high) {
        None
    } else {
        Some((low, high))
    }
}

/// MIDI note a zone's sample plays unshifted at, stored one higher
pub fn root_note(zone: &Zone) -> i32 {
    let low = i32::from(zone.key_low);
    let key = i32::from(zone.key);
    let root = if zone.key_low == zone.key_high {
        if key != 0 && key == low { key } else { low }
    } else if key != 0 {
        key
    } else {
        low
    };
    root + 1
}

/// Project a decoded instrument into an XPM program
///
/// Each key-range cluster becomes one instrument slot. Clusters outside their
/// group's key range are skipped, as are zones outside the group's velocity
/// range and zones whose sample is not indexed. Slots left without layers
/// are dropped.
pub fn project(
    instrument: &Instrument,
    program_type: ProgramType,
    layers_per_instrument: usize,
    index: &SampleIndex,
) -> Result<Projection> {
    let name = instrument.name.clone();
    let clusters = instrument.cluster_zones_by_key_range(layers_per_instrument);
    debug!(
        "{}: {} clusters from {} zones",
        name,
        clusters.len(),
        instrument.zones.len()
    );
    if clusters.is_empty() {
        return Err(ConvertError::NoInstruments(name));
    }
    if clusters.len() >= MAX_INSTRUMENTS {
        return Err(ConvertError::TooManyInstruments {
            name,
            count: clusters.len(),
        });
    }

    let groups = instrument.active_groups();
    if groups.is_empty() {
        return Err(ConvertError::NoGroups(name));
    }
    let round_robin = groups.iter().any(Group::in_round_robin);

    let mut xpm = MpcvObject::new(program_type, &name);
    let mut copies = Vec::new();
    let mut copied: HashSet<String> = HashSet::new();

    for cluster in &clusters {
        let Some(group) = governing_group(&groups, cluster) else {
            continue;
        };

        let Some((low, high)) = limit_range(
            cluster.key_low.into(),
            cluster.key_high.into(),
            group.key_low.into(),
            group.key_high.into(),
        ) else {
            debug!(
                "Skipping keys {}-{} outside group {} range {}-{}",
                cluster.key_low, cluster.key_high, group.id, group.key_low, group.key_high
            );
            continue;
        };

        let number = xpm.program.instrument_count() as u32 + 1;
        let mut slot = xpm.program.new_instrument(number);
        slot.low_note = low;
        slot.high_note = match program_type {
            ProgramType::Drum => low,
            ProgramType::Keygroup => high,
        };
        apply_group(&mut slot, instrument.params.as_ref(), group, round_robin);
        if let Some(first) = cluster.zones.first() {
            slot.one_shot = first.is_one_shot();
            if first.has_output() {
                slot.audio_route.audio_route = output_to_audio_route(first.output.into());
            }
        }

        for zone in &cluster.zones {
            let Some((vel_low, vel_high)) = limit_range(
                zone.vel_low.into(),
                zone.vel_high.into(),
                group.vel_low.into(),
                group.vel_high.into(),
            ) else {
                debug!(
                    "Skipping velocities {}-{} outside group {} range {}-{}",
                    zone.vel_low, zone.vel_high, group.id, group.vel_low, group.vel_high
                );
                continue;
            };

            let Some(sample) = instrument.sample_for(zone) else {
                continue;
            };
            let file_name = sample.file_name.trim();
            let copy = match index.resolve(file_name) {
                Ok(copy) => copy,
                Err(e) => {
                    warn!("{}: {}", name, e);
                    continue;
                }
            };

            let number = slot.layers.layer.len() as u32 + 1;
            let mut layer = layer_for(zone, number);
            layer.vel_start = vel_low;
            layer.vel_end = vel_high;
            layer.sample_name = sample_stem(file_name).to_string();
            layer.sample_file = copy.file_name.clone();
            trace!(
                "  layer {}: vel {}-{} root {} {}",
                number, vel_low, vel_high, layer.root_note, layer.sample_file
            );
            slot.layers.layer.push(layer);

            if copied.insert(copy.file_name.clone()) {
                copies.push(copy);
            }
        }

        if slot.layers.layer.is_empty() {
            debug!("Dropping instrument {}: no layers", number);
            continue;
        }
        xpm.program.push_instrument(slot)?;
    }

    let count = xpm.program.instrument_count();
    if count == 0 {
        return Err(ConvertError::NoInstruments(name));
    }
    xpm.program.num_keygroups = count;
    xpm.program.pitch_bend_range = PITCH_BEND_RANGE;
    xpm.program.master_transpose = 0.0;

    Ok(Projection {
        name,
        program_type,
        program: xpm,
        copies,
    })
}

/// Group named by the cluster's first zone, else the first active group
fn governing_group<'a>(groups: &'a [Group], cluster: &ZoneCluster<'_>) -> Option<&'a Group> {
    let wanted = cluster.group_index();
    let found = wanted.and_then(|id| {
        groups
            .iter()
            .find(|g| i64::from(g.id) == i64::from(id))
    });
    if found.is_none() {
        debug!("Group {:?} not found, using first group", wanted);
    }
    found.or_else(|| groups.first())
}

/// Filter, envelopes, trigger and play mode for one instrument slot
fn apply_group(
    slot: &mut mpc_xpm::Instrument,
    params: Option<&Params>,
    group: &Group,
    round_robin: bool,
) {
    slot.volume = legacy_gain(group.volume.into());
    slot.cutoff = filter_normalize(group.cutoff.into());
    slot.resonance = filter_normalize(group.resonance.into());

    let (volume, filter) = match params {
        Some(params) => (
            Stages::from_params_env2(params),
            Stages::from_params_env1(params),
        ),
        None => (
            Stages {
                attack: group.env2.attack,
                hold: group.env2.hold,
                decay: group.env2.decay,
                sustain: group.env2.sustain,
                release: group.env2.release,
            },
            Stages {
                attack: group.env1.attack,
                hold: 0,
                decay: group.env1.decay,
                sustain: group.env1.sustain,
                release: group.env1.release,
            },
        ),
    };

    let attack_curve = params
        .filter(|p| p.time_curve != 0)
        .map_or(LINEAR_CURVE, |p| envelope_curve(p.time_curve.into()));

    slot.volume_attack = env_time(volume.attack);
    slot.volume_hold = env_time(volume.hold);
    slot.volume_decay = env_time(volume.decay);
    slot.volume_sustain = env_level(volume.sustain);
    slot.volume_release = env_time(volume.release);
    slot.volume_attack_curve = attack_curve;
    slot.volume_decay_curve = LINEAR_CURVE;
    slot.volume_release_curve = LINEAR_CURVE;

    // MPC filter envelopes cannot go negative
    if slot.filter_env_amt != 0.0 {
        slot.filter_attack = env_time(filter.attack);
        slot.filter_hold = env_time(filter.hold);
        slot.filter_decay = env_time(filter.decay);
        slot.filter_sustain = env_level(filter.sustain);
        slot.filter_release = env_time(filter.release);
        slot.filter_attack_curve = attack_curve;
        slot.filter_decay_curve = LINEAR_CURVE;
        slot.filter_release_curve = LINEAR_CURVE;
    }

    slot.pitch_attack = env_time(filter.attack);
    slot.pitch_hold = env_time(volume.hold);
    slot.pitch_decay = env_time(filter.decay);
    slot.pitch_sustain = env_level(filter.sustain);
    slot.pitch_release = env_time(filter.release);
    slot.pitch_attack_curve = attack_curve;
    slot.pitch_decay_curve = LINEAR_CURVE;
    slot.pitch_release_curve = LINEAR_CURVE;
    slot.pitch_env_amount = 0.0;

    slot.trigger_mode = if group.is_release_trigger() { 1 } else { 2 };
    slot.zone_play = if round_robin && group.in_round_robin() { 0 } else { 1 };

    slot.lfo.lfo_type = "Triangle".to_string();
    slot.lfo.rate = 0.0;
    slot.lfo.sync = 0;
    slot.lfo.reset = LfoReset::Off;
    slot.lfo.pitch_amount = 0.0;
    slot.lfo.cutoff_amount = 0.0;
    slot.lfo.volume_amount = 0.0;
    slot.lfo.pan_amount = 0.0;
}

/// Sample region, loop, tuning and mix settings of one zone
fn layer_for(zone: &Zone, number: u32) -> Layer {
    let loop_enabled = zone.loop_enabled();
    Layer {
        active: true,
        pitch: 0.0,
        mute: false,
        volume: volume_db_to_linear(zone.volume.into()),
        pan: pan_to_normalized(zone.pan.into()),
        tune_coarse: zone.coarse_tuning.into(),
        tune_fine: zone.fine_tuning.into(),
        sample_start: zone.sample_start,
        sample_end: zone.sample_end,
        slice_start: zone.sample_start,
        slice_end: zone.sample_end,
        offset: zone.offset,
        loop_enabled,
        loop_start: zone.loop_start,
        loop_end: zone.loop_end,
        loop_crossfade_length: zone.loop_crossfade,
        loop_tune: zone.loop_tune.into(),
        slice_loop: i32::from(loop_enabled),
        slice_loop_start: zone.loop_start,
        slice_loop_crossfade_length: zone.loop_crossfade,
        root_note: root_note(zone),
        key_track: scale_to_key_track(zone.scale.into()),
        ..Layer::new(number)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use exs24::{Envelope, LoopFlags, Sample, ZoneFlags};

    use super::*;

    fn zone(key_low: i8, key_high: i8, sample_index: i32) -> Zone {
        Zone {
            key: key_low as u8,
            key_low,
            key_high,
            sample_index,
            group_index: 0,
            ..Default::default()
        }
    }

    fn sample(file_name: &str) -> Sample {
        Sample {
            name: file_name.to_string(),
            file_name: file_name.to_string(),
            ..Default::default()
        }
    }

    fn instrument(zones: Vec<Zone>, samples: Vec<Sample>) -> Instrument {
        Instrument {
            name: "Test".to_string(),
            zones,
            samples,
            groups: vec![Group::default()],
            ..Default::default()
        }
    }

    /// Index over real files named after each sample
    fn index_for(names: &[&str]) -> (tempfile::TempDir, SampleIndex) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"RIFF").unwrap();
        }
        let index = SampleIndex::build(dir.path()).unwrap();
        (dir, index)
    }

    #[test]
    fn test_limit_range() {
        assert_eq!(limit_range(0, 127, 0, 0), Some((0, 127)));
        assert_eq!(limit_range(0, 127, 64, 0), Some((64, 127)));
        assert_eq!(limit_range(0, 127, 0, 100), Some((0, 100)));
        assert_eq!(limit_range(10, 20, 30, 40), None);
        assert_eq!(limit_range(50, 60, 30, 40), None);
        assert_eq!(limit_range(35, 60, 30, 40), Some((35, 40)));
    }

    #[test]
    fn test_root_note_rules() {
        let single = Zone {
            key: 60,
            key_low: 60,
            key_high: 60,
            ..Default::default()
        };
        assert_eq!(root_note(&single), 61);

        let single_mismatch = Zone {
            key: 72,
            key_low: 60,
            key_high: 60,
            ..Default::default()
        };
        assert_eq!(root_note(&single_mismatch), 61);

        let multi = Zone {
            key: 64,
            key_low: 60,
            key_high: 70,
            ..Default::default()
        };
        assert_eq!(root_note(&multi), 65);

        let multi_unset = Zone {
            key: 0,
            key_low: 60,
            key_high: 70,
            ..Default::default()
        };
        assert_eq!(root_note(&multi_unset), 61);
    }

    #[test]
    fn test_keygroup_projection() {
        let (_dir, index) = index_for(&["kick.wav"]);
        let model = instrument(vec![zone(60, 60, 0)], vec![sample("kick.wav")]);

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        assert_eq!(projection.instrument_count(), 1);
        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!(slot.number, 1);
        assert_eq!((slot.low_note, slot.high_note), (60, 60));
        assert_eq!(slot.layers.layer.len(), 1);
        let layer = &slot.layers.layer[0];
        assert_eq!((layer.vel_start, layer.vel_end), (0, 127));
        assert_eq!(layer.root_note, 61);
        assert_eq!(layer.sample_name, "kick");
        assert_eq!(layer.sample_file, "kick.WAV");
        assert_eq!(projection.copies.len(), 1);
        assert_eq!(projection.program.program.num_keygroups, 1);
    }

    #[test]
    fn test_drum_projection_collapses_range() {
        let (_dir, index) = index_for(&["tom.wav"]);
        let model = instrument(vec![zone(45, 48, 0)], vec![sample("tom.wav")]);

        let projection = project(&model, ProgramType::Drum, 4, &index).unwrap();

        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!((slot.low_note, slot.high_note), (45, 45));
        assert!(projection.program.program.pad_note_map.is_some());
    }

    #[test]
    fn test_group_velocity_clamp() {
        let (_dir, index) = index_for(&["pad.wav"]);
        let mut model = instrument(vec![zone(60, 72, 0)], vec![sample("pad.wav")]);
        model.groups[0].vel_low = 64;

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let layer = &projection.program.program.instruments.instrument[0].layers.layer[0];
        assert_eq!(layer.vel_start, 64);
        assert_eq!(layer.vel_end, 127);
    }

    #[test]
    fn test_group_velocity_range_drops_instrument() {
        let (_dir, index) = index_for(&["soft.wav", "hard.wav"]);
        let mut soft = zone(36, 36, 0);
        soft.vel_low = 0;
        soft.vel_high = 40;
        let mut model = instrument(
            vec![soft, zone(38, 38, 1)],
            vec![sample("soft.wav"), sample("hard.wav")],
        );
        model.groups[0].vel_low = 64;

        let projection = project(&model, ProgramType::Drum, 4, &index).unwrap();

        assert_eq!(projection.instrument_count(), 1);
        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!(slot.low_note, 38);
        assert_eq!(slot.layers.layer[0].vel_start, 64);
        assert_eq!(projection.copies.len(), 1);

        model.zones.truncate(1);
        assert!(matches!(
            project(&model, ProgramType::Drum, 4, &index),
            Err(ConvertError::NoInstruments(_))
        ));
    }

    #[test]
    fn test_group_key_range_skips_cluster() {
        let (_dir, index) = index_for(&["a.wav", "b.wav"]);
        let mut model = instrument(
            vec![zone(10, 20, 0), zone(40, 80, 1)],
            vec![sample("a.wav"), sample("b.wav")],
        );
        model.groups[0].key_low = 30;
        model.groups[0].key_high = 60;

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        assert_eq!(projection.instrument_count(), 1);
        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!((slot.low_note, slot.high_note), (40, 60));
    }

    #[test]
    fn test_missing_sample_drops_layer_and_instrument() {
        let (_dir, index) = index_for(&["present.wav"]);
        let model = instrument(
            vec![zone(36, 36, 0), zone(38, 38, 1)],
            vec![sample("present.wav"), sample("missing.wav")],
        );

        let projection = project(&model, ProgramType::Drum, 4, &index).unwrap();

        assert_eq!(projection.instrument_count(), 1);
        assert_eq!(projection.program.program.num_keygroups, 1);
        assert_eq!(projection.copies.len(), 1);
    }

    #[test]
    fn test_all_samples_missing_is_no_instruments() {
        let (_dir, index) = index_for(&[]);
        let model = instrument(vec![zone(36, 36, 0)], vec![sample("missing.wav")]);

        assert!(matches!(
            project(&model, ProgramType::Keygroup, 4, &index),
            Err(ConvertError::NoInstruments(_))
        ));
    }

    #[test]
    fn test_no_zones_is_no_instruments() {
        let (_dir, index) = index_for(&[]);
        let model = instrument(Vec::new(), Vec::new());

        assert!(matches!(
            project(&model, ProgramType::Keygroup, 4, &index),
            Err(ConvertError::NoInstruments(_))
        ));
    }

    #[test]
    fn test_too_many_instruments() {
        let (_dir, index) = index_for(&["s.wav"]);
        let zones = (0..128).map(|k| zone(k as i8, k as i8, 0)).collect();
        let model = instrument(zones, vec![sample("s.wav")]);

        assert!(matches!(
            project(&model, ProgramType::Drum, 4, &index),
            Err(ConvertError::TooManyInstruments { count: 128, .. })
        ));
    }

    #[test]
    fn test_shared_sample_copied_once() {
        let (_dir, index) = index_for(&["loop.wav"]);
        let model = instrument(
            vec![zone(36, 47, 0), zone(48, 59, 0)],
            vec![sample("loop.wav")],
        );

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        assert_eq!(projection.instrument_count(), 2);
        assert_eq!(projection.copies.len(), 1);
    }

    #[test]
    fn test_layers_split_by_cluster_size() {
        let (_dir, index) = index_for(&["v.wav"]);
        let zones = (0..5)
            .map(|i| Zone {
                vel_low: i * 20,
                ..zone(60, 72, 0)
            })
            .collect();
        let model = instrument(zones, vec![sample("v.wav")]);

        let projection = project(&model, ProgramType::Keygroup, 2, &index).unwrap();

        let counts: Vec<usize> = projection
            .program
            .program
            .instruments()
            .map(|i| i.layers.layer.len())
            .collect();
        assert_eq!(counts, vec![2, 2, 1]);
        let numbers: Vec<u32> = projection.program.program.instruments().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_zone_fields_carried_to_layer() {
        let (_dir, index) = index_for(&["s.wav"]);
        let mut z = zone(60, 72, 0);
        z.flags = ZoneFlags::ONE_SHOT | ZoneFlags::OUTPUT;
        z.output = 3;
        z.volume = -6;
        z.pan = 63;
        z.scale = 50;
        z.coarse_tuning = -2;
        z.fine_tuning = 10;
        z.sample_start = 100;
        z.sample_end = 9000;
        z.loop_flags = LoopFlags::ENABLED;
        z.loop_start = 200;
        z.loop_end = 8000;
        z.loop_crossfade = 50;
        let model = instrument(vec![z], vec![sample("s.wav")]);

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let slot = &projection.program.program.instruments.instrument[0];
        assert!(slot.one_shot);
        assert_eq!(slot.audio_route.audio_route, 3);
        let layer = &slot.layers.layer[0];
        assert_eq!(format!("{:.6}", layer.volume), "0.501187");
        assert_eq!(format!("{:.6}", layer.pan), "1.000000");
        assert_eq!(format!("{:.6}", layer.key_track), "0.500000");
        assert_eq!((layer.tune_coarse, layer.tune_fine), (-2, 10));
        assert_eq!((layer.slice_start, layer.slice_end), (100, 9000));
        assert!(layer.loop_enabled);
        assert_eq!(layer.slice_loop, 1);
        assert_eq!(layer.slice_loop_start, 200);
        assert_eq!(layer.loop_crossfade_length, 50);
    }

    #[test]
    fn test_group_envelopes_without_params() {
        let (_dir, index) = index_for(&["s.wav"]);
        let mut model = instrument(vec![zone(60, 60, 0)], vec![sample("s.wav")]);
        model.groups[0].env2 = Envelope {
            attack: 127,
            hold: 127,
            decay: 0,
            sustain: 127,
            release: -1,
        };
        model.groups[0].trigger = 1;

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!(format!("{:.6}", slot.volume_attack), "1.000000");
        assert_eq!(format!("{:.6}", slot.volume_hold), "1.000000");
        assert_eq!(format!("{:.6}", slot.volume_sustain), "1.000000");
        assert_eq!(format!("{:.6}", slot.volume_release), "0.000000");
        assert_eq!(format!("{:.6}", slot.pitch_hold), "1.000000");
        assert_eq!(slot.volume_attack_curve, LINEAR_CURVE);
        assert_eq!(slot.trigger_mode, 1);
        assert_eq!(slot.lfo.lfo_type, "Triangle");
    }

    #[test]
    fn test_params_envelopes_and_curve() {
        let (_dir, index) = index_for(&["s.wav"]);
        let mut model = instrument(vec![zone(60, 60, 0)], vec![sample("s.wav")]);
        model.params = Some(Params {
            env2_attack: 127,
            env2_sustain: 0,
            env1_decay: 127,
            time_curve: 99,
            ..Default::default()
        });
        model.groups[0].env2.hold = 127;

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!(format!("{:.6}", slot.volume_attack), "1.000000");
        assert_eq!(format!("{:.6}", slot.volume_hold), "0.000000");
        assert_eq!(format!("{:.6}", slot.volume_sustain), "0.000000");
        assert_eq!(format!("{:.6}", slot.filter_decay), "1.000000");
        assert_eq!(format!("{:.6}", slot.pitch_decay), "1.000000");
        assert_eq!(format!("{:.6}", slot.volume_attack_curve), "1.000000");
        assert_eq!(slot.volume_decay_curve, LINEAR_CURVE);
        assert_eq!(slot.trigger_mode, 2);
    }

    #[test]
    fn test_round_robin_zone_play() {
        let (_dir, index) = index_for(&["a.wav", "b.wav"]);
        let mut model = instrument(
            vec![
                zone(60, 60, 0),
                Zone {
                    group_index: 1,
                    ..zone(62, 62, 1)
                },
            ],
            vec![sample("a.wav"), sample("b.wav")],
        );
        model.groups = vec![
            Group {
                id: 0,
                select_group: 1,
                ..Default::default()
            },
            Group {
                id: 1,
                ..Default::default()
            },
        ];

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let modes: Vec<i32> = projection
            .program
            .program
            .instruments()
            .map(|i| i.zone_play)
            .collect();
        assert_eq!(modes, vec![0, 1]);
    }

    #[test]
    fn test_dangling_group_falls_back_to_first() {
        let (_dir, index) = index_for(&["s.wav"]);
        let mut model = instrument(
            vec![Zone {
                group_index: 9,
                ..zone(60, 60, 0)
            }],
            vec![sample("s.wav")],
        );
        model.groups[0].cutoff = 0;

        let projection = project(&model, ProgramType::Keygroup, 4, &index).unwrap();

        let slot = &projection.program.program.instruments.instrument[0];
        assert_eq!(format!("{:.6}", slot.cutoff), "1.000000");
    }
}
