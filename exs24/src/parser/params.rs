//! Params chunk decoding
//!
//! The params chunk is a sparse table of up to 100 `(key, value)` pairs.
//! Keys resolve through [`PARAM_KEYS`]; keys missing from the table are
//! logged and skipped.

use std::sync::OnceLock;

use hashbrown::HashMap;
use tracing::warn;

use crate::error::ExsError;
use crate::module::{Endian, ModSlot, Params};
use crate::parser::{Chunk, Record};
use crate::{MOD_SLOTS, PARAM_SLOTS, PARAMS_RECORD_LEN};

const KEYS_OFFSET: usize = 88;
const VALUES_OFFSET: usize = 188;

/// Where a param key writes its value
#[derive(Clone, Copy)]
enum Target {
    Field(fn(&mut Params, i16)),
    Slot(fn(&mut ModSlot, i16)),
}

/// A run of `count` keys, `stride` apart, starting at `first`
struct ParamKey {
    first: u8,
    stride: u8,
    count: u8,
    target: Target,
}

impl ParamKey {
    const fn field(key: u8, set: fn(&mut Params, i16)) -> Self {
        Self {
            first: key,
            stride: 1,
            count: 1,
            target: Target::Field(set),
        }
    }

    const fn slots(first: u8, stride: u8, set: fn(&mut ModSlot, i16)) -> Self {
        Self {
            first,
            stride,
            count: MOD_SLOTS as u8,
            target: Target::Slot(set),
        }
    }
}

static PARAM_KEYS: &[ParamKey] = &[
    ParamKey::field(3, |p, v| p.pitch_bend_up = v),
    ParamKey::field(4, |p, v| p.pitch_bend_down = v),
    ParamKey::field(5, |p, v| p.voices = v),
    ParamKey::field(7, |p, v| p.output_volume = v),
    ParamKey::field(8, |p, v| p.key_scale = v),
    ParamKey::field(10, |p, v| p.mono_mode = v),
    ParamKey::field(14, |p, v| p.coarse_tune = v),
    ParamKey::field(15, |p, v| p.fine_tune = v),
    ParamKey::field(20, |p, v| p.glide_time = v),
    ParamKey::field(44, |p, v| p.filter_on = v != 0),
    ParamKey::field(45, |p, v| p.transpose = v),
    ParamKey::field(46, |p, v| p.filter_via_key = v),
    ParamKey::field(60, |p, v| p.lfo1_decay_delay = v),
    ParamKey::field(61, |p, v| p.lfo1_rate = v),
    ParamKey::field(62, |p, v| p.lfo1_waveform = v),
    ParamKey::field(63, |p, v| p.lfo2_rate = v),
    ParamKey::field(64, |p, v| p.lfo2_waveform = v),
    ParamKey::field(72, |p, v| p.pitcher = v),
    ParamKey::field(73, |p, v| p.pitcher_via_vel = v),
    ParamKey::field(75, |p, v| p.filter_drive = v),
    ParamKey::field(76, |p, v| p.env1_attack = v),
    ParamKey::field(77, |p, v| p.env1_attack_via_vel = v),
    ParamKey::field(78, |p, v| p.env1_decay = v),
    ParamKey::field(79, |p, v| p.env1_sustain = v),
    ParamKey::field(80, |p, v| p.env1_release = v),
    ParamKey::field(81, |p, v| p.env2_sustain = v),
    ParamKey::field(82, |p, v| p.env2_attack = v),
    ParamKey::field(83, |p, v| p.env2_attack_via_vel = v),
    ParamKey::field(84, |p, v| p.env2_decay = v),
    ParamKey::field(85, |p, v| p.env2_release = v),
    ParamKey::field(89, |p, v| p.level_via_vel = v),
    ParamKey::field(90, |p, v| p.level_fixed = v),
    ParamKey::field(91, |p, v| p.time_curve = v),
    ParamKey::field(92, |p, v| p.time_via = v),
    ParamKey::field(95, |p, v| p.velocity_offset = v),
    ParamKey::field(97, |p, v| p.velocity_xfade = v),
    ParamKey::field(98, |p, v| p.random_detune = v),
    ParamKey::field(163, |p, v| p.sample_select_random = v),
    ParamKey::field(164, |p, v| p.velocity_random = v),
    ParamKey::field(165, |p, v| p.velocity_xfade_type = v),
    ParamKey::field(166, |p, v| p.coarse_tune = v),
    ParamKey::field(167, |p, v| p.lfo3_rate = v),
    ParamKey::field(170, |p, v| p.filter_fat = v != 0),
    ParamKey::field(171, |p, v| p.unison = v != 0),
    ParamKey::field(172, |p, v| p.hold_via = v),
    ParamKey::slots(173, 6, |s, v| s.destination = v),
    ParamKey::slots(174, 6, |s, v| s.source = v),
    ParamKey::slots(175, 6, |s, v| s.via = v),
    ParamKey::slots(176, 6, |s, v| s.amount = v),
    ParamKey::slots(177, 6, |s, v| s.amount_via = v),
    ParamKey::slots(178, 6, |s, v| s.invert_via = v != 0),
    ParamKey::slots(233, 1, |s, v| s.invert = v != 0),
    ParamKey::field(243, |p, v| p.filter_type = v),
    ParamKey::slots(244, 1, |s, v| s.bypass = v != 0),
];

/// Key -> (target, modulation slot index), expanded once from [`PARAM_KEYS`]
fn lookup() -> &'static HashMap<u8, (Target, usize)> {
    static TABLE: OnceLock<HashMap<u8, (Target, usize)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for entry in PARAM_KEYS {
            for slot in 0..entry.count {
                let key = entry.first + slot * entry.stride;
                table.insert(key, (entry.target, usize::from(slot)));
            }
        }
        table
    })
}

/// Apply one key/value pair; returns false for keys outside the table
fn apply(params: &mut Params, key: u8, value: i16) -> bool {
    match lookup().get(&key) {
        Some((Target::Field(set), _)) => set(params, value),
        Some((Target::Slot(set), slot)) => set(&mut params.mod_slots[*slot], value),
        None => return false,
    }
    true
}

/// Decode the params record at the chunk start
pub(crate) fn parse_params(data: &[u8], chunk: &Chunk, endian: Endian) -> Result<Params, ExsError> {
    let r = Record::new(data, chunk.offset, endian, "params");
    r.require(PARAMS_RECORD_LEN)?;

    let mut params = Params::default();
    for i in 0..PARAM_SLOTS {
        let key = r.u8(KEYS_OFFSET + i)?;
        if key == 0 {
            continue;
        }
        let value = r.i16(VALUES_OFFSET + i * 2)?;
        if !apply(&mut params, key, value) {
            warn!(key, value, "ignoring unknown param key");
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_table_has_no_duplicate_keys() {
        let expanded: usize = PARAM_KEYS.iter().map(|k| usize::from(k.count)).sum();
        assert_eq!(lookup().len(), expanded);
    }

    #[test]
    fn test_apply_fields_and_slots() {
        let mut params = Params::default();
        assert!(apply(&mut params, 82, 40));
        assert!(apply(&mut params, 91, -20));
        assert!(apply(&mut params, 171, 1));
        assert!(apply(&mut params, 173 + 6 * 2, 9));
        assert!(apply(&mut params, 178 + 6 * 9, 1));
        assert!(apply(&mut params, 233 + 4, 1));
        assert!(apply(&mut params, 253, 1));

        assert_eq!(params.env2_attack, 40);
        assert_eq!(params.time_curve, -20);
        assert!(params.unison);
        assert_eq!(params.mod_slots[2].destination, 9);
        assert!(params.mod_slots[9].invert_via);
        assert!(params.mod_slots[4].invert);
        assert!(params.mod_slots[9].bypass);
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut params = Params::default();
        assert!(!apply(&mut params, 1, 5));
        assert!(!apply(&mut params, 254, 5));
        assert_eq!(params, Params::default());
    }
}
