//! Group chunk decoding

use crate::GROUP_RECORD_LEN;
use crate::error::ExsError;
use crate::module::{Endian, Envelope, Group};
use crate::parser::{Chunk, Record};

/// Decay flag in the group option byte
const GROUP_DECAY: u8 = 0x40;

/// Decode the group record at the chunk start
pub(crate) fn parse_group(data: &[u8], chunk: &Chunk, endian: Endian) -> Result<Group, ExsError> {
    let r = Record::new(data, chunk.offset, endian, "group");
    r.require(GROUP_RECORD_LEN)?;

    Ok(Group {
        id: r.u32(8)?,
        name: r.string(20, 64)?,
        volume: r.i8(84)?,
        pan: r.i8(85)?,
        polyphony: r.u8(86)?,
        decay: r.u8(87)? & GROUP_DECAY != 0,
        exclusive: r.u8(88)?,
        vel_low: r.u8(89)?,
        vel_high: r.u8(90)?,
        decay_time: r.u32(100)?,
        cutoff: r.i8(125)?,
        resonance: r.i8(127)?,
        env2: Envelope {
            attack: r.i32(140)?,
            decay: r.i32(144)?,
            sustain: r.i32(148)?,
            release: r.i32(152)?,
            hold: r.i32(180)?,
        },
        trigger: r.u8(157)?,
        output: r.u8(158)?,
        select_group: r.i32(164)?,
        select_type: r.u8(168)?,
        select_number: r.u8(169)?,
        select_high: r.u8(170)?,
        select_low: r.u8(171)?,
        key_low: r.u8(172)?,
        key_high: r.u8(173)?,
        env1: Envelope {
            attack: r.i32(184)?,
            decay: r.i32(188)?,
            sustain: r.i32(192)?,
            release: r.i32(196)?,
            hold: 0,
        },
    })
}
