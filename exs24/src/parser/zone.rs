//! Zone chunk decoding

use crate::error::ExsError;
use crate::module::{Endian, LoopFlags, Zone, ZoneFlags};
use crate::parser::{Chunk, Record};
use crate::{MIN_ZONE_CHUNK_SIZE, ZONE_RECORD_LEN};

/// Decode the zone record at the chunk start
pub(crate) fn parse_zone(data: &[u8], chunk: &Chunk, endian: Endian) -> Result<Zone, ExsError> {
    if chunk.size < MIN_ZONE_CHUNK_SIZE {
        return Err(ExsError::InvalidZoneChunkSize {
            offset: chunk.offset,
            size: chunk.size,
        });
    }

    let r = Record::new(data, chunk.offset, endian, "zone");
    r.require(ZONE_RECORD_LEN)?;

    Ok(Zone {
        id: r.u32(8)?,
        name: r.string(20, 64)?,
        flags: ZoneFlags::from_bits(r.u8(84)?),
        key: r.u8(85)?,
        fine_tuning: r.i8(86)?,
        pan: r.i8(87)?,
        volume: r.i8(88)?,
        scale: r.i8(89)?,
        key_low: r.i8(90)?,
        key_high: r.i8(91)?,
        // 92: reserved
        vel_low: r.i8(93)?,
        vel_high: r.i8(94)?,
        sample_start: r.i32(96)?,
        sample_end: r.i32(100)?,
        loop_start: r.i32(104)?,
        loop_end: r.i32(108)?,
        loop_crossfade: r.i32(112)?,
        loop_tune: r.i8(116)?,
        loop_flags: LoopFlags::from_bits(r.u32(117)?),
        play_mode: r.u8(121)?,
        coarse_tuning: r.i8(164)?,
        output: r.i8(166)?,
        group_index: r.i32(172)?,
        sample_index: r.i32(176)?,
        sample_fade: r.i32(188)?,
        offset: r.i32(192)?,
    })
}
