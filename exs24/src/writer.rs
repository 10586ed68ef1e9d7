//! EXS24 container writer
//!
//! Produces containers the parser reads back: a header chunk followed by the
//! added records, each laid out at its fixed offsets. Used to build fixtures
//! for converter tests and to exercise the decoder against known layouts.

use crate::module::{Endian, Group, Sample, Zone};
use crate::parser::ChunkKind;
use crate::{
    CHUNK_HEADER_LEN, CHUNK_STRIDE, EXPANSION_SIZE_OFFSET, GROUP_RECORD_LEN, MAGIC_OFFSET, PARAM_SLOTS,
    PARAMS_RECORD_LEN, SAMPLE_RECORD_LEN, SIZE_EXPANDED_THRESHOLD, ZONE_RECORD_LEN,
};

/// Declared size of the header chunk
const HEADER_CHUNK_SIZE: u32 = 40;

/// Zero-filled chunk buffer with endian-aware field setters
struct RecordBuf {
    buf: Vec<u8>,
    endian: Endian,
}

impl RecordBuf {
    fn new(kind: ChunkKind, size: u32, endian: Endian) -> Self {
        let mut record = Self {
            buf: vec![0u8; size as usize + CHUNK_STRIDE],
            endian,
        };
        record.put_u32(0, 0x0000_0101 | (u32::from(kind.code()) << 24));
        record.put_u32(4, size);
        record.buf[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(endian.magic());
        record
    }

    fn put_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    fn put_i8(&mut self, offset: usize, value: i8) {
        self.buf[offset] = value as u8;
    }

    fn put_i16(&mut self, offset: usize, value: i16) {
        let bytes = match self.endian {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        };
        self.buf[offset..offset + 2].copy_from_slice(&bytes);
    }

    fn put_u32(&mut self, offset: usize, value: u32) {
        let bytes = match self.endian {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        };
        self.buf[offset..offset + 4].copy_from_slice(&bytes);
    }

    fn put_i32(&mut self, offset: usize, value: i32) {
        self.put_u32(offset, value as u32);
    }

    /// Fixed-width string field, truncated and zero padded
    fn put_str(&mut self, offset: usize, len: usize, value: &str) {
        let bytes = value.as_bytes();
        let n = bytes.len().min(len);
        self.buf[offset..offset + n].copy_from_slice(&bytes[..n]);
    }
}

/// Builder for EXS24 containers
#[derive(Debug, Clone, Default)]
pub struct ExsWriter {
    endian: Endian,
    size_expanded: bool,
    chunks: Vec<u8>,
}

impl ExsWriter {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            ..Default::default()
        }
    }

    /// Mark the header as size-expanded
    pub fn set_size_expanded(&mut self, expanded: bool) {
        self.size_expanded = expanded;
    }

    pub fn add_zone(&mut self, zone: &Zone) -> &mut Self {
        let mut r = self.record(ChunkKind::Zone, ZONE_RECORD_LEN);
        r.put_u32(8, zone.id);
        r.put_str(20, 64, &zone.name);
        r.put_u8(84, zone.flags.bits());
        r.put_u8(85, zone.key);
        r.put_i8(86, zone.fine_tuning);
        r.put_i8(87, zone.pan);
        r.put_i8(88, zone.volume);
        r.put_i8(89, zone.scale);
        r.put_i8(90, zone.key_low);
        r.put_i8(91, zone.key_high);
        r.put_i8(93, zone.vel_low);
        r.put_i8(94, zone.vel_high);
        r.put_i32(96, zone.sample_start);
        r.put_i32(100, zone.sample_end);
        r.put_i32(104, zone.loop_start);
        r.put_i32(108, zone.loop_end);
        r.put_i32(112, zone.loop_crossfade);
        r.put_i8(116, zone.loop_tune);
        r.put_u32(117, zone.loop_flags.bits());
        r.put_u8(121, zone.play_mode);
        r.put_i8(164, zone.coarse_tuning);
        r.put_i8(166, zone.output);
        r.put_i32(172, zone.group_index);
        r.put_i32(176, zone.sample_index);
        r.put_i32(188, zone.sample_fade);
        r.put_i32(192, zone.offset);
        self.push(r)
    }

    pub fn add_group(&mut self, group: &Group) -> &mut Self {
        let mut r = self.record(ChunkKind::Group, GROUP_RECORD_LEN);
        r.put_u32(8, group.id);
        r.put_str(20, 64, &group.name);
        r.put_i8(84, group.volume);
        r.put_i8(85, group.pan);
        r.put_u8(86, group.polyphony);
        r.put_u8(87, if group.decay { 0x40 } else { 0 });
        r.put_u8(88, group.exclusive);
        r.put_u8(89, group.vel_low);
        r.put_u8(90, group.vel_high);
        r.put_u32(100, group.decay_time);
        r.put_i8(125, group.cutoff);
        r.put_i8(127, group.resonance);
        r.put_i32(140, group.env2.attack);
        r.put_i32(144, group.env2.decay);
        r.put_i32(148, group.env2.sustain);
        r.put_i32(152, group.env2.release);
        r.put_u8(157, group.trigger);
        r.put_u8(158, group.output);
        r.put_i32(164, group.select_group);
        r.put_u8(168, group.select_type);
        r.put_u8(169, group.select_number);
        r.put_u8(170, group.select_high);
        r.put_u8(171, group.select_low);
        r.put_u8(172, group.key_low);
        r.put_u8(173, group.key_high);
        r.put_i32(180, group.env2.hold);
        r.put_i32(184, group.env1.attack);
        r.put_i32(188, group.env1.decay);
        r.put_i32(192, group.env1.sustain);
        r.put_i32(196, group.env1.release);
        self.push(r)
    }

    pub fn add_sample(&mut self, sample: &Sample) -> &mut Self {
        let mut r = self.record(ChunkKind::Sample, SAMPLE_RECORD_LEN);
        r.put_u32(8, sample.id);
        r.put_str(20, 64, &sample.name);
        r.put_i32(88, sample.length);
        r.put_i32(92, sample.rate);
        r.put_u8(96, sample.bit_depth);
        r.put_i32(112, sample.sample_type);
        r.put_str(164, 256, &sample.path);
        r.put_str(420, 256, &sample.file_name);
        self.push(r)
    }

    /// Params chunk from raw `(key, value)` pairs; pairs beyond 100 are dropped
    pub fn add_params(&mut self, pairs: &[(u8, i16)]) -> &mut Self {
        let mut r = self.record(ChunkKind::Params, PARAMS_RECORD_LEN);
        for (i, &(key, value)) in pairs.iter().take(PARAM_SLOTS).enumerate() {
            r.put_u8(88 + i, key);
            r.put_i16(188 + i * 2, value);
        }
        self.push(r)
    }

    /// Arbitrary chunk with a declared size; `payload` is placed after the chunk header
    pub fn add_raw_chunk(&mut self, kind: ChunkKind, size: u32, payload: &[u8]) -> &mut Self {
        let mut r = RecordBuf::new(kind, size, self.endian);
        let n = payload.len().min(r.buf.len() - CHUNK_HEADER_LEN);
        r.buf[CHUNK_HEADER_LEN..CHUNK_HEADER_LEN + n].copy_from_slice(&payload[..n]);
        self.push(r)
    }

    /// Assemble the container
    pub fn finish(&self) -> Vec<u8> {
        let mut header = RecordBuf::new(ChunkKind::Header, HEADER_CHUNK_SIZE, self.endian);
        let expansion = if self.size_expanded {
            SIZE_EXPANDED_THRESHOLD + 1
        } else {
            HEADER_CHUNK_SIZE
        };
        header.put_u32(EXPANSION_SIZE_OFFSET, expansion);

        let mut out = header.buf;
        out.extend_from_slice(&self.chunks);
        out
    }

    fn record(&self, kind: ChunkKind, record_len: usize) -> RecordBuf {
        RecordBuf::new(kind, (record_len - CHUNK_STRIDE) as u32, self.endian)
    }

    fn push(&mut self, record: RecordBuf) -> &mut Self {
        self.chunks.extend_from_slice(&record.buf);
        self
    }
}
