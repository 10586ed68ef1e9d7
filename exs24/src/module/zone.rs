//! EXS24 zone structures and flags

/// A key/velocity range mapped to one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    /// Option byte (see [`ZoneFlags`])
    pub flags: ZoneFlags,
    /// Root key
    pub key: u8,
    /// Fine tuning in cents
    pub fine_tuning: i8,
    /// Coarse tuning in semitones
    pub coarse_tuning: i8,
    /// Pan (-64..63)
    pub pan: i8,
    /// Volume in dB
    pub volume: i8,
    /// Key tracking amount
    pub scale: i8,
    pub key_low: i8,
    pub key_high: i8,
    pub vel_low: i8,
    pub vel_high: i8,
    pub sample_start: i32,
    pub sample_end: i32,
    pub loop_start: i32,
    pub loop_end: i32,
    pub loop_crossfade: i32,
    pub loop_tune: i8,
    /// Loop option word (see [`LoopFlags`])
    pub loop_flags: LoopFlags,
    pub play_mode: u8,
    /// Output routing target, meaningful when [`ZoneFlags::OUTPUT`] is set
    pub output: i8,
    /// ID of the owning group, or -1
    pub group_index: i32,
    /// Position in the sample list, or -1
    pub sample_index: i32,
    pub sample_fade: i32,
    pub offset: i32,
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            flags: ZoneFlags::empty(),
            key: 60,
            fine_tuning: 0,
            coarse_tuning: 0,
            pan: 0,
            volume: 0,
            scale: 0,
            key_low: 0,
            key_high: 127,
            vel_low: 0,
            vel_high: 127,
            sample_start: 0,
            sample_end: 0,
            loop_start: 0,
            loop_end: 0,
            loop_crossfade: 0,
            loop_tune: 0,
            loop_flags: LoopFlags::empty(),
            play_mode: 0,
            output: 0,
            group_index: crate::UNSET_INDEX,
            sample_index: crate::UNSET_INDEX,
            sample_fade: 0,
            offset: 0,
        }
    }
}

impl Zone {
    /// Sample list position, `None` for the unset sentinel
    pub fn sample_slot(&self) -> Option<usize> {
        usize::try_from(self.sample_index).ok()
    }

    /// Zone covers exactly one key
    pub fn is_single_note(&self) -> bool {
        self.key_low == self.key_high
    }

    pub fn is_one_shot(&self) -> bool {
        self.flags.contains(ZoneFlags::ONE_SHOT)
    }

    /// Pitch follows the played key (the stored bit means "tracking off")
    pub fn tracks_pitch(&self) -> bool {
        !self.flags.contains(ZoneFlags::PITCH_OFF)
    }

    pub fn is_reverse(&self) -> bool {
        self.flags.contains(ZoneFlags::REVERSE)
    }

    pub fn velocity_range_on(&self) -> bool {
        self.flags.contains(ZoneFlags::VELOCITY_RANGE)
    }

    pub fn has_output(&self) -> bool {
        self.flags.contains(ZoneFlags::OUTPUT)
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_flags.contains(LoopFlags::ENABLED)
    }

    pub fn loop_equal_power(&self) -> bool {
        self.loop_flags.contains(LoopFlags::EQUAL_POWER)
    }

    pub fn loop_play_to_end(&self) -> bool {
        self.loop_flags.contains(LoopFlags::PLAY_TO_END)
    }
}

/// Zone option byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneFlags(u8);

impl ZoneFlags {
    /// Play the whole sample regardless of note-off
    pub const ONE_SHOT: Self = Self(0x01);
    /// Pitch tracking disabled
    pub const PITCH_OFF: Self = Self(0x02);
    /// Play the sample backwards
    pub const REVERSE: Self = Self(0x04);
    /// Velocity range enabled
    pub const VELOCITY_RANGE: Self = Self(0x08);
    /// Output routing enabled
    pub const OUTPUT: Self = Self(0x40);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for ZoneFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Zone loop option word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopFlags(u32);

impl LoopFlags {
    pub const ENABLED: Self = Self(0x01);
    /// Equal-power crossfade at the loop seam
    pub const EQUAL_POWER: Self = Self(0x02);
    /// Leave the loop and play to the end on release
    pub const PLAY_TO_END: Self = Self(0x04);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for LoopFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_flags() {
        let zone = Zone {
            flags: ZoneFlags::ONE_SHOT | ZoneFlags::REVERSE,
            ..Default::default()
        };
        assert!(zone.is_one_shot());
        assert!(zone.is_reverse());
        assert!(zone.tracks_pitch());
        assert!(!zone.velocity_range_on());
        assert!(!zone.has_output());

        let untracked = Zone {
            flags: ZoneFlags::PITCH_OFF,
            ..Default::default()
        };
        assert!(!untracked.tracks_pitch());
    }

    #[test]
    fn test_loop_flags() {
        let zone = Zone {
            loop_flags: LoopFlags::ENABLED | LoopFlags::EQUAL_POWER,
            ..Default::default()
        };
        assert!(zone.loop_enabled());
        assert!(zone.loop_equal_power());
        assert!(!zone.loop_play_to_end());
    }

    #[test]
    fn test_sample_slot() {
        let mut zone = Zone::default();
        assert_eq!(zone.sample_slot(), None);
        zone.sample_index = 3;
        assert_eq!(zone.sample_slot(), Some(3));
    }
}
