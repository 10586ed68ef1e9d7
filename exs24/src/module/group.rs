//! EXS24 group structures

/// One ADSR envelope as stored in a group record
///
/// Raw values are on the 0..127 scale; negative means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    pub attack: i32,
    pub hold: i32,
    pub decay: i32,
    pub sustain: i32,
    pub release: i32,
}

/// Settings shared by the zones that reference a group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Identifier referenced by `Zone::group_index` (not the list position)
    pub id: u32,
    pub name: String,
    /// Volume in dB
    pub volume: i8,
    pub pan: i8,
    pub polyphony: u8,
    /// Decay flag from the option byte
    pub decay: bool,
    pub exclusive: u8,
    /// Lower velocity bound, 0 means unconstrained
    pub vel_low: u8,
    /// Upper velocity bound, 0 means unconstrained
    pub vel_high: u8,
    pub decay_time: u32,
    pub cutoff: i8,
    pub resonance: i8,
    /// Envelope 1, drives the filter
    pub env1: Envelope,
    /// Envelope 2, drives the amplifier
    pub env2: Envelope,
    /// 1 for release trigger, anything else for normal
    pub trigger: u8,
    pub output: u8,
    /// List position of the next group in a round-robin cycle, or -1
    pub select_group: i32,
    pub select_type: u8,
    /// 1-based position within the round-robin chain, 0 when not chained
    pub select_number: u8,
    pub select_high: u8,
    pub select_low: u8,
    /// Lower key bound, 0 means unconstrained
    pub key_low: u8,
    /// Upper key bound, 0 means unconstrained
    pub key_high: u8,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            volume: 0,
            pan: 0,
            polyphony: 0,
            decay: false,
            exclusive: 0,
            vel_low: 0,
            vel_high: 127,
            decay_time: 0,
            cutoff: 127,
            resonance: 0,
            env1: Envelope::default(),
            env2: Envelope::default(),
            trigger: 0,
            output: 0,
            select_group: crate::UNSET_INDEX,
            select_type: 0,
            select_number: 0,
            select_high: 0,
            select_low: 0,
            key_low: 0,
            key_high: 127,
        }
    }
}

impl Group {
    /// Group substituted when no decoded group is referenced by a playable zone
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn in_round_robin(&self) -> bool {
        self.select_group >= 0
    }

    pub fn is_release_trigger(&self) -> bool {
        self.trigger == 1
    }
}
