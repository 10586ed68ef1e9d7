//! EXS24 instrument data structures

mod group;
mod params;
mod sample;
mod zone;

pub use group::{Envelope, Group};
pub use params::{ModSlot, Params};
pub use sample::Sample;
pub use zone::{LoopFlags, Zone, ZoneFlags};

/// Byte order of every multi-byte integer in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Endianness announced by a header magic, if it is one of the four known markers
    pub fn from_magic(magic: &[u8; 4]) -> Option<Self> {
        if crate::MAGIC_BIG_ENDIAN.contains(&magic) {
            Some(Self::Big)
        } else if crate::MAGIC_LITTLE_ENDIAN.contains(&magic) {
            Some(Self::Little)
        } else {
            None
        }
    }

    /// Magic written for this byte order
    pub fn magic(self) -> &'static [u8; 4] {
        match self {
            Self::Little => crate::MAGIC_LITTLE_ENDIAN[0],
            Self::Big => crate::MAGIC_BIG_ENDIAN[0],
        }
    }
}

/// A decoded EXS24 instrument
///
/// Built once per file by [`crate::parse_exs`]. Round-robin sequences are
/// resolved during decoding, so `Group::select_number` is already filled in.
#[derive(Debug, Clone, Default)]
pub struct Instrument {
    /// File name without the `.exs` extension
    pub name: String,
    /// Byte order of the container
    pub endian: Endian,
    /// Header size word exceeded the expansion threshold
    pub size_expanded: bool,
    /// Total size of the decoded buffer in bytes
    pub size: usize,
    /// Zones in decode order
    pub zones: Vec<Zone>,
    /// Groups in decode order; `Group::select_group` indexes into this list
    pub groups: Vec<Group>,
    /// Samples in decode order; `Zone::sample_index` indexes into this list
    pub samples: Vec<Sample>,
    /// Instrument-wide parameters, if a params chunk was present
    pub params: Option<Params>,
    /// Round-robin chains as ordered group indices
    pub sequences: Vec<Vec<usize>>,
}

impl Instrument {
    pub fn is_big_endian(&self) -> bool {
        self.endian == Endian::Big
    }

    /// Sample a zone points at, if the reference resolves
    pub fn sample_for(&self, zone: &Zone) -> Option<&Sample> {
        zone.sample_slot().and_then(|index| self.samples.get(index))
    }

    /// Whether a zone references a sample that exists
    pub fn has_sample(&self, zone: &Zone) -> bool {
        self.sample_for(zone).is_some()
    }

    /// Group with the given ID (not array position)
    pub fn group_by_id(&self, id: i32) -> Option<&Group> {
        self.groups.iter().find(|g| i64::from(g.id) == i64::from(id))
    }

    /// Whether any group takes part in a round-robin chain
    pub fn has_round_robin(&self) -> bool {
        self.groups.iter().any(Group::in_round_robin)
    }
}
