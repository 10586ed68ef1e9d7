//! Drum kit vs. pitched instrument classification

use crate::module::Instrument;

/// Destination program layout an instrument should be projected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramKind {
    /// Pitched instrument spanning key ranges
    #[default]
    Keygroup,
    /// One pad per note
    Drum,
}

/// Strategy deciding the program layout of a decoded instrument
pub trait ProgramClassifier {
    fn classify(&self, instrument: &Instrument) -> ProgramKind;
}

/// Structural drum detector
///
/// Counts distinct key-range clusters among playable zones. A kit is
/// recognised when most ranges are single notes and there are few enough of
/// them to fit a pad bank, or when single-note ranges are common and most
/// zones are one-shot or ignore the played pitch. Deterministic for a given
/// model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHeuristic {
    /// Share of single-note key ranges that alone marks a kit
    pub min_single_note_ratio: f64,
    /// Most distinct ranges a kit may have
    pub max_pads: usize,
    /// Share of one-shot or untracked zones that marks a kit with mixed ranges
    pub min_one_shot_ratio: f64,
}

impl Default for DrumHeuristic {
    fn default() -> Self {
        Self {
            min_single_note_ratio: 0.75,
            max_pads: 64,
            min_one_shot_ratio: 0.5,
        }
    }
}

impl ProgramClassifier for DrumHeuristic {
    fn classify(&self, instrument: &Instrument) -> ProgramKind {
        let mut ranges: Vec<(i8, i8)> = instrument
            .playable_zones()
            .map(|z| (z.key_low, z.key_high))
            .collect();
        ranges.sort_unstable();
        ranges.dedup();
        if ranges.len() < 2 {
            return ProgramKind::Keygroup;
        }

        let single = ranges.iter().filter(|(low, high)| low == high).count();
        let single_ratio = single as f64 / ranges.len() as f64;
        if single_ratio >= self.min_single_note_ratio && ranges.len() <= self.max_pads {
            return ProgramKind::Drum;
        }

        let (zones, percussive) = instrument
            .playable_zones()
            .fold((0usize, 0usize), |(total, hits), zone| {
                let hit = zone.is_one_shot() || !zone.tracks_pitch();
                (total + 1, hits + usize::from(hit))
            });
        let percussive_ratio = percussive as f64 / zones as f64;
        if single_ratio >= 0.5 && percussive_ratio >= self.min_one_shot_ratio {
            ProgramKind::Drum
        } else {
            ProgramKind::Keygroup
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Sample, Zone, ZoneFlags};

    fn instrument(ranges: &[(i8, i8)], flags: ZoneFlags) -> Instrument {
        Instrument {
            zones: ranges
                .iter()
                .map(|&(key_low, key_high)| Zone {
                    key_low,
                    key_high,
                    flags,
                    sample_index: 0,
                    ..Default::default()
                })
                .collect(),
            samples: vec![Sample::default()],
            ..Default::default()
        }
    }

    #[test]
    fn test_single_note_kit_is_drum() {
        let kit = instrument(&[(36, 36), (38, 38), (42, 42), (46, 46)], ZoneFlags::empty());
        assert_eq!(DrumHeuristic::default().classify(&kit), ProgramKind::Drum);
    }

    #[test]
    fn test_multisampled_piano_is_keygroup() {
        let piano = instrument(&[(21, 32), (33, 44), (45, 56), (57, 68)], ZoneFlags::empty());
        assert_eq!(DrumHeuristic::default().classify(&piano), ProgramKind::Keygroup);
    }

    #[test]
    fn test_single_range_is_keygroup() {
        let one = instrument(&[(60, 60), (60, 60)], ZoneFlags::ONE_SHOT);
        assert_eq!(DrumHeuristic::default().classify(&one), ProgramKind::Keygroup);
    }

    #[test]
    fn test_chromatic_set_beyond_pad_limit_is_keygroup() {
        let ranges: Vec<(i8, i8)> = (21..109).map(|k| (k, k)).collect();
        let chromatic = instrument(&ranges, ZoneFlags::empty());
        assert_eq!(DrumHeuristic::default().classify(&chromatic), ProgramKind::Keygroup);
    }

    #[test]
    fn test_one_shot_mixed_ranges_is_drum() {
        let kit = instrument(&[(36, 36), (38, 38), (40, 44), (46, 50)], ZoneFlags::ONE_SHOT);
        assert_eq!(DrumHeuristic::default().classify(&kit), ProgramKind::Drum);
        let tonal = instrument(&[(36, 36), (38, 38), (40, 44), (46, 50)], ZoneFlags::empty());
        assert_eq!(DrumHeuristic::default().classify(&tonal), ProgramKind::Keygroup);
    }
}
