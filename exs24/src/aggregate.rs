//! Zone clustering and active group selection

use hashbrown::HashMap;

use crate::module::{Group, Instrument, Zone};

/// Zones sharing one exact key range, ordered by ascending `vel_low`
///
/// Each cluster becomes one destination instrument.
#[derive(Debug, Clone)]
pub struct ZoneCluster<'a> {
    pub key_low: i8,
    pub key_high: i8,
    pub zones: Vec<&'a Zone>,
}

impl ZoneCluster<'_> {
    pub fn is_single_note(&self) -> bool {
        self.key_low == self.key_high
    }

    /// Group ID referenced by the first zone
    pub fn group_index(&self) -> Option<i32> {
        self.zones.first().map(|z| z.group_index)
    }
}

impl Instrument {
    /// Zones whose sample reference resolves
    pub fn playable_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|zone| self.has_sample(zone))
    }

    /// Bucket playable zones by exact `(key_low, key_high)` and split each bucket
    /// into clusters of at most `zones_per_cluster` zones
    ///
    /// Buckets keep the order in which their key range first appears. Within a
    /// bucket zones are sorted by `vel_low`, ties keeping decode order. A
    /// `zones_per_cluster` of 0 is treated as 1.
    pub fn cluster_zones_by_key_range(&self, zones_per_cluster: usize) -> Vec<ZoneCluster<'_>> {
        let per_cluster = zones_per_cluster.max(1);

        let mut positions: HashMap<(i8, i8), usize> = HashMap::new();
        let mut buckets: Vec<((i8, i8), Vec<&Zone>)> = Vec::new();
        for zone in self.playable_zones() {
            let range = (zone.key_low, zone.key_high);
            let slot = *positions.entry(range).or_insert_with(|| {
                buckets.push((range, Vec::new()));
                buckets.len() - 1
            });
            buckets[slot].1.push(zone);
        }

        let mut clusters = Vec::new();
        for ((key_low, key_high), mut zones) in buckets {
            zones.sort_by_key(|z| z.vel_low);
            for chunk in zones.chunks(per_cluster) {
                clusters.push(ZoneCluster {
                    key_low,
                    key_high,
                    zones: chunk.to_vec(),
                });
            }
        }
        clusters
    }

    /// Groups referenced by at least one playable zone
    ///
    /// Falls back to a single full-range group named after the instrument, so
    /// the result is never empty.
    pub fn active_groups(&self) -> Vec<Group> {
        let active: Vec<Group> = self
            .groups
            .iter()
            .filter(|group| {
                self.playable_zones()
                    .any(|zone| i64::from(zone.group_index) == i64::from(group.id))
            })
            .cloned()
            .collect();

        if active.is_empty() {
            vec![Group::fallback(&self.name)]
        } else {
            active
        }
    }
}
