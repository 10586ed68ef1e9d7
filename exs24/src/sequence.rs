//! Round-robin chain resolution
//!
//! Groups form round-robin cycles through `select_group`, which holds the
//! list position of the next group in the cycle. A chain is recovered by
//! walking predecessors back to the head, then following `select_group`
//! forward until the walk leaves the cycle or revisits a member.

use hashbrown::HashSet;

use crate::module::Group;

/// First group (other than `index` itself) whose link points at `index`
fn predecessor(groups: &[Group], index: usize) -> Option<usize> {
    groups
        .iter()
        .enumerate()
        .find(|(j, g)| *j != index && usize::try_from(g.select_group).ok() == Some(index))
        .map(|(j, _)| j)
}

/// Walk back-links from `start` to the head of its chain
fn chain_head(groups: &[Group], start: usize) -> usize {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut head = start;
    while let Some(prev) = predecessor(groups, head) {
        if !visited.insert(prev) {
            break;
        }
        head = prev;
    }
    head
}

/// Reconstruct round-robin chains as ordered lists of group positions
///
/// Every group appears in at most one chain, groups with `select_group == -1`
/// never appear, and single-group chains are dropped. Cycles terminate on the
/// first revisited group.
pub fn resolve_sequences(groups: &[Group]) -> Vec<Vec<usize>> {
    let mut assigned = HashSet::new();
    let mut sequences = Vec::new();

    for (index, group) in groups.iter().enumerate() {
        if !group.in_round_robin() || assigned.contains(&index) {
            continue;
        }

        let mut chain: Vec<usize> = Vec::new();
        let mut cursor = Some(chain_head(groups, index));
        while let Some(current) = cursor {
            let Some(member) = groups.get(current) else {
                break;
            };
            if !member.in_round_robin() || chain.contains(&current) || assigned.contains(&current) {
                break;
            }
            chain.push(current);
            cursor = usize::try_from(member.select_group).ok();
        }

        if chain.len() > 1 {
            assigned.extend(chain.iter().copied());
            sequences.push(chain);
        }
    }
    sequences
}

/// Store each group's 1-based chain position in `select_number` (0 when unchained)
pub fn assign_sequence_numbers(groups: &mut [Group], sequences: &[Vec<usize>]) {
    for group in groups.iter_mut() {
        group.select_number = 0;
    }
    for sequence in sequences {
        for (position, &index) in sequence.iter().enumerate() {
            if let Some(group) = groups.get_mut(index) {
                group.select_number = u8::try_from(position + 1).unwrap_or(u8::MAX);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(links: &[i32]) -> Vec<Group> {
        links
            .iter()
            .enumerate()
            .map(|(i, &select_group)| Group {
                id: i as u32,
                select_group,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_three_group_cycle() {
        let groups = linked(&[1, 2, 0]);
        let sequences = resolve_sequences(&groups);
        assert_eq!(sequences.len(), 1);
        let mut members = sequences[0].clone();
        members.sort();
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn test_chain_order_follows_links() {
        // 2 -> 0 -> 1 -> 2
        let groups = linked(&[1, 2, 0]);
        let sequence = &resolve_sequences(&groups)[0];
        for pair in sequence.windows(2) {
            assert_eq!(groups[pair[0]].select_group as usize, pair[1]);
        }
    }

    #[test]
    fn test_two_cycle_terminates() {
        let groups = linked(&[1, 0]);
        let sequences = resolve_sequences(&groups);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences[0].len(), 2);
    }

    #[test]
    fn test_unlinked_groups_never_in_sequence() {
        // 0 -> 1, 1 is not in a cycle
        let groups = linked(&[1, -1, -1]);
        let sequences = resolve_sequences(&groups);
        assert!(sequences.iter().flatten().all(|&i| groups[i].select_group != -1));
        assert!(sequences.is_empty());
    }

    #[test]
    fn test_self_link_discarded() {
        let groups = linked(&[0, -1]);
        assert!(resolve_sequences(&groups).is_empty());
    }

    #[test]
    fn test_dangling_link() {
        let groups = linked(&[7, 0]);
        let sequences = resolve_sequences(&groups);
        assert_eq!(sequences, vec![vec![1, 0]]);
    }

    #[test]
    fn test_two_independent_chains() {
        let groups = linked(&[1, 0, 3, 2, -1]);
        let sequences = resolve_sequences(&groups);
        assert_eq!(sequences.len(), 2);
        let all: Vec<usize> = sequences.iter().flatten().copied().collect();
        let unique: HashSet<usize> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_assign_sequence_numbers() {
        let mut groups = linked(&[1, 2, 0, -1]);
        groups[3].select_number = 9;
        let sequences = resolve_sequences(&groups);
        assign_sequence_numbers(&mut groups, &sequences);

        for (position, &index) in sequences[0].iter().enumerate() {
            assert_eq!(groups[index].select_number as usize, position + 1);
        }
        assert_eq!(groups[3].select_number, 0);
    }
}
