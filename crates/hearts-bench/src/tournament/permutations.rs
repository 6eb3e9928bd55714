use crate::config::SEATS;

/// Seatings of the four agents, in lexicographic order. Entry `i` of a
/// seating is the agent index sitting at seat `i`.
pub struct SeatPermutations {
    seatings: Vec<[usize; SEATS]>,
}

impl SeatPermutations {
    /// The first `count` seatings; there are 24 at most.
    pub fn new(count: usize) -> Self {
        let mut seatings = Vec::with_capacity(count.min(24));
        let mut current = [0, 1, 2, 3];
        while seatings.len() < count {
            seatings.push(current);
            if !next_permutation(&mut current) {
                break;
            }
        }
        Self { seatings }
    }

    pub fn as_slice(&self) -> &[[usize; SEATS]] {
        &self.seatings
    }
}

/// Advances to the next lexicographic arrangement; false after the last one.
fn next_permutation(items: &mut [usize; SEATS]) -> bool {
    let Some(pivot) = (0..SEATS - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..SEATS)
        .rev()
        .find(|&j| items[j] > items[pivot])
        .unwrap_or(pivot + 1);
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_the_identity_seating() {
        let perms = SeatPermutations::new(2);
        assert_eq!(perms.as_slice(), &[[0, 1, 2, 3], [0, 1, 3, 2]]);
    }

    #[test]
    fn enumerates_all_twenty_four_once() {
        let perms = SeatPermutations::new(100);
        assert_eq!(perms.as_slice().len(), 24);

        let mut seen = perms.as_slice().to_vec();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 24);
        assert_eq!(perms.as_slice().last(), Some(&[3, 2, 1, 0]));
    }
}
