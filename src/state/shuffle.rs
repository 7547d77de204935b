use rand::Rng;

/// In-place Fisher–Yates (Durstenfeld) shuffle.
///
/// Walks from the last index down to 1, swapping each slot with a uniformly
/// drawn index in `[0, i]`. Every permutation is equally likely given an
/// unbiased `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_shuffle_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        let original: Vec<u32> = vec![5, 3, 3, 9, 1, 1, 1, 42, 0];
        let mut shuffled = original.clone();

        shuffle(&mut shuffled, &mut rng);

        let mut a = original.clone();
        let mut b = shuffled.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_trivial_inputs() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut empty: Vec<u8> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec!["only.jpg"];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec!["only.jpg"]);
    }

    #[test]
    fn test_shuffle_reaches_every_permutation() {
        // 3! = 6 orders; 600 draws makes missing one vanishingly unlikely
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = HashSet::new();

        for _ in 0..600 {
            let mut items = [1, 2, 3];
            shuffle(&mut items, &mut rng);
            seen.insert(items);
        }

        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();

        shuffle(&mut a, &mut StdRng::seed_from_u64(99));
        shuffle(&mut b, &mut StdRng::seed_from_u64(99));

        assert_eq!(a, b);
    }
}
