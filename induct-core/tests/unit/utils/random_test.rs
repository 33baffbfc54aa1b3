use super::*;

#[test]
fn can_reproduce_sequence_with_same_seed() {
    let first = DefaultRandom::new_with_seed(11);
    let second = DefaultRandom::new_with_seed(11);

    let lhs: Vec<i32> = (0..16).map(|_| first.uniform_int(0, 100)).collect();
    let rhs: Vec<i32> = (0..16).map(|_| second.uniform_int(0, 100)).collect();

    assert_eq!(lhs, rhs);
}

#[test]
fn can_produce_values_in_range() {
    let random = DefaultRandom::new_with_seed(7);

    for _ in 0..100 {
        let value = random.uniform_int(3, 5);
        assert!((3..=5).contains(&value));

        let value = random.uniform_real(0.5, 1.5);
        assert!((0.5..1.5).contains(&value));
    }
}

#[test]
fn can_handle_degenerate_range() {
    let random = DefaultRandom::new_with_seed(7);

    assert_eq!(random.uniform_int(42, 42), 42);
    assert_eq!(random.uniform_real(0.25, 0.25), 0.25);
}

#[test]
fn can_interpret_probability_extremes() {
    let random = DefaultRandom::new_with_seed(7);

    assert!(!random.is_hit(0.));
    assert!(random.is_hit(1.));
}

#[test]
fn can_shuffle_deterministically() {
    let shuffled = |seed: u64| {
        let random = DefaultRandom::new_with_seed(seed);
        let mut indices: Vec<usize> = (0..10).collect();
        random.shuffle(&mut indices);
        indices
    };

    let result = shuffled(3);

    assert_eq!(result, shuffled(3));
    let mut sorted = result;
    sorted.sort_unstable();
    assert_eq!(sorted, (0..10).collect::<Vec<_>>());
}
