use fuzzdex::spelling::{Strategy, levenshtein_distance, levenshtein_distance_threshold};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: [char; 6] = ['a', 'b', 'c', 'ä', 'ß', '語'];

fn random_word(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..12);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn distance(a: &str, b: &str) -> usize {
    levenshtein_distance(a, b).unwrap()
}

fn words(seed: u64, count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| random_word(&mut rng)).collect()
}

#[test]
fn test_symmetry_and_identity() {
    let words = words(7, 60);
    for a in &words {
        assert_eq!(distance(a, a), 0);
        for b in &words {
            assert_eq!(distance(a, b), distance(b, a), "{a:?} / {b:?}");
        }
    }
}

#[test]
fn test_deletion_bound() {
    for word in words(11, 100) {
        let chars = word.chars().count();
        assert_eq!(distance(&word, ""), chars);
        assert_eq!(distance("", &word), chars);
    }
}

#[test]
fn test_triangle_inequality() {
    let words = words(23, 20);
    for a in &words {
        for b in &words {
            for c in &words {
                assert!(distance(a, c) <= distance(a, b) + distance(b, c));
            }
        }
    }
}

#[test]
fn test_strategies_agree() {
    let words = words(42, 80);
    for a in &words {
        for b in &words {
            let single = Strategy::SingleColumn.str_distance(a, b).unwrap();
            let rows = Strategy::TwoRow.str_distance(a, b).unwrap();
            assert_eq!(single, rows, "{a:?} / {b:?}");
        }
    }
}

#[test]
fn test_threshold_agrees_with_full_distance() {
    let words = words(5, 50);
    for a in &words {
        for b in &words {
            let full = distance(a, b);
            for threshold in 0..4 {
                let bounded = levenshtein_distance_threshold(a, b, threshold).unwrap();
                assert_eq!(bounded, (full <= threshold).then_some(full));
            }
        }
    }
}

#[test]
fn test_concrete_scenarios() {
    for strategy in Strategy::ALL {
        assert_eq!(strategy.str_distance("jaa", "jaar").unwrap(), 1);
        assert_eq!(strategy.str_distance("a", "aa").unwrap(), 1);
        assert_eq!(strategy.str_distance("kitten", "sitting").unwrap(), 3);
        assert_eq!(strategy.str_distance("", "abc").unwrap(), 3);
    }
}

#[test]
fn test_concurrent_callers() {
    let words = words(99, 40);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for a in &words {
                    for b in &words {
                        let single = Strategy::SingleColumn.str_distance(a, b).unwrap();
                        let rows = Strategy::TwoRow.str_distance(a, b).unwrap();
                        assert_eq!(single, rows);
                    }
                }
            });
        }
    });
}
