//! Bucket sizing of `System.Collections.Hashtable`, which is part of its serialized state.

pub const LOAD_FACTOR: f32 = 0.72;
const INITIAL_SIZE: i32 = 3;
const HASH_PRIME: i32 = 101;
const MAX_PRIME_ARRAY_LENGTH: i32 = 0x7FEF_FFFD;

const PRIMES: [i32; 72] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631,
    761, 919, 1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103,
    12143, 14591, 17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631,
    130363, 156437, 187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403,
    968897, 1162687, 1395263, 1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559,
    5999471, 7199369,
];

fn is_prime(candidate: i32) -> bool {
    if candidate & 1 == 0 {
        return candidate == 2;
    }
    let limit = (candidate as f64).sqrt() as i32;
    let mut divisor = 3;
    while divisor <= limit {
        if candidate % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// The smallest usable prime that is at least `min`.
pub fn get_prime(min: i32) -> i32 {
    if let Some(prime) = PRIMES.iter().copied().find(|prime| *prime >= min) {
        return prime;
    }
    let mut candidate = min | 1;
    while candidate < i32::MAX {
        if is_prime(candidate) && (candidate - 1) % HASH_PRIME != 0 {
            return candidate;
        }
        candidate += 2;
    }
    min
}

fn expand_prime(old_size: i32) -> i32 {
    match old_size.checked_mul(2) {
        Some(new_size) if new_size <= MAX_PRIME_ARRAY_LENGTH => get_prime(new_size),
        _ => MAX_PRIME_ARRAY_LENGTH,
    }
}

fn load_size(hash_size: i32) -> usize {
    (LOAD_FACTOR * hash_size as f32) as usize
}

/// The bucket count of a default-constructed table after `count` distinct insertions.
pub fn hash_size_after_inserts(count: usize) -> i32 {
    let mut hash_size = INITIAL_SIZE;
    let mut threshold = load_size(hash_size);
    for inserted in 0..count {
        if inserted >= threshold {
            hash_size = expand_prime(hash_size);
            threshold = load_size(hash_size);
        }
    }
    hash_size
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn primes() {
        assert_eq!(3, get_prime(0));
        assert_eq!(7, get_prime(4));
        assert_eq!(7199369, get_prime(7199369));
        let beyond = get_prime(7199370);
        assert!(is_prime(beyond) && beyond > 7199369);
        assert!(!is_prime(9) && is_prime(101));
    }

    #[test]
    fn growth() {
        assert_eq!(3, hash_size_after_inserts(0));
        assert_eq!(3, hash_size_after_inserts(1));
        assert_eq!(3, hash_size_after_inserts(2));
        assert_eq!(7, hash_size_after_inserts(3));
        assert_eq!(7, hash_size_after_inserts(5));
        assert_eq!(17, hash_size_after_inserts(6));
    }
}
