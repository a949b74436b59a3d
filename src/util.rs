use rand::distr::{Alphanumeric, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Returns a random string of ASCII letters and digits from a
/// cryptographically secure RNG.
pub fn random_alphanumeric_string(len: usize) -> String {
    let mut rng = StdRng::from_os_rng();
    String::from_iter((0..len).map(|_| Alphanumeric.sample(&mut rng) as char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_strings_differ() {
        let a = random_alphanumeric_string(32);
        let b = random_alphanumeric_string(32);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
