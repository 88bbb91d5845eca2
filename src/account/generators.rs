use rand::Rng;

/// Exclusive upper bound for generated bank numbers
pub const BANK_NUMBER_UPPER_BOUND: i64 = 1_000_000;

/// Trait for generating bank numbers
pub trait BankNumberGenerator: Send + Sync {
    fn generate(&self) -> i64;
}

/// Uniformly random bank numbers in `[0, BANK_NUMBER_UPPER_BOUND)`.
/// Collisions are possible; callers retry on a uniqueness conflict.
pub struct RandomBankNumberGenerator;

impl RandomBankNumberGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomBankNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BankNumberGenerator for RandomBankNumberGenerator {
    fn generate(&self) -> i64 {
        rand::rng().random_range(0..BANK_NUMBER_UPPER_BOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bank_number_in_range() {
        let generator = RandomBankNumberGenerator::new();
        for _ in 0..1000 {
            let number = generator.generate();
            assert!((0..BANK_NUMBER_UPPER_BOUND).contains(&number));
        }
    }
}
