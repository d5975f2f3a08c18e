//! Fake value provider shared by factories and seeders.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::CellNumber;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use time::{Date, Duration, OffsetDateTime};

/// Generates fake values from a seedable RNG.
///
/// Two seeds created with the same number produce the same sequence of
/// values (dates are relative to the current day).
#[derive(Debug, Clone)]
pub struct Seed {
    rng: StdRng,
}

impl Seed {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is set, random otherwise.
    pub fn from_optional(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    /// Derives an independent seed from this one's stream.
    ///
    /// Forks of equally seeded parents match; successive forks differ.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.r#gen())
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn firstname(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    pub fn lastname(&mut self) -> String {
        LastName().fake_with_rng(&mut self.rng)
    }

    pub fn full_name(&mut self) -> String {
        format!("{} {}", self.firstname(), self.lastname())
    }

    /// Generates an email address derived from a name.
    pub fn email(&mut self, from: &str) -> String {
        let normalized: String = from
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ')
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(".");

        let suffix: u32 = self.rng.gen_range(1..9999);
        let domains = ["gmail.com", "outlook.com", "yahoo.com", "proton.me"];
        let domain = domains[self.rng.gen_range(0..domains.len())];

        if normalized.is_empty() {
            format!("user{suffix}@{domain}")
        } else {
            format!("{normalized}{suffix}@{domain}")
        }
    }

    pub fn city(&mut self) -> String {
        CityName().fake_with_rng(&mut self.rng)
    }

    pub fn street(&mut self) -> String {
        let name: String = StreetName().fake_with_rng(&mut self.rng);
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        format!("{name} {number}")
    }

    pub fn postcode(&mut self) -> String {
        ZipCode().fake_with_rng(&mut self.rng)
    }

    pub fn smartphone(&mut self) -> String {
        CellNumber().fake_with_rng(&mut self.rng)
    }

    /// Returns a date between `oldest` and `newest` before today.
    pub fn past_date(&mut self, oldest: Duration, newest: Duration) -> Date {
        let (low, high) = if oldest.whole_days() < newest.whole_days() {
            (oldest.whole_days(), newest.whole_days())
        } else {
            (newest.whole_days(), oldest.whole_days())
        };

        let days_ago = self.rng.gen_range(low..=high);
        OffsetDateTime::now_utc().date() - Duration::days(days_ago)
    }

    /// Picks a random element, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::from_entropy()
    }
}
