//! Downtime buckets and per-bucket minute sums.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// The six matchable downtime buckets. `total` and `other` are not buckets:
/// total is summed independently and other is derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    #[serde(rename = "production")]
    Production,
    #[serde(rename = "failures")]
    Failures,
    #[serde(rename = "maintenance")]
    Maintenance,
    #[serde(rename = "micro_stops")]
    MicroStops,
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "unplanned")]
    Unplanned,
}

impl Bucket {
    /// Report order.
    pub const ALL: [Bucket; 6] = [
        Bucket::Production,
        Bucket::Failures,
        Bucket::Maintenance,
        Bucket::MicroStops,
        Bucket::Scheduled,
        Bucket::Unplanned,
    ];

    fn index(self) -> usize {
        match self {
            Bucket::Production => 0,
            Bucket::Failures => 1,
            Bucket::Maintenance => 2,
            Bucket::MicroStops => 3,
            Bucket::Scheduled => 4,
            Bucket::Unplanned => 5,
        }
    }

    /// Stable machine key, same as the serde name.
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Production => "production",
            Bucket::Failures => "failures",
            Bucket::Maintenance => "maintenance",
            Bucket::MicroStops => "micro_stops",
            Bucket::Scheduled => "scheduled",
            Bucket::Unplanned => "unplanned",
        }
    }

    /// Label used in the printed report.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Production => "Producción",
            Bucket::Failures => "Fallas y averías",
            Bucket::Maintenance => "Mantenciones",
            Bucket::MicroStops => "Micro paradas",
            Bucket::Scheduled => "Paradas programadas (sin mantención)",
            Bucket::Unplanned => "Paradas no planificadas (sin fallas)",
        }
    }
}

/// Set of buckets fired by a single row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketSet(u8);

impl BucketSet {
    pub fn insert(&mut self, bucket: Bucket) {
        self.0 |= 1 << bucket.index();
    }

    pub fn contains(&self, bucket: Bucket) -> bool {
        self.0 & (1 << bucket.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Bucket> + '_ {
        Bucket::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<Bucket> for BucketSet {
    fn from_iter<I: IntoIterator<Item = Bucket>>(iter: I) -> Self {
        let mut set = BucketSet::default();
        for bucket in iter {
            set.insert(bucket);
        }
        set
    }
}

/// Accumulated minutes per bucket. Serialises as a `{bucket: minutes}` map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketTotals {
    minutes: [f64; 6],
}

impl BucketTotals {
    pub fn get(&self, bucket: Bucket) -> f64 {
        self.minutes[bucket.index()]
    }

    pub fn add(&mut self, bucket: Bucket, minutes: f64) {
        self.minutes[bucket.index()] += minutes;
    }

    /// Add every bucket of `other` into `self`.
    pub fn merge(&mut self, other: &BucketTotals) {
        for (mine, theirs) in self.minutes.iter_mut().zip(other.minutes.iter()) {
            *mine += theirs;
        }
    }

    /// Sum of the six named buckets (not the grand total).
    pub fn categorized(&self) -> f64 {
        self.minutes.iter().sum()
    }
}

impl Serialize for BucketTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Bucket::ALL.len()))?;
        for bucket in Bucket::ALL {
            map.serialize_entry(bucket.key(), &self.get(bucket))?;
        }
        map.end()
    }
}
