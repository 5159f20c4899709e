//! A fixed set of independently locked buckets used as scratch space when
//! several workers accumulate values for integer keys.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Integer keys that can be spread over buckets by `key mod buckets`.
pub trait BucketKey: Copy + Ord {
    fn bucket(self, buckets: usize) -> usize;
}

macro_rules! unsigned_bucket_key {
    ($($t:ty),*) => {$(
        impl BucketKey for $t {
            fn bucket(self, buckets: usize) -> usize { (self as u64 % buckets as u64) as usize }
        }
    )*};
}

macro_rules! signed_bucket_key {
    ($($t:ty),*) => {$(
        impl BucketKey for $t {
            fn bucket(self, buckets: usize) -> usize {
                (self as i64).rem_euclid(buckets as i64) as usize
            }
        }
    )*};
}

unsigned_bucket_key!(u8, u16, u32, u64, usize);
signed_bucket_key!(i8, i16, i32, i64, isize);

pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: BucketKey, V> ConcurrentMap<K, V> {
    /// At least one bucket is always allocated.
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { buckets }
    }

    /// One bucket per available hardware thread.
    pub fn with_available_parallelism() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn bucket_count(&self) -> usize { self.buckets.len() }

    fn bucket(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.bucket(self.buckets.len())]
    }

    /// Locks the key's bucket and hands out its value slot, default-created.
    /// The bucket stays locked until the guard is dropped.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.bucket(key).lock(), |map| map.entry(key).or_default())
    }

    pub fn erase(&self, key: K) -> Option<V> {
        self.bucket(key).lock().remove(&key)
    }

    /// Merges every bucket into one ordered map, one bucket lock at a time.
    /// Contributions for the same key are summed.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: AddAssign + Default + Clone,
    {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            let guard = bucket.lock();
            for (key, value) in guard.iter() {
                *result.entry(*key).or_insert_with(V::default) += value.clone();
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
