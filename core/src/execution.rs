use rayon::prelude::*;

/// How the independent per-word tasks of one call are run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Execution {
    #[default]
    Sequential,
    /// On the rayon global pool.
    Parallel,
}

impl Execution {
    pub fn for_each<T, F>(self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        match self {
            Execution::Sequential => items.iter().for_each(f),
            Execution::Parallel => items.par_iter().for_each(f),
        }
    }

    pub fn for_each_mut<T, F>(self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&mut T) + Sync + Send,
    {
        match self {
            Execution::Sequential => items.iter_mut().for_each(f),
            Execution::Parallel => items.par_iter_mut().for_each(f),
        }
    }

    pub fn any<T, F>(self, items: &[T], f: F) -> bool
    where
        T: Sync,
        F: Fn(&T) -> bool + Sync + Send,
    {
        match self {
            Execution::Sequential => items.iter().any(f),
            Execution::Parallel => items.par_iter().any(f),
        }
    }

    /// Keeps the items accepted by `f`, in their original order.
    pub fn filter<T, F>(self, items: &[T], f: F) -> Vec<T>
    where
        T: Sync + Send + Clone,
        F: Fn(&T) -> bool + Sync + Send,
    {
        match self {
            Execution::Sequential => items.iter().filter(|item| f(item)).cloned().collect(),
            Execution::Parallel => items.par_iter().filter(|item| f(item)).cloned().collect(),
        }
    }

    /// Buckets for a scratch accumulator used under this policy.
    pub fn bucket_count(self) -> usize {
        match self {
            Execution::Sequential => 1,
            Execution::Parallel => num_cpus::get(),
        }
    }
}
