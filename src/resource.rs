//! Single-shot fetch state for one endpoint

use chrono::{DateTime, Utc};

/// Outcome of settling a resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    Stale,
    Loaded,
    Failed(String),
}

/// Data, loading flag and error for one fetched value.
///
/// A fresh resource starts out loading, since screens fetch on mount.
#[derive(Clone, Debug)]
pub struct Resource<T> {
    label: &'static str,
    data: T,
    loading: bool,
    error: Option<String>,
    pending: Option<u64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T: Default> Resource<T> {
    pub fn new(label: &'static str) -> Self {
        Resource {
            label,
            data: T::default(),
            loading: true,
            error: None,
            pending: None,
            fetched_at: None,
        }
    }

    /// Settle as empty without a request
    pub fn skip(&mut self) {
        self.data = T::default();
        self.loading = false;
        self.error = None;
        self.pending = None;
    }
}

impl<T> Resource<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_pending(&self, token: u64) -> bool {
        self.pending == Some(token)
    }

    /// Start a fresh fetch under `token`, superseding any pending one
    pub fn begin(&mut self, token: u64) {
        self.loading = true;
        self.error = None;
        self.pending = Some(token);
    }

    /// Apply the outcome of the fetch issued under `token`.
    /// Previous data is kept when the fetch fails.
    pub fn settle(&mut self, token: u64, result: Result<T, String>) -> Settled {
        if !self.is_pending(token) {
            return Settled::Stale;
        }
        self.pending = None;
        self.loading = false;

        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.fetched_at = Some(Utc::now());
                Settled::Loaded
            }
            Err(reason) => {
                let message = format!("Could not load {}: {}", self.label, reason);
                self.error = Some(message.clone());
                Settled::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resource_is_loading() {
        let res: Resource<Vec<u32>> = Resource::new("courses");
        assert!(res.is_loading());
        assert!(res.data().is_empty());
        assert!(res.error().is_none());
    }

    #[test]
    fn test_settle_success() {
        let mut res: Resource<Vec<u32>> = Resource::new("courses");
        res.begin(4);
        assert_eq!(res.settle(4, Ok(vec![1, 2])), Settled::Loaded);
        assert_eq!(res.data(), &vec![1, 2]);
        assert!(!res.is_loading());
        assert!(res.fetched_at().is_some());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut res: Resource<Vec<u32>> = Resource::new("categories");
        res.begin(1);
        res.settle(1, Ok(vec![9]));
        res.begin(2);
        let outcome = res.settle(2, Err("Request timed out".into()));

        assert_eq!(
            outcome,
            Settled::Failed("Could not load categories: Request timed out".into())
        );
        assert_eq!(res.data(), &vec![9]);
        assert!(!res.is_loading());
    }

    #[test]
    fn test_refetch_supersedes_pending() {
        let mut res: Resource<Vec<u32>> = Resource::new("users");
        res.begin(1);
        res.begin(2);
        assert_eq!(res.settle(1, Ok(vec![1])), Settled::Stale);
        assert!(res.is_loading());
        assert_eq!(res.settle(2, Ok(vec![2])), Settled::Loaded);
        assert_eq!(res.data(), &vec![2]);
    }

    #[test]
    fn test_skip_settles_empty() {
        let mut res: Resource<Vec<u32>> = Resource::new("favorites");
        res.skip();
        assert!(!res.is_loading());
        assert!(res.data().is_empty());
    }
}
