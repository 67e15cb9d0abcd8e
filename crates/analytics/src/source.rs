use async_trait::async_trait;
use core_types::UserId;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Amount source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to a user's transaction amounts.
///
/// Implementations must return amounts in ascending record order and must return
/// the same sequence on repeated reads when nothing was written in between. A user
/// without records yields an empty vector, never an error.
#[async_trait]
pub trait AmountSource: Send + Sync {
    async fn fetch_amounts(&self, user_id: UserId) -> Result<Vec<f64>, SourceError>;
}

#[async_trait]
impl<S: AmountSource + ?Sized> AmountSource for Arc<S> {
    async fn fetch_amounts(&self, user_id: UserId) -> Result<Vec<f64>, SourceError> {
        (**self).fetch_amounts(user_id).await
    }
}

/// An `AmountSource` held entirely in memory. Amounts keep the order in which
/// they were pushed.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    amounts: BTreeMap<UserId, Vec<f64>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amounts(mut self, user_id: UserId, amounts: impl IntoIterator<Item = f64>) -> Self {
        self.amounts.entry(user_id).or_default().extend(amounts);
        self
    }

    pub fn push(&mut self, user_id: UserId, amount: f64) {
        self.amounts.entry(user_id).or_default().push(amount);
    }
}

#[async_trait]
impl AmountSource for InMemorySource {
    async fn fetch_amounts(&self, user_id: UserId) -> Result<Vec<f64>, SourceError> {
        Ok(self.amounts.get(&user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_reads_as_empty() {
        let source = InMemorySource::new().with_amounts(UserId(1), [1.0]);
        assert!(source.fetch_amounts(UserId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reads_preserve_insertion_order_and_are_stable() {
        let mut source = InMemorySource::new().with_amounts(UserId(7), [30.0, 10.0]);
        source.push(UserId(7), 20.0);

        let first = source.fetch_amounts(UserId(7)).await.unwrap();
        let second = source.fetch_amounts(UserId(7)).await.unwrap();
        assert_eq!(first, vec![30.0, 10.0, 20.0]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn shared_sources_delegate() {
        let source: Arc<dyn AmountSource> =
            Arc::new(InMemorySource::new().with_amounts(UserId(3), [4.0, 5.0]));
        assert_eq!(source.fetch_amounts(UserId(3)).await.unwrap(), vec![4.0, 5.0]);
    }
}
