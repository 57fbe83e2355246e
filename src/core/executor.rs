//! Stage execution over an ordered set of named items.
//!
//! A stage applies one operation to every item (distributions for the
//! file stages, channels for announce) under a single failure policy:
//!
//! - `fail_fast = true`: the first failure aborts the stage immediately
//!   and propagates unwrapped; no further items are attempted.
//! - `fail_fast = false`: every item is attempted; failures are
//!   accumulated and reported as a single [`StageFailures`] aggregate.

use std::fmt;
use std::future::Future;

use anyhow::Result;
use tracing::{info, warn};

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Checksum,
    Prepare,
    Package,
    Announce,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Checksum => "checksum",
            Stage::Prepare => "prepare",
            Stage::Package => "package",
            Stage::Announce => "announce",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item a stage can iterate over. Identifiers are stable and used in
/// log lines and aggregate reporting.
pub trait StageItem {
    fn id(&self) -> &str;
}

impl<T: StageItem + ?Sized> StageItem for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
}

impl StageItem for crate::model::Distribution {
    fn id(&self) -> &str {
        &self.name
    }
}

impl StageItem for Box<dyn crate::announce::Channel> {
    fn id(&self) -> &str {
        self.name()
    }
}

/// A single failed item: its stable identifier and the underlying cause.
#[derive(Debug)]
pub struct ItemFailure {
    pub name: String,
    pub cause: anyhow::Error,
}

/// Aggregate failure raised at stage end in non-fail-fast mode. Holds the
/// full per-item failure set; an empty set is never raised.
#[derive(Debug)]
pub struct StageFailures {
    pub stage: Stage,
    pub failures: Vec<ItemFailure>,
}

impl fmt::Display for StageFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} item(s) failed during {}: ",
            self.failures.len(),
            self.stage
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.name, failure.cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for StageFailures {}

/// Run one stage over the given items, applying `op` to each in order.
///
/// Emits one informational line per item attempted and one warning per
/// failure, independent of the fail-fast setting.
pub async fn run<T, F, Fut>(
    stage: Stage,
    items: impl IntoIterator<Item = T>,
    fail_fast: bool,
    op: F,
) -> Result<()>
where
    T: StageItem,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut failures = Vec::new();

    for item in items {
        let name = item.id().to_string();
        info!(stage = %stage, item = %name, "Processing");

        if let Err(cause) = op(item).await {
            warn!(stage = %stage, item = %name, error = %cause, "Item failed");
            if fail_fast {
                return Err(cause);
            }
            failures.push(ItemFailure { name, cause });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(StageFailures { stage, failures }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Item(&'static str);

    impl StageItem for Item {
        fn id(&self) -> &str {
            self.0
        }
    }

    fn items() -> Vec<Item> {
        vec![Item("one"), Item("two"), Item("three")]
    }

    #[tokio::test]
    async fn test_all_items_attempted_without_fail_fast() {
        let attempted = RefCell::new(Vec::new());

        let result = run(Stage::Prepare, items(), false, |item| {
            attempted.borrow_mut().push(item.0);
            async move {
                if item.0 == "two" {
                    anyhow::bail!("boom");
                }
                Ok(())
            }
        })
        .await;

        assert_eq!(*attempted.borrow(), vec!["one", "two", "three"]);

        let err = result.unwrap_err();
        let aggregate = err.downcast_ref::<StageFailures>().expect("aggregate");
        assert_eq!(aggregate.failures.len(), 1);
        assert_eq!(aggregate.failures[0].name, "two");
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_first_failure() {
        let attempted = RefCell::new(Vec::new());

        let result = run(Stage::Prepare, items(), true, |item| {
            attempted.borrow_mut().push(item.0);
            async move {
                if item.0 == "one" {
                    anyhow::bail!("boom");
                }
                Ok(())
            }
        })
        .await;

        assert_eq!(*attempted.borrow(), vec!["one"]);

        // The raw error propagates unwrapped
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<StageFailures>().is_none());
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_empty_failure_set_is_success() {
        let result = run(Stage::Checksum, items(), false, |_| async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_aggregate_display_names_items() {
        let aggregate = StageFailures {
            stage: Stage::Announce,
            failures: vec![
                ItemFailure {
                    name: "sdkman".to_string(),
                    cause: anyhow::anyhow!("boom"),
                },
                ItemFailure {
                    name: "zulip".to_string(),
                    cause: anyhow::anyhow!("bam"),
                },
            ],
        };

        let rendered = aggregate.to_string();
        assert!(rendered.contains("2 item(s) failed during announce"));
        assert!(rendered.contains("sdkman: boom"));
        assert!(rendered.contains("zulip: bam"));
    }
}
