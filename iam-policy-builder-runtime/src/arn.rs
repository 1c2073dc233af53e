//! Defaults applied when a resource accessor is called without partition, region or account.

/// Partition used when none is supplied.
pub const DEFAULT_PARTITION: &str = "aws";

/// Matches any region or account.
pub const WILDCARD: &str = "*";

/// Values substituted into ARN templates for omitted standard placeholders.
///
/// The default is partition `aws`, any region and any account. A statement built for a
/// specific environment (for example `aws-cn`, or a single account) can carry its own
/// defaults through [`PolicyStatement::with_arn_defaults`](crate::PolicyStatement::with_arn_defaults).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArnDefaults {
    partition: String,
    region: String,
    account: String,
}

impl ArnDefaults {
    pub fn new(
        partition: impl Into<String>,
        region: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            region: region.into(),
            account: account.into(),
        }
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    #[inline]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[inline]
    pub fn account(&self) -> &str {
        &self.account
    }
}

impl Default for ArnDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITION, WILDCARD, WILDCARD)
    }
}
