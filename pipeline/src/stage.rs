//! Pipeline stages, their fixed order, and per-artifact outcomes.

use std::collections::BTreeSet;
use std::fmt;

/// One step of the release pipeline.
///
/// The derived ordering is the execution order: later stages rely on the side
/// effects of earlier ones, so a selection always runs in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Remove the artifacts directory.
    Clean,
    /// Download artifacts, then verify them.
    Fetch,
    /// Check artifacts against their checksum manifests.
    Verify,
    /// Unpack archives into their destination directories.
    Extract,
    /// Ask the publish tool to validate each destination directory.
    Validate,
    /// Push each destination directory to its channel.
    Publish,
    /// Report build status from the publish service.
    Status,
}

impl Stage {
    /// Every stage in execution order.
    pub const ORDER: [Self; 7] = [
        Self::Clean,
        Self::Fetch,
        Self::Verify,
        Self::Extract,
        Self::Validate,
        Self::Publish,
        Self::Status,
    ];

    /// Lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Fetch => "fetch",
            Self::Verify => "verify",
            Self::Extract => "extract",
            Self::Validate => "validate",
            Self::Publish => "publish",
            Self::Status => "status",
        }
    }

    /// How per-artifact iteration behaves in this stage.
    #[must_use]
    pub const fn policy(self) -> StagePolicy {
        match self {
            Self::Clean => StagePolicy::new(false, false),
            Self::Fetch | Self::Status => StagePolicy::new(true, false),
            Self::Verify => StagePolicy::new(false, true),
            Self::Extract | Self::Validate | Self::Publish => StagePolicy::new(true, true),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iteration behaviour of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePolicy {
    /// Wait and print a separator after each processed artifact.
    pub pace: bool,
    /// Print per-channel banners and abort the run on the first failure.
    pub show_result: bool,
}

impl StagePolicy {
    /// Build a policy.
    #[must_use]
    pub const fn new(pace: bool, show_result: bool) -> Self {
        Self { pace, show_result }
    }
}

/// Result of one stage action for one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The artifact does not take part in this stage.
    Skipped,
    /// The action succeeded.
    Succeeded,
    /// The action failed.
    Failed,
}

impl StageOutcome {
    /// Map a success flag to an outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use artifacts_pipeline::stage::StageOutcome;
    ///
    /// assert_eq!(StageOutcome::from_success(true), StageOutcome::Succeeded);
    /// assert_eq!(StageOutcome::from_success(false), StageOutcome::Failed);
    /// ```
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::Succeeded } else { Self::Failed }
    }

    /// Whether the artifact was skipped.
    #[must_use]
    pub const fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// A set of stages, iterated in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSelection {
    stages: BTreeSet<Stage>,
}

impl StageSelection {
    /// Add `stage` to the selection.
    #[must_use]
    pub fn with(mut self, stage: Stage) -> Self {
        self.stages.insert(stage);
        self
    }

    /// Add `stage` when `selected` is true.
    #[must_use]
    pub fn with_if(self, stage: Stage, selected: bool) -> Self {
        if selected { self.with(stage) } else { self }
    }

    /// Whether `stage` is selected.
    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Whether no stage is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Selected stages in execution order.
    pub fn iter(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().copied()
    }
}

impl FromIterator<Stage> for StageSelection {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn order_matches_derived_ordering() {
        let mut sorted = Stage::ORDER;
        sorted.sort();
        assert_eq!(sorted, Stage::ORDER);
    }

    #[test]
    fn selection_iterates_in_execution_order() {
        let selection: StageSelection = [Stage::Status, Stage::Clean, Stage::Extract, Stage::Clean]
            .into_iter()
            .collect();
        let stages: Vec<Stage> = selection.iter().collect();
        assert_eq!(stages, [Stage::Clean, Stage::Extract, Stage::Status]);
    }

    #[test]
    fn with_if_respects_the_flag() {
        let selection = StageSelection::default()
            .with_if(Stage::Fetch, true)
            .with_if(Stage::Verify, false);
        assert!(selection.contains(Stage::Fetch));
        assert!(!selection.contains(Stage::Verify));
        assert!(!selection.is_empty());
    }

    #[rstest]
    #[case::fetch(Stage::Fetch, true, false)]
    #[case::verify(Stage::Verify, false, true)]
    #[case::extract(Stage::Extract, true, true)]
    #[case::validate(Stage::Validate, true, true)]
    #[case::publish(Stage::Publish, true, true)]
    #[case::status(Stage::Status, true, false)]
    fn stage_policies(#[case] stage: Stage, #[case] pace: bool, #[case] show_result: bool) {
        assert_eq!(stage.policy(), StagePolicy::new(pace, show_result));
    }

    #[test]
    fn display_uses_lowercase_names() {
        let names: Vec<String> = Stage::ORDER.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["clean", "fetch", "verify", "extract", "validate", "publish", "status"]
        );
    }
}
