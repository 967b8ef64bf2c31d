// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline of named phases.
//!
//! A [`Timeline`] is static schedule data: an ordered list of [`Phase`]s with
//! start offsets and durations. [`Timeline::resolve`] maps an elapsed time to
//! the active phase and its local progress. Resolution never fails: a
//! malformed schedule degrades to a sensible phase rather than an error, and
//! [`Timeline::validate`] reports what is wrong so it can be logged.
//!
//! Looping is not handled here. The owner of the elapsed time wraps it with
//! [`Timeline::wrap`] before resolving.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named, time-boxed segment of the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase name, used to look up its animator
    pub name: String,
    /// Start time in seconds
    pub start_offset: f32,
    /// Duration in seconds
    pub duration: f32,
}

impl Phase {
    /// Create a new phase
    pub fn new(name: impl Into<String>, start_offset: f32, duration: f32) -> Self {
        Self {
            name: name.into(),
            start_offset,
            duration,
        }
    }

    /// End time in seconds
    pub fn end(&self) -> f32 {
        self.start_offset + self.duration
    }

    /// Progress through this phase at `elapsed`, clamped to `[0, 1]`.
    ///
    /// A phase without a usable duration acts as a step: 0 before its start,
    /// 1 from its start onwards.
    pub fn local_progress(&self, elapsed: f32) -> f32 {
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return if elapsed >= self.start_offset { 1.0 } else { 0.0 };
        }

        let progress = (elapsed - self.start_offset) / self.duration;
        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        }
    }
}

/// The phase active at some elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPhase<'a> {
    /// Index into the timeline's phase list
    pub index: usize,
    /// The active phase
    pub phase: &'a Phase,
    /// Progress through the phase, in `[0, 1]`
    pub local_progress: f32,
}

/// Problems found in a phase schedule. None of these stop playback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineIssue {
    /// No phases at all
    #[error("timeline has no phases")]
    Empty,

    /// Two phases share a name; only the first can be told apart by name
    #[error("phase name '{0}' is declared more than once")]
    DuplicateName(String),

    /// Duration is zero, negative or not finite
    #[error("phase '{name}' has non-positive duration {duration}")]
    NonPositiveDuration {
        /// Phase name
        name: String,
        /// Offending duration
        duration: f32,
    },

    /// Start offset below zero
    #[error("phase '{name}' starts before zero ({start_offset})")]
    NegativeStart {
        /// Phase name
        name: String,
        /// Offending start offset
        start_offset: f32,
    },

    /// Start offset earlier than the previous phase's
    #[error("phase '{name}' starts at {start_offset}, before the previous phase at {previous}")]
    OutOfOrder {
        /// Phase name
        name: String,
        /// Its start offset
        start_offset: f32,
        /// Start offset of the phase declared before it
        previous: f32,
    },

    /// Same start offset as the previous phase; the later declaration wins
    #[error("phases '{earlier}' and '{later}' both start at {start_offset}; '{later}' takes precedence")]
    SharedStart {
        /// Phase declared first
        earlier: String,
        /// Phase declared second
        later: String,
        /// Shared start offset
        start_offset: f32,
    },
}

/// Ordered list of phases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    phases: Vec<Phase>,
}

impl Timeline {
    /// Create a timeline from phases in declaration order
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// Append a phase
    pub fn with_phase(mut self, name: impl Into<String>, start_offset: f32, duration: f32) -> Self {
        self.phases.push(Phase::new(name, start_offset, duration));
        self
    }

    /// All phases in declaration order
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Find a phase by name
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Phase count
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Whether there are no phases
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Latest end time of any phase
    pub fn total_duration(&self) -> f32 {
        self.phases
            .iter()
            .map(Phase::end)
            .filter(|end| end.is_finite())
            .fold(0.0, f32::max)
    }

    /// Resolve the active phase at `elapsed`.
    ///
    /// The last declared phase whose start offset is at or before `elapsed`
    /// wins, so of two phases with the same start the later one is chosen.
    /// Before the first start the first phase is returned at progress 0.
    /// Only an empty timeline yields `None`.
    pub fn resolve(&self, elapsed: f32) -> Option<ResolvedPhase<'_>> {
        let first = self.phases.first()?;

        let resolved = self
            .phases
            .iter()
            .enumerate()
            .rev()
            .find(|(_, phase)| phase.start_offset <= elapsed)
            .map(|(index, phase)| ResolvedPhase {
                index,
                phase,
                local_progress: phase.local_progress(elapsed),
            })
            .unwrap_or(ResolvedPhase {
                index: 0,
                phase: first,
                local_progress: 0.0,
            });

        Some(resolved)
    }

    /// Wrap `elapsed` back into the loop once it runs past `loop_duration`.
    ///
    /// The overshoot is kept, so 16.5 with a 16 second loop becomes 0.5.
    /// A non-positive loop duration disables wrapping.
    pub fn wrap(elapsed: f32, loop_duration: f32) -> f32 {
        if loop_duration > 0.0 && loop_duration.is_finite() && elapsed > loop_duration {
            elapsed.rem_euclid(loop_duration)
        } else {
            elapsed
        }
    }

    /// Check the schedule for problems
    pub fn validate(&self) -> Vec<TimelineIssue> {
        let mut issues = Vec::new();

        if self.phases.is_empty() {
            issues.push(TimelineIssue::Empty);
            return issues;
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.phases.len());
        let mut previous: Option<&Phase> = None;

        for phase in &self.phases {
            if seen.contains(&phase.name.as_str()) {
                issues.push(TimelineIssue::DuplicateName(phase.name.clone()));
            } else {
                seen.push(&phase.name);
            }

            if !(phase.duration > 0.0 && phase.duration.is_finite()) {
                issues.push(TimelineIssue::NonPositiveDuration {
                    name: phase.name.clone(),
                    duration: phase.duration,
                });
            }

            if phase.start_offset < 0.0 {
                issues.push(TimelineIssue::NegativeStart {
                    name: phase.name.clone(),
                    start_offset: phase.start_offset,
                });
            }

            if let Some(prev) = previous {
                if phase.start_offset < prev.start_offset {
                    issues.push(TimelineIssue::OutOfOrder {
                        name: phase.name.clone(),
                        start_offset: phase.start_offset,
                        previous: prev.start_offset,
                    });
                } else if phase.start_offset == prev.start_offset {
                    issues.push(TimelineIssue::SharedStart {
                        earlier: prev.name.clone(),
                        later: phase.name.clone(),
                        start_offset: phase.start_offset,
                    });
                }
            }

            previous = Some(phase);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showcase() -> Timeline {
        Timeline::default()
            .with_phase("intro", 0.0, 4.0)
            .with_phase("closeup", 4.0, 3.0)
            .with_phase("rotation", 7.0, 4.0)
            .with_phase("sparkle", 11.0, 3.0)
            .with_phase("finale", 14.0, 2.0)
    }

    #[test]
    fn test_resolve_mid_phase() {
        let timeline = showcase();
        let resolved = timeline.resolve(5.5).unwrap();
        assert_eq!(resolved.phase.name, "closeup");
        assert_eq!(resolved.index, 1);
        assert!((resolved.local_progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_start() {
        let timeline = showcase();
        let resolved = timeline.resolve(0.0).unwrap();
        assert_eq!(resolved.phase.name, "intro");
        assert_eq!(resolved.local_progress, 0.0);
    }

    #[test]
    fn test_phase_boundaries() {
        let timeline = showcase();
        for phase in timeline.phases() {
            assert_eq!(phase.local_progress(phase.start_offset), 0.0);
            assert_eq!(phase.local_progress(phase.end()), 1.0);

            let resolved = timeline.resolve(phase.start_offset).unwrap();
            assert_eq!(resolved.phase.name, phase.name);
            assert_eq!(resolved.local_progress, 0.0);
        }

        let last = timeline.resolve(16.0).unwrap();
        assert_eq!(last.phase.name, "finale");
        assert_eq!(last.local_progress, 1.0);
    }

    #[test]
    fn test_progress_always_clamped() {
        let timeline = showcase();
        let mut elapsed = 0.0;
        while elapsed < 40.0 {
            let resolved = timeline.resolve(elapsed).unwrap();
            assert!((0.0..=1.0).contains(&resolved.local_progress), "at {elapsed}");
            elapsed += 0.037;
        }
    }

    #[test]
    fn test_resolve_is_pure() {
        let timeline = showcase();
        assert_eq!(timeline.resolve(9.25), timeline.resolve(9.25));
    }

    #[test]
    fn test_before_first_phase_falls_back_to_first() {
        let timeline = Timeline::default()
            .with_phase("late", 2.0, 1.0)
            .with_phase("later", 3.0, 1.0);
        let resolved = timeline.resolve(0.5).unwrap();
        assert_eq!(resolved.phase.name, "late");
        assert_eq!(resolved.local_progress, 0.0);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::default();
        assert!(timeline.resolve(1.0).is_none());
        assert_eq!(timeline.validate(), vec![TimelineIssue::Empty]);
        assert_eq!(timeline.total_duration(), 0.0);
    }

    #[test]
    fn test_zero_duration_is_a_step() {
        let timeline = Timeline::default().with_phase("flash", 1.0, 0.0);
        assert_eq!(timeline.resolve(1.0).unwrap().local_progress, 1.0);
        assert_eq!(timeline.resolve(0.5).unwrap().local_progress, 0.0);
        assert!(matches!(
            timeline.validate().as_slice(),
            [TimelineIssue::NonPositiveDuration { .. }]
        ));
    }

    #[test]
    fn test_shared_start_last_declared_wins() {
        let timeline = Timeline::default()
            .with_phase("a", 0.0, 2.0)
            .with_phase("b", 0.0, 4.0);
        let resolved = timeline.resolve(1.0).unwrap();
        assert_eq!(resolved.phase.name, "b");
        assert!((resolved.local_progress - 0.25).abs() < 1e-6);
        assert!(matches!(
            timeline.validate().as_slice(),
            [TimelineIssue::SharedStart { later, .. }] if later == "b"
        ));
    }

    #[test]
    fn test_wrap() {
        assert!((Timeline::wrap(16.5, 16.0) - 0.5).abs() < 1e-6);
        assert_eq!(Timeline::wrap(16.0, 16.0), 16.0);
        assert_eq!(Timeline::wrap(3.0, 16.0), 3.0);
        assert!((Timeline::wrap(33.0, 16.0) - 1.0).abs() < 1e-5);
        assert_eq!(Timeline::wrap(40.0, 0.0), 40.0);
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let timeline = Timeline::default()
            .with_phase("a", 1.0, 1.0)
            .with_phase("a", 0.5, 1.0)
            .with_phase("c", -1.0, -2.0);
        let issues = timeline.validate();
        assert!(issues.contains(&TimelineIssue::DuplicateName("a".into())));
        assert!(issues.iter().any(|i| matches!(i, TimelineIssue::OutOfOrder { name, .. } if name == "a")));
        assert!(issues.iter().any(|i| matches!(i, TimelineIssue::NegativeStart { name, .. } if name == "c")));
        assert!(issues.iter().any(|i| matches!(i, TimelineIssue::NonPositiveDuration { name, .. } if name == "c")));
        assert!(showcase().validate().is_empty());
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(showcase().total_duration(), 16.0);
    }
}
