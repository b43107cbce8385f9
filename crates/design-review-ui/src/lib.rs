#![warn(missing_docs)]
//! # design-review-ui
//!
//! ## Purpose
//! Defines the UI-facing analysis state and the projection consumed by the
//! result renderer.
//!
//! ## Responsibilities
//! - Hold the analyzing flag, latest analysis and latest error message.
//! - Offer the transitions the page controller applies during an upload.
//! - Project state into a [`PageView`] for rendering.
//!
//! ## Data flow
//! Page controller events mutate [`AnalysisState`] -> [`project_view`] ->
//! renderer.
//!
//! ## Ownership and lifetimes
//! `AnalysisState` owns its analysis and message so snapshots can be cloned out
//! from behind a lock without borrowing.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Failures arrive
//! as already user-facing strings.
//!
//! ## Security and privacy notes
//! State never holds the encoded image, only the analysis and messages.

use design_review_core::DesignAnalysis;

/// Coarse phase derived from [`AnalysisState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Nothing has been analyzed yet.
    Idle,
    /// An upload is in flight.
    Analyzing,
    /// Latest attempt produced an analysis.
    Result,
    /// Latest attempt failed.
    Error,
}

/// Analysis state owned by the page controller.
///
/// Exclusion between analysis and error is not enforced: a failed attempt
/// leaves the previous analysis in place alongside the new error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    /// `true` while an upload is being processed.
    pub is_analyzing: bool,
    /// Most recent successful analysis.
    pub analysis: Option<DesignAnalysis>,
    /// Most recent user-facing error message.
    pub error: Option<String>,
}

impl AnalysisState {
    /// Creates idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an upload as started and clears the previous error.
    pub fn begin_analysis(&mut self) {
        self.is_analyzing = true;
        self.error = None;
    }

    /// Stores a successful analysis.
    pub fn complete_with(&mut self, analysis: DesignAnalysis) {
        self.analysis = Some(analysis);
    }

    /// Stores a user-facing failure message.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Clears the analyzing flag. Calling it again has no effect.
    pub fn finish_analysis(&mut self) {
        self.is_analyzing = false;
    }

    /// Returns the phase shown to the user.
    pub fn phase(&self) -> AnalysisPhase {
        if self.is_analyzing {
            AnalysisPhase::Analyzing
        } else if self.error.is_some() {
            AnalysisPhase::Error
        } else if self.analysis.is_some() {
            AnalysisPhase::Result
        } else {
            AnalysisPhase::Idle
        }
    }

    /// Returns a short human-readable status.
    pub fn status_text(&self) -> &'static str {
        match self.phase() {
            AnalysisPhase::Idle => "No analysis yet",
            AnalysisPhase::Analyzing => "Analyzing design...",
            AnalysisPhase::Result => "Analysis ready",
            AnalysisPhase::Error => "Analysis failed",
        }
    }
}

/// What the result renderer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// Loading indicator.
    Loading,
    /// Analysis to display.
    Ready(DesignAnalysis),
    /// Nothing to display.
    Empty,
}

/// Full page projection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Whether the upload widget should show its busy state.
    pub is_uploading: bool,
    /// Error banner text.
    pub error: Option<String>,
    /// Result panel content.
    pub result: ResultView,
}

/// Projects state into the page view.
pub fn project_view(state: &AnalysisState) -> PageView {
    let result = if state.is_analyzing {
        ResultView::Loading
    } else {
        match &state.analysis {
            Some(analysis) => ResultView::Ready(analysis.clone()),
            None => ResultView::Empty,
        }
    };

    PageView {
        is_uploading: state.is_analyzing,
        error: state.error.clone(),
        result,
    }
}
