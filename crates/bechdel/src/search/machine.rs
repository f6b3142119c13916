use serde::Serialize;

/// Lifecycle of one query.
///
/// `Idle → Debouncing → Loading → Loaded`, back to `Idle` on a blank query,
/// and `SuppressedClear → Idle` around a selection. Suppression is a phase
/// rather than a flag so that it is swallowed by exactly one reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Loading,
    Loaded,
    SuppressedClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryReaction {
    /// Blank query: drop the candidates, no lookup.
    Clear,
    /// Start (or restart) the quiescence window.
    Schedule,
    /// The programmatic clear that follows a selection.
    Swallow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpiryAction {
    Dispatch,
    Suppressed,
}

impl SearchPhase {
    pub fn is_loading(self) -> bool {
        self == SearchPhase::Loading
    }

    pub(crate) fn on_query_changed(self, text: &str) -> (SearchPhase, QueryReaction) {
        match self {
            SearchPhase::SuppressedClear => (SearchPhase::Idle, QueryReaction::Swallow),
            _ if text.trim().is_empty() => (SearchPhase::Idle, QueryReaction::Clear),
            _ => (SearchPhase::Debouncing, QueryReaction::Schedule),
        }
    }

    pub(crate) fn on_timer_expired(self) -> Option<(SearchPhase, ExpiryAction)> {
        match self {
            SearchPhase::Debouncing => Some((SearchPhase::Loading, ExpiryAction::Dispatch)),
            SearchPhase::SuppressedClear => Some((SearchPhase::Idle, ExpiryAction::Suppressed)),
            SearchPhase::Idle | SearchPhase::Loading | SearchPhase::Loaded => None,
        }
    }

    pub(crate) fn on_lookup_resolved(self, has_candidates: bool) -> SearchPhase {
        if has_candidates {
            SearchPhase::Loaded
        } else {
            SearchPhase::Idle
        }
    }

    pub(crate) fn on_selected(self) -> SearchPhase {
        SearchPhase::SuppressedClear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_schedules_from_every_unsuppressed_phase() {
        for phase in [
            SearchPhase::Idle,
            SearchPhase::Debouncing,
            SearchPhase::Loading,
            SearchPhase::Loaded,
        ] {
            assert_eq!(
                phase.on_query_changed("Alien"),
                (SearchPhase::Debouncing, QueryReaction::Schedule),
                "from {phase:?}"
            );
        }
    }

    #[test]
    fn blank_text_clears() {
        for text in ["", " ", "\t\n"] {
            assert_eq!(
                SearchPhase::Loaded.on_query_changed(text),
                (SearchPhase::Idle, QueryReaction::Clear)
            );
        }
    }

    #[test]
    fn suppression_swallows_exactly_one_reaction() {
        let phase = SearchPhase::Loaded.on_selected();
        let (phase, reaction) = phase.on_query_changed("");
        assert_eq!(reaction, QueryReaction::Swallow);
        assert_eq!(phase, SearchPhase::Idle);

        let (phase, reaction) = phase.on_query_changed("Heat");
        assert_eq!(reaction, QueryReaction::Schedule);
        assert_eq!(phase, SearchPhase::Debouncing);
    }

    #[test]
    fn expiry_dispatches_only_while_debouncing() {
        assert_eq!(
            SearchPhase::Debouncing.on_timer_expired(),
            Some((SearchPhase::Loading, ExpiryAction::Dispatch))
        );
        assert_eq!(
            SearchPhase::SuppressedClear.on_timer_expired(),
            Some((SearchPhase::Idle, ExpiryAction::Suppressed))
        );
        assert_eq!(SearchPhase::Idle.on_timer_expired(), None);
        assert_eq!(SearchPhase::Loading.on_timer_expired(), None);
        assert_eq!(SearchPhase::Loaded.on_timer_expired(), None);
    }

    #[test]
    fn only_loading_reports_loading() {
        assert!(SearchPhase::Loading.is_loading());
        assert!(!SearchPhase::Debouncing.is_loading());
        assert!(!SearchPhase::SuppressedClear.is_loading());
    }

    #[test]
    fn resolution_lands_in_loaded_or_idle() {
        assert_eq!(SearchPhase::Loading.on_lookup_resolved(true), SearchPhase::Loaded);
        assert_eq!(SearchPhase::Loading.on_lookup_resolved(false), SearchPhase::Idle);
    }
}
