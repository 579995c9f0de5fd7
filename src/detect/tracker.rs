use std::collections::HashMap;

use crate::page::{ElementId, PageElement};

use super::parse::parse_timer_text;

/// One element suspected of being an ad countdown display.
#[derive(Debug, Clone)]
pub struct Candidate<E> {
    element: E,
    last_seconds: u32,
    confirmed: bool,
}

impl<E> Candidate<E> {
    pub fn last_seconds(&self) -> u32 {
        self.last_seconds
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

/// What a single observation told us about an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Not a plausible ad countdown (unparseable, or too long to be an ad).
    Ignored,
    /// Recorded or updated without evidence of counting down.
    Tracked,
    /// The value dropped since the previous poll: an active countdown.
    Confirmed,
}

/// Per-element observation history across polls.
///
/// A single observed decrease between consecutive polls is the sole
/// confirmation rule: no hysteresis, no minimum decrease amount.
pub struct CandidateTracker<E> {
    candidates: HashMap<ElementId, Candidate<E>>,
    max_ad_duration_secs: u32,
}

impl<E: PageElement> CandidateTracker<E> {
    pub fn new(max_ad_duration_secs: u32) -> Self {
        Self {
            candidates: HashMap::new(),
            max_ad_duration_secs,
        }
    }

    /// Record one poll of an element's rendered text.
    ///
    /// Callers pre-filter by search region and text length; this applies the
    /// timer parse and the plausible-duration cap, then updates history.
    pub fn observe(&mut self, element: &E, text: &str) -> Observation {
        match parse_timer_text(text) {
            Some(seconds) => self.record(element, seconds),
            None => Observation::Ignored,
        }
    }

    fn record(&mut self, element: &E, seconds: u32) -> Observation {
        // Long countdowns are VOD scrubbers or content timers, not ads
        if seconds >= self.max_ad_duration_secs {
            return Observation::Ignored;
        }

        match self.candidates.get_mut(&element.id()) {
            None => {
                self.candidates.insert(
                    element.id(),
                    Candidate {
                        element: element.clone(),
                        last_seconds: seconds,
                        confirmed: false,
                    },
                );
                Observation::Tracked
            }
            Some(candidate) => {
                let decreased = seconds < candidate.last_seconds;
                candidate.last_seconds = seconds;
                if decreased {
                    candidate.confirmed = true;
                    Observation::Confirmed
                } else {
                    Observation::Tracked
                }
            }
        }
    }

    /// Drop candidates whose element left the live page.
    pub fn sweep(&mut self) {
        self.candidates
            .retain(|_, candidate| candidate.element.is_connected());
    }

    /// Whether at least one confirmed candidate still looks like an active
    /// ad timer: attached, rendered, and currently showing a timer value.
    ///
    /// The value is not required to still be decreasing; presence alone
    /// keeps ad mode alive.
    pub fn any_confirmed_valid(&self) -> bool {
        self.candidates
            .values()
            .filter(|candidate| candidate.confirmed)
            .any(|candidate| {
                candidate.element.is_connected()
                    && candidate.element.is_visible()
                    && parse_timer_text(&candidate.element.text()).is_some()
            })
    }

    /// Discard all candidates. Invoked on every return to scanning so a
    /// stale timer from an old ad instance cannot confirm a new one.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn get(&self, id: ElementId) -> Option<&Candidate<E>> {
        self.candidates.get(&id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::sim::SimPage;

    fn tracker() -> CandidateTracker<crate::page::sim::SimElement> {
        CandidateTracker::new(180)
    }

    #[test]
    fn decreasing_sequence_confirms_on_second_observation() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();

        assert_eq!(tracker.observe(&el, "0:10"), Observation::Tracked);
        assert_eq!(tracker.observe(&el, "0:09"), Observation::Confirmed);
        assert!(tracker.get(el.id()).unwrap().is_confirmed());

        // Stays confirmed as the countdown continues
        assert_eq!(tracker.observe(&el, "0:08"), Observation::Confirmed);
        assert!(tracker.get(el.id()).unwrap().is_confirmed());
        assert_eq!(tracker.get(el.id()).unwrap().last_seconds(), 8);
    }

    #[test]
    fn non_decreasing_sequence_never_confirms() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:05", 10.0);
        let mut tracker = tracker();

        assert_eq!(tracker.observe(&el, "0:05"), Observation::Tracked);
        assert_eq!(tracker.observe(&el, "0:05"), Observation::Tracked);
        assert_eq!(tracker.observe(&el, "0:06"), Observation::Tracked);
        assert!(!tracker.get(el.id()).unwrap().is_confirmed());
    }

    #[test]
    fn unparseable_text_is_ignored() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("Skip Intro", 10.0);
        let mut tracker = tracker();

        assert_eq!(tracker.observe(&el, "Skip Intro"), Observation::Ignored);
        assert!(tracker.is_empty());
    }

    #[test]
    fn duration_cap_boundary() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("", 10.0);
        let mut tracker = tracker();

        assert_eq!(tracker.record(&el, 179), Observation::Tracked);
        assert_eq!(tracker.len(), 1);

        let other = page.insert_text("", 10.0);
        assert_eq!(tracker.record(&other, 180), Observation::Ignored);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn sweep_drops_detached_elements() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");

        tracker.sweep();
        assert_eq!(tracker.len(), 1);

        page.detach(el.id());
        tracker.sweep();
        assert!(tracker.is_empty());
    }

    #[test]
    fn confirmed_candidate_is_valid_while_timer_persists() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");
        tracker.observe(&el, "0:09");

        assert!(tracker.any_confirmed_valid());

        // The value holding steady is still valid; only the timer vanishing,
        // hiding, or turning into non-timer text ends the ad.
        page.set_text(el.id(), "0:09");
        assert!(tracker.any_confirmed_valid());
    }

    #[test]
    fn validity_ends_when_text_stops_parsing() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");
        tracker.observe(&el, "0:09");

        page.set_text(el.id(), "Skip");
        assert!(!tracker.any_confirmed_valid());
    }

    #[test]
    fn validity_ends_when_element_hides_or_detaches() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");
        tracker.observe(&el, "0:09");

        page.set_visible(el.id(), false);
        assert!(!tracker.any_confirmed_valid());

        page.set_visible(el.id(), true);
        assert!(tracker.any_confirmed_valid());

        page.detach(el.id());
        assert!(!tracker.any_confirmed_valid());
    }

    #[test]
    fn unconfirmed_candidates_never_hold_ad_mode() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");

        assert!(!tracker.any_confirmed_valid());
    }

    #[test]
    fn clear_discards_everything() {
        let page = SimPage::new(1000.0);
        let el = page.insert_text("0:10", 10.0);
        let mut tracker = tracker();
        tracker.observe(&el, "0:10");
        tracker.observe(&el, "0:09");

        tracker.clear();
        assert!(tracker.is_empty());
        assert!(!tracker.any_confirmed_valid());
    }
}
