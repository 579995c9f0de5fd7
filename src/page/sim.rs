//! Scripted in-process page model.
//!
//! Implements the [`Page`] capabilities over interior-mutable state so the
//! detection loop can be driven without a real rendering environment. Used by
//! the demo binary and the end-to-end tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{ElementId, Page, PageElement, VideoSurface};

#[derive(Debug)]
struct ElementInner {
    text: String,
    top: f64,
    visible: bool,
    connected: bool,
}

#[derive(Debug)]
struct PageInner {
    viewport_height: f64,
    video: Option<SimVideo>,
    // BTreeMap keeps element iteration in insertion (page) order
    elements: BTreeMap<u64, ElementInner>,
    next_id: u64,
}

/// A page whose elements and video are mutated by the test script rather
/// than a renderer. Clones share the same underlying page state.
#[derive(Debug, Clone)]
pub struct SimPage {
    inner: Arc<Mutex<PageInner>>,
}

impl SimPage {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PageInner {
                viewport_height,
                video: None,
                elements: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    /// Add a video surface to the page and return a handle to it.
    pub fn attach_video(&self) -> SimVideo {
        let video = SimVideo::new();
        self.inner.lock().unwrap().video = Some(video.clone());
        video
    }

    pub fn remove_video(&self) {
        self.inner.lock().unwrap().video = None;
    }

    /// Insert a connected, visible text element at the given top offset.
    pub fn insert_text(&self, text: &str, top: f64) -> SimElement {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.elements.insert(
            id,
            ElementInner {
                text: text.to_string(),
                top,
                visible: true,
                connected: true,
            },
        );
        SimElement {
            id,
            page: Arc::clone(&self.inner),
        }
    }

    pub fn set_text(&self, id: ElementId, text: &str) {
        if let Some(el) = self.inner.lock().unwrap().elements.get_mut(&id.0) {
            el.text = text.to_string();
        }
    }

    pub fn set_visible(&self, id: ElementId, visible: bool) {
        if let Some(el) = self.inner.lock().unwrap().elements.get_mut(&id.0) {
            el.visible = visible;
        }
    }

    /// Remove the element from the live page. Existing handles stay usable
    /// but report `is_connected() == false`.
    pub fn detach(&self, id: ElementId) {
        if let Some(el) = self.inner.lock().unwrap().elements.get_mut(&id.0) {
            el.connected = false;
        }
    }
}

impl Page for SimPage {
    type Element = SimElement;
    type Video = SimVideo;

    fn video(&self) -> Option<SimVideo> {
        self.inner.lock().unwrap().video.clone()
    }

    fn text_elements(&self) -> Vec<SimElement> {
        let inner = self.inner.lock().unwrap();
        inner
            .elements
            .iter()
            .filter(|(_, el)| el.connected)
            .map(|(id, _)| SimElement {
                id: *id,
                page: Arc::clone(&self.inner),
            })
            .collect()
    }

    fn viewport_height(&self) -> f64 {
        self.inner.lock().unwrap().viewport_height
    }
}

/// Handle to one scripted element.
#[derive(Debug, Clone)]
pub struct SimElement {
    id: u64,
    page: Arc<Mutex<PageInner>>,
}

impl PageElement for SimElement {
    fn id(&self) -> ElementId {
        ElementId(self.id)
    }

    fn text(&self) -> String {
        self.page
            .lock()
            .unwrap()
            .elements
            .get(&self.id)
            .map(|el| el.text.clone())
            .unwrap_or_default()
    }

    fn is_connected(&self) -> bool {
        self.page
            .lock()
            .unwrap()
            .elements
            .get(&self.id)
            .map(|el| el.connected)
            .unwrap_or(false)
    }

    fn is_visible(&self) -> bool {
        self.page
            .lock()
            .unwrap()
            .elements
            .get(&self.id)
            .map(|el| el.connected && el.visible)
            .unwrap_or(false)
    }

    fn top(&self) -> f64 {
        self.page
            .lock()
            .unwrap()
            .elements
            .get(&self.id)
            .map(|el| el.top)
            .unwrap_or(0.0)
    }
}

#[derive(Debug)]
struct VideoInner {
    playback_rate: f64,
    muted: bool,
}

/// Scripted video surface. Clones share playback state.
#[derive(Debug, Clone)]
pub struct SimVideo {
    inner: Arc<Mutex<VideoInner>>,
}

impl SimVideo {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VideoInner {
                playback_rate: 1.0,
                muted: false,
            })),
        }
    }
}

impl VideoSurface for SimVideo {
    fn playback_rate(&self) -> f64 {
        self.inner.lock().unwrap().playback_rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.inner.lock().unwrap().playback_rate = rate;
    }

    fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    fn set_muted(&self, muted: bool) {
        self.inner.lock().unwrap().muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_elements_leave_the_element_list_but_handles_survive() {
        let page = SimPage::new(800.0);
        let el = page.insert_text("0:10", 20.0);
        assert_eq!(page.text_elements().len(), 1);

        page.detach(el.id());
        assert!(page.text_elements().is_empty());
        assert!(!el.is_connected());
        assert_eq!(el.text(), "0:10");
    }

    #[test]
    fn hidden_elements_stay_connected_but_report_invisible() {
        let page = SimPage::new(800.0);
        let el = page.insert_text("0:10", 20.0);
        page.set_visible(el.id(), false);

        assert!(el.is_connected());
        assert!(!el.is_visible());
        assert_eq!(page.text_elements().len(), 1);
    }

    #[test]
    fn video_handles_share_state() {
        let page = SimPage::new(800.0);
        let video = page.attach_video();
        video.set_playback_rate(16.0);

        let same = page.video().expect("video attached");
        assert_eq!(same.playback_rate(), 16.0);
    }
}
