pub mod sim;

use std::fmt;

/// Opaque identity of a live page element. Stable for the lifetime of the
/// element, so it can key per-element tracking state across polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one text-bearing element in the live page structure.
///
/// Handles are cheap to clone and stay usable after the underlying element
/// is removed from the page; `is_connected` reports whether it is still part
/// of the live structure.
pub trait PageElement: Clone {
    fn id(&self) -> ElementId;

    /// Currently rendered text content (empty if the element is gone).
    fn text(&self) -> String;

    /// Whether the element is still attached to the live page.
    fn is_connected(&self) -> bool;

    /// Whether the element is currently rendered (not hidden via layout
    /// detachment).
    fn is_visible(&self) -> bool;

    /// Top offset of the element's bounding box, in viewport pixels.
    fn top(&self) -> f64;
}

/// The page's primary video surface with mutable playback properties.
pub trait VideoSurface {
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&self, rate: f64);
    fn muted(&self) -> bool;
    fn set_muted(&self, muted: bool);
}

/// Query capabilities the detection loop consumes from its environment.
///
/// All queries are synchronous and reflect the page as of the call; the loop
/// never holds results across ticks except via `PageElement` handles.
pub trait Page: Send + 'static {
    type Element: PageElement + Send + 'static;
    type Video: VideoSurface + Send + 'static;

    /// The current primary video surface, if the page has one.
    fn video(&self) -> Option<Self::Video>;

    /// All elements matching generic container tags, in page order.
    fn text_elements(&self) -> Vec<Self::Element>;

    /// Current viewport height in pixels.
    fn viewport_height(&self) -> f64;
}
