use once_cell::sync::Lazy;
use regex::Regex;

// Exactly "0:SS" or "00:SS", optionally negative ("-0:09" remaining-time
// displays). The zero minutes field is required: "1:23" is a scrubber or a
// track length, not an ad countdown.
static TIMER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?0?0:(\d{2})$").expect("valid timer regex"));

/// Parse rendered text into countdown seconds.
///
/// Only the exact punctuation of a countdown display counts; two-digit
/// prices, ratings and view counts do not parse. Returns `None` for
/// anything that is not a timer.
pub fn parse_timer_text(text: &str) -> Option<u32> {
    let caps = TIMER_RE.captures(text.trim())?;
    caps.get(1)?.as_str().parse().ok()
}
