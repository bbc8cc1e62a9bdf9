//! Scroll synchronizer: tracks which heading is in reading focus.
//!
//! The browser runs this contract through `IntersectionObserver`; the Rust
//! side owns the state machine and the observer options, so the embedded
//! client script and these tests agree on behavior.
//!
//! ```text
//! Unmounted ──mount──▶ Mounted(active = None)
//!     ▲                   │ intersections: last intersecting, registered id wins
//!     └─────unmount───────┘
//! ```

use serde::Serialize;

/// Observer configuration shared with the client script.
///
/// Margins are percentages of the viewport height; negative values shrink
/// the observed band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOptions {
    pub top_margin_pct: i8,
    pub bottom_margin_pct: i8,
    pub threshold: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            top_margin_pct: -20,
            bottom_margin_pct: -70,
            threshold: 0.0,
        }
    }
}

impl ObserverOptions {
    /// CSS `rootMargin` string: `"-20% 0% -70% 0%"`.
    pub fn root_margin(&self) -> String {
        format!("{}% 0% {}% 0%", self.top_margin_pct, self.bottom_margin_pct)
    }

    /// Vertical band, in pixels from the viewport top, where a heading counts
    /// as in focus.
    pub fn band(&self, viewport_height: f64) -> ViewportBand {
        let top = -f64::from(self.top_margin_pct) / 100.0 * viewport_height;
        let bottom = viewport_height + f64::from(self.bottom_margin_pct) / 100.0 * viewport_height;
        ViewportBand { top, bottom }
    }
}

/// Focus band within the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBand {
    pub top: f64,
    pub bottom: f64,
}

impl ViewportBand {
    /// Whether an element spanning `[top, bottom)` intersects the band.
    ///
    /// With threshold 0, touching a single pixel is enough.
    pub fn intersects(&self, top: f64, bottom: f64) -> bool {
        top < self.bottom && bottom > self.top
    }
}

/// One visibility change reported by the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(id: impl Into<String>, is_intersecting: bool) -> Self {
        Self {
            id: id.into(),
            is_intersecting,
        }
    }
}

/// Environment the synchronizer subscribes to.
pub trait HeadingObserver {
    /// Start watching an element. Returns `false` when no element has this id.
    fn observe(&mut self, id: &str, options: &ObserverOptions) -> bool;

    /// Release every observation.
    fn disconnect(&mut self);
}

/// Active-heading state machine.
#[derive(Debug, Default)]
pub struct ScrollSpy {
    options: ObserverOptions,
    registered: Vec<String>,
    active: Option<String>,
    mounted: bool,
}

impl ScrollSpy {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Observe every heading whose element exists. State starts at none.
    pub fn mount<O, I, S>(&mut self, observer: &mut O, ids: I)
    where
        O: HeadingObserver,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.mounted {
            observer.disconnect();
        }

        self.registered.clear();
        self.active = None;

        for id in ids {
            let id = id.as_ref();
            if self.registered.iter().any(|r| r == id) {
                continue;
            }
            if observer.observe(id, &self.options) {
                self.registered.push(id.to_string());
            }
        }
        self.mounted = true;
    }

    /// Apply one observer batch. The last intersecting registered entry wins;
    /// entries leaving the band never clear the state.
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) {
        if !self.mounted {
            return;
        }
        let last = entries
            .iter()
            .rev()
            .find(|entry| entry.is_intersecting && self.is_registered(&entry.id));
        if let Some(entry) = last {
            self.active = Some(entry.id.clone());
        }
    }

    /// Release observations and discard state.
    pub fn unmount<O: HeadingObserver>(&mut self, observer: &mut O) {
        if self.mounted {
            observer.disconnect();
        }
        self.registered.clear();
        self.active = None;
        self.mounted = false;
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    fn is_registered(&self, id: &str) -> bool {
        self.registered.iter().any(|r| r == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    /// Fake page: a set of element ids that exist.
    #[derive(Default)]
    struct FakePage {
        elements: FxHashSet<String>,
        observed: Vec<String>,
        disconnects: usize,
    }

    impl FakePage {
        fn with(ids: &[&str]) -> Self {
            Self {
                elements: ids.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl HeadingObserver for FakePage {
        fn observe(&mut self, id: &str, options: &ObserverOptions) -> bool {
            assert_eq!(options.root_margin(), "-20% 0% -70% 0%");
            let exists = self.elements.contains(id);
            if exists {
                self.observed.push(id.to_string());
            }
            exists
        }

        fn disconnect(&mut self) {
            self.observed.clear();
            self.disconnects += 1;
        }
    }

    fn mounted(page: &mut FakePage, ids: &[&str]) -> ScrollSpy {
        let mut spy = ScrollSpy::new(ObserverOptions::default());
        spy.mount(page, ids.iter().copied());
        spy
    }

    #[test]
    fn test_mount_starts_without_active() {
        let mut page = FakePage::with(&["channels", "buffered-channels"]);
        let spy = mounted(&mut page, &["channels", "buffered-channels", "missing"]);

        assert_eq!(spy.active(), None);
        assert_eq!(spy.registered(), ["channels", "buffered-channels"]);
        assert_eq!(page.observed, vec!["channels", "buffered-channels"]);
    }

    #[test]
    fn test_last_intersecting_wins() {
        let mut page = FakePage::with(&["a", "b", "c"]);
        let mut spy = mounted(&mut page, &["a", "b", "c"]);

        spy.on_intersections(&[
            IntersectionEntry::new("a", true),
            IntersectionEntry::new("b", true),
            IntersectionEntry::new("c", false),
        ]);
        assert_eq!(spy.active(), Some("b"));
    }

    #[test]
    fn test_leaving_does_not_clear() {
        let mut page = FakePage::with(&["a"]);
        let mut spy = mounted(&mut page, &["a"]);

        spy.on_intersections(&[IntersectionEntry::new("a", true)]);
        spy.on_intersections(&[IntersectionEntry::new("a", false)]);
        assert_eq!(spy.active(), Some("a"));
    }

    #[test]
    fn test_unregistered_ids_ignored() {
        let mut page = FakePage::with(&["a"]);
        let mut spy = mounted(&mut page, &["a", "ghost"]);

        spy.on_intersections(&[
            IntersectionEntry::new("a", true),
            IntersectionEntry::new("ghost", true),
        ]);
        assert_eq!(spy.active(), Some("a"));
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut page = FakePage::with(&["a"]);
        let mut spy = mounted(&mut page, &["a"]);
        spy.on_intersections(&[IntersectionEntry::new("a", true)]);

        spy.unmount(&mut page);
        assert_eq!(spy.active(), None);
        assert!(spy.registered().is_empty());
        assert!(!spy.is_mounted());
        assert!(page.observed.is_empty());
        assert_eq!(page.disconnects, 1);

        spy.on_intersections(&[IntersectionEntry::new("a", true)]);
        assert_eq!(spy.active(), None);
    }

    #[test]
    fn test_remount_resets_state() {
        let mut page = FakePage::with(&["a", "b"]);
        let mut spy = mounted(&mut page, &["a"]);
        spy.on_intersections(&[IntersectionEntry::new("a", true)]);

        spy.mount(&mut page, ["b"]);
        assert_eq!(spy.active(), None);
        assert_eq!(spy.registered(), ["b"]);
        assert_eq!(page.disconnects, 1);
    }

    #[test]
    fn test_duplicate_ids_registered_once() {
        let mut page = FakePage::with(&["example"]);
        let spy = mounted(&mut page, &["example", "example"]);
        assert_eq!(spy.registered(), ["example"]);
        assert_eq!(page.observed.len(), 1);
    }

    #[test]
    fn test_band_geometry() {
        let band = ObserverOptions::default().band(1000.0);
        assert!((band.top - 200.0).abs() < 1e-9);
        assert!((band.bottom - 300.0).abs() < 1e-9);

        assert!(band.intersects(250.0, 280.0));
        assert!(band.intersects(150.0, 201.0));
        assert!(!band.intersects(100.0, 200.0));
        assert!(!band.intersects(300.0, 340.0));
    }
}
