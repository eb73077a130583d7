//! Fading post sections in and out as they cross the viewport.
//!
//! The host (a browser binding, a test double) implements [`Viewport`] on top
//! of its intersection observer. A mounted container holds exactly one
//! observer for all of its direct children and gives it back when the
//! [`RevealGuard`] is dropped.

use spdlog::debug;

use crate::content::content_renderer::RenderedContent;

/// Share of a child that has to be visible before it is shown
pub const REVEAL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opacity {
    Visible,
    Hidden,
}

impl Opacity {
    pub fn value(&self) -> f64 {
        match self {
            Opacity::Visible => 1.0,
            Opacity::Hidden => 0.0,
        }
    }
}

/// Reported by the viewport when a child crosses the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Index of the direct child
    pub target: usize,
    pub intersection_ratio: f64,
}

pub trait Viewport {
    /// Starts watching `targets`. Crossings are reported through
    /// [`RevealGuard::on_intersection`].
    fn observe(&mut self, threshold: f64, targets: &[usize]) -> ObserverId;

    fn disconnect(&mut self, observer: ObserverId);
}

pub struct ProgressiveReveal {}

impl ProgressiveReveal {
    pub fn mount<'a, V: Viewport>(viewport: &'a mut V, content: &RenderedContent) -> RevealGuard<'a, V> {
        let targets: Vec<usize> = (0..content.children.len()).collect();
        let observer = viewport.observe(REVEAL_THRESHOLD, &targets);
        debug!("Observing {} sections of {} with observer {}", targets.len(), content.slug, observer.0);

        RevealGuard {
            viewport,
            observer,
            opacities: vec![Opacity::Hidden; targets.len()],
        }
    }
}

pub struct RevealGuard<'a, V: Viewport> {
    viewport: &'a mut V,
    observer: ObserverId,
    opacities: Vec<Opacity>,
}

impl<V: Viewport> RevealGuard<'_, V> {
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) {
        for entry in entries {
            let Some(opacity) = self.opacities.get_mut(entry.target) else {
                continue;
            };
            *opacity = if entry.intersection_ratio >= REVEAL_THRESHOLD {
                Opacity::Visible
            } else {
                Opacity::Hidden
            };
        }
    }

    pub fn opacity(&self, child: usize) -> Option<Opacity> {
        self.opacities.get(child).copied()
    }

    pub fn opacities(&self) -> &[Opacity] {
        &self.opacities
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    pub fn viewport(&self) -> &V {
        self.viewport
    }
}

impl<V: Viewport> Drop for RevealGuard<'_, V> {
    fn drop(&mut self) {
        self.viewport.disconnect(self.observer);
    }
}

#[cfg(test)]
mod tests {
    use crate::content::content_renderer::render;

    use super::*;

    #[derive(Default)]
    struct FakeViewport {
        next_id: u64,
        active: Vec<(ObserverId, f64, Vec<usize>)>,
        disconnected: Vec<ObserverId>,
    }

    impl Viewport for FakeViewport {
        fn observe(&mut self, threshold: f64, targets: &[usize]) -> ObserverId {
            self.next_id += 1;
            let id = ObserverId(self.next_id);
            self.active.push((id, threshold, targets.to_vec()));
            id
        }

        fn disconnect(&mut self, observer: ObserverId) {
            self.active.retain(|(id, _, _)| *id != observer);
            self.disconnected.push(observer);
        }
    }

    fn three_sections() -> RenderedContent {
        render("# Title\n\nFirst.\n\nSecond.", "post").unwrap()
    }

    #[test]
    fn test_one_observer_per_container() {
        let content = three_sections();
        let mut viewport = FakeViewport::default();
        {
            let guard = ProgressiveReveal::mount(&mut viewport, &content);
            let active = &guard.viewport().active;
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].1, REVEAL_THRESHOLD);
            assert_eq!(active[0].2, vec![0, 1, 2]);
        }
        assert!(viewport.active.is_empty());
        assert_eq!(viewport.disconnected, vec![ObserverId(1)]);
    }

    #[test]
    fn test_remount_does_not_leak() {
        let content = three_sections();
        let mut viewport = FakeViewport::default();
        for _ in 0..5 {
            let guard = ProgressiveReveal::mount(&mut viewport, &content);
            assert_eq!(guard.viewport().active.len(), 1);
        }
        assert!(viewport.active.is_empty());
        assert_eq!(viewport.disconnected.len(), 5);
    }

    #[test]
    fn test_opacity_follows_threshold() {
        let content = three_sections();
        let mut viewport = FakeViewport::default();
        let mut guard = ProgressiveReveal::mount(&mut viewport, &content);
        assert_eq!(guard.opacities(), [Opacity::Hidden; 3]);

        guard.on_intersection(&[
            IntersectionEntry { target: 0, intersection_ratio: 1.0 },
            IntersectionEntry { target: 1, intersection_ratio: 0.1 },
            IntersectionEntry { target: 2, intersection_ratio: 0.05 },
        ]);
        assert_eq!(guard.opacity(0), Some(Opacity::Visible));
        assert_eq!(guard.opacity(1), Some(Opacity::Visible));
        assert_eq!(guard.opacity(2), Some(Opacity::Hidden));

        guard.on_intersection(&[IntersectionEntry { target: 0, intersection_ratio: 0.0 }]);
        assert_eq!(guard.opacity(0).map(|o| o.value()), Some(0.0));
        assert_eq!(guard.opacity(1).map(|o| o.value()), Some(1.0));
    }

    #[test]
    fn test_unknown_targets_are_ignored() {
        let content = three_sections();
        let mut viewport = FakeViewport::default();
        let mut guard = ProgressiveReveal::mount(&mut viewport, &content);
        guard.on_intersection(&[IntersectionEntry { target: 7, intersection_ratio: 1.0 }]);
        assert_eq!(guard.opacities(), [Opacity::Hidden; 3]);
        assert_eq!(guard.opacity(7), None);
    }
}
