//! Timed fade-out and removal of notification banners.

use super::{DetachReason, TimerAction};
use crate::config::{css_seconds, BehaviorConfig};
use crate::dom::{Document, ElementId, Selector};
use crate::timer::{TaskId, TimerQueue};

/// Banners present at attach time and the task that will fade them.
#[derive(Debug, Clone)]
pub struct AutoDismiss {
    banners: Vec<ElementId>,
    task: TaskId,
}

impl AutoDismiss {
    /// Schedule the fade for every banner currently in the document.
    /// Banners added later are not affected.
    pub fn schedule<D: Document>(
        doc: &D,
        config: &BehaviorConfig,
        timers: &mut TimerQueue<TimerAction>,
    ) -> Option<Self> {
        let banners = doc.query_all(&Selector::class(&config.selectors.alert_class));
        if banners.is_empty() {
            return None;
        }
        let task = timers.schedule(
            config.appearance.dismiss_after(),
            TimerAction::FadeBanners(banners.clone()),
        );
        Some(Self { banners, task })
    }

    pub fn banners(&self) -> &[ElementId] {
        &self.banners
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    /// Start the opacity transition on each banner still attached and
    /// schedule its removal once the transition ends.
    pub fn fade<D: Document>(
        doc: &mut D,
        banners: &[ElementId],
        config: &BehaviorConfig,
        timers: &mut TimerQueue<TimerAction>,
    ) -> usize {
        let transition = format!("opacity {} ease", css_seconds(config.appearance.fade_ms));
        let mut faded = 0;
        for banner in banners {
            if !doc.is_attached(*banner) {
                tracing::debug!(element = banner.0, "Banner already dismissed");
                continue;
            }
            doc.set_style(*banner, "transition", &transition);
            doc.set_style(*banner, "opacity", "0");
            timers.schedule(
                config.appearance.fade(),
                TimerAction::Detach {
                    element: *banner,
                    reason: DetachReason::Banner,
                },
            );
            faded += 1;
        }
        faded
    }
}
