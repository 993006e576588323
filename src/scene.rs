use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Home,
    Flashcards,
    Quiz,
    Diary,
    Game,
}

impl SceneId {
    pub fn title(&self) -> &'static str {
        match self {
            SceneId::Home => "home",
            SceneId::Flashcards => "flashcards",
            SceneId::Quiz => "quiz",
            SceneId::Diary => "diary",
            SceneId::Game => "game",
        }
    }
}

/// Cross-fade between scenes.
///
/// Progress moves by a fixed step per frame, not per millisecond, so a slow
/// display makes the fade take longer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneTransition {
    Stable(SceneId),
    Transitioning {
        from: SceneId,
        to: SceneId,
        progress: f32,
    },
}

impl SceneTransition {
    pub fn new(scene: SceneId) -> Self {
        SceneTransition::Stable(scene)
    }

    /// Scene currently on screen. During a fade this is still the old one.
    pub fn current(&self) -> SceneId {
        match *self {
            SceneTransition::Stable(scene) => scene,
            SceneTransition::Transitioning { from, .. } => from,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SceneTransition::Transitioning { .. })
    }

    /// Start fading toward `to`. Asking for the scene already shown does
    /// nothing; asking mid-fade restarts the fade toward the new target.
    pub fn navigate(&mut self, to: SceneId) {
        let from = self.current();
        if from == to {
            return;
        }
        log::debug!("navigate {} -> {}", from.title(), to.title());
        *self = SceneTransition::Transitioning {
            from,
            to,
            progress: 0.0,
        };
    }

    /// Advance one frame. Returns the destination on the frame it is reached.
    pub fn step(&mut self, increment: f32) -> Option<SceneId> {
        let SceneTransition::Transitioning { to, progress, .. } = self else {
            return None;
        };
        *progress += increment;
        if *progress >= 1.0 {
            let arrived = *to;
            *self = SceneTransition::Stable(arrived);
            return Some(arrived);
        }
        None
    }

    /// Opacity of the fade overlay, peaking halfway through.
    pub fn overlay_alpha(&self) -> f32 {
        match *self {
            SceneTransition::Stable(_) => 0.0,
            SceneTransition::Transitioning { progress, .. } => {
                (progress.min(1.0) * PI).sin().max(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_to_current_is_noop() {
        let mut transition = SceneTransition::new(SceneId::Home);
        transition.navigate(SceneId::Home);
        assert_eq!(transition, SceneTransition::Stable(SceneId::Home));
    }

    #[test]
    fn test_arrives_after_fixed_frame_count() {
        let mut transition = SceneTransition::new(SceneId::Home);
        transition.navigate(SceneId::Game);

        let mut frames = 0;
        let arrived = loop {
            frames += 1;
            if let Some(scene) = transition.step(0.06) {
                break scene;
            }
            assert_eq!(transition.current(), SceneId::Home);
            assert!(frames < 100);
        };

        assert_eq!(arrived, SceneId::Game);
        // ceil(1 / 0.06)
        assert_eq!(frames, 17);
        assert_eq!(transition, SceneTransition::Stable(SceneId::Game));
        assert_eq!(transition.step(0.06), None);
    }

    #[test]
    fn test_overlay_peaks_midway() {
        let mut transition = SceneTransition::new(SceneId::Home);
        assert_eq!(transition.overlay_alpha(), 0.0);

        transition.navigate(SceneId::Quiz);
        transition.step(0.5);
        assert!((transition.overlay_alpha() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_renavigate_mid_fade_restarts() {
        let mut transition = SceneTransition::new(SceneId::Home);
        transition.navigate(SceneId::Quiz);
        transition.step(0.3);
        transition.navigate(SceneId::Diary);

        assert_eq!(
            transition,
            SceneTransition::Transitioning {
                from: SceneId::Home,
                to: SceneId::Diary,
                progress: 0.0
            }
        );
    }
}
