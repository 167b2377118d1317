use std::time::Duration;

use crate::geo::{Coord, ScreenPoint};
use crate::icon::IconCache;
use crate::layer::MarkerStyle;
use crate::surface::{Cursor, SurfaceController};

/// The site whose preview is open and the coordinate it is anchored to.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub site_id: String,
    pub anchor: Coord,
}

/// Timer effects the host must carry out for the hover debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Call [`PointerController::hover_elapsed`] with `token` after `delay`.
    Arm { token: u64, delay: Duration },
    Cancel(u64),
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Armed { target: HoverTarget, token: u64 },
    Active(HoverTarget),
}

/// Hover and click handling over the marker layer.
///
/// At most one feature is in the hovered style at any time: the one held
/// by `Phase::Active`.
#[derive(Debug)]
pub struct PointerController {
    phase: Phase,
    delay: Duration,
    next_token: u64,
}

impl PointerController {
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            delay,
            next_token: 0,
        }
    }

    /// Current hover. `Some` only once the debounce has elapsed.
    pub fn hover(&self) -> Option<&HoverTarget> {
        match &self.phase {
            Phase::Active(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::Armed { .. })
    }

    pub fn pointer_move(
        &mut self,
        pixel: ScreenPoint,
        surface: &mut SurfaceController,
        icons: &mut IconCache,
    ) -> Vec<TimerCommand> {
        let hit = surface.screen_to_feature(pixel).map(|f| HoverTarget {
            site_id: f.site_id().to_string(),
            anchor: f.coord,
        });
        surface.set_cursor(if hit.is_some() {
            Cursor::Pointer
        } else {
            Cursor::Default
        });

        let hit_id = hit.as_ref().map(|t| t.site_id.as_str());
        let unchanged = match &self.phase {
            Phase::Active(current) => Some(current.site_id.as_str()) == hit_id,
            Phase::Armed { target, .. } => Some(target.site_id.as_str()) == hit_id,
            Phase::Idle => false,
        };
        if unchanged {
            return Vec::new();
        }

        let mut commands = self.clear(surface, icons);
        if let Some(target) = hit {
            self.next_token += 1;
            let token = self.next_token;
            tracing::trace!(site = %target.site_id, token, "hover armed");
            self.phase = Phase::Armed { target, token };
            commands.push(TimerCommand::Arm {
                token,
                delay: self.delay,
            });
        }
        commands
    }

    pub fn pointer_leave(&mut self, surface: &mut SurfaceController, icons: &mut IconCache) -> Vec<TimerCommand> {
        surface.set_cursor(Cursor::Default);
        self.clear(surface, icons)
    }

    /// The debounce timer for `token` fired. Returns whether a hover opened.
    pub fn hover_elapsed(&mut self, token: u64, surface: &mut SurfaceController, icons: &mut IconCache) -> bool {
        let target = match &self.phase {
            Phase::Armed { target, token: armed } if *armed == token => target.clone(),
            _ => {
                tracing::debug!(token, "stale hover timer ignored");
                return false;
            }
        };
        surface.restyle(&target.site_id, MarkerStyle::Hovered, icons);
        tracing::debug!(site = %target.site_id, "hover active");
        self.phase = Phase::Active(target);
        true
    }

    /// Site under `pixel`, regardless of hover state.
    pub fn click(&self, pixel: ScreenPoint, surface: &SurfaceController) -> Option<String> {
        surface.screen_to_feature(pixel).map(|f| f.site_id().to_string())
    }

    /// Drop any pending or active hover, e.g. before the features change.
    pub fn reset(&mut self, surface: &mut SurfaceController, icons: &mut IconCache) -> Vec<TimerCommand> {
        self.clear(surface, icons)
    }

    fn clear(&mut self, surface: &mut SurfaceController, icons: &mut IconCache) -> Vec<TimerCommand> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => Vec::new(),
            Phase::Armed { token, .. } => vec![TimerCommand::Cancel(token)],
            Phase::Active(target) => {
                surface.restyle(&target.site_id, MarkerStyle::Normal, icons);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::geo::{project, resolution_for_zoom, unproject, LatLng};
    use crate::test_utils::{approx, marker_layer, FakeContainer};
    use crate::view::ViewState;

    const DELAY: Duration = Duration::from_millis(300);

    /// Longitude that lands `dx` pixels right of center at zoom 6.
    fn lng_at(dx: f64) -> f64 {
        unproject(Coord::new(dx * resolution_for_zoom(6.0), 0.0)).lng
    }

    struct Fixture {
        _container: FakeContainer,
        surface: SurfaceController,
        icons: IconCache,
        pointer: PointerController,
    }

    /// Marker "a" at screen center, "b" 100px to its right.
    fn fixture() -> Fixture {
        let container = FakeContainer::new(800.0, 600.0);
        let mut surface = SurfaceController::new(&MapConfig::default());
        surface.initialize(Some(&container), ViewState::new(Coord::new(0.0, 0.0), 6.0));
        let mut icons = IconCache::new();
        surface.set_layers(vec![marker_layer(
            &mut icons,
            &[("a", 0.0, 0.0), ("b", 0.0, lng_at(100.0))],
        )]);
        Fixture {
            _container: container,
            surface,
            icons,
            pointer: PointerController::new(DELAY),
        }
    }

    const OVER_A: ScreenPoint = ScreenPoint { x: 400.0, y: 285.0 };
    const OVER_B: ScreenPoint = ScreenPoint { x: 500.0, y: 285.0 };
    const EMPTY: ScreenPoint = ScreenPoint { x: 200.0, y: 100.0 };

    impl Fixture {
        fn mv(&mut self, p: ScreenPoint) -> Vec<TimerCommand> {
            self.pointer.pointer_move(p, &mut self.surface, &mut self.icons)
        }

        fn fire(&mut self, token: u64) -> bool {
            self.pointer.hover_elapsed(token, &mut self.surface, &mut self.icons)
        }

        fn hovered_count(&self) -> usize {
            self.surface
                .marker_features()
                .filter(|f| f.style == MarkerStyle::Hovered)
                .count()
        }

        fn style_of(&self, id: &str) -> MarkerStyle {
            self.surface
                .marker_features()
                .find(|f| f.site_id() == id)
                .map(|f| f.style)
                .unwrap()
        }
    }

    fn armed_token(commands: &[TimerCommand]) -> u64 {
        commands
            .iter()
            .find_map(|c| match c {
                TimerCommand::Arm { token, delay } => {
                    assert_eq!(*delay, DELAY);
                    Some(*token)
                }
                TimerCommand::Cancel(_) => None,
            })
            .expect("no timer armed")
    }

    #[test]
    fn test_move_over_feature_arms_timer() {
        let mut fx = fixture();
        let cmds = fx.mv(OVER_A);
        assert_eq!(cmds.len(), 1);
        armed_token(&cmds);
        assert!(fx.pointer.is_armed());
        assert!(fx.pointer.hover().is_none());
        assert_eq!(fx.surface.cursor(), Cursor::Pointer);
    }

    #[test]
    fn test_leave_before_delay_never_activates() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        let cmds = fx.mv(EMPTY);
        assert_eq!(cmds, vec![TimerCommand::Cancel(token)]);
        assert_eq!(fx.surface.cursor(), Cursor::Default);

        // A timer that fires anyway is stale
        assert!(!fx.fire(token));
        assert!(fx.pointer.hover().is_none());
        assert_eq!(fx.hovered_count(), 0);
    }

    #[test]
    fn test_dwell_activates_exactly_once() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        // Small moves within the same marker do not re-arm
        assert!(fx.mv(ScreenPoint::new(402.0, 288.0)).is_empty());
        assert!(fx.fire(token));
        assert!(!fx.fire(token));

        let hover = fx.pointer.hover().unwrap();
        assert_eq!(hover.site_id, "a");
        let expected = project(LatLng::new(0.0, 0.0));
        assert!(approx(hover.anchor.x, expected.x, 1e-6));
        assert!(approx(hover.anchor.y, expected.y, 1e-6));
        assert_eq!(fx.style_of("a"), MarkerStyle::Hovered);

        assert!(fx.mv(OVER_A).is_empty());
        assert_eq!(fx.pointer.hover().map(|h| h.site_id.as_str()), Some("a"));
    }

    #[test]
    fn test_pointer_leave_cancels_pending_timer() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        let cmds = fx.pointer.pointer_leave(&mut fx.surface, &mut fx.icons);
        assert_eq!(cmds, vec![TimerCommand::Cancel(token)]);
        assert!(!fx.pointer.is_armed());
    }

    #[test]
    fn test_moving_off_active_resets_style_immediately() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        fx.fire(token);
        assert!(fx.mv(EMPTY).is_empty());
        assert!(fx.pointer.hover().is_none());
        assert_eq!(fx.style_of("a"), MarkerStyle::Normal);
    }

    #[test]
    fn test_direct_move_between_features_single_active() {
        let mut fx = fixture();
        let a = armed_token(&fx.mv(OVER_A));
        fx.fire(a);
        assert_eq!(fx.hovered_count(), 1);

        let cmds = fx.mv(OVER_B);
        let b = armed_token(&cmds);
        assert_ne!(a, b);
        assert_eq!(fx.style_of("a"), MarkerStyle::Normal);
        assert_eq!(fx.hovered_count(), 0);
        assert!(fx.pointer.hover().is_none());

        assert!(fx.fire(b));
        assert_eq!(fx.pointer.hover().map(|h| h.site_id.as_str()), Some("b"));
        assert_eq!(fx.style_of("b"), MarkerStyle::Hovered);
        assert_eq!(fx.hovered_count(), 1);
    }

    #[test]
    fn test_switching_while_armed_cancels_first_timer() {
        let mut fx = fixture();
        let a = armed_token(&fx.mv(OVER_A));
        let cmds = fx.mv(OVER_B);
        assert_eq!(cmds[0], TimerCommand::Cancel(a));
        let b = armed_token(&cmds);
        assert!(!fx.fire(a));
        assert!(fx.fire(b));
        assert_eq!(fx.pointer.hover().map(|h| h.site_id.as_str()), Some("b"));
    }

    #[test]
    fn test_click_in_idle_navigates() {
        let fx = fixture();
        assert!(fx.pointer.hover().is_none());
        assert_eq!(fx.pointer.click(OVER_B, &fx.surface), Some("b".to_string()));
        assert_eq!(fx.pointer.click(EMPTY, &fx.surface), None);
        assert!(!fx.pointer.is_armed());
    }

    #[test]
    fn test_click_does_not_alter_hover() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        fx.fire(token);
        assert_eq!(fx.pointer.click(OVER_B, &fx.surface), Some("b".to_string()));
        assert_eq!(fx.pointer.hover().map(|h| h.site_id.as_str()), Some("a"));
    }

    #[test]
    fn test_reset_clears_active_hover() {
        let mut fx = fixture();
        let token = armed_token(&fx.mv(OVER_A));
        fx.fire(token);
        assert!(fx.pointer.reset(&mut fx.surface, &mut fx.icons).is_empty());
        assert!(fx.pointer.hover().is_none());
        assert_eq!(fx.hovered_count(), 0);
    }
}
