use crate::animation::{ActionKey, AnimationMixer, LoopMode, MixerEvent};
use crate::errors::{MarionetteError, Result};
use crate::viewer::command::ViewerState;
use crate::viewer::config::StateMachineConfig;

/// Base-state / emote state machine on top of a mixer.
///
/// Exactly one action is "active" at a time. Every transition crossfades
/// from the active action to the target. Triggering an emote arms a restore:
/// when that emote's action reports `Finished`, the controller fades back to
/// whichever base state is selected at that moment.
#[derive(Debug, Clone)]
pub struct AnimationController {
    config: StateMachineConfig,
    view: ViewerState,
    active: Option<ActionKey>,
    previous: Option<ActionKey>,
    armed_emote: Option<ActionKey>,
}

impl AnimationController {
    /// Configures the loop mode of every clip in `mixer`: emotes and late
    /// states play once and hold their last pose, the rest loop.
    pub fn new(config: StateMachineConfig, mixer: &mut AnimationMixer) -> Self {
        for name in mixer.list_animations() {
            let one_shot = config.is_one_shot(&name);
            if let Some(action) = mixer.action_by_name_mut(&name) {
                if one_shot {
                    action.loop_mode = LoopMode::Once;
                    action.clamp_when_finished = true;
                } else {
                    action.loop_mode = LoopMode::Loop;
                    action.clamp_when_finished = false;
                }
            }
        }

        for name in config.states.iter().chain(&config.emotes) {
            if mixer.action_key(name).is_none() {
                log::warn!("No clip named '{name}' in the model");
            }
        }

        let view = ViewerState {
            state: config.default_state.clone(),
            emotes: config.emotes.clone(),
        };

        Self {
            config,
            view,
            active: None,
            previous: None,
            armed_emote: None,
        }
    }

    /// Plays the default state at full weight, without a fade.
    pub fn start(&mut self, mixer: &mut AnimationMixer) -> Result<()> {
        let key = mixer.play(&self.config.default_state)?;
        self.view.state.clone_from(&self.config.default_state);
        self.active = Some(key);
        log::debug!("Started in state '{}'", self.view.state);
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn view(&self) -> &ViewerState {
        &self.view
    }

    #[must_use]
    pub fn selected_state(&self) -> &str {
        &self.view.state
    }

    #[must_use]
    pub fn states(&self) -> &[String] {
        &self.config.states
    }

    #[must_use]
    pub fn emotes(&self) -> &[String] {
        &self.config.emotes
    }

    #[must_use]
    pub fn config(&self) -> &StateMachineConfig {
        &self.config
    }

    #[must_use]
    pub fn active_action(&self) -> Option<ActionKey> {
        self.active
    }

    #[must_use]
    pub fn previous_action(&self) -> Option<ActionKey> {
        self.previous
    }

    /// The emote whose completion will trigger a restore, if any.
    #[must_use]
    pub fn armed_emote(&self) -> Option<ActionKey> {
        self.armed_emote
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Crossfades to base state `name`.
    ///
    /// Returns `Ok(false)` when `name` is already selected and either active
    /// or about to be restored after an emote. Unknown names leave the
    /// controller untouched.
    pub fn select_state(&mut self, name: &str, mixer: &mut AnimationMixer) -> Result<bool> {
        if !self.config.states.iter().any(|s| s == name) {
            return Err(MarionetteError::NotAState(name.to_string()));
        }
        let key = mixer.require(name)?;

        if self.view.state == name && (self.active == Some(key) || self.armed_emote.is_some()) {
            return Ok(false);
        }

        self.view.state = name.to_string();
        self.fade_to_action(key, self.config.state_fade, mixer);
        log::debug!("State -> '{name}'");
        Ok(true)
    }

    /// Crossfades into emote `name` and arms the restore.
    pub fn trigger_emote(&mut self, name: &str, mixer: &mut AnimationMixer) -> Result<()> {
        if !self.config.emotes.iter().any(|e| e == name) {
            return Err(MarionetteError::NotAnEmote(name.to_string()));
        }
        let key = mixer.require(name)?;

        self.fade_to_action(key, self.config.emote_fade, mixer);
        self.armed_emote = Some(key);
        log::debug!("Emote '{name}'");
        Ok(())
    }

    /// Reacts to one mixer event. Returns `true` if it restored the base
    /// state.
    pub fn handle_event(&mut self, event: &MixerEvent, mixer: &mut AnimationMixer) -> bool {
        let MixerEvent::Finished { action, clip } = event else {
            return false;
        };
        if self.armed_emote != Some(*action) {
            return false;
        }
        self.armed_emote = None;

        match mixer.require(&self.view.state) {
            Ok(key) => {
                self.fade_to_action(key, self.config.emote_fade, mixer);
                log::debug!("Emote '{clip}' finished, back to '{}'", self.view.state);
                true
            }
            Err(e) => {
                log::warn!("Cannot restore after '{clip}': {e}");
                false
            }
        }
    }

    pub fn handle_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a MixerEvent>,
        mixer: &mut AnimationMixer,
    ) {
        for event in events {
            self.handle_event(event, mixer);
        }
    }

    fn fade_to_action(&mut self, target: ActionKey, duration: f32, mixer: &mut AnimationMixer) {
        self.previous = self.active;
        self.active = Some(target);

        if let Some(previous) = self.previous
            && previous != target
            && let Some(action) = mixer.action_mut(previous)
        {
            action.fade_out(duration);
        }

        if let Some(action) = mixer.action_mut(target) {
            action
                .reset()
                .set_effective_time_scale(1.0)
                .set_effective_weight(1.0)
                .fade_in(duration)
                .play();
        }
    }
}
