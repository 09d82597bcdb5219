use crate::scene::MeshKey;

/// Everything the debug panel (or a script) can ask a viewer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    /// Crossfade to a base state.
    SelectState(String),
    /// Play a one-shot emote, then return to the selected base state.
    TriggerEmote(String),
    /// Write one morph-target influence (clamped to `[0, 1]`).
    SetMorphInfluence {
        mesh: MeshKey,
        index: usize,
        value: f32,
    },
}

/// What the state folders of the panel show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerState {
    /// Selected base state
    pub state: String,
    /// Emote triggers, in panel order
    pub emotes: Vec<String>,
}
