//! Debug panel
//!
//! The panel is plain data: folders of dropdowns, buttons and sliders built
//! from the animation controller and the model's morph meshes. Interactions
//! resolve to [`ViewerCommand`]s; the viewer applies them. [`ui`] draws the
//! same model with egui.

pub mod ui;

use crate::errors::{MarionetteError, Result};
use crate::scene::{MeshKey, NodeHandle, Scene};
use crate::viewer::command::{ViewerCommand, ViewerState};
use crate::viewer::controller::AnimationController;

pub const STATES_FOLDER: &str = "States";
pub const EMOTES_FOLDER: &str = "Emotes";

/// Slider increment for morph influences.
pub const MORPH_STEP: f32 = 0.01;

/// A numeric control bound to one morph-target influence.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderControl {
    pub label: String,
    pub mesh: MeshKey,
    pub index: usize,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderControl {
    /// Snaps `value` onto the slider's step grid inside its range.
    #[must_use]
    pub fn quantize(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let snapped = if self.step > 0.0 {
            ((value - self.min) / self.step).round() * self.step + self.min
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Picks one of `options`; selecting resolves to `SelectState`.
    Dropdown {
        label: String,
        options: Vec<String>,
        selected: String,
    },
    /// Resolves to `TriggerEmote(label)`.
    Button { label: String },
    Slider(SliderControl),
}

impl Control {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Control::Dropdown { label, .. } | Control::Button { label } => label,
            Control::Slider(slider) => &slider.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub title: String,
    pub open: bool,
    pub controls: Vec<Control>,
}

impl Folder {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open: true,
            controls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DebugPanel {
    folders: Vec<Folder>,
}

impl DebugPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    #[must_use]
    pub fn folder(&self, title: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.title == title)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Adds the `States` dropdown and the `Emotes` buttons.
    pub fn add_state_folders(&mut self, controller: &AnimationController) {
        let mut states = Folder::new(STATES_FOLDER);
        states.controls.push(Control::Dropdown {
            label: "state".to_string(),
            options: controller.states().to_vec(),
            selected: controller.selected_state().to_string(),
        });
        self.folders.push(states);

        let mut emotes = Folder::new(EMOTES_FOLDER);
        emotes.controls.extend(
            controller
                .emotes()
                .iter()
                .map(|label| Control::Button { label: label.clone() }),
        );
        self.folders.push(emotes);
    }

    /// Adds a folder with one slider per morph target of `mesh`.
    pub fn add_morph_folder(&mut self, scene: &Scene, mesh: MeshKey, title: &str) -> Result<()> {
        let data = scene.meshes.get(mesh).ok_or(MarionetteError::InvalidMesh)?;
        if !data.has_morph_targets() {
            return Err(MarionetteError::NoMorphTargets(data.name.clone()));
        }

        let mut folder = Folder::new(title);
        let targets = &data.morph_targets;
        for (index, (label, value)) in targets.names().iter().zip(targets.influences()).enumerate() {
            folder.controls.push(Control::Slider(SliderControl {
                label: label.clone(),
                mesh,
                index,
                value: *value,
                min: 0.0,
                max: 1.0,
                step: MORPH_STEP,
            }));
        }
        self.folders.push(folder);
        Ok(())
    }

    /// Adds the morph folder for the mesh on node `node_name` under `root`.
    pub fn add_morph_folder_for_node(
        &mut self,
        scene: &Scene,
        root: NodeHandle,
        node_name: &str,
        title: &str,
    ) -> Result<()> {
        let node = scene
            .find_node_by_name(root, node_name)
            .ok_or_else(|| MarionetteError::NodeNotFound(node_name.to_string()))?;
        let mesh = scene
            .mesh_of(node)
            .ok_or_else(|| MarionetteError::NoMorphTargets(node_name.to_string()))?;
        self.add_morph_folder(scene, mesh, title)
    }

    /// One folder per morph mesh under `root`, titled with the mesh name
    /// (or `fallback_title`). Returns how many folders were added.
    pub fn add_all_morph_folders(
        &mut self,
        scene: &Scene,
        root: NodeHandle,
        fallback_title: &str,
    ) -> usize {
        let mut added = 0;
        for (_, mesh) in scene.morph_meshes(root) {
            let title = scene
                .meshes
                .get(mesh)
                .map(|m| m.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(fallback_title)
                .to_string();
            match self.add_morph_folder(scene, mesh, &title) {
                Ok(()) => added += 1,
                Err(e) => log::warn!("Skipping expression folder '{title}': {e}"),
            }
        }
        added
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Choosing `option` in a dropdown.
    #[must_use]
    pub fn select(&self, option: &str) -> Option<ViewerCommand> {
        self.controls().find_map(|control| match control {
            Control::Dropdown { options, .. } if options.iter().any(|o| o == option) => {
                Some(ViewerCommand::SelectState(option.to_string()))
            }
            _ => None,
        })
    }

    /// Pressing the button labelled `label`.
    #[must_use]
    pub fn click(&self, label: &str) -> Option<ViewerCommand> {
        self.controls().find_map(|control| match control {
            Control::Button { label: l } if l == label => {
                Some(ViewerCommand::TriggerEmote(label.to_string()))
            }
            _ => None,
        })
    }

    /// Dragging slider `label` in folder `folder` to `value`.
    #[must_use]
    pub fn drag(&self, folder: &str, label: &str, value: f32) -> Option<ViewerCommand> {
        self.folder(folder)?
            .controls
            .iter()
            .find_map(|control| match control {
                Control::Slider(slider) if slider.label == label => {
                    Some(ViewerCommand::SetMorphInfluence {
                        mesh: slider.mesh,
                        index: slider.index,
                        value: slider.quantize(value),
                    })
                }
                _ => None,
            })
    }

    /// Re-reads the live values the controls display.
    pub fn sync(&mut self, scene: &Scene, view: Option<&ViewerState>) {
        for control in self.folders.iter_mut().flat_map(|f| f.controls.iter_mut()) {
            match control {
                Control::Slider(slider) => {
                    if let Some(value) = scene
                        .meshes
                        .get(slider.mesh)
                        .and_then(|m| m.morph_targets.get(slider.index))
                    {
                        slider.value = value;
                    }
                }
                Control::Dropdown { selected, .. } => {
                    if let Some(view) = view {
                        selected.clone_from(&view.state);
                    }
                }
                Control::Button { .. } => {}
            }
        }
    }

    fn controls(&self) -> impl Iterator<Item = &Control> {
        self.folders.iter().flat_map(|f| f.controls.iter())
    }
}
