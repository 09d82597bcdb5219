use crate::panel::{Control, DebugPanel};
use crate::viewer::command::ViewerCommand;

impl DebugPanel {
    /// Draws the panel into `ui` and returns the commands the user issued
    /// this frame. Slider values shown are updated in place so dragging
    /// feels immediate; the scene catches up when the commands are applied.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<ViewerCommand> {
        let mut commands = Vec::new();

        for (folder_index, folder) in self.folders.iter_mut().enumerate() {
            let response = egui::CollapsingHeader::new(&folder.title)
                .id_salt(("marionette_folder", folder_index))
                .default_open(folder.open)
                .show(ui, |ui| {
                    for (control_index, control) in folder.controls.iter_mut().enumerate() {
                        show_control(ui, (folder_index, control_index), control, &mut commands);
                    }
                });
            folder.open = response.openness > 0.0;
        }

        commands
    }

    /// Draws the panel in its own floating window.
    pub fn show_window(&mut self, ctx: &egui::Context) -> Vec<ViewerCommand> {
        egui::Window::new("Controls")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| self.show(ui))
            .and_then(|r| r.inner)
            .unwrap_or_default()
    }
}

fn show_control(
    ui: &mut egui::Ui,
    id: (usize, usize),
    control: &mut Control,
    commands: &mut Vec<ViewerCommand>,
) {
    match control {
        Control::Dropdown {
            label,
            options,
            selected,
        } => {
            ui.horizontal(|ui| {
                ui.label(label.as_str());
                let mut choice = selected.clone();
                egui::ComboBox::from_id_salt(("marionette_dropdown", id))
                    .selected_text(selected.as_str())
                    .show_ui(ui, |ui| {
                        for option in options.iter() {
                            ui.selectable_value(&mut choice, option.clone(), option.as_str());
                        }
                    });
                if choice != *selected {
                    commands.push(ViewerCommand::SelectState(choice.clone()));
                    *selected = choice;
                }
            });
        }
        Control::Button { label } => {
            if ui.button(label.as_str()).clicked() {
                commands.push(ViewerCommand::TriggerEmote(label.clone()));
            }
        }
        Control::Slider(slider) => {
            let mut value = slider.value;
            let changed = ui
                .add(
                    egui::Slider::new(&mut value, slider.min..=slider.max)
                        .step_by(f64::from(slider.step))
                        .text(slider.label.as_str()),
                )
                .changed();
            if changed {
                let value = slider.quantize(value);
                slider.value = value;
                commands.push(ViewerCommand::SetMorphInfluence {
                    mesh: slider.mesh,
                    index: slider.index,
                    value,
                });
            }
        }
    }
}
