use bevy::prelude::*;
use bevy_egui::{
    egui::{self, Color32},
    EguiContexts, EguiPlugin,
};
use grapple_core::hand::{Finger, Handedness, JointId};

use crate::gizmos::GrappleGizmos;
use crate::rig::GrappleRig;

pub(super) struct GrappleUiPlugin;

impl Plugin for GrappleUiPlugin {
    fn build(&self, app: &mut App) {
        if app.is_plugin_added::<EguiPlugin>() == false {
            app.add_plugins(EguiPlugin);
        }
        app.init_resource::<GestureAuthoring>()
            .add_systems(Update, grapple_panel);
    }
}

/// State of the gesture authoring widgets.
#[derive(Resource, Debug, Clone)]
pub struct GestureAuthoring {
    pub name: String,
    pub path: String,
    /// Constrain recorded gestures to the current palm direction.
    pub palm_forward: bool,
    pub remap_bends: bool,
    pub config_path: String,
}

impl Default for GestureAuthoring {
    fn default() -> Self {
        Self {
            name: "Gesture".to_string(),
            path: "assets/gestures/default.gestures.json".to_string(),
            palm_forward: false,
            remap_bends: true,
            config_path: "assets/grapple.json".to_string(),
        }
    }
}

fn scrollbox(ui: &mut egui::Ui, height: f32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::default()
        .inner_margin(6.0)
        .outer_margin(4.0)
        .stroke((1.0, Color32::DARK_GRAY))
        .rounding(10.0)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(height)
                .auto_shrink(false)
                .show(ui, add_contents);
        });
}

fn grapple_panel(
    mut contexts: EguiContexts,
    mut rig: ResMut<GrappleRig>,
    mut authoring: ResMut<GestureAuthoring>,
    mut gizmos: ResMut<GrappleGizmos>,
) {
    let ctx = contexts.ctx_mut();

    egui::SidePanel::right("grapple_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Grapple");
            ui.add_space(10.0);
            hands_section(ui, &rig, &mut authoring);
            ui.add_space(10.0);
            gestures_section(ui, &mut rig, &mut authoring);
            ui.add_space(10.0);
            interactables_section(ui, &rig);
            ui.add_space(10.0);
            gizmos_section(ui, &mut gizmos);
            ui.add_space(10.0);
            config_section(ui, &rig, &mut authoring);
        });
}

fn hands_section(ui: &mut egui::Ui, rig: &GrappleRig, authoring: &mut GestureAuthoring) {
    ui.checkbox(&mut authoring.remap_bends, "Remap Finger Bends");

    for hand in Handedness::ALL {
        ui.collapsing(format!("{hand} Hand"), |ui| {
            if rig.is_tracked(hand) == false {
                ui.label("Not tracked");
                return;
            }

            let gestures = rig.gestures();
            let current = gestures.current_gesture(hand).map(|g| g.name.as_str());
            let previous = gestures.previous_gesture(hand).map(|g| g.name.as_str());
            ui.label(format!("Gesture: {}", current.unwrap_or("-")));
            ui.label(format!("Previous: {}", previous.unwrap_or("-")));

            for finger in Finger::ALL {
                let bend = rig.try_get_finger_bend(hand, finger, authoring.remap_bends);
                let bar = match bend {
                    Some(bend) => egui::ProgressBar::new(bend).text(format!("{finger:?} {bend:.2}")),
                    None => egui::ProgressBar::new(0.0).text(format!("{finger:?} -")),
                };
                ui.add(bar);
            }
        });
    }
}

fn gestures_section(ui: &mut egui::Ui, rig: &mut GrappleRig, authoring: &mut GestureAuthoring) {
    ui.label(format!("Gestures ({})", rig.gesture_library().len()));

    let mut removed = None;
    scrollbox(ui, 150.0, |ui| {
        for gesture in rig.gesture_library().iter() {
            ui.horizontal(|ui| {
                ui.label(&gesture.name);
                if ui.small_button("Remove").clicked() {
                    removed = Some(gesture.name.clone());
                }
            });
        }
    });
    if let Some(name) = removed {
        rig.gesture_library_mut().remove(&name);
    }

    ui.horizontal(|ui| {
        ui.label("Name:");
        ui.text_edit_singleline(&mut authoring.name);
    });
    ui.checkbox(&mut authoring.palm_forward, "Use Palm Direction");
    ui.horizontal(|ui| {
        let forward_joint = authoring.palm_forward.then_some(JointId::Palm);
        for hand in Handedness::ALL {
            if ui.button(format!("Record {hand}")).clicked() {
                rig.record_gesture(authoring.name.clone(), hand, forward_joint);
            }
        }
    });

    ui.add_space(5.0);
    ui.horizontal(|ui| {
        ui.label("File:");
        ui.text_edit_singleline(&mut authoring.path);
    });
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            match rig.export_gestures(&authoring.path) {
                Ok(()) => info!("Saved gestures to {}.", authoring.path),
                Err(err) => error!("Could not save gestures: {err}"),
            }
        }
        if ui.button("Load").clicked() {
            let count = rig.import_gestures(&authoring.path, true);
            info!("Loaded {count} gestures from {}.", authoring.path);
        }
    });
}

fn interactables_section(ui: &mut egui::Ui, rig: &GrappleRig) {
    ui.label(format!("Interactables: {}", rig.interactions().len()));
    for hand in Handedness::ALL {
        ui.label(format!("{hand} proximates: {}", rig.proximates(hand).len()));
    }
}

fn gizmos_section(ui: &mut egui::Ui, gizmos: &mut GrappleGizmos) {
    ui.label("Gizmos");
    ui.checkbox(&mut gizmos.joints, "Joints");
    ui.checkbox(&mut gizmos.capsules, "Capsules");
    ui.checkbox(&mut gizmos.interactables, "Interactables");
}

fn config_section(ui: &mut egui::Ui, rig: &GrappleRig, authoring: &mut GestureAuthoring) {
    ui.horizontal(|ui| {
        ui.label("Config:");
        ui.text_edit_singleline(&mut authoring.config_path);
    });

    if ui.button("Save Config").clicked() {
        let result = serde_json::to_string_pretty(rig.config())
            .map_err(|err| err.to_string())
            .and_then(|json| {
                std::fs::write(&authoring.config_path, json).map_err(|err| err.to_string())
            });
        match result {
            Ok(()) => info!("Saved config to {}.", authoring.config_path),
            Err(err) => error!("Could not save config: {err}"),
        }
    }
}
