use bevy::{color::palettes::css, prelude::*};
use bevy_grapple::prelude::*;
use bevy_grapple::synthetic::SyntheticHandPlugin;
use bevy_grapple::prelude::Button;

const CONFIG_PATH: &str = "assets/grapple.json";
const GESTURE_LIST_PATH: &str = "gestures/default.gestures.json";

fn main() {
    let (config, config_error) = match GrappleConfig::from_json_file(CONFIG_PATH) {
        Ok(config) => (config, None),
        Err(err) => (GrappleConfig::default(), Some(err.to_string())),
    };

    let mut app = App::new();

    app.add_plugins((
        DefaultPlugins,
        GrapplePlugin::new(config),
        GestureAssetPlugin,
        GrappleDebugPlugin,
        SyntheticHandPlugin,
    ))
    .add_systems(Startup, (setup, load_gesture_list))
    .add_systems(Startup, move || match &config_error {
        Some(err) => warn!("Using default config, could not read {CONFIG_PATH}: {err}"),
        None => info!("Loaded config from {CONFIG_PATH}."),
    })
    .add_systems(Update, (log_events, color_interactables));

    #[cfg(feature = "debug")]
    app.add_plugins(bevy_inspector_egui::quick::WorldInspectorPlugin::new());

    app.run();
}

fn load_gesture_list(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ActiveGestureList::new(asset_server.load(GESTURE_LIST_PATH)));
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0.0, 1.3, 0.2).looking_at(Vec3::new(0.0, 0.9, -0.5), Vec3::Y),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        transform: Transform::from_xyz(1.0, 3.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let mut spawn = |name: &str, mesh: Mesh, transform: Transform, interactable: GrappleInteractable| {
        commands
            .spawn((
                Name::new(name.to_string()),
                PbrBundle {
                    mesh: meshes.add(mesh),
                    material: materials.add(Color::from(css::GRAY)),
                    transform,
                    ..default()
                },
                interactable,
            ))
            .id()
    };

    let button_mesh = || Mesh::from(Cuboid::new(0.04, 0.01, 0.04));
    let button_a = spawn(
        "Button A",
        button_mesh(),
        Transform::from_xyz(-0.08, 0.9, -0.45),
        GrappleInteractable::new(Button::new(Pose::default(), Vec2::splat(0.02))),
    );
    let button_b = spawn(
        "Button B",
        button_mesh(),
        Transform::from_xyz(0.0, 0.9, -0.45),
        GrappleInteractable::new(Button::new(Pose::default(), Vec2::splat(0.02))),
    );
    spawn(
        "Slider",
        Cuboid::new(0.2, 0.01, 0.02).into(),
        Transform::from_xyz(0.15, 0.9, -0.45),
        GrappleInteractable::new(Slider::new(Pose::default(), 0.2)),
    );
    spawn(
        "Lever",
        Cylinder::new(0.01, 0.2).into(),
        Transform::from_xyz(-0.25, 0.9, -0.5),
        GrappleInteractable::new(Lever::new(Pose::default(), 0.2, -0.8, 0.8)),
    );
    spawn(
        "Socket",
        Sphere::new(0.02).into(),
        Transform::from_xyz(0.3, 1.0, -0.4),
        GrappleInteractable::new(Socket::new(Pose::default(), 0.03)),
    );
    spawn(
        "Valve",
        Torus::new(0.08, 0.1).into(),
        Transform::from_xyz(0.0, 1.1, -0.6),
        GrappleInteractable::new(Valve::new(Pose::default(), 0.09)),
    );

    commands.spawn((
        Name::new("Button Group"),
        InteractableGroupMembers {
            members: vec![button_a, button_b],
            cooldown: None,
        },
    ));
}

fn color_interactables(
    q_interactables: Query<(&InteractableStatus, &Handle<StandardMaterial>), Changed<InteractableStatus>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (status, material) in q_interactables.iter() {
        let Some(material) = materials.get_mut(material) else {
            continue;
        };
        material.base_color = match **status {
            InteractableState::Active => css::GRAY,
            InteractableState::Proximate => css::YELLOW,
            InteractableState::Interacted => css::LIME,
            InteractableState::Disabled => css::DARK_RED,
        }
        .into();
    }
}

fn log_events(
    mut evr_gesture: EventReader<GestureChanged>,
    mut evr_interaction: EventReader<InteractionChanged>,
    q_names: Query<&Name>,
) {
    for event in evr_gesture.read() {
        match event.recognized {
            true => info!("{} hand: {}", event.hand, event.gesture),
            false => info!("{} hand released {}", event.hand, event.gesture),
        }
    }

    for event in evr_interaction.read() {
        let name = q_names
            .get(event.entity)
            .map(|name| name.as_str())
            .unwrap_or("?");
        info!("{} hand {:?} {name}", event.hand, event.kind);
    }
}
