//! Planar reflection for the ocean.
//!
//! A second camera renders the scene mirrored across the water plane into an
//! offscreen image that the ocean shader samples in screen space. The mirror
//! camera keeps a proper rotation by flipping its up vector, so its image is
//! upside down relative to a true mirror; the shader flips it back.

use bevy::{
    prelude::*,
    render::{
        camera::RenderTarget,
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages},
    },
};
use shared::{viewport::RenderSurface, water::OceanSettings};

use crate::camera::MainCamera;

/// Height of the water plane.
const WATER_LEVEL: f32 = 0.0;

#[derive(Component)]
pub struct ReflectionCamera;

#[derive(Resource)]
pub struct ReflectionTarget {
    pub image: Handle<Image>,
}

pub fn create_reflection_image(size: UVec2) -> Image {
    let mut image = Image::new_fill(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

pub fn spawn_reflection_camera(commands: &mut Commands, image: Handle<Image>) {
    commands.spawn((
        Name::new("Reflection camera"),
        ReflectionCamera,
        Camera3d::default(),
        Camera {
            // Render before the main camera samples the result
            order: -1,
            target: RenderTarget::Image(image.into()),
            ..default()
        },
        Msaa::Off,
    ));
}

fn mirror(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 2.0 * WATER_LEVEL - v.y, v.z)
}

fn mirror_direction(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.y, v.z)
}

/// Reflection camera transform for a main camera at `main`.
pub fn mirrored_transform(main: &Transform) -> Transform {
    let forward = mirror_direction(*main.forward());
    let up = -mirror_direction(*main.up());
    Transform::from_translation(mirror(main.translation)).looking_to(forward, up)
}

/// Places the reflection camera under the water and copies the main camera's lens.
pub fn mirror_reflection_camera(
    main_camera: Query<(&Transform, &Projection), (With<MainCamera>, Without<ReflectionCamera>)>,
    mut reflection_camera: Query<
        (&mut Transform, &mut Projection),
        (With<ReflectionCamera>, Without<MainCamera>),
    >,
) {
    let Ok((main_transform, main_projection)) = main_camera.single() else {
        return;
    };
    let Ok((mut transform, mut projection)) = reflection_camera.single_mut() else {
        return;
    };

    *transform = mirrored_transform(main_transform);

    // Aspect ratio is owned by the render target size; only fov and clip planes are copied
    if let (Projection::Perspective(main), Projection::Perspective(current)) =
        (main_projection, projection.as_ref())
    {
        if main.fov != current.fov || main.near != current.near || main.far != current.far {
            if let Projection::Perspective(current) = projection.as_mut() {
                current.fov = main.fov;
                current.near = main.near;
                current.far = main.far;
            }
        }
    }
}

/// Resizes the reflection image so its aspect ratio matches the window.
pub fn resize_reflection_target(
    surface: Res<RenderSurface>,
    settings: Res<OceanSettings>,
    target: Option<Res<ReflectionTarget>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !surface.is_changed() {
        return;
    }
    let Some(target) = target else {
        return;
    };
    let size = settings.reflection_extent(surface.aspect_ratio());
    let Some(image) = images.get_mut(&target.image) else {
        return;
    };
    if image.size() != size {
        image.resize(Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        });
        debug!("Reflection target resized to {}x{}", size.x, size.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_mirror_of_start_camera() {
        let main = Transform::from_xyz(0.0, 10.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y);
        let mirrored = mirrored_transform(&main);

        assert_vec_close(mirrored.translation, Vec3::new(0.0, -10.0, 20.0));
        // Looks up at the mirror image of the orbit target
        assert_vec_close(
            *mirrored.forward(),
            Vec3::new(0.0, 10.0, -20.0).normalize(),
        );
        // Same right vector, so there is no horizontal flip
        assert_vec_close(*mirrored.right(), *main.right());
    }

    #[test]
    fn test_mirror_is_an_involution_on_position() {
        let main = Transform::from_xyz(3.0, 7.0, -2.0).looking_at(Vec3::new(1.0, 0.0, 1.0), Vec3::Y);
        let twice = mirrored_transform(&mirrored_transform(&main));
        assert_vec_close(twice.translation, main.translation);
        assert_vec_close(*twice.forward(), *main.forward());
    }

    #[test]
    fn test_reflection_image_is_renderable() {
        let image = create_reflection_image(UVec2::new(683, 512));
        assert_eq!(image.size(), UVec2::new(683, 512));
        assert!(image
            .texture_descriptor
            .usage
            .contains(TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING));
    }

    #[test]
    fn test_resize_follows_render_surface() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Image>>()
            .init_resource::<OceanSettings>()
            .insert_resource(RenderSurface::new(512.0, 512.0))
            .add_systems(Update, resize_reflection_target);

        let image = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(create_reflection_image(UVec2::new(512, 512)));
        app.insert_resource(ReflectionTarget {
            image: image.clone(),
        });
        app.update();

        app.world_mut()
            .resource_mut::<RenderSurface>()
            .resize(1024.0, 512.0);
        app.update();

        let size = app.world().resource::<Assets<Image>>().get(&image).unwrap().size();
        assert_eq!(size, UVec2::new(1024, 512));
    }
}
