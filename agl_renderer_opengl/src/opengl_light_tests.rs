use super::*;
use glam::{Vec3, Vec4};
use agl::agl::graphics::Color;
use crate::opengl_recording::GlCall;
use crate::test_support::context;

// ============================================================================
// Slot probing
// ============================================================================

#[test]
fn test_enable_takes_first_disabled_unit() {
    let (ctx, gl) = context(8, 8);
    let mut a = GlLight::new(ctx.clone(), LightType::Point);
    let mut b = GlLight::new(ctx.clone(), LightType::Directional);
    a.enable().unwrap();
    b.enable().unwrap();
    assert_eq!((a.slot(), b.slot()), (Some(0), Some(1)));
    assert!(gl.capability(Capability::Light(0)));
    assert!(gl.capability(Capability::Light(1)));

    a.disable().unwrap();
    assert!(!gl.capability(Capability::Light(0)));
    let mut c = GlLight::new(ctx.clone(), LightType::Spot);
    c.enable().unwrap();
    assert_eq!(c.slot(), Some(0));
}

#[test]
fn test_enable_turns_on_lighting_stage() {
    let (ctx, gl) = context(8, 8);
    assert!(!gl.capability(Capability::Lighting));
    let mut light = GlLight::new(ctx.clone(), LightType::Directional);
    light.enable().unwrap();
    assert!(gl.capability(Capability::Lighting));
    assert!(ctx.lock().unwrap().pipeline.lighting());
}

#[test]
fn test_units_enabled_elsewhere_are_skipped() {
    let (ctx, gl) = context(8, 8);
    ctx.lock().unwrap().gl.enable(Capability::Light(0));
    let mut light = GlLight::new(ctx.clone(), LightType::Point);
    light.enable().unwrap();
    assert_eq!(light.slot(), Some(1));
    assert!(gl.capability(Capability::Light(0)));
}

#[test]
fn test_exhausted_units_leave_light_unbound() {
    let (ctx, gl) = context(8, 8);
    ctx.lock().unwrap().max_lights = 2;
    let mut lights: Vec<GlLight> = (0..2).map(|_| GlLight::new(ctx.clone(), LightType::Point)).collect();
    for light in lights.iter_mut() {
        light.enable().unwrap();
    }

    gl.clear_calls();
    let mut extra = GlLight::new(ctx.clone(), LightType::Point);
    assert!(extra.enable().is_ok());
    assert!(!extra.is_bound());
    assert_eq!(gl.count_calls(|c| matches!(c, GlCall::Light(..))), 0);
}

#[test]
fn test_drop_disables_unit() {
    let (ctx, gl) = context(8, 8);
    {
        let mut light = GlLight::new(ctx.clone(), LightType::Point);
        light.enable().unwrap();
    }
    assert!(!gl.capability(Capability::Light(0)));
}

// ============================================================================
// Parameter upload
// ============================================================================

#[test]
fn test_directional_upload() {
    let (ctx, gl) = context(8, 8);
    let mut light = GlLight::new(ctx, LightType::Directional);
    light.params_mut().direction = Vec3::new(0.0, -1.0, 0.0);
    light.enable().unwrap();

    assert_eq!(
        gl.calls(),
        vec![
            GlCall::Light(0, LightParam::Diffuse(light.params().diffuse())),
            GlCall::Light(0, LightParam::Position(Vec4::new(0.0, 1.0, 0.0, 0.0))),
            GlCall::Light(0, LightParam::SpotDirection(Vec3::NEG_Z)),
            GlCall::Light(0, LightParam::SpotCutoff(180.0)),
            GlCall::Enable(Capability::Light(0)),
        ]
    );
}

#[test]
fn test_reenable_reuploads_to_same_unit() {
    let (ctx, gl) = context(8, 8);
    let mut light = GlLight::new(ctx, LightType::Spot);
    light.enable().unwrap();
    light.params_mut().color = Color::rgb(15, 0, 0);
    light.params_mut().intensity = 1.3;
    light.params_mut().cutoff = 25.0;
    gl.clear_calls();
    light.enable().unwrap();

    assert_eq!(light.slot(), Some(0));
    let calls = gl.calls();
    assert!(calls.contains(&GlCall::Light(0, LightParam::Diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0)))));
    assert!(calls.contains(&GlCall::Light(0, LightParam::SpotCutoff(25.0))));
}
