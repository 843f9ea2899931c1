use super::*;
use agl::agl::graphics::PixelFormat;
use crate::opengl_recording::GlCall;
use crate::test_support::{batches, context, MonoMetric};

fn atlas() -> PixelBuffer {
    PixelBuffer::from_rgba(&vec![[255, 255, 255, 255]; 128 * 80])
}

fn font(ctx: &SharedGlContext) -> Arc<dyn Font> {
    Arc::new(GlFont::new(ctx.clone(), Arc::new(MonoMetric), &atlas(), 128, 80).unwrap())
}

struct OtherFont(FontData);

impl Font for OtherFont {
    fn data(&self) -> &FontData {
        &self.0
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[test]
fn test_atlas_uploaded_once_and_released() {
    let (ctx, gl) = context(64, 64);
    let font = font(&ctx);
    assert_eq!(gl.live_textures(), 1);
    let a = GlLabel::new(ctx.clone(), font.clone()).unwrap();
    let b = GlLabel::new(ctx.clone(), font.clone()).unwrap();
    assert_eq!(gl.live_textures(), 1);
    drop((a, b, font));
    assert_eq!(gl.live_textures(), 0);
}

#[test]
fn test_foreign_font_is_rejected() {
    let (ctx, _gl) = context(64, 64);
    let data = FontData::new(Arc::new(MonoMetric), &PixelBuffer::new(PixelFormat::RGBA8888, 4), 2, 2).unwrap();
    let result = GlLabel::new(ctx, Arc::new(OtherFont(data)));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_one_quad_per_glyph_with_atlas_uvs() {
    let (ctx, gl) = context(64, 64);
    let mut label = GlLabel::new(ctx.clone(), font(&ctx)).unwrap();
    label.layout_mut().set_text("AB\nA");
    gl.clear_calls();
    label.draw(2, 3).unwrap();

    let calls = gl.calls();
    let quads = batches(&calls);
    assert_eq!(quads.len(), 1);
    let corners = &quads[0];
    assert_eq!(corners.len(), 12);
    // 'B' follows 'A' one advance to the right, the second line one height down
    assert_eq!(corners[4], GlCall::Vertex2(Vec2::new(10.0, 3.0)));
    assert_eq!(corners[8], GlCall::Vertex2(Vec2::new(2.0, 13.0)));

    // 'A' = 0x41: column 1, row 4 of the 16-column atlas
    let a_uv = Vec2::new(8.0 / 128.0, 40.0 / 80.0);
    assert!(calls.contains(&GlCall::TexCoord(a_uv)));
}

#[test]
fn test_draw_modulates_and_blends() {
    let (ctx, gl) = context(64, 64);
    let mut label = GlLabel::new(ctx.clone(), font(&ctx)).unwrap();
    label.layout_mut().set_text("A");
    label.set_color(Color::rgb(255, 0, 0));
    label.draw(0, 0).unwrap();

    let calls = gl.calls();
    assert!(calls.contains(&GlCall::Color(Vec4::new(1.0, 0.0, 0.0, 1.0))));
    assert!(calls.contains(&GlCall::Enable(Capability::Blend)));
    assert!(calls.contains(&GlCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)));
    assert!(!gl.capability(Capability::Blend));
    assert!(!gl.capability(Capability::Texture2D));
    assert_eq!(gl.modelview_depth(), 0);
}
