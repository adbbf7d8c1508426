use canvas2d::{Color, Context, Image, Pattern, Repetition, Shader};

fn checkerboard() -> Image {
    Image::from_rgba8(
        2,
        2,
        vec![
            255, 0, 0, 255, 0, 255, 0, 255,
            0, 0, 255, 255, 255, 255, 0, 255,
        ],
    )
    .unwrap()
}

#[test]
fn no_repeat_pattern_only_paints_within_the_source_image_bounds() {
    let mut ctx = Context::new(6, 6).unwrap();
    ctx.set_fill_style_shader(Shader::Pattern(Pattern { image: checkerboard(), repetition: Repetition::NoRepeat }));
    ctx.fill_rect(0.0, 0.0, 6.0, 6.0);

    assert_eq!(ctx.surface().get_pixel(0, 0), Some(Color::from_rgba(255, 0, 0, 255)));
    assert_eq!(ctx.surface().get_pixel(5, 5), Some(Color::TRANSPARENT));
}

#[test]
fn repeat_pattern_tiles_across_both_axes() {
    let mut ctx = Context::new(6, 6).unwrap();
    ctx.set_fill_style_shader(Shader::Pattern(Pattern { image: checkerboard(), repetition: Repetition::Repeat }));
    ctx.fill_rect(0.0, 0.0, 6.0, 6.0);

    assert_eq!(ctx.surface().get_pixel(4, 4), ctx.surface().get_pixel(0, 0));
    assert_eq!(ctx.surface().get_pixel(5, 5), Some(Color::from_rgba(255, 255, 0, 255)));
}

#[test]
fn repeat_x_pattern_does_not_tile_vertically() {
    let mut ctx = Context::new(6, 6).unwrap();
    ctx.set_fill_style_shader(Shader::Pattern(Pattern { image: checkerboard(), repetition: Repetition::RepeatX }));
    ctx.fill_rect(0.0, 0.0, 6.0, 6.0);

    assert_eq!(ctx.surface().get_pixel(4, 0), Some(Color::from_rgba(255, 0, 0, 255)));
    assert_eq!(ctx.surface().get_pixel(0, 4), Some(Color::TRANSPARENT));
}
