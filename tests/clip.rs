use canvas2d::{Color, Context, FillRule};

#[test]
fn second_clip_intersects_with_the_first() {
    let mut ctx = Context::new(20, 20).unwrap();
    ctx.rect(0.0, 0.0, 10.0, 20.0);
    ctx.clip(FillRule::NonZero);
    ctx.begin_path();
    ctx.rect(0.0, 0.0, 20.0, 10.0);
    ctx.clip(FillRule::NonZero);

    ctx.set_fill_style_color(Color::BLACK);
    ctx.fill_rect(0.0, 0.0, 20.0, 20.0);

    assert_eq!(ctx.surface().get_pixel(5, 5), Some(Color::BLACK));
    assert_eq!(ctx.surface().get_pixel(15, 5), Some(Color::TRANSPARENT));
    assert_eq!(ctx.surface().get_pixel(5, 15), Some(Color::TRANSPARENT));
}

#[test]
fn clip_does_not_survive_restore() {
    let mut ctx = Context::new(10, 10).unwrap();
    ctx.save();
    ctx.rect(0.0, 0.0, 2.0, 10.0);
    ctx.clip(FillRule::NonZero);
    ctx.restore();

    ctx.set_fill_style_color(Color::BLACK);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(ctx.surface().get_pixel(8, 8), Some(Color::BLACK));
}

#[test]
fn empty_path_clip_blocks_all_subsequent_drawing() {
    let mut ctx = Context::new(10, 10).unwrap();
    ctx.begin_path();
    ctx.clip(FillRule::NonZero);

    ctx.set_fill_style_color(Color::BLACK);
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert!(ctx.surface().data().iter().all(|&b| b == 0));
}
