use canvas2d::{Color, Context};

#[test]
fn dashed_horizontal_line_leaves_gaps() {
    let mut ctx = Context::new(40, 10).unwrap();
    ctx.set_stroke_style_color(Color::BLACK);
    ctx.set_line_width(2.0);
    ctx.set_line_dash(&[6.0, 6.0]);
    ctx.move_to(0.0, 5.0);
    ctx.line_to(36.0, 5.0);
    ctx.stroke();

    assert_eq!(ctx.surface().get_pixel(2, 5), Some(Color::BLACK));
    assert_eq!(ctx.surface().get_pixel(9, 5), Some(Color::TRANSPARENT));
}

#[test]
fn get_line_dash_round_trips_an_odd_length_pattern_verbatim() {
    let mut ctx = Context::new(40, 10).unwrap();
    ctx.set_line_dash(&[5.0]);
    assert_eq!(ctx.get_line_dash(), &[5.0]);
}

#[test]
fn empty_dash_array_yields_a_solid_stroke() {
    let mut ctx = Context::new(40, 10).unwrap();
    ctx.set_stroke_style_color(Color::BLACK);
    ctx.set_line_width(2.0);
    ctx.set_line_dash(&[6.0, 6.0]);
    ctx.set_line_dash(&[]);
    ctx.move_to(0.0, 5.0);
    ctx.line_to(36.0, 5.0);
    ctx.stroke();

    assert_eq!(ctx.surface().get_pixel(20, 5), Some(Color::BLACK));
}

#[test]
fn negative_dash_value_is_rejected_leaving_the_dash_array_unset() {
    let mut ctx = Context::new(10, 10).unwrap();
    ctx.set_line_dash(&[4.0, -1.0]);
    assert!(ctx.get_line_dash().is_empty());
}
