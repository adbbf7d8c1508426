use canvas2d::{Color, Context, GradientStop, LinearGradient, Point, RadialGradient, Shader};

#[test]
fn linear_gradient_fill_rect_interpolates_across_the_rect() {
    let mut ctx = Context::new(10, 1).unwrap();
    ctx.set_fill_style_shader(Shader::LinearGradient(LinearGradient {
        p0: Point::from_xy(0.0, 0.0),
        p1: Point::from_xy(10.0, 0.0),
        stops: vec![
            GradientStop::new(0.0, Color::from_rgba(0, 0, 0, 255)),
            GradientStop::new(1.0, Color::from_rgba(255, 0, 0, 255)),
        ],
    }));
    ctx.fill_rect(0.0, 0.0, 10.0, 1.0);

    let left = ctx.surface().get_pixel(0, 0).unwrap();
    let right = ctx.surface().get_pixel(9, 0).unwrap();
    assert!(left.r < right.r);
}

#[test]
fn radial_gradient_fills_outward_from_the_center() {
    let mut ctx = Context::new(20, 20).unwrap();
    ctx.set_fill_style_shader(Shader::RadialGradient(RadialGradient {
        c0: Point::from_xy(10.0, 10.0),
        r0: 0.0,
        c1: Point::from_xy(10.0, 10.0),
        r1: 10.0,
        stops: vec![
            GradientStop::new(0.0, Color::from_rgba(255, 255, 255, 255)),
            GradientStop::new(1.0, Color::from_rgba(0, 0, 0, 255)),
        ],
    }));
    ctx.fill_rect(0.0, 0.0, 20.0, 20.0);

    let center = ctx.surface().get_pixel(10, 10).unwrap();
    let edge = ctx.surface().get_pixel(19, 10).unwrap();
    assert!(center.r > edge.r);
}

#[test]
fn gradient_fill_marks_path_based_rendering_even_for_an_axis_aligned_rect() {
    let mut ctx = Context::new(10, 10).unwrap();
    ctx.set_fill_style_shader(Shader::LinearGradient(LinearGradient {
        p0: Point::from_xy(0.0, 0.0),
        p1: Point::from_xy(10.0, 0.0),
        stops: vec![
            GradientStop::new(0.0, Color::BLACK),
            GradientStop::new(1.0, Color::from_rgba(255, 255, 255, 255)),
        ],
    }));
    ctx.fill_rect(0.0, 0.0, 10.0, 10.0);
    assert!(ctx.is_path_based_rendering_used());
}
