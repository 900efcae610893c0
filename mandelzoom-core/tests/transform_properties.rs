use mandelzoom_core::{
    escape_time, wheel_zoom_rect, Complex, PixelDimensions, Rect, RectangleAnimator, Viewport,
    PLANE_BOUND,
};

const TOLERANCE: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn fix_aspect_matches_pixels_and_keeps_center() {
    let viewports = [
        Viewport::FULL,
        Viewport::new(-0.75, 0.1, 0.5, 0.02).unwrap(),
        Viewport::new(0.43, -0.25, 9.4e-5, 7.2e-5).unwrap(),
        Viewport::new(-1.0, -1.0, 0.001, 3.0).unwrap(),
    ];
    let sizes = [(100, 100), (1920, 1080), (300, 800), (1, 7), (640, 639)];

    for vp in viewports {
        for (w, h) in sizes {
            let dims = PixelDimensions::new(w, h).unwrap();
            let mut fixed = vp;
            fixed.fix_aspect(dims);

            assert!(
                close(fixed.width / fixed.height, w as f64 / h as f64),
                "{vp:?} on {w}×{h} gave {fixed:?}"
            );
            let (before, after) = (vp.center(), fixed.center());
            assert!(close(before.re, after.re) && close(before.im, after.im));
        }
    }
}

#[test]
fn crop_reproduces_selected_bounds() {
    let dims = PixelDimensions::new(200, 100).unwrap();
    let mut base = Viewport::FULL;
    base.fix_aspect(dims);

    // Selections share the panel's 2:1 shape and stay inside the plane
    // bounds, so neither the clamp nor the aspect fix moves them.
    let selections = [(60, 30, 100, 50), (100, 50, 60, 30), (50, 0, 150, 50), (150, 80, 110, 60)];
    for (x1, y1, x2, y2) in selections {
        let a = base.pixel_to_plane(x1, y1, dims, 1);
        let b = base.pixel_to_plane(x2, y2, dims, 1);
        let expected = (a.re.min(b.re), a.im.min(b.im), a.re.max(b.re), a.im.max(b.im));

        let mut vp = base;
        assert!(vp.crop(x1 as i32, y1 as i32, x2 as i32, y2 as i32, dims));
        let tl = vp.pixel_to_plane(0, 0, dims, 1);
        let br = vp.pixel_to_plane(dims.width, dims.height, dims, 1);
        assert!(close(tl.re, expected.0) && close(tl.im, expected.1), "{tl:?} vs {expected:?}");
        assert!(close(br.re, expected.2) && close(br.im, expected.3), "{br:?} vs {expected:?}");
    }
}

#[test]
fn crop_never_zooms_out_past_bounds() {
    let dims = PixelDimensions::new(100, 100).unwrap();
    let mut vp = Viewport::new(-0.5, -0.5, 1.0, 1.0).unwrap();
    let out = wheel_zoom_rect(50, 50, -3, dims).unwrap();
    assert!(vp.crop_rect(out, dims));

    let tl = vp.pixel_to_plane(0, 0, dims, 1);
    let br = vp.pixel_to_plane(100, 100, dims, 1);
    assert!(close(tl.re, -PLANE_BOUND) && close(tl.im, -PLANE_BOUND));
    assert!(close(br.re, PLANE_BOUND) && close(br.im, PLANE_BOUND));
}

#[test]
fn wheel_zoom_in_then_out_returns_to_start() {
    let dims = PixelDimensions::new(400, 400).unwrap();
    let start = Viewport::new(-1.0, -0.5, 1.0, 1.0).unwrap();
    let mut vp = start;
    vp.crop_rect(wheel_zoom_rect(100, 300, 1, dims).unwrap(), dims);
    vp.crop_rect(wheel_zoom_rect(100, 300, -1, dims).unwrap(), dims);
    assert!(close(vp.x, start.x) && close(vp.y, start.y));
    assert!(close(vp.width, start.width) && close(vp.height, start.height));
}

#[test]
fn animator_is_monotonic_between_endpoints() {
    let start = Rect::new(0, 0, 640, 480);
    let end = Rect::new(120, 77, 300, 225);
    let anim = RectangleAnimator::new(start, end, 10).unwrap();

    assert_eq!(anim.value_for_frame(0), start);
    assert_eq!(anim.value_for_frame(9), end);
    for f in 1..10 {
        let prev = anim.value_for_frame(f - 1);
        let cur = anim.value_for_frame(f);
        assert!(cur.x >= prev.x && cur.y >= prev.y);
        assert!(cur.width <= prev.width && cur.height <= prev.height);
        // Re-reading a frame never changes it.
        assert_eq!(cur, anim.value_for_frame(f));
    }
}

#[test]
fn advancing_total_frames_finishes_for_good() {
    let mut anim = RectangleAnimator::new(Rect::new(0, 0, 10, 10), Rect::new(-10, -10, 30, 30), 6).unwrap();
    for _ in 0..6 {
        anim.advance_frame();
    }
    assert!(anim.is_finished());
    for _ in 0..3 {
        assert_eq!(anim.advance_frame(), Rect::new(-10, -10, 30, 30));
        assert!(anim.is_finished());
    }
}

#[test]
fn escape_time_extremes() {
    assert_eq!(escape_time(Complex::ZERO, 64), 64);
    assert!(escape_time(Complex::new(5.0, 5.0), 64) <= 1);
}

#[test]
fn viewport_serde_round_trip() {
    let vp = Viewport::new(-0.561895714249722, -0.64233713371809176, 1.185069712557534e-5, 7.62939453125e-6)
        .unwrap();
    let json = serde_json::to_string(&vp).unwrap();
    let back: Viewport = serde_json::from_str(&json).unwrap();
    assert_eq!(vp, back);
}
