use crate::db::gap::Gap;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;

fn f(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Renders gaps as bands, nets as filled trunks at their track range, and a
/// vertical stub from every pin to its trunk.
pub fn draw_assignment(gaps: &[Gap], filename: &str, width: u32, height: u32) -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));

    let nets = gaps.iter().flat_map(|g| g.assignments().iter().map(|a| &a.net));
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y: f64 = 0.0;
    for n in nets {
        min_x = min_x.min(f(n.minx()));
        max_x = max_x.max(f(n.maxx()));
        for p in n.pins() {
            max_y = max_y.max(f(p.y));
        }
    }
    for g in gaps {
        max_y = max_y.max(f(g.base_height + g.width));
    }
    max_y *= 1.05;
    if !min_x.is_finite() || max_x <= min_x || max_y <= 0.0 {
        log::warn!("Nothing to draw; skipping {}", filename);
        return Ok(());
    }

    let margin = 0.02 * (max_x - min_x);
    let scale_x = width as f64 / (max_x - min_x + 2.0 * margin);
    let scale_y = height as f64 / max_y;
    let map = |x: f64, y: f64| ((x - min_x + margin) * scale_x, height as f64 - y * scale_y);

    let color_gap = Rgb([45, 45, 55]);
    let color_stub = Rgb([90, 90, 90]);
    let palette = [
        Rgb([0, 110, 255]),
        Rgb([255, 20, 80]),
        Rgb([0, 255, 100]),
        Rgb([255, 215, 0]),
        Rgb([180, 50, 255]),
        Rgb([0, 240, 255]),
    ];

    for g in gaps {
        let (_, top) = map(0.0, f(g.base_height + g.width));
        let h = (f(g.width) * scale_y).max(1.0);
        draw_filled_rect_mut(
            &mut img,
            ImageRect::at(0, top as i32).of_size(width, h as u32),
            color_gap,
        );
    }

    for g in gaps {
        for (k, a) in g.assignments().iter().enumerate() {
            let trunk = f(g.realized_midy(a));
            for p in a.net.pins() {
                let (px, py) = map(f(p.x), f(p.y));
                let (_, ty) = map(f(p.x), trunk);
                draw_line_segment_mut(
                    &mut img,
                    (px as f32, py as f32),
                    (px as f32, ty as f32),
                    color_stub,
                );
            }

            let (x0, top) = map(f(a.net.minx()), f(g.base_height + a.max_height));
            let w = (f(a.net.horizontal_wirelength()) * scale_x).max(1.0);
            let h = (f(a.net.width()) * scale_y).max(1.0);
            draw_filled_rect_mut(
                &mut img,
                ImageRect::at(x0 as i32, top as i32).of_size(w as u32, h as u32),
                palette[k % palette.len()],
            );
        }
    }

    img.save(Path::new(filename))?;
    log::info!("Wrote assignment figure to {}", filename);
    Ok(())
}
