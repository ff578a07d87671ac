pub fn circle_overlaps_rect(cx: f32, cy: f32, r: f32, rx: f32, ry: f32, rw: f32, rh: f32) -> bool {
    let nearest_x = cx.clamp(rx, rx + rw);
    let nearest_y = cy.clamp(ry, ry + rh);
    let dx = cx - nearest_x;
    let dy = cy - nearest_y;
    dx * dx + dy * dy <= r * r
}

pub fn circle_in_bounds(cx: f32, cy: f32, r: f32, width: f32, height: f32) -> bool {
    cx - r >= 0.0 && cy - r >= 0.0 && cx + r <= width && cy + r <= height
}
