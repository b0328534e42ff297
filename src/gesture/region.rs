use super::{config::SurfaceGeometry, types::Region};

/// Maps a contact position to the zone it lands in. First match wins:
/// modifier corner, vertical strip, horizontal strip, middle button,
/// button row, move area.
pub fn classify(geometry: &SurfaceGeometry, x: i32, y: i32) -> Region {
    if x < 0 || y < 0 {
        return Region::Null;
    }

    let (x, y) = (i64::from(x), i64::from(y));
    let width = i64::from(geometry.width);
    let height = i64::from(geometry.height);
    let radius = i64::from(geometry.modifier_radius);

    if x * x + y * y < radius * radius {
        return Region::Modifier;
    }
    if x > width - i64::from(geometry.vert_scroll_width) {
        return Region::VertScroll;
    }
    if y < i64::from(geometry.horiz_scroll_width) {
        return Region::HorizScroll;
    }
    if in_middle_button(geometry, x, y) {
        return Region::MiddleBtn;
    }
    if y * 100 > height * i64::from(geometry.buttons_row_pct) {
        return if x > width / 2 {
            Region::RightBtn
        } else {
            Region::LeftBtn
        };
    }
    Region::Move
}

fn in_middle_button(geometry: &SurfaceGeometry, x: i64, y: i64) -> bool {
    let height = i64::from(geometry.height);
    let center = i64::from(geometry.width) / 2;
    let half = i64::from(geometry.middle_button_half_width);

    y * 100 >= height * i64::from(geometry.middle_button_top_pct)
        && y * 100 <= height * i64::from(geometry.middle_button_bottom_pct)
        && x > center - half
        && x <= center + half
}
