//! Panel layout.
//!
//! Positions are fractions of the screen so the layout works at any
//! resolution; control sizes are fixed in pixels.
//!
//! ```text
//! +------------------------------------------+
//! |                                          |
//! |   [ 0 ]                        [ 1 ]     |  row 0
//! |   [ 2 ]                        [ 3 ]     |  row 1
//! |   [ 4 ]                        [ 5 ]     |  row 2
//! |   [ 6 ]       [Settings]       [ 7 ]     |  row 3
//! +------------------------------------------+
//! ```

/// Toggle button size in pixels.
pub const TOGGLE_WIDTH: f32 = 200.0;
pub const TOGGLE_HEIGHT: f32 = 120.0;

/// Settings button size in pixels.
pub const SETTINGS_WIDTH: f32 = 180.0;
pub const SETTINGS_HEIGHT: f32 = 50.0;

/// Back button size on the settings screen.
pub const BACK_WIDTH: f32 = 200.0;
pub const BACK_HEIGHT: f32 = 50.0;

/// Left edge of the left column, as a fraction of the width.
const LEFT_COLUMN_X: f32 = 0.1;
/// Right edge of the right column, as a fraction of the width.
const RIGHT_COLUMN_X: f32 = 0.9;
/// Gap below the settings button, as a fraction of the height.
const SETTINGS_BOTTOM: f32 = 0.02;

/// Axis-aligned rectangle in screen pixels, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Splits off the top `fraction` of the height.
    pub fn split_top(&self, fraction: f32) -> (Rect, Rect) {
        let top_height = self.height * fraction;
        (
            Rect::new(self.x, self.y, self.width, top_height),
            Rect::new(self.x, self.y + top_height, self.width, self.height - top_height),
        )
    }
}

/// Column a toggle is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

/// Placement of one toggle control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub column: Column,
    pub rect: Rect,
}

/// Control under a touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Toggle(usize),
    Settings,
    Back,
}

/// Main screen layout for a given accessory count.
#[derive(Debug, Clone)]
pub struct PanelLayout {
    rows: usize,
    slots: Vec<Slot>,
    settings_button: Rect,
}

impl PanelLayout {
    /// Computes slot positions for `count` accessories.
    pub fn compute(count: usize, width: u32, height: u32) -> Self {
        let width = width as f32;
        let height = height as f32;

        let left_count = count.div_ceil(2);
        let right_count = count / 2;
        let rows = left_count.max(right_count);
        let spacing = 1.0 / (rows + 1) as f32;

        let slots = (0..count)
            .map(|index| {
                let row = index / 2;
                let column = if index % 2 == 0 {
                    Column::Left
                } else {
                    Column::Right
                };
                let x = match column {
                    Column::Left => LEFT_COLUMN_X * width,
                    Column::Right => RIGHT_COLUMN_X * width - TOGGLE_WIDTH,
                };
                let y = (row + 1) as f32 * spacing * height;
                Slot {
                    index,
                    column,
                    rect: Rect::new(x, y, TOGGLE_WIDTH, TOGGLE_HEIGHT),
                }
            })
            .collect();

        let settings_button = Rect::new(
            (width - SETTINGS_WIDTH) / 2.0,
            height - SETTINGS_BOTTOM * height - SETTINGS_HEIGHT,
            SETTINGS_WIDTH,
            SETTINGS_HEIGHT,
        );

        Self {
            rows,
            slots,
            settings_button,
        }
    }

    /// Number of occupied rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Vertical spacing between rows as a fraction of the height.
    pub fn spacing(&self) -> f32 {
        1.0 / (self.rows + 1) as f32
    }

    /// Placement of the toggle at `index`.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Accessory indices placed in a column, top to bottom.
    pub fn column(&self, column: Column) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.column == column)
            .map(|s| s.index)
            .collect()
    }

    pub fn settings_button(&self) -> Rect {
        self.settings_button
    }

    /// Finds the control under a point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Hit> {
        if let Some(slot) = self.slots.iter().find(|s| s.rect.contains(x, y)) {
            return Some(Hit::Toggle(slot.index));
        }
        if self.settings_button.contains(x, y) {
            return Some(Hit::Settings);
        }
        None
    }
}

/// Settings screen layout: a title area above a bottom-centre back button.
#[derive(Debug, Clone)]
pub struct SettingsLayout {
    title: Rect,
    back_button: Rect,
}

impl SettingsLayout {
    pub fn compute(width: u32, height: u32) -> Self {
        let width = width as f32;
        let height = height as f32;
        Self {
            title: Rect::new(0.0, 0.0, width, height - BACK_HEIGHT),
            back_button: Rect::new(
                (width - BACK_WIDTH) / 2.0,
                height - BACK_HEIGHT,
                BACK_WIDTH,
                BACK_HEIGHT,
            ),
        }
    }

    pub fn title(&self) -> Rect {
        self.title
    }

    pub fn back_button(&self) -> Rect {
        self.back_button
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<Hit> {
        self.back_button.contains(x, y).then_some(Hit::Back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_accessories() {
        let layout = PanelLayout::compute(8, 1024, 600);
        assert_eq!(layout.column(Column::Left), vec![0, 2, 4, 6]);
        assert_eq!(layout.column(Column::Right), vec![1, 3, 5, 7]);
        assert_eq!(layout.rows(), 4);
        assert!((layout.spacing() - 0.2).abs() < 1e-6);

        let tops: Vec<f32> = layout
            .column(Column::Left)
            .iter()
            .map(|&i| layout.slot(i).unwrap().rect.y)
            .collect();
        for (top, expected) in tops.iter().zip([120.0, 240.0, 360.0, 480.0]) {
            assert!((top - expected).abs() < 1e-3);
        }
        for pair in tops.windows(2) {
            assert!((pair[1] - pair[0] - 120.0).abs() < 1e-3);
        }

        // Same row for each left/right pair
        for row in 0..4 {
            let left = layout.slot(row * 2).unwrap();
            let right = layout.slot(row * 2 + 1).unwrap();
            assert_eq!(left.rect.y, right.rect.y);
        }
    }

    #[test]
    fn test_column_edges() {
        let layout = PanelLayout::compute(2, 1000, 600);
        let left = layout.slot(0).unwrap().rect;
        let right = layout.slot(1).unwrap().rect;
        assert!((left.x - 100.0).abs() < 1e-3);
        assert!((right.right() - 900.0).abs() < 1e-3);
    }

    #[test]
    fn test_odd_count() {
        let layout = PanelLayout::compute(3, 1024, 600);
        assert_eq!(layout.column(Column::Left), vec![0, 2]);
        assert_eq!(layout.column(Column::Right), vec![1]);
        assert_eq!(layout.rows(), 2);
        assert!((layout.slot(2).unwrap().rect.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_layout() {
        let layout = PanelLayout::compute(0, 1024, 600);
        assert!(layout.slot(0).is_none());
        assert_eq!(layout.rows(), 0);
        let settings = layout.settings_button();
        assert_eq!(
            layout.hit_test(settings.x + 1.0, settings.y + 1.0),
            Some(Hit::Settings)
        );
    }

    #[test]
    fn test_settings_button_position() {
        let layout = PanelLayout::compute(8, 1024, 600);
        let button = layout.settings_button();
        assert_eq!(button.x, 422.0);
        assert!((button.bottom() - 588.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_test() {
        let layout = PanelLayout::compute(8, 1024, 600);
        let slot = layout.slot(5).unwrap().rect;
        assert_eq!(
            layout.hit_test(slot.x + 10.0, slot.y + 10.0),
            Some(Hit::Toggle(5))
        );
        assert_eq!(layout.hit_test(5.0, 5.0), None);
        assert_eq!(layout.hit_test(slot.right(), slot.y + 10.0), None);
    }

    #[test]
    fn test_settings_layout() {
        let layout = SettingsLayout::compute(1024, 600);
        let back = layout.back_button();
        assert_eq!(back.x, 412.0);
        assert_eq!(back.bottom(), 600.0);
        assert_eq!(layout.hit_test(back.x + 5.0, back.y + 5.0), Some(Hit::Back));
        assert_eq!(layout.hit_test(10.0, 10.0), None);
    }

    #[test]
    fn test_rect_split_top() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let (top, bottom) = rect.split_top(0.7);
        assert!((top.height - 70.0).abs() < 1e-3);
        assert!((bottom.y - 70.0).abs() < 1e-3);
        assert!((bottom.height - 30.0).abs() < 1e-3);
    }
}
