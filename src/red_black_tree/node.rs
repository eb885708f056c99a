/// The colour of a node in a red black tree.
///
/// Removal temporarily leaves a double black node behind, so a colour counts units of
/// blackness instead of being a flag: red is zero, black is one and double black is two.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Color(i8);

impl Color {
    pub const RED: Color = Color(0);
    pub const BLACK: Color = Color(1);

    pub fn is_red(self) -> bool {
        self == Color::RED
    }

    pub fn is_black(self) -> bool {
        self == Color::BLACK
    }

    /// Adds one unit of blackness.
    pub fn darken(&mut self) {
        self.0 += 1;
    }

    /// Removes one unit of blackness.
    pub fn lighten(&mut self) {
        self.0 -= 1;
    }

    /// Adds the blackness of `other`, as when a spliced node hands its colour to its child.
    pub fn absorb(&mut self, other: Color) {
        self.0 += other.0;
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}
