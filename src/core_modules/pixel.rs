// THEORY:
// The `Pixel` module is the most fundamental unit of the engine. It is a "dumb"
// data container for a single RGB color plus the one metric every other layer
// needs: the squared Euclidean distance between two colors.
//
// Key architectural principles:
// 1.  **RGB Only**: Equality, hashing and distance are defined over the three
//     color channels. Alpha lives in the raster buffer and is carried through
//     untouched; it never takes part in a comparison.
// 2.  **Integer Math**: Distances are computed in `u32` without a square root.
//     The maximum value (3 * 255^2) fits easily and keeps comparisons exact, so
//     tie-breaks never depend on floating point rounding.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Distance = u32;

    /// Number of color channels that take part in comparisons.
    pub const COLOR_CHANNELS: usize = 3;

    /// A single RGB color.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Color {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Color {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Reads the first three bytes of an RGB or RGBA pixel.
        #[inline]
        pub fn from_pixel_bytes(bytes: &[Byte]) -> Self {
            Self::new(bytes[0], bytes[1], bytes[2])
        }

        /// Writes this color over the first three bytes of a pixel, leaving any
        /// alpha byte in place.
        #[inline]
        pub fn write_to(&self, bytes: &mut [Byte]) {
            bytes[0] = self.red;
            bytes[1] = self.green;
            bytes[2] = self.blue;
        }

        /// Squared Euclidean distance in RGB space.
        #[inline]
        pub fn distance_squared(&self, other: &Color) -> Distance {
            let dr = self.red as i32 - other.red as i32;
            let dg = self.green as i32 - other.green as i32;
            let db = self.blue as i32 - other.blue as i32;
            (dr * dr + dg * dg + db * db) as Distance
        }

        pub fn as_array(&self) -> [Channel; COLOR_CHANNELS] {
            [self.red, self.green, self.blue]
        }
    }

    impl From<[Channel; 3]> for Color {
        fn from(rgb: [Channel; 3]) -> Self {
            Color::new(rgb[0], rgb[1], rgb[2])
        }
    }

    impl From<(Channel, Channel, Channel)> for Color {
        fn from((red, green, blue): (Channel, Channel, Channel)) -> Self {
            Color::new(red, green, blue)
        }
    }

    impl From<Color> for [Channel; 3] {
        fn from(color: Color) -> Self {
            color.as_array()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn distance_is_squared_euclidean() {
        let a = Color::new(10, 20, 30);
        let b = Color::new(13, 16, 30);
        assert_eq!(a.distance_squared(&b), 9 + 16);
        assert_eq!(b.distance_squared(&a), 25);
        assert_eq!(a.distance_squared(&a), 0);
    }

    #[test]
    fn extreme_distance_does_not_overflow() {
        let black = Color::new(0, 0, 0);
        let white = Color::new(255, 255, 255);
        assert_eq!(black.distance_squared(&white), 3 * 255 * 255);
    }

    #[test]
    fn writing_a_color_keeps_alpha() {
        let mut rgba = [1u8, 2, 3, 77];
        Color::new(9, 8, 7).write_to(&mut rgba);
        assert_eq!(rgba, [9, 8, 7, 77]);
        assert_eq!(Color::from_pixel_bytes(&rgba), Color::new(9, 8, 7));
    }
}
