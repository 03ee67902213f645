//! Structures for handling components within a composite glyph
use bitflags::bitflags;
use kurbo::Affine;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serializer,
};

bitflags! {
    /// Flags used when serializing/deserializing the component.
    ///
    /// These are computed automatically, so you don't need to worry about them.
    pub struct ComponentFlags: u16 {
        ///  If this is set, the arguments are 16-bit (uint16 or int16); otherwise, they are bytes (uint8 or int8).
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        ///  If this is set, the arguments are signed xy values; otherwise, they are unsigned point numbers.
        const ARGS_ARE_XY_VALUES = 0x0002;
        /// For the xy values if the preceding is true.
        const ROUND_XY_TO_GRID = 0x0004;
        /// The transform matrix is a simple linear scale.
        const WE_HAVE_A_SCALE = 0x0008;
        /// Indicates at least one more component after this one.
        const MORE_COMPONENTS = 0x0020;
        /// The transform matrix is a scaling transform with independent X and Y scales.
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        /// The transform matrix is a full two-by-two matrix with scaleXY and scaleYX values.
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        /// TrueType instructions follow this component.
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        /// The metrics of the composite glyph should be the same as the metrics of this component.
        const USE_MY_METRICS = 0x0200;
        /// The contours of the components overlap.
        const OVERLAP_COMPOUND = 0x0400;
        /// The component's offset should be scaled.
        const SCALED_COMPONENT_OFFSET = 0x0800;
        /// The component's offset should not be scaled.
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// A high-level representation of a component within a glyph
#[derive(Debug, PartialEq, Clone)]
pub struct Component {
    /// The glyph ID that this component references.
    pub glyph_index: uint16,
    /// An affine transformation applied to the component's contours.
    pub transformation: Affine,
    /// Alternate, and rarely used, method of positioning components using contour point numbers.
    pub match_points: Option<(uint16, uint16)>,
    /// Flags.
    /// Most of these are calculated automatically on serialization. Those which can be
    /// meaningfully manually set are `ROUND_XY_TO_GRID`, `USE_MY_METRICS`,
    /// `SCALED_COMPONENT_OFFSET`, `UNSCALED_COMPONENT_OFFSET` and `OVERLAP_COMPOUND`.
    pub flags: ComponentFlags,
}

fn f2dot14_to_f64(raw: int16) -> f64 {
    raw as f64 / 16384.0
}

fn f64_to_f2dot14(value: f64) -> int16 {
    (value * 16384.0).round().max(i16::MIN as f64).min(i16::MAX as f64) as int16
}

fn read_f2dot14(c: &mut ReaderContext) -> Result<f64, DeserializationError> {
    let raw: int16 = c.de()?;
    Ok(f2dot14_to_f64(raw))
}

impl Component {
    /// Recompute the flags prior to serialization. `more` should be true if this
    /// is not the final component in a glyph; `instructions` should be true if
    /// there are TrueType instructions in the glyph.
    pub fn recompute_flags(&self, more: bool, instructions: bool) -> ComponentFlags {
        let mut flags = self.flags
            & (ComponentFlags::ROUND_XY_TO_GRID
                | ComponentFlags::USE_MY_METRICS
                | ComponentFlags::SCALED_COMPONENT_OFFSET
                | ComponentFlags::UNSCALED_COMPONENT_OFFSET
                | ComponentFlags::OVERLAP_COMPOUND);
        if more {
            flags |= ComponentFlags::MORE_COMPONENTS;
        } else if instructions {
            flags |= ComponentFlags::WE_HAVE_INSTRUCTIONS;
        }
        let [x_scale, scale01, scale10, scale_y, translate_x, translate_y] =
            self.transformation.as_coeffs();
        if let Some((x, y)) = self.match_points {
            if x > 255 || y > 255 {
                flags |= ComponentFlags::ARG_1_AND_2_ARE_WORDS;
            }
        } else {
            flags |= ComponentFlags::ARGS_ARE_XY_VALUES;
            let (x, y) = (translate_x.round(), translate_y.round());
            if !((-128.0..=127.0).contains(&x) && (-128.0..=127.0).contains(&y)) {
                flags |= ComponentFlags::ARG_1_AND_2_ARE_WORDS;
            }
        }
        if scale01 != 0.0 || scale10 != 0.0 {
            flags |= ComponentFlags::WE_HAVE_A_TWO_BY_TWO;
        } else if (x_scale - scale_y).abs() > f64::EPSILON {
            flags |= ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE;
        } else if (x_scale - 1.0).abs() > f64::EPSILON {
            flags |= ComponentFlags::WE_HAVE_A_SCALE;
        }
        flags
    }

    /// Writes this component record with the given (recomputed) flags.
    pub fn write(&self, flags: ComponentFlags, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(flags.bits())?;
        data.put(self.glyph_index)?;
        let [x_scale, scale01, scale10, scale_y, translate_x, translate_y] =
            self.transformation.as_coeffs();
        let (arg1, arg2) = match self.match_points {
            Some((x, y)) if !flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) => {
                (x as i32, y as i32)
            }
            _ => (translate_x.round() as i32, translate_y.round() as i32),
        };
        if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
            if flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) {
                data.put(arg1 as int16)?;
                data.put(arg2 as int16)?;
            } else {
                data.put(arg1 as uint16)?;
                data.put(arg2 as uint16)?;
            }
        } else if flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) {
            data.put(arg1 as i8)?;
            data.put(arg2 as i8)?;
        } else {
            data.put(arg1 as u8)?;
            data.put(arg2 as u8)?;
        }
        if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
            data.put(f64_to_f2dot14(x_scale))?;
            data.put(f64_to_f2dot14(scale01))?;
            data.put(f64_to_f2dot14(scale10))?;
            data.put(f64_to_f2dot14(scale_y))?;
        } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            data.put(f64_to_f2dot14(x_scale))?;
            data.put(f64_to_f2dot14(scale_y))?;
        } else if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
            data.put(f64_to_f2dot14(x_scale))?;
        }
        Ok(())
    }
}

impl Deserialize for Component {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let raw_flags: uint16 = c.de()?;
        let flags = ComponentFlags::from_bits_truncate(raw_flags);
        let glyph_index: uint16 = c.de()?;
        let mut match_points: Option<(uint16, uint16)> = None;
        let mut x_offset: i16 = 0;
        let mut y_offset: i16 = 0;
        if flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) {
            // signed xy values
            if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
                x_offset = c.de()?;
                y_offset = c.de()?;
            } else {
                let x_off: i8 = c.de()?;
                let y_off: i8 = c.de()?;
                x_offset = x_off.into();
                y_offset = y_off.into();
            }
        } else if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
            // unsigned point numbers
            let p1: u16 = c.de()?;
            let p2: u16 = c.de()?;
            match_points = Some((p1, p2));
        } else {
            let p1: u8 = c.de()?;
            let p2: u8 = c.de()?;
            match_points = Some((p1.into(), p2.into()));
        }
        let mut x_scale = 1.0_f64;
        let mut scale01 = 0.0_f64;
        let mut scale10 = 0.0_f64;
        let mut y_scale = 1.0_f64;
        if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
            x_scale = read_f2dot14(c)?;
            y_scale = x_scale;
        } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            x_scale = read_f2dot14(c)?;
            y_scale = read_f2dot14(c)?;
        } else if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
            x_scale = read_f2dot14(c)?;
            scale01 = read_f2dot14(c)?;
            scale10 = read_f2dot14(c)?;
            y_scale = read_f2dot14(c)?;
        }
        let transformation = Affine::new([
            x_scale,
            scale01,
            scale10,
            y_scale,
            x_offset.into(),
            y_offset.into(),
        ]);

        Ok(Component {
            glyph_index,
            transformation,
            match_points,
            flags,
        })
    }
}
