use std::convert::TryInto;

use otspec::types::*;
use otspec::{DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer};

/// The 'hmtx' OpenType tag.
pub const TAG: Tag = Tag::new(b"hmtx");

/// A single horizontal metric
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[allow(non_snake_case)]
pub struct Metric {
    /// The full horizontal advance width of the glyph
    pub advanceWidth: uint16,
    /// The left side bearing of the glyph
    pub lsb: int16,
}

/// The horizontal metrics table
#[derive(Clone, Debug, PartialEq, Default)]
#[allow(non_camel_case_types)]
pub struct hmtx {
    /// The list of metrics, corresponding to the glyph order
    pub metrics: Vec<Metric>,
}

impl hmtx {
    /// The number of horizontal metrics (to be stored in the `hhea` table)
    ///
    /// Trailing glyphs sharing the last advance width are stored as bare
    /// left side bearings.
    pub fn number_of_hmetrics(&self) -> uint16 {
        let last = match self.metrics.last() {
            Some(metric) => metric.advanceWidth,
            None => return 0,
        };
        let dupe_widths = self
            .metrics
            .iter()
            .rev()
            .skip(1)
            .take_while(|m| m.advanceWidth == last)
            .count();
        (self.metrics.len() - dupe_widths)
            .try_into()
            .unwrap_or(uint16::MAX)
    }

    /// Serialize the horizontal metrics table to a binary vector and a corresponding
    /// number of horizontal metrics (to be stored in the `hhea` table)
    pub fn to_bytes(&self) -> Result<(Vec<u8>, uint16), SerializationError> {
        let number_of_hmetrics = self.number_of_hmetrics();
        let mut bytes: Vec<u8> = Vec::with_capacity(self.metrics.len() * 4);
        for (i, metric) in self.metrics.iter().enumerate() {
            if i < number_of_hmetrics as usize {
                bytes.put(metric.advanceWidth)?;
            }
            bytes.put(metric.lsb)?;
        }
        Ok((bytes, number_of_hmetrics))
    }
}

/// Deserializes a Horizontal Metrics Table given a binary vector, the
/// `numberOfHMetrics` field of the `hhea` table and the glyph count.
pub fn from_bytes(
    c: &mut ReaderContext,
    number_of_h_metrics: uint16,
    num_glyphs: uint16,
) -> Result<hmtx, DeserializationError> {
    if number_of_h_metrics == 0 && num_glyphs > 0 {
        return Err(DeserializationError(
            "hhea.numberOfHMetrics must be at least one".to_string(),
        ));
    }
    let mut res = hmtx {
        metrics: Vec::with_capacity(num_glyphs as usize),
    };
    for _ in 0..number_of_h_metrics.min(num_glyphs) {
        res.metrics.push(Metric {
            advanceWidth: c.de()?,
            lsb: c.de()?,
        });
    }
    let last = res.metrics.last().map(|m| m.advanceWidth).unwrap_or(0);
    while res.metrics.len() < num_glyphs as usize {
        // Some fonts truncate the trailing lsb array; treat missing ones as zero.
        let lsb: int16 = if c.remaining() >= 2 { c.de()? } else { 0 };
        res.metrics.push(Metric {
            advanceWidth: last,
            lsb,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmtx_de_16bit() {
        let mut binary_hmtx = ReaderContext::new(vec![
            0x02, 0xf4, 0x00, 0x05, 0x02, 0x98, 0x00, 0x1e, 0x00, 0xc8, 0x00, 0x00, 0x00, 0x1d,
        ]);
        let fhmtx = from_bytes(&mut binary_hmtx, 3, 4).unwrap();
        assert_eq!(
            fhmtx.metrics,
            vec![
                Metric {
                    advanceWidth: 756,
                    lsb: 5
                },
                Metric {
                    advanceWidth: 664,
                    lsb: 30
                },
                Metric {
                    advanceWidth: 200,
                    lsb: 0
                },
                Metric {
                    advanceWidth: 200,
                    lsb: 29
                },
            ]
        );
    }

    #[test]
    fn hmtx_ser_folds_trailing_advances() {
        let fhmtx = hmtx {
            metrics: vec![
                Metric {
                    advanceWidth: 500,
                    lsb: 0,
                },
                Metric {
                    advanceWidth: 320,
                    lsb: 64,
                },
                Metric {
                    advanceWidth: 320,
                    lsb: 128,
                },
                Metric {
                    advanceWidth: 320,
                    lsb: -64,
                },
            ],
        };
        let (bytes, num) = fhmtx.to_bytes().unwrap();
        assert_eq!(num, 2);
        assert_eq!(
            bytes,
            vec![0x01, 0xf4, 0x00, 0x00, 0x01, 0x40, 0x00, 0x40, 0x00, 0x80, 0xff, 0xc0]
        );
        let reread = from_bytes(&mut ReaderContext::new(bytes), num, 4).unwrap();
        assert_eq!(reread, fhmtx);
    }

    #[test]
    fn hmtx_zero_metrics_is_an_error() {
        let mut c = ReaderContext::new(vec![0x00, 0x00]);
        assert!(from_bytes(&mut c, 0, 1).is_err());
    }
}
