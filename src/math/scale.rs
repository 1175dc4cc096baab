use crate::errors::DrawError;
use serde::{Deserialize, Serialize};

/// Closed numeric interval given by its two endpoints.
pub type Range = (f64, f64);

/// Linear mapping between a source range and a target range.
///
/// The mapping is `target = source * k + b`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleParts")]
pub struct Scale {
    k: f64,
    b: f64,
}

/// Unchecked wire form of a [`Scale`].
#[derive(Deserialize)]
struct ScaleParts {
    k: f64,
    b: f64,
}

impl TryFrom<ScaleParts> for Scale {
    type Error = DrawError;

    fn try_from(parts: ScaleParts) -> Result<Self, Self::Error> {
        if parts.k == 0.0 || !parts.k.is_finite() || !parts.b.is_finite() {
            return Err(DrawError::InvalidScale { k: parts.k, b: parts.b });
        }
        Ok(Scale { k: parts.k, b: parts.b })
    }
}

impl Scale {
    /// Builds the scale that maps `source.0 -> target.0` and `source.1 -> target.1`.
    ///
    /// Both ranges must have distinct endpoints. An empty target range would make
    /// the scale non-invertible, so it is rejected as well.
    pub fn generate(source: Range, target: Range) -> Result<Scale, DrawError> {
        if source.0 == source.1 {
            return Err(DrawError::DegenerateSourceRange);
        }
        if target.0 == target.1 {
            return Err(DrawError::DegenerateTargetRange);
        }

        let k = (target.0 - target.1) / (source.0 - source.1);
        let b = target.0 - k * source.0;
        Ok(Scale { k, b })
    }

    #[inline]
    pub fn k(&self) -> f64 {
        self.k
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn get_target(&self, source: f64) -> f64 {
        source * self.k + self.b
    }

    /// Inverse of [`get_target`](Self::get_target). Not finite if `k` is 0.
    /// Construction and deserialization reject that, so only a
    /// [`multiply`](Self::multiply) that underflows can get there.
    pub fn get_source(&self, target: f64) -> f64 {
        (target - self.b) / self.k
    }

    /// Scale equivalent to applying `self` first, then `other`.
    pub fn multiply(&self, other: &Scale) -> Scale {
        Scale {
            k: self.k * other.k,
            b: self.b * other.k + other.b,
        }
    }
}
