//! Subsampling factor planning.
//!
//! Before decoding pixels, the native image size is learned from a
//! bounds-only probe (header read, no pixel data). The factor is then chosen
//! so that the subsampled raster is as small as possible while still meeting
//! the fit policy:
//!
//! | scale policy          | FitInside                       | Crop                            |
//! |-----------------------|---------------------------------|---------------------------------|
//! | `PowerOfTwoSubsample` | halve while either half ≥ target | halve while both halves ≥ target |
//! | exact / stretched     | `max(w_scale, h_scale)`         | `min(w_scale, h_scale)`         |
//!
//! The factor is never below 1.

use std::sync::Arc;

use crate::codec::probe_dimensions;
use crate::error::DecodeError;
use crate::geometry::Dimensions;
use crate::locator::ImageLocator;
use crate::observe::{Event, ObservabilitySink};
use crate::options::{ExtraParams, FitPolicy, ScalePolicy};
use crate::source::ByteStreamSource;

/// Outcome of subsampling planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsamplePlan {
    /// Integer subsampling factor, at least 1.
    pub factor: u32,
    /// Native image size, if a probe was performed.
    pub native: Option<Dimensions>,
}

/// Compute the subsampling factor for a known native size.
///
/// `target` must have no zero side.
pub fn compute_factor(
    native: Dimensions,
    target: Dimensions,
    scale_policy: ScalePolicy,
    fit_policy: FitPolicy,
) -> u32 {
    let factor = match scale_policy {
        ScalePolicy::None => 1,
        ScalePolicy::PowerOfTwoSubsample => power_of_two_factor(native, target, fit_policy),
        ScalePolicy::ExactFit | ScalePolicy::ExactFitStretched => {
            let (width_scale, height_scale) = native.integer_ratio(target);
            match fit_policy {
                FitPolicy::FitInside => width_scale.max(height_scale),
                FitPolicy::Crop => width_scale.min(height_scale),
            }
        }
    };
    factor.max(1)
}

fn power_of_two_factor(native: Dimensions, target: Dimensions, fit_policy: FitPolicy) -> u32 {
    let (mut width, mut height) = (native.width, native.height);
    let mut factor = 1u32;
    loop {
        let width_fits = width / 2 >= target.width;
        let height_fits = height / 2 >= target.height;
        let keep_halving = match fit_policy {
            FitPolicy::FitInside => width_fits || height_fits,
            FitPolicy::Crop => width_fits && height_fits,
        };
        if !keep_halving || factor == 1 << 31 {
            break;
        }
        width /= 2;
        height /= 2;
        factor *= 2;
    }
    factor
}

/// Plans the subsampling factor for a locator by probing its bounds.
#[derive(Clone)]
pub struct SubsamplePlanner {
    source: Arc<dyn ByteStreamSource>,
    sink: Arc<dyn ObservabilitySink>,
}

impl SubsamplePlanner {
    pub fn new(source: Arc<dyn ByteStreamSource>, sink: Arc<dyn ObservabilitySink>) -> Self {
        Self { source, sink }
    }

    /// Probe `locator` and compute its subsampling factor for `target`.
    ///
    /// With [`ScalePolicy::None`] no stream is opened and the factor is 1.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidTarget` for a zero-sized target, and
    /// propagates stream and header errors from the probe.
    pub fn plan(
        &self,
        locator: &ImageLocator,
        extra: &ExtraParams,
        target: Dimensions,
        scale_policy: ScalePolicy,
        fit_policy: FitPolicy,
    ) -> Result<SubsamplePlan, DecodeError> {
        if target.is_empty() {
            return Err(DecodeError::InvalidTarget {
                width: target.width,
                height: target.height,
            });
        }
        if scale_policy == ScalePolicy::None {
            return Ok(SubsamplePlan {
                factor: 1,
                native: None,
            });
        }

        let stream = self.source.open_stream(locator, extra)?;
        let native = probe_dimensions(stream)?;
        let factor = compute_factor(native, target, scale_policy, fit_policy);

        self.sink.emit(&Event::Subsampling {
            native,
            target,
            factor,
        });
        Ok(SubsamplePlan {
            factor,
            native: Some(native),
        })
    }
}
