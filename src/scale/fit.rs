use crate::{
    foundation::core::Size,
    foundation::error::{ShowError, ShowResult},
};

/// Largest size with `content`'s aspect ratio that fits entirely inside `container`.
pub fn fit_within(content: Size, container: Size) -> Size {
    let k = (container.width / content.width).min(container.height / content.height);
    Size::new(content.width * k, content.height * k)
}

/// Scale factor mapping the authoring-time show size onto `viewport` (contain-fit).
///
/// `k` is the fitted height over the original height; since the aspect ratio is
/// preserved this equals the width ratio too.
pub fn compute_scale_factor(original: Size, viewport: Size) -> ShowResult<f64> {
    for (name, s) in [("original", original), ("viewport", viewport)] {
        if !(s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0) {
            return Err(ShowError::validation(format!(
                "{name} size must be finite and > 0 (got {}x{})",
                s.width, s.height
            )));
        }
    }
    let fitted = fit_within(original, viewport);
    Ok(fitted.height / original.height)
}
