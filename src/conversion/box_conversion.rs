use crate::error::{Result, VisionError};

/// `(x1, y1, x2, y2)`: left, top, right, bottom.
pub type Xyxy = (f64, f64, f64, f64);

/// `(cx, cy, w, h)`: center point, then width and height.
pub type Xywh = (f64, f64, f64, f64);

pub(crate) fn check_scale((height, width): (u32, u32)) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(VisionError::InvalidScale { height, width });
    }
    Ok(())
}

/// Converts pixel coordinates into fractions of the image size.
///
/// `scale` is `(height, width)`, the order image shapes are usually reported in.
pub fn pixel_to_normalized(xyxy: Xyxy, scale: (u32, u32)) -> Result<Xyxy> {
    check_scale(scale)?;
    let (height, width) = (scale.0 as f64, scale.1 as f64);
    Ok((xyxy.0 / width, xyxy.1 / height, xyxy.2 / width, xyxy.3 / height))
}

/// Inverse of `pixel_to_normalized`, rounded to the nearest whole pixel.
///
/// Going pixel -> normalized -> pixel gives back the original box to within one pixel per
/// coordinate; it is exact for boxes that were already on whole pixels.
pub fn normalized_to_pixel(xyxyn: Xyxy, scale: (u32, u32)) -> Result<(i64, i64, i64, i64)> {
    check_scale(scale)?;
    let (height, width) = (scale.0 as f64, scale.1 as f64);
    Ok((
        (xyxyn.0 * width).round() as i64,
        (xyxyn.1 * height).round() as i64,
        (xyxyn.2 * width).round() as i64,
        (xyxyn.3 * height).round() as i64,
    ))
}

pub fn corner_to_center_form((x1, y1, x2, y2): Xyxy) -> Xywh {
    let w = x2 - x1;
    let h = y2 - y1;
    (x1 + w / 2.0, y1 + h / 2.0, w, h)
}

pub fn center_to_corner_form((cx, cy, w, h): Xywh) -> Xyxy {
    (cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
}
