use crate::consts::{DAYS_PER_YEAR, UM2_PER_MM2, UM3_PER_MM3};
use crate::{Idx2d, MorphError, MorphResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 样本标定信息: 像素尺寸, 植入时长, 切片尺寸.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// 各向同性像素尺寸, 单位为微米.
    pixel_size: f64,

    /// 植入至扫描经过的天数.
    num_days: u32,

    /// 每个水平切片的形状 (H, W). 同一样本的所有切片必须一致.
    img_size: Idx2d,
}

impl Calibration {
    /// 构建标定信息. 像素尺寸必须为正有限数, 切片尺寸不能为零.
    pub fn new(pixel_size: f64, num_days: u32, img_size: Idx2d) -> MorphResult<Self> {
        let ans = Self {
            pixel_size,
            num_days,
            img_size,
        };
        ans.validate()?;
        Ok(ans)
    }

    /// 检查标定信息是否合法.
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            return Err(MorphError::InvalidCalibration("pixel size must be positive"));
        }
        if self.img_size.0 == 0 || self.img_size.1 == 0 {
            return Err(MorphError::InvalidCalibration("image size must be non-empty"));
        }
        Ok(())
    }

    /// 像素尺寸 (微米).
    #[inline]
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// 植入天数.
    #[inline]
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// 切片形状 (H, W).
    #[inline]
    pub fn img_size(&self) -> Idx2d {
        self.img_size
    }

    /// 单个体素的体积, 单位为立方毫米.
    #[inline]
    pub fn voxel_volume_mm3(&self) -> f64 {
        self.pixel_size.powi(3) / UM3_PER_MM3
    }

    /// 单个体素面的面积, 单位为平方毫米.
    #[inline]
    pub fn pixel_area_mm2(&self) -> f64 {
        self.pixel_size.powi(2) / UM2_PER_MM2
    }

    /// 植入时长, 单位为年.
    #[inline]
    pub fn elapsed_years(&self) -> f64 {
        self.num_days as f64 / DAYS_PER_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::Calibration;
    use crate::MorphError;

    #[test]
    fn test_units() {
        let c = Calibration::new(10.0, 73, (4, 4)).unwrap();
        assert!((c.voxel_volume_mm3() - 1e-6).abs() < 1e-18);
        assert!((c.pixel_area_mm2() - 1e-4).abs() < 1e-16);
        assert!((c.elapsed_years() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_invalid() {
        for p in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Calibration::new(p, 1, (4, 4)),
                Err(MorphError::InvalidCalibration(_))
            ));
        }
        assert!(Calibration::new(1.0, 0, (0, 4)).is_err());
        assert!(Calibration::new(1.0, 0, (4, 4)).is_ok());
    }
}
