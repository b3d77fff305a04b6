//! 单个样本的形态学定量.
//!
//! [`Sample`] 持有一对同形状的体数据 (参考扫描与目标扫描), 标签字典和标定信息,
//! 构建后不再修改. 所有派生量都是纯函数, 中间体数据 (过滤, 掩膜) 总是新分配的,
//! 从不改写样本持有的原始数据.

use crate::consts::DEFAULT_ROI_SIZE_UM;
use crate::error::checked_div;
use crate::io::{self, LoadError};
use crate::label::LabelDictionary;
use crate::morph::RoiMask;
use crate::{LabelVolume, MorphError, MorphResult};

mod calibration;
mod config;
mod series;

pub use calibration::Calibration;
pub use config::{SampleConfig, SampleConfigBuilder};
pub use series::{SliceRecord, SliceSeries, SliceSeriesIter};

/// 降解速率 `(v_i - v_res) / (a_i * t)`, 单位 mm/年.
///
/// `v_i`, `v_res` 单位为 mm³, `a_i` 为 mm², `t` 为年. `a_i * t` 为零时返回
/// `Err(DivisionByZero)`.
#[inline]
pub fn degradation_rate_of(v_i: f64, v_res: f64, a_i: f64, t: f64) -> MorphResult<f64> {
    checked_div(v_i - v_res, a_i * t, "initial area times elapsed time")
}

/// 降解相关的全部中间量.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DegradationReport {
    /// 初始体积 (mm³).
    pub initial_volume: f64,
    /// 残余体积 (mm³).
    pub residual_volume: f64,
    /// 初始暴露面积 (mm²).
    pub initial_area: f64,
    /// 植入时长 (年).
    pub elapsed_time: f64,
    /// 体积损失百分比.
    pub volume_loss_percent: f64,
    /// 降解速率 (mm/年).
    pub degradation_rate: f64,
}

/// 一个样本的全部标量结果. 每一项独立计算, 某一项失败不影响其它项.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSummary {
    /// 样本名称.
    pub name: String,
    /// 初始体积 (mm³).
    pub initial_volume: f64,
    /// 残余体积 (mm³).
    pub residual_volume: f64,
    /// 初始暴露面积 (mm²).
    pub initial_area: MorphResult<f64>,
    /// 体积损失百分比.
    pub volume_loss_percent: MorphResult<f64>,
    /// 降解速率 (mm/年).
    pub degradation_rate: MorphResult<f64>,
    /// 骨-植入物接触率.
    pub bone_to_implant_contact: MorphResult<f64>,
    /// ROI 内骨体积分数.
    pub bone_volume_to_total_volume: MorphResult<f64>,
}

/// 一个已加载并校验过的样本.
#[derive(Clone, Debug)]
pub struct Sample {
    name: String,
    reference: LabelVolume,
    target: LabelVolume,
    labels: LabelDictionary,
    calibration: Calibration,
}

impl Sample {
    /// 由内存中的体数据构建样本.
    ///
    /// 检查: 标签字典与标定信息合法, 参考与目标形状一致, 切片形状等于 `img_size`,
    /// 两个体数据中的每个值都是字典中的编码.
    pub fn new(
        name: impl Into<String>,
        reference: LabelVolume,
        target: LabelVolume,
        labels: LabelDictionary,
        calibration: Calibration,
    ) -> MorphResult<Self> {
        labels.validate()?;
        calibration.validate()?;
        if reference.len_z() == 0 {
            return Err(MorphError::EmptyInput);
        }
        if reference.shape() != target.shape() {
            return Err(MorphError::ShapeMismatch {
                expected: reference.shape(),
                found: target.shape(),
            });
        }
        if reference.slice_shape() != calibration.img_size() {
            return Err(MorphError::SliceShapeMismatch {
                expected: calibration.img_size(),
                found: reference.slice_shape(),
            });
        }
        reference.validate_against(&labels)?;
        target.validate_against(&labels)?;

        let ans = Self {
            name: name.into(),
            reference,
            target,
            labels,
            calibration,
        };
        log::debug!("sample `{}`: {:?} voxels per scan", ans.name, ans.reference.shape());
        Ok(ans)
    }

    /// 按配置加载样本: 读入两组图像, 按需平滑目标扫描, 然后校验.
    ///
    /// 读取失败与形态学校验失败分别对应 [`LoadError`] 的不同变体.
    pub fn load(config: &SampleConfig) -> Result<Self, LoadError> {
        config.validate()?;
        log::info!("loading sample `{}`", config.name);
        let reference = io::load_volume(&config.reference)?;
        let mut target = io::load_volume(&config.target)?;
        if let Some(labels) = &config.smooth {
            target = io::smooth(&target, labels);
        }
        Ok(Self::new(
            config.name.clone(),
            reference,
            target,
            config.labels,
            config.calibration()?,
        )?)
    }

    /// 样本名称.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 参考扫描.
    #[inline]
    pub fn reference(&self) -> &LabelVolume {
        &self.reference
    }

    /// 目标扫描.
    #[inline]
    pub fn target(&self) -> &LabelVolume {
        &self.target
    }

    /// 标签字典.
    #[inline]
    pub fn labels(&self) -> &LabelDictionary {
        &self.labels
    }

    /// 标定信息.
    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// 水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.reference.len_z()
    }

    /// 初始体积: 参考扫描中参考骨钉体素个数乘以体素体积 (mm³).
    pub fn initial_volume(&self) -> f64 {
        self.reference.count(self.labels.screw_ref()) as f64 * self.calibration.voxel_volume_mm3()
    }

    /// 残余体积: 目标扫描中标记为骨钉的体素个数乘以体素体积 (mm³).
    /// 降解层不计入.
    pub fn residual_volume(&self) -> f64 {
        self.target.count(self.labels.screw()) as f64 * self.calibration.voxel_volume_mm3()
    }

    /// 初始暴露面积: 参考扫描中背景与参考骨钉的接触面数乘以像素面积 (mm²).
    pub fn initial_area(&self) -> MorphResult<f64> {
        let faces = self
            .reference
            .contact(self.labels.background(), self.labels.screw_ref())?;
        Ok(faces as f64 * self.calibration.pixel_area_mm2())
    }

    /// 植入时长 (年).
    #[inline]
    pub fn elapsed_time(&self) -> f64 {
        self.calibration.elapsed_years()
    }

    /// 体积损失 `v_i - v_res` (mm³).
    #[inline]
    pub fn volume_loss(&self) -> f64 {
        self.initial_volume() - self.residual_volume()
    }

    /// 体积损失百分比 `(v_i - v_res) / v_i * 100`.
    pub fn volume_loss_percent(&self) -> MorphResult<f64> {
        let v_i = self.initial_volume();
        Ok(checked_div(v_i - self.residual_volume(), v_i, "initial volume")? * 100.0)
    }

    /// 降解速率 (mm/年).
    pub fn degradation_rate(&self) -> MorphResult<f64> {
        degradation_rate_of(
            self.initial_volume(),
            self.residual_volume(),
            self.initial_area()?,
            self.elapsed_time(),
        )
    }

    /// 一次算出全部降解相关量.
    pub fn degradation(&self) -> MorphResult<DegradationReport> {
        let initial_volume = self.initial_volume();
        let residual_volume = self.residual_volume();
        let initial_area = self.initial_area()?;
        let elapsed_time = self.elapsed_time();
        let volume_loss = initial_volume - residual_volume;
        Ok(DegradationReport {
            initial_volume,
            residual_volume,
            initial_area,
            elapsed_time,
            volume_loss_percent: checked_div(volume_loss, initial_volume, "initial volume")?
                * 100.0,
            degradation_rate: degradation_rate_of(
                initial_volume,
                residual_volume,
                initial_area,
                elapsed_time,
            )?,
        })
    }

    /// 以参考扫描中的非背景体素为参考结构构建 ROI 掩膜.
    fn roi_mask(&self, roi_size: f64) -> MorphResult<RoiMask> {
        let bg = self.labels.background();
        RoiMask::build_with(
            &self.reference,
            roi_size,
            self.calibration.pixel_size(),
            |p| p != bg,
        )
    }

    /// 骨-植入物接触率 (BIC), ROI 半径为 [`DEFAULT_ROI_SIZE_UM`].
    #[inline]
    pub fn bone_to_implant_contact(&self) -> MorphResult<f64> {
        self.bone_to_implant_contact_with(DEFAULT_ROI_SIZE_UM)
    }

    /// 以 `roi_size` (微米) 为 ROI 半径计算骨-植入物接触率.
    ///
    /// 构建两个派生体数据: "骨钉" (骨钉与降解层, 降解层并入骨钉) 和
    /// "骨钉 + 骨", ROI 之外均填充背景. 结果为
    /// `contact(骨钉 + 骨, 骨钉, 骨) / contact(骨钉, 骨钉, 背景)`.
    pub fn bone_to_implant_contact_with(&self, roi_size: f64) -> MorphResult<f64> {
        let l = &self.labels;
        let (bg, screw) = (l.background(), l.screw());
        let mask = self.roi_mask(roi_size)?;

        let screw_vol = self
            .target
            .filter_or(&[screw, l.degradation_layer()], bg)
            .remap(l.degradation_layer(), screw);
        let screw_bone = self.target.filter_or(&[screw, l.bone()], bg);
        let screw_vol = mask.apply(&screw_vol, bg)?;
        let screw_bone = mask.apply(&screw_bone, bg)?;

        let bone_contact = screw_bone.contact(screw, l.bone())?;
        let exposed = screw_vol.contact(screw, bg)?;
        log::debug!("sample `{}`: bic {bone_contact} / {exposed}", self.name);
        checked_div(bone_contact as f64, exposed as f64, "implant-background contact")
    }

    /// ROI 内骨体积分数 (BV/TV). ROI 之外的体素填充为骨钉, 因此不计入任何一项.
    ///
    /// `bv_tv = v_bone / (v_bone + v_background)`, 总在 `[0, 1]` 之内.
    pub fn bone_volume_to_total_volume(&self, roi_size: f64) -> MorphResult<f64> {
        let l = &self.labels;
        let masked = self.roi_mask(roi_size)?.apply(&self.target, l.screw())?;
        let v_bone = masked.count(l.bone());
        let v_roi = v_bone + masked.count(l.background());
        checked_div(v_bone as f64, v_roi as f64, "roi voxel count")
    }

    /// 计算第 `z` 层的降解统计. 错误会附带层号.
    pub fn slice_record(&self, z: usize) -> MorphResult<SliceRecord> {
        let l = &self.labels;
        let c = &self.calibration;
        let (r, t) = (self.reference.slice_at(z), self.target.slice_at(z));
        let v_i = r.count(l.screw_ref()) as f64 * c.voxel_volume_mm3();
        let v_res = t.count(l.screw()) as f64 * c.voxel_volume_mm3();
        let surface_area = r
            .contact(l.background(), l.screw_ref())
            .map_err(|e| e.at_slice(z))? as f64
            * c.pixel_area_mm2();
        let degradation_rate = degradation_rate_of(v_i, v_res, surface_area, c.elapsed_years())
            .map_err(|e| e.at_slice(z))?;
        Ok(SliceRecord {
            index: z,
            surface_area,
            volume_loss: v_i - v_res,
            degradation_rate,
        })
    }

    /// 逐层惰性计算降解统计.
    #[inline]
    pub fn slice_series_iter(&self) -> SliceSeriesIter<'_> {
        SliceSeriesIter::new(self)
    }

    /// 逐层计算降解统计. 任意一层失败则整体失败.
    pub fn slice_series(&self) -> MorphResult<SliceSeries> {
        self.slice_series_iter().collect()
    }

    /// 计算全部标量结果. `roi_size` 为 BV/TV 的 ROI 半径 (微米).
    pub fn summary(&self, roi_size: f64) -> SampleSummary {
        SampleSummary {
            name: self.name.clone(),
            initial_volume: self.initial_volume(),
            residual_volume: self.residual_volume(),
            initial_area: self.initial_area(),
            volume_loss_percent: self.volume_loss_percent(),
            degradation_rate: self.degradation_rate(),
            bone_to_implant_contact: self.bone_to_implant_contact(),
            bone_volume_to_total_volume: self.bone_volume_to_total_volume(roi_size),
        }
    }
}

#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// 并发操作部分
#[cfg(feature = "rayon")]
impl Sample {
    /// 借助 `rayon`, 按层并行计算降解统计. 结果与 [`Self::slice_series`] 完全一致.
    pub fn par_slice_series(&self) -> MorphResult<SliceSeries> {
        let records = (0..self.len_z())
            .into_par_iter()
            .map(|z| self.slice_record(z))
            .collect::<MorphResult<Vec<_>>>()?;
        Ok(records.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{degradation_rate_of, Calibration, Sample, SampleConfig};
    use crate::io::LoadError;
    use crate::label::LabelDictionary;
    use crate::{ImgWriteRaw, LabelVolume, MorphError, OwnedLabelSlice};
    use ndarray::{s, Array2, Array3};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-12)
    }

    /// 3x9x9 的样本. 参考扫描中 `[3..6, 3..6]` 为参考骨钉;
    /// 目标扫描中同一区域为骨钉, 但 `(z, 3, 3)` 为降解层, 其上方一行 `(z, 2, 3..6)` 为骨.
    fn block_sample() -> Sample {
        // 重复初始化会失败, 忽略即可.
        let _ = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init();

        let mut reference = Array3::zeros((3, 9, 9));
        reference.slice_mut(s![.., 3..6, 3..6]).fill(2u8);
        let mut target = Array3::zeros((3, 9, 9));
        target.slice_mut(s![.., 3..6, 3..6]).fill(1u8);
        target.slice_mut(s![.., 3, 3]).fill(3u8);
        target.slice_mut(s![.., 2, 3..6]).fill(4u8);
        Sample::new(
            "block",
            LabelVolume::new(reference),
            LabelVolume::new(target),
            LabelDictionary::default(),
            Calibration::new(10.0, 73, (9, 9)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_run_rate() {
        let (v_i, v_res, a_i, t) = (
            1.0975536779719681,
            0.57570291379712,
            58.9247225984,
            28.0 / 365.0,
        );
        let rate = degradation_rate_of(v_i, v_res, a_i, t).unwrap();
        assert!((rate - (v_i - v_res) / (a_i * t)).abs() < 1e-6);
        assert!((rate - 0.11545).abs() < 1e-4);
        assert_eq!(
            degradation_rate_of(v_i, v_res, 0.0, t),
            Err(MorphError::DivisionByZero("initial area times elapsed time"))
        );
    }

    #[test]
    fn test_single_voxel_initial_volume() {
        let mut reference = Array3::zeros((5, 5, 5));
        reference[(2, 2, 2)] = 2u8;
        let s = Sample::new(
            "single",
            LabelVolume::new(reference),
            LabelVolume::from_elem((5, 5, 5), 0),
            LabelDictionary::default(),
            Calibration::new(10.0, 28, (5, 5)).unwrap(),
        )
        .unwrap();
        assert!(f64_eq(s.initial_volume(), 1e-6));
        assert_eq!(s.residual_volume(), 0.0);
        assert!(f64_eq(s.initial_area().unwrap(), 6e-4));
        assert!(f64_eq(s.volume_loss_percent().unwrap(), 100.0));
        // 目标扫描中没有骨钉, 也没有骨.
        assert!(matches!(
            s.bone_to_implant_contact(),
            Err(MorphError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn test_degradation() {
        let s = block_sample();
        assert!(f64_eq(s.initial_volume(), 2.7e-5));
        assert!(f64_eq(s.residual_volume(), 2.4e-5));
        assert!(f64_eq(s.initial_area().unwrap(), 3.6e-3));
        assert!(f64_eq(s.elapsed_time(), 0.2));
        assert!(f64_eq(s.volume_loss(), 3e-6));

        let report = s.degradation().unwrap();
        assert!(f64_eq(report.volume_loss_percent, 100.0 / 9.0));
        assert!(f64_eq(report.degradation_rate, 3e-6 / (3.6e-3 * 0.2)));
        assert_eq!(report.degradation_rate, s.degradation_rate().unwrap());
    }

    #[test]
    fn test_bone_to_implant_contact() {
        let s = block_sample();
        // 骨与骨钉的接触: 降解层被滤除, 每层 2 个面; 暴露面: 每层 12 个面.
        assert!(f64_eq(s.bone_to_implant_contact().unwrap(), 6.0 / 36.0));
        // 原始数据不受影响.
        assert_eq!(s.target().count(3), 3);
    }

    #[test]
    fn test_bic_without_exposed_surface() {
        // 骨钉被骨完全包围, 没有与背景的接触.
        let mut target = Array3::from_elem((1, 3, 3), 4u8);
        target[(0, 1, 1)] = 1;
        let mut reference = Array3::zeros((1, 3, 3));
        reference[(0, 1, 1)] = 2u8;
        let s = Sample::new(
            "wrapped",
            LabelVolume::new(reference),
            LabelVolume::new(target),
            LabelDictionary::default(),
            Calibration::new(10.0, 1, (3, 3)).unwrap(),
        )
        .unwrap();
        // 在 "骨钉" 体数据中骨被滤除为背景, 因此仍有暴露面.
        assert!(f64_eq(s.bone_to_implant_contact().unwrap(), 1.0));

        // 整个切片都是骨钉时, 背景不存在.
        let s = Sample::new(
            "solid",
            LabelVolume::from_elem((1, 3, 3), 2),
            LabelVolume::from_elem((1, 3, 3), 1),
            LabelDictionary::default(),
            Calibration::new(10.0, 1, (3, 3)).unwrap(),
        )
        .unwrap();
        assert!(s.bone_to_implant_contact().is_err());
    }

    #[test]
    fn test_bone_volume_to_total_volume() {
        let s = block_sample();
        assert!(f64_eq(s.bone_volume_to_total_volume(1000.0).unwrap(), 9.0 / 216.0));
        // 半径 2 像素: 每层骨钉外一圈 16 个像素, 其中 3 个为骨.
        assert!(f64_eq(s.bone_volume_to_total_volume(20.0).unwrap(), 9.0 / 48.0));
        // 半径 1 像素: ROI 只包含参考结构自身.
        assert_eq!(
            s.bone_volume_to_total_volume(10.0),
            Err(MorphError::DivisionByZero("roi voxel count"))
        );
        for roi in [20.0, 50.0, 1000.0] {
            let v = s.bone_volume_to_total_volume(roi).unwrap();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_slice_series() {
        let s = block_sample();
        let series = s.slice_series().unwrap();
        assert_eq!(series.len(), 3);
        for z in 0..3 {
            assert!(f64_eq(series.surface_area[z], 1.2e-3));
            assert!(f64_eq(series.volume_loss[z], 1e-6));
            assert!(f64_eq(series.degradation_rate[z], 1e-6 / (1.2e-3 * 0.2)));
        }
        let first = s.slice_series_iter().next().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(s.slice_series_iter().len(), 3);
    }

    #[test]
    fn test_slice_series_reports_index() {
        let mut reference = Array3::zeros((3, 4, 4));
        reference.slice_mut(s![0..2, 1..3, 1..3]).fill(2u8);
        let s = Sample::new(
            "partial",
            LabelVolume::new(reference),
            LabelVolume::from_elem((3, 4, 4), 0),
            LabelDictionary::default(),
            Calibration::new(10.0, 10, (4, 4)).unwrap(),
        )
        .unwrap();
        let records: Vec<_> = s.slice_series_iter().collect();
        assert!(records[0].is_ok());
        assert!(records[1].is_ok());
        assert!(matches!(
            records[2],
            Err(MorphError::AtSlice { index: 2, .. })
        ));
        assert!(s.slice_series().is_err());
    }

    #[test]
    fn test_construction_checks() {
        let cal = Calibration::new(10.0, 10, (4, 4)).unwrap();
        let dict = LabelDictionary::default();
        let ok = LabelVolume::from_elem((2, 4, 4), 0);

        let e = Sample::new("a", ok.clone(), LabelVolume::from_elem((3, 4, 4), 0), dict, cal);
        assert!(matches!(e, Err(MorphError::ShapeMismatch { .. })));

        let e = Sample::new(
            "b",
            LabelVolume::from_elem((2, 5, 4), 0),
            LabelVolume::from_elem((2, 5, 4), 0),
            dict,
            cal,
        );
        assert!(matches!(e, Err(MorphError::SliceShapeMismatch { .. })));

        let e = Sample::new("c", ok.clone(), LabelVolume::from_elem((2, 4, 4), 9), dict, cal);
        assert_eq!(e.unwrap_err(), MorphError::UnknownLabel(9));

        assert!(Sample::new("d", ok.clone(), ok, dict, cal).is_ok());
    }

    #[test]
    fn test_summary_keeps_independent_results() {
        let s = block_sample();
        let summary = s.summary(10.0);
        assert_eq!(summary.name, "block");
        assert!(summary.degradation_rate.is_ok());
        assert!(summary.bone_to_implant_contact.is_ok());
        assert!(summary.bone_volume_to_total_volume.is_err());
    }

    /// 在临时目录中保存体数据, 返回路径字符串.
    fn save_volume(dir: &Path, name: &str, data: Array3<u8>) -> String {
        let path = dir.join(name);
        LabelVolume::new(data).save_npy(&path).unwrap();
        path.to_str().unwrap().to_owned()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("screw-berry-load-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(reference: String, target: String, img_size: (usize, usize)) -> SampleConfig {
        SampleConfig {
            name: "loaded".to_string(),
            num_days: 73,
            reference,
            target,
            smooth: None,
            pixel_size: 10.0,
            labels: LabelDictionary::default(),
            img_size,
            roi_size: 1000.0,
        }
    }

    #[test]
    fn test_load_from_images() {
        let dir = scratch_dir("png");
        let (ref_dir, tgt_dir) = (dir.join("ref"), dir.join("tgt"));
        fs::create_dir_all(&ref_dir).unwrap();
        fs::create_dir_all(&tgt_dir).unwrap();
        for z in 0..3 {
            let mut r = Array2::zeros((6, 5));
            r.slice_mut(s![2..4, 1..4]).fill(2u8);
            let mut t = Array2::zeros((6, 5));
            t.slice_mut(s![2..4, 1..3]).fill(1u8);
            OwnedLabelSlice::from(r).save_raw(ref_dir.join(format!("{z:03}.png"))).unwrap();
            OwnedLabelSlice::from(t).save_raw(tgt_dir.join(format!("{z:03}.png"))).unwrap();
        }
        let c = config(
            ref_dir.join("*.png").to_str().unwrap().to_owned(),
            tgt_dir.join("*.png").to_str().unwrap().to_owned(),
            (6, 5),
        );
        let s = Sample::load(&c).unwrap();
        assert_eq!(s.name(), "loaded");
        assert_eq!(s.reference().shape(), (3, 6, 5));
        assert_eq!(s.reference().count(2), 18);
        assert_eq!(s.target().count(1), 12);
        assert!(f64_eq(s.volume_loss_percent().unwrap(), 100.0 / 3.0));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_smooths_target_only() {
        let dir = scratch_dir("smooth");
        let mut reference = Array3::zeros((1, 5, 5));
        reference[(0, 2, 2)] = 2u8;
        let mut target = Array3::from_elem((1, 5, 5), 1u8);
        target[(0, 2, 2)] = 3;
        let mut c = config(
            save_volume(&dir, "ref.npy", reference),
            save_volume(&dir, "tgt.npy", target),
            (5, 5),
        );

        let s = Sample::load(&c).unwrap();
        assert_eq!(s.target().count(3), 1);

        c.smooth = Some(vec![0, 1, 2, 3]);
        let s = Sample::load(&c).unwrap();
        assert_eq!(s.target().count(3), 0);
        assert_eq!(s.target().count(1), 25);
        // 参考扫描不做平滑, 孤立的参考骨钉体素保留.
        assert_eq!(s.reference().count(2), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_errors() {
        let dir = scratch_dir("errors");
        let ok = save_volume(&dir, "ok.npy", Array3::zeros((2, 4, 4)));
        let deeper = save_volume(&dir, "deeper.npy", Array3::zeros((3, 4, 4)));
        let unknown = save_volume(&dir, "unknown.npy", Array3::from_elem((2, 4, 4), 9u8));

        let e = Sample::load(&config(ok.clone(), deeper, (4, 4))).unwrap_err();
        assert!(matches!(e, LoadError::Morph(MorphError::ShapeMismatch { .. })));

        let e = Sample::load(&config(ok.clone(), unknown, (4, 4))).unwrap_err();
        assert!(matches!(e, LoadError::Morph(MorphError::UnknownLabel(9))));

        let e = Sample::load(&config(ok.clone(), ok.clone(), (5, 4))).unwrap_err();
        assert!(matches!(e, LoadError::Morph(MorphError::SliceShapeMismatch { .. })));

        // 配置本身非法时不读取任何文件.
        let mut c = config("missing/*.png".to_string(), "missing/*.png".to_string(), (4, 4));
        c.pixel_size = -1.0;
        let e = Sample::load(&c).unwrap_err();
        assert!(matches!(e, LoadError::Morph(MorphError::InvalidCalibration(_))));

        let mut c = config(ok.clone(), ok.clone(), (4, 4));
        c.smooth = Some(vec![42]);
        let e = Sample::load(&c).unwrap_err();
        assert!(matches!(e, LoadError::Morph(MorphError::UnknownLabel(42))));

        let missing = dir.join("nothing-*.png").to_str().unwrap().to_owned();
        let e = Sample::load(&config(missing, ok, (4, 4))).unwrap_err();
        assert!(matches!(e, LoadError::EmptyInput(_)));
        fs::remove_dir_all(dir).unwrap();
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_slice_series() {
        let s = block_sample();
        assert_eq!(s.par_slice_series().unwrap(), s.slice_series().unwrap());
    }
}
