//! 体素标签的语义角色与标签字典.
//!
//! 算法只关心角色 ([`Role`]), 而每个样本的具体整数编码由 [`LabelDictionary`] 提供.

use crate::consts::*;
use crate::{MorphError, MorphResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 体素的语义角色.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// 背景 (空气, 软组织等).
    Background,

    /// 目标扫描中残余的骨钉.
    Screw,

    /// 参考扫描中的原始骨钉.
    ScrewRef,

    /// 骨钉表面的降解层.
    DegradationLayer,

    /// 骨组织.
    Bone,
}

impl Role {
    /// 全部五种角色, 按字典字段顺序排列.
    pub const ALL: [Role; 5] = [
        Role::Background,
        Role::Screw,
        Role::ScrewRef,
        Role::DegradationLayer,
        Role::Bone,
    ];

    /// 角色名称, 与配置文件中的字段名一致.
    pub const fn name(&self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::Screw => "screw",
            Role::ScrewRef => "screw_ref",
            Role::DegradationLayer => "degradation_layer",
            Role::Bone => "bone",
        }
    }
}

/// 角色到整数编码的映射. 在一个样本的生命周期内保持不变.
///
/// 通过 [`LabelDictionary::new`] 构建时保证五个编码两两不同.
/// 反序列化得到的字典需要调用 [`LabelDictionary::validate`] 检查.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelDictionary {
    background: u8,
    screw: u8,
    screw_ref: u8,
    degradation_layer: u8,
    bone: u8,
}

impl Default for LabelDictionary {
    /// 背景 0, 骨钉 1, 参考骨钉 2, 降解层 3, 骨 4.
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            screw: DEFAULT_SCREW,
            screw_ref: DEFAULT_SCREW_REF,
            degradation_layer: DEFAULT_DEGRADATION_LAYER,
            bone: DEFAULT_BONE,
        }
    }
}

impl LabelDictionary {
    /// 构建标签字典. 如果存在重复编码则返回 `Err(DuplicateCode)`.
    pub fn new(
        background: u8,
        screw: u8,
        screw_ref: u8,
        degradation_layer: u8,
        bone: u8,
    ) -> MorphResult<Self> {
        let ans = Self {
            background,
            screw,
            screw_ref,
            degradation_layer,
            bone,
        };
        ans.validate()?;
        Ok(ans)
    }

    /// 检查五个编码是否两两不同.
    pub fn validate(&self) -> MorphResult<()> {
        let codes = self.codes();
        for (i, code) in codes.iter().enumerate() {
            if codes[i + 1..].contains(code) {
                return Err(MorphError::DuplicateCode(*code));
            }
        }
        Ok(())
    }

    /// 获取角色 `role` 对应的整数编码.
    #[inline]
    pub const fn code(&self, role: Role) -> u8 {
        match role {
            Role::Background => self.background,
            Role::Screw => self.screw,
            Role::ScrewRef => self.screw_ref,
            Role::DegradationLayer => self.degradation_layer,
            Role::Bone => self.bone,
        }
    }

    /// 反查编码 `code` 对应的角色. 不存在时返回 `None`.
    pub fn role_of(&self, code: u8) -> Option<Role> {
        Role::ALL.into_iter().find(|r| self.code(*r) == code)
    }

    /// 编码 `code` 是否属于该字典?
    #[inline]
    pub fn contains_code(&self, code: u8) -> bool {
        self.role_of(code).is_some()
    }

    /// 按 [`Role::ALL`] 的顺序获取全部编码.
    #[inline]
    pub fn codes(&self) -> [u8; 5] {
        Role::ALL.map(|r| self.code(r))
    }

    /// 背景编码.
    #[inline]
    pub const fn background(&self) -> u8 {
        self.background
    }

    /// 骨钉编码.
    #[inline]
    pub const fn screw(&self) -> u8 {
        self.screw
    }

    /// 参考骨钉编码.
    #[inline]
    pub const fn screw_ref(&self) -> u8 {
        self.screw_ref
    }

    /// 降解层编码.
    #[inline]
    pub const fn degradation_layer(&self) -> u8 {
        self.degradation_layer
    }

    /// 骨组织编码.
    #[inline]
    pub const fn bone(&self) -> u8 {
        self.bone
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelDictionary, Role};
    use crate::MorphError;

    #[test]
    fn test_default_codes() {
        let d = LabelDictionary::default();
        assert_eq!(d.codes(), [0, 1, 2, 3, 4]);
        assert!(d.validate().is_ok());
        for role in Role::ALL {
            assert_eq!(d.role_of(d.code(role)), Some(role));
        }
        assert_eq!(d.role_of(200), None);
        assert_eq!(Role::DegradationLayer.name(), "degradation_layer");
    }

    #[test]
    fn test_duplicate_code() {
        let e = LabelDictionary::new(0, 1, 2, 1, 4).unwrap_err();
        assert_eq!(e, MorphError::DuplicateCode(1));

        let d = LabelDictionary::new(10, 20, 30, 40, 50).unwrap();
        assert_eq!(d.code(Role::Bone), 50);
        assert!(d.contains_code(30));
        assert!(!d.contains_code(0));
    }
}
