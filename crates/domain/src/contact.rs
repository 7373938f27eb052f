//! # 連絡先情報
//!
//! 署名テンプレートに渡す連絡先ブロック。
//! ドメイン層では中身を解釈せず、テンプレートにそのまま渡す。

use serde::{Deserialize, Serialize};

/// 署名に埋め込む連絡先
///
/// テンプレートからは `organisationName`, `name`, `phone`, `fax` として参照される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// 組織名
    pub organisation_name: String,
    /// 氏名
    pub name:              String,
    /// 電話番号
    pub phone:             String,
    /// FAX 番号
    pub fax:               String,
}
